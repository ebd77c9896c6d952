use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

use crate::args::{ExtractOptions, OutputFormat};
use ytdoc_core::{config::Config, ExtractionResult, VideoQuery, YoutubeProcessor};

pub async fn run(url: &str, options: &ExtractOptions, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    let query = VideoQuery {
        url: url.to_string(),
        language: options
            .language
            .clone()
            .unwrap_or_else(|| config.extract.language.clone()),
        max_transcript_length: options
            .max_length
            .unwrap_or(config.extract.max_transcript_length),
        include_comments: options.comments,
    };

    let processor = YoutubeProcessor::new(config);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.cyan} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Extracting {}...", url));

    let result = match processor.process_video(&query).await {
        Ok(result) => {
            pb.finish_and_clear();
            result
        }
        Err(e) => {
            pb.abandon_with_message(format!("Failed: {}", e));
            return Err(e.into());
        }
    };

    let rendered = match options.format {
        OutputFormat::Json => serde_json::to_string_pretty(&result)?,
        OutputFormat::Text => render_text(&result),
    };

    match options.output {
        Some(ref path) => {
            write_output(path, &rendered)?;
            println!("Output: {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))
}

fn render_text(result: &ExtractionResult) -> String {
    let meta = &result.metadata;
    let mut out = String::new();

    out.push_str(&format!("{}\n", meta.title));
    out.push_str(&format!("{}\n", "=".repeat(meta.title.chars().count().min(80))));
    out.push_str(&format!("Channel:   {}\n", meta.channel));
    out.push_str(&format!("Duration:  {}\n", format_duration(meta.duration)));
    if let Some(views) = meta.view_count {
        out.push_str(&format!("Views:     {}\n", views));
    }
    if let Some(date) = meta.upload_date {
        out.push_str(&format!("Uploaded:  {}\n", date));
    }
    out.push_str(&format!("URL:       {}\n", meta.url));
    if let Some(ref language) = meta.detected_transcript_language {
        out.push_str(&format!("Language:  {}\n", language));
    }

    if !meta.description.is_empty() {
        out.push_str(&format!("\nDescription\n-----------\n{}\n", meta.description));
    }

    match result.transcript {
        Some(ref transcript) => {
            out.push_str(&format!("\nTranscript\n----------\n{}\n", transcript));
        }
        None => out.push_str("\nTranscript: not available\n"),
    }

    if let Some(ref comments) = result.comments {
        out.push_str("\nComments\n--------\n");
        for comment in comments {
            out.push_str(&format!("- {}\n", comment));
        }
    }

    out
}

fn format_duration(seconds: u64) -> String {
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}
