use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ytdoc")]
#[command(author, version, about = "YouTube video metadata, transcript and comment extraction")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// YouTube URL to process (shorthand for `extract <URL>`)
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    #[command(flatten)]
    pub options: ExtractOptions,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract metadata, transcript and comments for a single video
    Extract {
        /// YouTube URL or video id
        url: String,

        #[command(flatten)]
        options: ExtractOptions,
    },

    /// Check providers, proxy and API key
    Doctor,

    /// Show configuration
    Config,
}

#[derive(clap::Args, Clone, Debug)]
pub struct ExtractOptions {
    /// Preferred transcript language (defaults to config, then "en")
    #[arg(short, long)]
    pub language: Option<String>,

    /// Transcript character limit, 0 disables truncation
    #[arg(short = 'm', long, allow_negative_numbers = true)]
    pub max_length: Option<i64>,

    /// Include comments (needs a YouTube API key)
    #[arg(short, long)]
    pub comments: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty printed JSON
    Json,
    /// Human readable summary followed by the transcript
    Text,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_shorthand() {
        let cli = Cli::parse_from(["ytdoc", "https://youtu.be/dQw4w9WgXcQ", "-c", "-vv"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.url.as_deref(), Some("https://youtu.be/dQw4w9WgXcQ"));
        assert!(cli.options.comments);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.options.format, OutputFormat::Json);
    }

    #[test]
    fn test_extract_subcommand() {
        let cli = Cli::parse_from([
            "ytdoc", "extract", "dQw4w9WgXcQ", "-l", "de", "-m", "500", "-f", "text", "-o",
            "out.txt",
        ]);
        match cli.command {
            Some(Commands::Extract { url, options }) => {
                assert_eq!(url, "dQw4w9WgXcQ");
                assert_eq!(options.language.as_deref(), Some("de"));
                assert_eq!(options.max_length, Some(500));
                assert_eq!(options.format, OutputFormat::Text);
                assert_eq!(options.output, Some(PathBuf::from("out.txt")));
                assert!(!options.comments);
            }
            _ => panic!("expected extract"),
        }
    }
}
