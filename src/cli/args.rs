//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// Fabula - Storybook Generation Toolset
///
/// Turns hand-authored page YAML into illustrated storybook pages,
/// caches every generated image by prompt fingerprint, and compiles
/// per-character PDF books from versioned manifests.
#[derive(Parser, Debug)]
#[command(name = "fabula")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "FABULA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Plain output: no spinners, bars or prompts
    #[arg(long, global = true)]
    pub plain: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate page images into a version
    Generate(GenerateArgs),

    /// Compile a character's pages into a PDF book
    Book(BookArgs),

    /// Add print bleed and fold guides to an image
    Frame(FrameArgs),

    /// List versions and their contents
    Versions(VersionsArgs),

    /// Validate the content base structure
    Check,

    /// Print a character's story text as Markdown
    Text(TextArgs),

    /// Print the prompt and fingerprint for a page without generating
    Prompt(PromptArgs),

    /// Mint a version that merges selections from other versions
    Merge(MergeArgs),

    /// Copy a page's image selection from another version
    Pick(PickArgs),

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Scaffold a new content base
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the generate command
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Page ids to generate (e.g. p01-mia); all pages when empty
    pub pages: Vec<String>,

    /// Restrict to pages featuring this character
    #[arg(long)]
    pub character: Option<String>,

    /// Style id (overrides generation.style)
    #[arg(short, long)]
    pub style: Option<String>,

    /// Version message, required when content changed since the
    /// latest version
    #[arg(short, long)]
    pub message: Option<String>,

    /// Maximum in-flight generation calls
    #[arg(short, long)]
    pub workers: Option<usize>,
}

/// Arguments for the book command
#[derive(Parser, Debug)]
pub struct BookArgs {
    /// Character id the book is for
    pub character: String,

    /// Version to compile from (defaults to latest)
    #[arg(id = "book_version", value_name = "VERSION")]
    pub version: Option<u32>,

    /// Frame each page with print bleed and guides first
    #[arg(long)]
    pub framed: bool,
}

/// Arguments for the frame command
#[derive(Parser, Debug)]
pub struct FrameArgs {
    /// Image to frame
    pub image: PathBuf,
}

/// Arguments for the versions command
#[derive(Parser, Debug)]
pub struct VersionsArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the text command
#[derive(Parser, Debug)]
pub struct TextArgs {
    /// Character id
    pub character: String,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the prompt command
#[derive(Parser, Debug)]
pub struct PromptArgs {
    /// Page id (e.g. p01-mia)
    pub page: String,

    /// Style id (overrides generation.style)
    #[arg(short, long)]
    pub style: Option<String>,
}

/// Arguments for the merge command
#[derive(Parser, Debug)]
pub struct MergeArgs {
    /// Versions to merge selections from (comma-separated)
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub sources: Vec<u32>,

    /// Version message
    #[arg(short, long)]
    pub message: String,
}

/// Arguments for the pick command
#[derive(Parser, Debug)]
pub struct PickArgs {
    /// Page id to copy (e.g. p03-mia)
    pub page: String,

    /// Version to copy the selection from
    #[arg(long)]
    pub from: u32,

    /// Version to record the selection in (defaults to latest)
    #[arg(long)]
    pub to: Option<u32>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., generation.style)
        key: String,
        /// Value to set
        value: String,
        /// Write to project-local .fabula.toml instead of global config
        #[arg(long)]
        local: bool,
    },
}

/// Arguments for the init command
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Overwrite existing content files
    #[arg(short, long)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format for the versions command
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_generate() {
        let cli = Cli::parse_from(["fabula", "generate", "p01-mia", "p02-mia", "-m", "first"]);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.pages, vec!["p01-mia", "p02-mia"]);
                assert_eq!(args.message.as_deref(), Some("first"));
                assert!(args.style.is_none());
            }
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn cli_parses_generate_filters() {
        let cli = Cli::parse_from([
            "fabula",
            "generate",
            "--character",
            "mia",
            "--style",
            "ink",
            "--workers",
            "5",
        ]);
        match cli.command {
            Commands::Generate(args) => {
                assert!(args.pages.is_empty());
                assert_eq!(args.character.as_deref(), Some("mia"));
                assert_eq!(args.style.as_deref(), Some("ink"));
                assert_eq!(args.workers, Some(5));
            }
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn cli_parses_book_with_version() {
        let cli = Cli::parse_from(["fabula", "book", "mia", "3", "--framed"]);
        match cli.command {
            Commands::Book(args) => {
                assert_eq!(args.character, "mia");
                assert_eq!(args.version, Some(3));
                assert!(args.framed);
            }
            _ => panic!("expected Book command"),
        }
    }

    #[test]
    fn cli_parses_book_latest() {
        let cli = Cli::parse_from(["fabula", "book", "mia"]);
        match cli.command {
            Commands::Book(args) => {
                assert_eq!(args.character, "mia");
                assert_eq!(args.version, None);
                assert!(!args.framed);
            }
            _ => panic!("expected Book command"),
        }
    }

    #[test]
    fn cli_parses_merge_sources() {
        let cli = Cli::parse_from(["fabula", "merge", "--sources", "2,3", "-m", "best of both"]);
        match cli.command {
            Commands::Merge(args) => {
                assert_eq!(args.sources, vec![2, 3]);
                assert_eq!(args.message, "best of both");
            }
            _ => panic!("expected Merge command"),
        }
    }

    #[test]
    fn cli_merge_requires_sources() {
        let result = Cli::try_parse_from(["fabula", "merge", "-m", "msg"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parses_pick() {
        let cli = Cli::parse_from(["fabula", "pick", "p03-mia", "--from", "2", "--to", "5"]);
        match cli.command {
            Commands::Pick(args) => {
                assert_eq!(args.page, "p03-mia");
                assert_eq!(args.from, 2);
                assert_eq!(args.to, Some(5));
            }
            _ => panic!("expected Pick command"),
        }
    }

    #[test]
    fn cli_parses_check() {
        let cli = Cli::parse_from(["fabula", "check"]);
        assert!(matches!(cli.command, Commands::Check));
    }

    #[test]
    fn cli_parses_versions_format() {
        let cli = Cli::parse_from(["fabula", "versions", "--format", "json"]);
        match cli.command {
            Commands::Versions(args) => {
                assert!(matches!(args.format, OutputFormat::Json));
            }
            _ => panic!("expected Versions command"),
        }
    }

    #[test]
    fn cli_parses_init_force() {
        let cli = Cli::parse_from(["fabula", "init", "--force"]);
        match cli.command {
            Commands::Init(args) => assert!(args.force),
            _ => panic!("expected Init command"),
        }
    }

    #[test]
    fn cli_plain_flag() {
        let cli = Cli::parse_from(["fabula", "--plain", "check"]);
        assert!(cli.plain);
    }

    #[test]
    fn cli_verbose_levels() {
        let cli = Cli::parse_from(["fabula", "check"]);
        assert_eq!(cli.verbose, 0);

        let cli = Cli::parse_from(["fabula", "-v", "check"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["fabula", "-vv", "check"]);
        assert_eq!(cli.verbose, 2);
    }
}
