//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Inspect and edit CPF content through layered sources
#[derive(Parser, Debug)]
#[command(name = "cpf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Sources file describing the layered content
    #[arg(short, long, env = "CPF_SOURCES", conflicts_with = "roots")]
    pub sources: Option<PathBuf>,

    /// Content directory; repeat to layer several, earlier ones win
    #[arg(short, long = "root", value_name = "DIR")]
    pub roots: Vec<PathBuf>,

    /// Base path prefixed to every content path
    #[arg(short, long)]
    pub base: Option<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Check whether a path exists in any source
    Exists { path: String },

    /// Print the content of a file
    Cat { path: String },

    /// Show what is known about an entry
    Stat { path: String },

    /// List entries below a path
    ///
    /// Examples:
    ///   cpf --root ./solution ls /public --depth 1 --dirs
    ///   cpf --root ./solution ls / --ext wcdf --ext cda
    Ls {
        #[arg(default_value = "/")]
        path: String,

        #[command(flatten)]
        options: ListArgs,
    },

    /// Save a local file into the first source
    Put {
        path: String,

        /// Local file to upload
        file: PathBuf,
    },

    /// Copy content into the first source
    Cp { from: String, to: String },

    /// Delete an entry from the first source
    Rm { path: String },

    /// Create a folder in the first source
    Mkdir {
        path: String,

        #[arg(long)]
        hidden: bool,
    },

    /// Generate shell completions
    ///
    /// Examples:
    ///   cpf completions bash > ~/.local/share/bash-completion/completions/cpf
    ///   cpf completions zsh > ~/.zfunc/_cpf
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Listing options
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ListArgs {
    /// Levels to descend; negative means unbounded
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub depth: i32,

    /// Include directories
    #[arg(long)]
    pub dirs: bool,

    /// Include hidden entries
    #[arg(long)]
    pub hidden: bool,

    /// Only files with these extensions
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,
}
