//! CLI argument definitions for launchauth.

use clap::{Parser, Subcommand};

/// launchauth - load client auth credentials from the environment or the launcher.
///
/// `ROBUST_AUTH_*` environment variables are applied before every command.
#[derive(Parser, Debug)]
#[command(name = "launchauth")]
#[command(author, version, long_version = crate::commands::LONG_VERSION)]
#[command(about = "Load client auth credentials from the environment or the launcher", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Base data directory containing the launcher directory.
    /// Defaults to LAUNCHAUTH_DATA_DIR, then the platform user data directory.
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import a saved login from the launcher's session store
    ///
    /// Picks the first unexpired login matching the optional filters.
    /// The custom server id requires a server URL; other server ids reject one.
    Import {
        /// Account name to match exactly
        username: Option<String>,

        /// Auth server id to match (e.g. Space-Wizards, or Custom)
        server_id: Option<String>,

        /// Auth server URL, only valid with the Custom server id
        server_url: Option<String>,
    },

    /// Show the current auth state (default when no command is given)
    Status,

    /// Known auth server commands
    Servers {
        #[command(subcommand)]
        command: ServerCommands,
    },
}

/// Auth server subcommands
#[derive(Subcommand, Debug)]
pub enum ServerCommands {
    /// List known auth servers
    List,

    /// Print known auth servers as an `id@url,...` list
    Encode,

    /// Find a known auth server by id or URL
    Find {
        /// Server id (case-sensitive)
        #[arg(long, conflicts_with = "url", required_unless_present = "url")]
        id: Option<String>,

        /// Server endpoint URL
        #[arg(long)]
        url: Option<String>,
    },
}
