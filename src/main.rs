//! launchauth CLI - load client auth credentials from the environment or the launcher.

use std::io;
use std::process;

use clap::Parser;
use launchauth::auth::{self, AuthState};
use launchauth::cli::{Cli, Commands, ServerCommands};
use launchauth::commands::{self, Output};
use launchauth::config::{self, Settings, SettingsOverrides};
use launchauth::launcher::LoginQuery;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr so stdout stays machine-readable. Use `RUST_LOG` to
/// control the level (e.g. `RUST_LOG=launchauth=debug`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let human = cli.human_readable;
    let overrides = SettingsOverrides {
        data_dir: cli.data_dir,
    };

    // Defaults, then environment overrides. A bad structured value is fatal.
    let mut state = AuthState::new();
    let env_applied = match auth::load_from_env(&mut state) {
        Ok(applied) => applied,
        Err(e) => exit_with_error(&e, human),
    };
    debug!(?env_applied, "Auth state initialized");

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Import {
            username,
            server_id,
            server_url,
        } => {
            let settings = resolve_settings(&overrides, human);
            let query = LoginQuery {
                username,
                server_id,
                server_url,
            };
            match commands::import(&mut state, &settings, query) {
                Ok(result) => {
                    info!(logged_in = state.is_logged_in(), "Import finished");
                    output(&result, human);
                }
                Err(e) => exit_with_error(&e, human),
            }
        }
        Commands::Status => {
            // The store path is informational here; an unresolvable data dir is not an error.
            let settings = config::resolve_settings(&overrides).ok();
            output(&commands::status(&state, &env_applied, settings.as_ref()), human);
        }
        Commands::Servers { command } => match command {
            ServerCommands::List => output(&commands::servers_list(&state), human),
            ServerCommands::Encode => output(&commands::servers_encode(&state), human),
            ServerCommands::Find { id, url } => output(
                &commands::servers_find(&state, id.as_deref(), url.as_deref()),
                human,
            ),
        },
    }
}

fn resolve_settings(overrides: &SettingsOverrides, human: bool) -> Settings {
    match config::resolve_settings(overrides) {
        Ok(settings) => {
            debug!(
                data_dir = %settings.data_dir.value.display(),
                source = %settings.data_dir.source,
                "Resolved data directory"
            );
            settings
        }
        Err(e) => exit_with_error(&e, human),
    }
}

fn exit_with_error(error: &dyn std::error::Error, human: bool) -> ! {
    if human {
        eprintln!("Error: {}", error);
    } else {
        eprintln!("{}", serde_json::json!({ "error": error.to_string() }));
    }
    process::exit(1);
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
