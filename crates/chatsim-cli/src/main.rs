mod command;
mod events;
mod script;
mod session;

use std::path::PathBuf;
use std::time::Instant;

use chatsim_core::{ChatConfig, ChatCore};
use clap::{Parser, Subcommand};
use events::Format;
use session::Session;

#[derive(Parser)]
#[command(name = "chatsim", about = "In-memory multi-user messaging simulator")]
struct Cli {
    /// Maximum number of registered users (default 200, or CHATSIM_MAX_USERS).
    #[arg(long)]
    max_users: Option<usize>,

    /// Maximum number of groups (default 50, or CHATSIM_MAX_GROUPS).
    #[arg(long)]
    max_groups: Option<usize>,

    /// Emit one JSON object per event instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run session commands from a script file, or stdin.
    Run {
        /// Script file, one command per line.
        #[arg(long)]
        script: Option<PathBuf>,
    },

    /// Run the built-in offline-delivery and group-broadcast scenario.
    Demo,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let start = Instant::now();

    let mut config = ChatConfig::new();
    if let Some(limit) = cli.max_users {
        config = config.max_users(limit);
    }
    if let Some(limit) = cli.max_groups {
        config = config.max_groups(limit);
    }
    let mut session = Session::new(ChatCore::new(config));

    let format = if cli.json { Format::Json } else { Format::Text };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let executed = match cli.command {
        Command::Run { script: path } => {
            script::run_script(&mut session, path.as_deref(), &mut out, format)?
        }
        Command::Demo => {
            script::run_lines(&mut session, script::DEMO_SCRIPT.as_bytes(), &mut out, format)?
        }
    };

    if let Some(user) = session.current_user() {
        tracing::debug!("{user} still logged in at exit");
    }
    let core = session.core();
    tracing::info!(
        "{executed} commands, {} users, {} groups in {:.1} ms",
        core.directory().user_count(),
        core.directory().group_count(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}
