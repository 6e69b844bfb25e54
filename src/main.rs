use agenda::app::AppState;
use agenda::config::{default_config_file, load_config, Config};
use agenda::input::{ask_user_id, report_load, run_menu, Console, KeyboardTicker, MenuContext, SessionEnd};
use agenda::persistence::Store;
use agenda::ticker::{SleepTicker, Ticker};
use agenda::ui;
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "A terminal task agenda with a Pomodoro timer and points-based levels", long_about = None)]
struct Cli {
    /// User ID. Asked for interactively when omitted
    #[arg(short, long)]
    user: Option<String>,

    /// Directory holding the tasks_<user>.json files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Config file. Defaults to <config dir>/agenda/config.json
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the agenda once and exit
    Show,
    /// Print the path of the user's data file
    Path,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("AGENDA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(io::stderr))
        .init();
}

fn load_settings(cli: &Cli) -> Result<Config> {
    match cli.config.clone().or_else(default_config_file) {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            load_config(path)
        }
        None => Ok(Config::default()),
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = load_settings(&cli)?;
    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.resolved_data_dir());
    let store = Store::new(data_dir);
    info!(data_dir = %store.data_dir().display(), "using data directory");

    match cli.command {
        Some(Commands::Path) => {
            let Some(user) = cli.user.as_deref() else {
                bail!("--user is required for this command");
            };
            println!("{}", store.path_for(user).display());
            Ok(())
        }
        Some(Commands::Show) => {
            let Some(user) = cli.user.as_deref() else {
                bail!("--user is required for this command");
            };
            let app = AppState::load(store, config, user);
            let today = chrono::Local::now().date_naive();
            ui::render_agenda(&mut io::stdout(), &app.agenda(), &app.completed(), today)?;
            Ok(())
        }
        None => run_interactive(cli.user, store, config),
    }
}

fn run_interactive(user: Option<String>, store: Store, config: Config) -> Result<()> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut console = Console::new(stdin.lock(), io::stdout());

    let userid = match user {
        Some(user) if !user.trim().is_empty() => user.trim().to_string(),
        _ => match ask_user_id(&mut console)? {
            Some(user) => user,
            None => return Ok(()),
        },
    };

    let mut app = AppState::load(store, config, &userid);
    report_load(&app, &mut console)?;

    // Keys can only interrupt the timer on a real terminal
    let mut ticker: Box<dyn Ticker> = if interactive {
        Box::new(KeyboardTicker::default())
    } else {
        Box::new(SleepTicker::default())
    };
    let mut ctx = MenuContext {
        ticker: ticker.as_mut(),
        today: chrono::Local::now().date_naive(),
        desktop_notifications: interactive,
    };

    let end = run_menu(&mut app, &mut console, &mut ctx)?;
    if end == SessionEnd::InputClosed {
        console.line("\nInput closed. Exiting without saving.")?;
    }
    info!(user = %userid, ?end, "session ended");
    Ok(())
}
