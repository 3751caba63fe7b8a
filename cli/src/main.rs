//! `liftbook`: terminal front end for the Liftbook workout tracker.
//!
//! ARCHITECTURE
//! ============
//! Each subcommand is one screen of the app. A run loads the local state
//! file into an `AppContext`, builds an `HttpBackend` carrying the stored
//! session token, repairs a draft whose workout already reached the server,
//! then dispatches. Long-running screens (`history --follow`,
//! `workout rest`) tick once per second until done or interrupted.

mod commands;
mod screens;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use client::net::api::HttpBackend;
use client::{AppContext, ClientError, FileStore};
use client::storage::StorageError;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const STATE_FILE: &str = "liftbook.json";

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no data directory; pass --data-dir or set LIFTBOOK_DATA_DIR")]
    NoDataDir,
    #[error("unknown exercise: {0}")]
    UnknownExercise(String),
    #[error("no {what} at position {position}")]
    BadPosition { what: &'static str, position: usize },
}

#[derive(Parser, Debug)]
#[command(name = "liftbook", about = "Track workouts, templates and progress")]
struct Cli {
    #[arg(long, env = "LIFTBOOK_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    /// Directory holding the local state file.
    #[arg(long, env = "LIFTBOOK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log client activity to stderr.
    #[arg(long, short, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Greeting, active workout and quick stats.
    Home,
    Login(CredentialsArgs),
    Register(CredentialsArgs),
    Logout,
    /// Print the GitHub sign-in URL, or adopt the token it returned.
    LoginGithub {
        #[arg(long)]
        token: Option<String>,
    },
    #[command(subcommand)]
    Profile(ProfileCommand),
    #[command(subcommand)]
    Theme(ThemeCommand),
    History(HistoryArgs),
    #[command(subcommand)]
    Workout(WorkoutCommand),
    #[command(subcommand)]
    Exercises(ExercisesCommand),
    #[command(subcommand)]
    Templates(TemplatesCommand),
    Stats {
        /// Show per-workout progress for one exercise.
        #[arg(long)]
        exercise: Option<String>,
    },
}

#[derive(Args, Debug)]
struct CredentialsArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "LIFTBOOK_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    Show,
    Rename { name: String },
    /// Upload a PNG, JPEG, GIF or WebP profile picture.
    Picture { path: PathBuf },
    /// Permanently delete the account and every document in it.
    DeleteAccount {
        #[arg(long, env = "LIFTBOOK_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Subcommand, Debug)]
enum ThemeCommand {
    Show,
    Toggle,
}

#[derive(Args, Debug)]
struct HistoryArgs {
    /// 1-based page of ten workouts.
    #[arg(long, default_value_t = 1)]
    page: usize,
    /// Keep running and print workouts saved from other sessions.
    #[arg(long, default_value_t = false)]
    follow: bool,
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum WorkoutCommand {
    Start {
        #[arg(long)]
        template: Option<Uuid>,
    },
    Add { name: String },
    /// Edit one set; positions are 1-based.
    Set {
        exercise: String,
        position: usize,
        #[arg(long)]
        weight: Option<String>,
        #[arg(long)]
        reps: Option<String>,
    },
    AddSet { exercise: String },
    Remove { exercise: String },
    Show,
    Finish,
    Discard,
    /// Count down a rest period while the workout clock keeps running.
    Rest { secs: u64 },
}

#[derive(Subcommand, Debug)]
enum ExercisesCommand {
    List,
    Add {
        name: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        muscle: String,
    },
    Delete { id: Uuid },
}

#[derive(Subcommand, Debug)]
enum TemplatesCommand {
    List,
    Create {
        name: String,
        /// Exercise names in order; repeat the flag.
        #[arg(long = "exercise", required = true)]
        exercises: Vec<String>,
    },
    Show { id: Uuid },
    AddExercise { id: Uuid, name: String },
    /// Move the exercise at FROM before (or with --after, after) TO.
    Move {
        id: Uuid,
        from: usize,
        to: usize,
        #[arg(long, default_value_t = false)]
        after: bool,
    },
    RemoveExercise { id: Uuid, position: usize },
    Delete { id: Uuid },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info,client=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}

fn state_path(data_dir: Option<PathBuf>) -> Result<PathBuf, CliError> {
    let dir = data_dir
        .or_else(|| dirs::data_dir().map(|d| d.join("liftbook")))
        .ok_or(CliError::NoDataDir)?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join(STATE_FILE))
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let store = FileStore::open(state_path(cli.data_dir)?)?;
    let mut ctx = AppContext::load(store);
    let backend = HttpBackend::new(&cli.base_url, ctx.token())?;

    if ctx.draft.is_active() && ctx.session.current().is_some() {
        client::workflow::reconcile_draft(&mut ctx, &backend).await?;
    }

    match cli.command {
        Command::Home => commands::home(&mut ctx, &backend).await,
        Command::Login(args) => commands::login(&mut ctx, &backend, &args.email, &args.password).await,
        Command::Register(args) => commands::register(&mut ctx, &backend, &args.email, &args.password).await,
        Command::Logout => commands::logout(&mut ctx, &backend).await,
        Command::LoginGithub { token } => commands::login_github(&mut ctx, &cli.base_url, token).await,
        Command::Profile(cmd) => commands::profile(&mut ctx, &backend, cmd).await,
        Command::Theme(cmd) => commands::theme(&mut ctx, cmd),
        Command::History(args) => commands::history(&mut ctx, &backend, &cli.base_url, args).await,
        Command::Workout(cmd) => commands::workout(&mut ctx, &backend, cmd).await,
        Command::Exercises(cmd) => commands::exercises(&backend, cmd).await,
        Command::Templates(cmd) => commands::templates(&backend, cmd).await,
        Command::Stats { exercise } => commands::stats(&mut ctx, &backend, exercise.as_deref()).await,
    }
}
