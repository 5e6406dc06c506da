//! Account CLI - Main entry point.

mod config;
mod error;
mod render;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::render::{render_session, render_state};
use anyhow::Context;
use auth_store::{AuthState, FileStorage};
use clap::Parser;
use registration_client::{
    RegistrationClient, RegistrationFlow, RegistrationService, SubmitOutcome,
};
use std::io::{self, Write};
use std::sync::Arc;
use tokio::signal;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "account")]
#[command(version)]
#[command(about = "Register an account and inspect the local session")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show whether a stored access token marks this session as logged in
    Status,
    /// Create an account on the backend
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        /// Account password (prefer the environment variable)
        #[arg(short, long, env = "ACCOUNT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Remove the stored access token
    Logout,
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.log.level);

    let storage = FileStorage::new(&config.storage.path);
    let auth = AuthState::initialize(&storage);
    debug!(
        "Session initialised from {:?} (logged in: {})",
        storage.path(),
        auth.is_logged_in()
    );

    match cli.command {
        Commands::Status => {
            println!("{}", render_session(auth.is_logged_in()));
            Ok(())
        }
        Commands::Register {
            username,
            email,
            password,
        } => register(&config, username, email, password).await,
        Commands::Logout => {
            if auth.sign_out(&storage)? {
                println!("Logged out");
            } else {
                println!("{}", render_session(false));
            }
            Ok(())
        }
    }
}

async fn register(
    config: &Config,
    username: String,
    email: String,
    password: String,
) -> AppResult<()> {
    let client = RegistrationClient::new(&config.backend.base_url, config.backend.timeout)?;
    info!("Registration endpoint: {}", client.endpoint());

    let flow = Arc::new(RegistrationFlow::new(client));
    flow.set_username(username).await;
    flow.set_email(email).await;
    flow.set_password(password).await;

    run_registration(flow, CancellationToken::new(), &mut io::stdout()).await
}

/// Submit the filled-in form and write progress and the result to `out`.
///
/// Ctrl-C cancels the submission through `cancel`. Anything other than a
/// successful registration ends in [`AppError::NotRegistered`].
async fn run_registration<S, W>(
    flow: Arc<RegistrationFlow<S>>,
    cancel: CancellationToken,
    out: &mut W,
) -> AppResult<()>
where
    S: RegistrationService + 'static,
    W: Write,
{
    let mut updates = WatchStream::from_changes(flow.subscribe());

    let mut submission = {
        let flow = flow.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { flow.submit(&cancel).await })
    };

    let outcome = loop {
        tokio::select! {
            result = &mut submission => break result?,
            Some(state) = updates.next() => {
                if state.is_loading() {
                    writeln!(out, "{}", render_state(&state))?;
                }
            }
            Ok(()) = signal::ctrl_c() => {
                warn!("Interrupted, cancelling registration");
                cancel.cancel();
            }
        }
    };

    match outcome {
        SubmitOutcome::Succeeded => {
            writeln!(out, "{}", render_state(&flow.state()))?;
            Ok(())
        }
        SubmitOutcome::Failed => {
            writeln!(out, "{}", render_state(&flow.state()))?;
            Err(AppError::NotRegistered)
        }
        SubmitOutcome::Cancelled => {
            writeln!(out, "Registration cancelled")?;
            Err(AppError::NotRegistered)
        }
        SubmitOutcome::AlreadySubmitting => {
            debug!("Another submission owns this form");
            writeln!(out, "Registration already in progress")?;
            Err(AppError::NotRegistered)
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
