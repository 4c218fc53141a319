//! Operator CLI for the PR portal's admin and debug actions.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use clap::{Parser, Subcommand};
use ortho_config::OrthoConfig;
use pr_portal::PortalSettings;
use pr_portal::domain::ports::{IdentityStore, Navigator};
use pr_portal::domain::{
    EmailTestService, ExternalUser, RedirectController, RedirectView, SessionResetOutcome,
    SessionResetService, SessionSnapshot, map_to_user_reference,
};
use pr_portal::outbound::callable::HttpCallableFunction;
use pr_portal::outbound::session_file::FileSessionStore;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

const ID_TOKEN_ENV: &str = "PR_PORTAL_ID_TOKEN";

/// `portal-admin` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "portal-admin",
    about = "Inspect and reset the cached portal session, hand off to Job Cards, and send test emails",
    version
)]
struct CliArgs {
    /// Session file. Falls back to `PR_PORTAL_SESSION_FILE`.
    #[arg(long = "session-file", value_name = "path")]
    session_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Show the signed-in user and derived permissions.
    Whoami {
        /// Print JSON instead of labelled lines.
        #[arg(long)]
        json: bool,
    },
    /// Clear local session state, sign out, then reload.
    ResetSession,
    /// Print the Job Card hand-off URL for the signed-in user.
    JobCardUrl,
    /// Normalise an identity-provider profile into a user reference.
    UserReference {
        /// Path to the profile JSON.
        #[arg(long = "profile", value_name = "path")]
        profile: PathBuf,
    },
    /// Send a test email through the `sendTestEmail` function.
    SendTestEmail {
        #[arg(long = "to", value_name = "address")]
        to: String,
        #[arg(long = "subject", default_value = "PR system test email")]
        subject: String,
        #[arg(
            long = "message",
            default_value = "This is a test email from the PR system."
        )]
        message: String,
        /// ID token for the call. Falls back to `PR_PORTAL_ID_TOKEN`.
        #[arg(long = "id-token", value_name = "token")]
        id_token: Option<String>,
    },
}

/// Prints the hand-off target instead of driving a browser.
struct StdoutNavigator;

impl Navigator for StdoutNavigator {
    fn replace(&self, target: &str) {
        println!("{target}");
    }
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = load_settings()?;
    let session_path = args.session_file.unwrap_or_else(|| settings.session_file());
    let store = Arc::new(FileSessionStore::new(session_path));

    match args.command {
        Command::Whoami { json } => whoami(&store, json),
        Command::ResetSession => reset_session(store).await,
        Command::JobCardUrl => job_card_url(&settings, store),
        Command::UserReference { profile } => user_reference(&profile),
        Command::SendTestEmail {
            to,
            subject,
            message,
            id_token,
        } => send_test_email(&settings, id_token, to, subject, message).await,
    }
}

fn load_settings() -> io::Result<PortalSettings> {
    PortalSettings::load_from_iter([OsString::from("portal-admin")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))
}

fn whoami(store: &FileSessionStore, json: bool) -> io::Result<()> {
    let snapshot = SessionSnapshot::from_user(store.current_user().as_ref());
    if json {
        let encoded = serde_json::to_string_pretty(&snapshot)
            .map_err(|error| io::Error::other(format!("encode session snapshot: {error}")))?;
        println!("{encoded}");
    } else {
        print!("{snapshot}");
    }
    Ok(())
}

async fn reset_session(store: Arc<FileSessionStore>) -> io::Result<()> {
    let service = SessionResetService::new(Arc::clone(&store), Arc::clone(&store), store);
    let outcome = service.force_reset().await;
    println!("{}", outcome.message());
    match outcome {
        SessionResetOutcome::Reloaded => Ok(()),
        SessionResetOutcome::SignOutFailed { message } => Err(io::Error::other(message)),
    }
}

fn job_card_url(settings: &PortalSettings, store: Arc<FileSessionStore>) -> io::Result<()> {
    let origin = settings.job_card_origin().map_err(io::Error::other)?;
    let path = store.path().display().to_string();
    let mut controller = RedirectController::new(store, Arc::new(StdoutNavigator), origin);
    match controller.on_identity_change() {
        RedirectView::Redirecting { .. } => Ok(()),
        RedirectView::Loading => Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no signed-in user in session file '{path}'"),
        )),
    }
}

fn user_reference(profile: &Path) -> io::Result<()> {
    let parent = profile
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = profile.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "profile path must be a file")
    })?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        io::Error::other(format!(
            "open profile directory '{}': {error}",
            parent.display()
        ))
    })?;
    let contents = directory.read_to_string(file_name).map_err(|error| {
        io::Error::other(format!("read profile '{}': {error}", profile.display()))
    })?;
    let value: serde_json::Value = serde_json::from_str(&contents).map_err(|error| {
        io::Error::other(format!("parse profile '{}': {error}", profile.display()))
    })?;

    let reference = map_to_user_reference(&ExternalUser::from_value(&value));
    let encoded = serde_json::to_string_pretty(&reference)
        .map_err(|error| io::Error::other(format!("encode user reference: {error}")))?;
    println!("{encoded}");
    Ok(())
}

async fn send_test_email(
    settings: &PortalSettings,
    id_token: Option<String>,
    to: String,
    subject: String,
    message: String,
) -> io::Result<()> {
    let base_url = settings.functions_base_url().map_err(io::Error::other)?;
    let mut functions = HttpCallableFunction::new(base_url, settings.request_timeout())
        .map_err(|error| io::Error::other(format!("create HTTP client: {error}")))?;
    if let Some(token) = resolve_id_token(id_token) {
        functions = functions.with_id_token(token);
    }

    let outcome = EmailTestService::new(Arc::new(functions))
        .send_test_email(to, subject, message)
        .await;
    println!("{}", outcome.message);
    if outcome.success {
        Ok(())
    } else {
        Err(io::Error::other(outcome.message))
    }
}

fn resolve_id_token(explicit: Option<String>) -> Option<String> {
    explicit
        .or_else(|| env::var(ID_TOKEN_ENV).ok())
        .filter(|token| !token.trim().is_empty())
}
