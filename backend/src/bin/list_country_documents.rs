//! List reference documents registered for a fixed country.
//!
//! One-shot maintenance script: a single Firestore query, one line per
//! match (`<id> <name> <code>`), no retries. Any failure aborts the process.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use ortho_config::OrthoConfig;
use pr_portal::PortalSettings;
use pr_portal::domain::CountryDocumentsQuery;
use pr_portal::outbound::firestore::{FirestoreRestStore, ServiceAccountKey};
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";
const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// `list-country-documents` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "list-country-documents",
    about = "Print reference documents whose country matches the configured value",
    version
)]
struct CliArgs {
    /// Service-account key file. Falls back to `GOOGLE_APPLICATION_CREDENTIALS`.
    #[arg(long = "credentials", value_name = "path")]
    credentials: Option<PathBuf>,
    /// OAuth access token. Falls back to `GOOGLE_OAUTH_ACCESS_TOKEN`.
    #[arg(long = "access-token", value_name = "token")]
    access_token: Option<String>,
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

    let credentials = resolve_required(args.credentials, CREDENTIALS_ENV, "--credentials")
        .map(PathBuf::from)?;
    let key = ServiceAccountKey::read(&credentials).map_err(io::Error::other)?;
    let access_token = resolve_required(args.access_token, ACCESS_TOKEN_ENV, "--access-token")?;

    let store = FirestoreRestStore::new(key.project_id, access_token, settings.request_timeout())
        .map_err(io::Error::other)?;
    let summaries = CountryDocumentsQuery::new(Arc::new(store))
        .run()
        .await
        .map_err(io::Error::other)?;

    for summary in summaries {
        println!("{summary}");
    }
    Ok(())
}

fn load_settings() -> io::Result<PortalSettings> {
    PortalSettings::load_from_iter([OsString::from("list-country-documents")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))
}

fn resolve_required<T>(explicit: Option<T>, env_name: &str, flag: &str) -> io::Result<String>
where
    T: Into<OsString>,
{
    let value = match explicit {
        Some(value) => value.into(),
        None => env::var_os(env_name).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{flag} is required when {env_name} is not set"),
            )
        })?,
    };
    let value = value.into_string().map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{flag} must be valid UTF-8"),
        )
    })?;
    if value.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{flag} must not be empty"),
        ));
    }
    Ok(value)
}
