// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Speech planning API server and admin CLI.

use anyhow::Context;
use clap::{Parser, Subcommand};
use futures_util::StreamExt;
use speech_planning::{
    config::{Config, StoreBackend},
    db::{DocumentStore, FirestoreStore, MemoryStore},
    repositories::Repositories,
    services::{
        importer, AuthProvider, AuthState, FirebaseAuthClient, FirebaseTokenVerifier,
        SessionManager,
    },
    usecases::{
        auth::{
            GoogleSignIn, SignInCredentials, SignInWithEmailAndPassword, SignOut,
            SignUpCredentials, SignUpWithEmailAndPassword,
        },
        users::GetUser,
    },
    AppState,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const PASSWORD_VAR: &str = "SPEECH_PLANNING_PASSWORD";
const SIGN_IN_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Parser)]
#[command(name = "speech-planning")]
#[command(about = "Plan public talks across congregations")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve,
    /// Import districts, congregations and speakers from a CSV export
    Import {
        file: PathBuf,

        /// Parse and report counts without writing
        #[arg(long)]
        dry_run: bool,

        /// Also write the speech catalogue
        #[arg(long)]
        with_speeches: bool,
    },
    /// Sign in and show the resulting session state
    Login {
        /// Email address; the password is read from SPEECH_PLANNING_PASSWORD
        #[arg(long, conflicts_with = "google_id_token")]
        email: Option<String>,

        /// Google ID token to exchange instead of a password
        #[arg(long)]
        google_id_token: Option<String>,

        /// Keep waiting until an administrator approves the account
        #[arg(long)]
        wait: bool,
    },
    /// Create an account; the password is read from SPEECH_PLANNING_PASSWORD
    Signup {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve);

    match &command {
        Commands::Serve => init_logging(),
        _ => init_cli_logging(),
    }

    let config = Config::from_env().context("Failed to load configuration")?;

    match command {
        Commands::Serve => serve(config).await,
        Commands::Import {
            file,
            dry_run,
            with_speeches,
        } => import(config, file, dry_run, with_speeches).await,
        Commands::Login {
            email,
            google_id_token,
            wait,
        } => login(config, email, google_id_token, wait).await,
        Commands::Signup { name, email } => signup(config, name, email).await,
    }
}

async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn DocumentStore>> {
    Ok(match config.store_backend {
        StoreBackend::Firestore => Arc::new(
            FirestoreStore::new(&config.gcp_project_id)
                .await
                .context("Failed to connect to Firestore")?,
        ),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory document store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    })
}

async fn serve(config: Config) -> anyhow::Result<()> {
    tracing::info!(port = config.port, "Starting speech planning API");

    let store = open_store(&config).await?;
    let token_verifier =
        FirebaseTokenVerifier::new(&config).context("Failed to initialize token verifier")?;

    let addr = format!("0.0.0.0:{}", config.port);
    let state = Arc::new(AppState::new(config, store, token_verifier));
    let app = speech_planning::routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn import(
    config: Config,
    file: PathBuf,
    dry_run: bool,
    with_speeches: bool,
) -> anyhow::Result<()> {
    let batch = importer::parse_file(&file)?;
    println!(
        "Parsed {} rows ({} too short): {} districts, {} congregations, {} speakers, {} speeches",
        batch.rows,
        batch.short_rows,
        batch.districts.len(),
        batch.congregations.len(),
        batch.speakers.len(),
        batch.speeches.len()
    );
    if !batch.rejected_speech_numbers.is_empty() {
        println!(
            "Ignoring non-numeric speech numbers: {}",
            batch.rejected_speech_numbers.join(", ")
        );
    }
    if dry_run {
        return Ok(());
    }

    let repos = Repositories::new(open_store(&config).await?);
    let report = importer::write_batch(&repos, &batch, with_speeches).await?;
    println!(
        "Wrote {} districts, {} congregations, {} speakers, {} speeches \
         (skipped {} congregations, {} speakers, {} speeches)",
        report.districts,
        report.congregations,
        report.speakers,
        report.speeches,
        report.skipped_congregations,
        report.skipped_speakers,
        report.skipped_speeches
    );
    Ok(())
}

fn auth_client(config: &Config) -> anyhow::Result<Arc<FirebaseAuthClient>> {
    let api_key = config.require_firebase_api_key()?.to_string();
    Ok(Arc::new(match &config.auth_emulator_host {
        Some(host) => FirebaseAuthClient::for_emulator(api_key, host),
        None => FirebaseAuthClient::new(api_key),
    }))
}

fn password_from_env() -> anyhow::Result<String> {
    std::env::var(PASSWORD_VAR).with_context(|| format!("{PASSWORD_VAR} is not set"))
}

async fn login(
    config: Config,
    email: Option<String>,
    google_id_token: Option<String>,
    wait: bool,
) -> anyhow::Result<()> {
    let provider = auth_client(&config)?;
    let repos = Repositories::new(open_store(&config).await?);
    let session = SessionManager::spawn(
        provider.clone(),
        repos.users.clone(),
        config.force_token_refresh,
    );
    session.settled().await;

    let user = match (email, google_id_token) {
        (Some(email), _) => {
            let credentials = SignInCredentials {
                email,
                password: password_from_env()?,
            };
            SignInWithEmailAndPassword::new(provider.clone(), repos.users.clone())
                .execute(&credentials)
                .await?
        }
        (None, Some(token)) => {
            GoogleSignIn::new(provider.clone(), repos.users.clone())
                .execute(&token)
                .await?
        }
        (None, None) => anyhow::bail!("Pass --email or --google-id-token"),
    };

    let mut state = wait_for_sign_in(&session).await;
    if wait && state == AuthState::NeedsApproval {
        println!("Account {} is waiting for approval...", user.uid);
        let mut records = GetUser::new(repos.users.clone()).observe(&user.uid).await?;
        while let Some(record) = records.next().await {
            if record?.is_some_and(|u| u.approved) {
                state = session.recheck().await;
                break;
            }
        }
    }

    report_state(&state);
    SignOut::new(provider).execute().await?;
    Ok(())
}

async fn signup(config: Config, name: String, email: String) -> anyhow::Result<()> {
    let provider = auth_client(&config)?;
    let repos = Repositories::new(open_store(&config).await?);
    let credentials = SignUpCredentials {
        name,
        email,
        password: password_from_env()?,
    };

    let user = SignUpWithEmailAndPassword::new(provider.clone(), repos.users)
        .execute(&credentials)
        .await?;
    println!(
        "Created account {} ({}); an administrator must approve it before use",
        user.uid,
        user.email.as_deref().unwrap_or("no email")
    );
    provider.sign_out().await;
    Ok(())
}

/// The session actor reacts to the sign-in asynchronously; wait for it.
/// A failed reconciliation leaves the state unauthenticated, hence the
/// timeout.
async fn wait_for_sign_in(session: &SessionManager) -> AuthState {
    let mut states = session.subscribe();
    let signed_in = states
        .wait_for(|s| matches!(s, AuthState::NeedsApproval | AuthState::Authenticated(_)));
    let state = match tokio::time::timeout(SIGN_IN_TIMEOUT, signed_in).await {
        Ok(Ok(state)) => (*state).clone(),
        _ => session.state(),
    };
    state
}

fn report_state(state: &AuthState) {
    match state {
        AuthState::Authenticated(user) => println!(
            "Signed in as {} with role {}",
            user.display_name.as_deref().unwrap_or(&user.uid),
            user.role.as_str()
        ),
        AuthState::NeedsApproval => println!("Signed in; the account still needs approval"),
        AuthState::Unauthenticated | AuthState::Loading => println!("Not signed in"),
    }
}

fn env_filter(default_directives: &[&str]) -> tracing_subscriber::EnvFilter {
    default_directives.iter().fold(
        tracing_subscriber::EnvFilter::from_default_env(),
        |filter, directive| match directive.parse() {
            Ok(d) => filter.add_directive(d),
            Err(_) => filter,
        },
    )
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(env_filter(&["speech_planning=debug", "info"]))
        .with(format)
        .init();
}

/// Compact human-readable logging for CLI commands.
fn init_cli_logging() {
    tracing_subscriber::registry()
        .with(env_filter(&["speech_planning=info", "warn"]))
        .with(tracing_subscriber::fmt::layer().compact().with_target(false))
        .init();
}
