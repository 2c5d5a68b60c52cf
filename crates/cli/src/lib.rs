//! Demo wiring for the user directory service.
//!
//! Seeds a store, answers a few lookups, runs a batch over the store and
//! resolves one user from a remote source, reporting each step as a line.

pub mod config;

use directory::{
    DirectoryError, InMemoryUserRepository, Role, User, UserId, UserRepository,
    UserRepositoryExt, Value, search,
};
use fetcher::UserSource;
use futures_util::future::AbortHandle;
use pipeline::{BatchProcessor, Resolver, RetryingSource, label_processed};
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub use config::{Config, LogFormat};

/// Errors that end a demo run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),
}

/// Installs the global tracing subscriber. Logs go to stderr.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let json = config.log_format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

/// The users every demo run starts with.
pub fn seed_users() -> Vec<User> {
    vec![
        User::new(1, "Alice", "alice@example.com", Role::Admin),
        User::new(2, "Bob", "bob@example.com", Role::User),
        User::new(3, "Charlie", "charlie@example.com", Role::Moderator),
    ]
}

/// Runs the demo and returns the report lines.
///
/// A failed remote lookup is reported, not returned as an error; only a
/// broken local directory ends the run early. Aborting `abort` cancels the
/// batch step.
#[tracing::instrument(skip_all)]
pub async fn run<S>(config: &Config, source: S, abort: AbortHandle) -> Result<Vec<String>, AppError>
where
    S: UserSource,
{
    let repo = InMemoryUserRepository::with_users(seed_users())?;
    let mut report = Vec::new();

    let alice = repo.find_by_id(UserId::new(1)).await?;
    report.push(alice.greeting());
    report.push(format!("Display name: {}", alice.display_name()));
    report.push(format!("Is admin: {}", alice.is_admin()));
    report.push(format!("Role: {}", alice.role().description()));

    let numbers = [1, 2, 3, 4, 5];
    if let Some(index) = search::find(&numbers, &3) {
        report.push(format!("Found at index: {index}"));
    }

    let admin_names: Vec<String> = repo
        .find_admins()
        .await?
        .iter()
        .map(|u| u.name().to_string())
        .collect();
    report.push(format!("Admin users: {}", admin_names.join(", ")));

    for value in [
        Value::from("hello"),
        Value::from(42),
        Value::from(alice.clone()),
        Value::from_json(serde_json::json!(true)),
    ] {
        report.push(value.describe());
    }

    let records = repo.find_all().await?;
    let mut outcomes =
        BatchProcessor::new(config.batch.clone()).process_with_abort(records, label_processed, abort);
    let mut processed = Vec::new();
    while let Some(outcome) = outcomes.recv().await {
        match outcome.result {
            Ok(label) => processed.push((outcome.id, label)),
            Err(e) => tracing::warn!(user_id = %outcome.id, error = %e, "batch item not processed"),
        }
    }
    processed.sort_by_key(|(id, _)| *id);
    report.extend(processed.into_iter().map(|(_, label)| label));

    let remote_id = UserId::new(config.remote_user_id);
    let resolver = Resolver::new(
        repo.clone(),
        RetryingSource::new(source, config.fetch.max_retries),
    );
    match resolver.resolve(remote_id, None).await {
        Ok(user) => report.push(format!("Resolved user {remote_id}: {}", user.display_name())),
        Err(e) => {
            tracing::warn!(user_id = %remote_id, error = %e, "remote lookup failed");
            report.push(format!("Remote lookup failed: {e}"));
        }
    }

    tracing::info!(users = repo.count().await?, "demo run complete");
    Ok(report)
}
