//! Demo entry point.

use std::process::ExitCode;

use fetcher::HttpUserFetcher;
use futures_util::future::AbortHandle;
use tokio::signal;

use directory_cli::Config;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install SIGINT handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, cancelling outstanding work");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, cancelling outstanding work");
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // 1. Load configuration and initialize tracing
    let config = Config::from_env();
    directory_cli::init_tracing(&config);

    // 2. Build the remote source
    let fetcher = match HttpUserFetcher::new(config.fetch.clone()) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            tracing::error!(error = %e, "failed to build HTTP client");
            return ExitCode::FAILURE;
        }
    };

    // 3. Cancel outstanding batch work on shutdown
    let (abort, _registration) = AbortHandle::new_pair();
    let on_shutdown = abort.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        on_shutdown.abort();
    });

    // 4. Run
    tracing::info!(api_url = %config.fetch.base_url, "starting directory demo");
    match directory_cli::run(&config, fetcher, abort).await {
        Ok(report) => {
            for line in report {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "demo failed");
            ExitCode::FAILURE
        }
    }
}
