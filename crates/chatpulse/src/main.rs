use chatpulse::tracing_err;
use clap::{Parser, Subcommand};
use futures::prelude::*;
use std::panic::AssertUnwindSafe;
use std::process::ExitCode;
use tracing::{error, info, warn};

/// Community dashboard and automation jobs for a Telegram group
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run the HTTP server with the jobs (default)
    Serve,

    /// Show the most active users of the last 24 hours
    Leaderboard {
        /// Show up to 1000 users instead of the top 10
        #[arg(long)]
        expanded: bool,

        /// Refresh the leaderboard every 30 seconds
        #[arg(long)]
        watch: bool,
    },

    /// Post the digest of X.com links via a running server
    TriggerDigest {
        #[arg(long, default_value = "http://127.0.0.1:3000/consolidate-x-posts")]
        endpoint: url::Url,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    if dotenvy::dotenv().is_err() {
        eprintln!("Dotenv config was not found, ignoring this...")
    }

    let args = Args::parse();

    let logging_task = chatpulse::init_logging();

    let main_fut = AssertUnwindSafe(async {
        let result = try_main(args).await;

        result.map(|()| ExitCode::SUCCESS).unwrap_or_else(|err| {
            error!(err = tracing_err(&err), "Exitting with an error...");
            ExitCode::FAILURE
        })
    })
    .catch_unwind()
    .unwrap_or_else(|_| {
        error!("Exitting due to a panic...");
        ExitCode::FAILURE
    });

    let exit_code = tokio::select! {
        exit_code = main_fut => {
            info!("Main task has finished, exiting...");
            exit_code
        }
        () = abort_signal() => ExitCode::SUCCESS,
    };

    logging_task.shutdown().await;

    exit_code
}

async fn try_main(args: Args) -> chatpulse::Result {
    match args.cmd.unwrap_or(Cmd::Serve) {
        Cmd::Serve => {
            chatpulse::init_metrics();
            chatpulse::run(chatpulse::Config::load_or_panic()).await
        }
        Cmd::Leaderboard { expanded, watch } => {
            let opts = chatpulse::LeaderboardOptions { expanded, watch };
            chatpulse::show_leaderboard(chatpulse::Config::load_or_panic(), opts).await
        }
        Cmd::TriggerDigest { endpoint } => chatpulse::trigger_digest(endpoint).await,
    }
}

async fn abort_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(
            err = tracing_err(&err),
            "Failed to wait for Ctrl+C, exiting..."
        );
    } else {
        info!("Ctrl+C received, exiting forcefully...");
    }
}
