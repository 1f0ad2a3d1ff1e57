//! dataplaned - Cassini dataplane control agent
//!
//! Entry point for the dataplane agent daemon.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use cassini_common::AgentError;
use cassini_dataplaned::{agent, MemoryStore, OvsCtl};

/// Cassini dataplane control agent
#[derive(Parser, Debug)]
#[command(name = "dataplaned")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Topology document loaded into the configuration store
    #[arg(short = 't', long, default_value = "/etc/cassini/topology.json")]
    topology: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

/// Initializes tracing/logging subsystem
fn init_logging(level: &str) {
    let level = level.parse().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn print_banner() {
    println!("Cassini Dataplane v{}", env!("CARGO_PKG_VERSION"));
    println!("Project: SDN-Multilayer - National Network for Education and Research (RNP)");
    println!();
}

/// Setup signal handlers and return the shared stop flag
fn setup_signal_handlers() -> Arc<AtomicBool> {
    let shutdown_flag = Arc::new(AtomicBool::new(false));
    let flag = shutdown_flag.clone();

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Received SIGINT/SIGTERM");
            flag.store(true, Ordering::Relaxed);
        }
    });

    shutdown_flag
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);
    print_banner();

    info!("Initializing cassini dataplane");

    let store = match MemoryStore::from_topology_file(&args.topology).await {
        Ok(store) => store,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(2);
        }
    };

    let switch = OvsCtl::new();
    let shutdown = setup_signal_handlers();

    match agent::run(&store, &switch, shutdown).await {
        Ok(()) => {
            info!("Cassini dataplane exited");
            ExitCode::SUCCESS
        }
        Err(e @ AgentError::StoreUnavailable { .. }) => {
            error!("{}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
