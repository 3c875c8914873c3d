// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use std::sync::Arc;

use anyhow::Result;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::config::ConfigFile;
use crate::engine::{AppContext, TargetSupervisor};
use crate::exec::ShellRunner;
use crate::fs::RealFileSystem;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the shared application context
/// - one supervisor per watch target
/// - SIGINT / SIGTERM handling
pub async fn run(args: CliArgs) -> Result<()> {
    let mut cfg = load_and_validate(&args.config)?;
    if args.sync_first {
        cfg.force_sync_first();
    }

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    info!(
        config = ?args.config,
        targets = cfg.targets().len(),
        interpreter = %cfg.interpreter(),
        "configuration loaded"
    );

    let ctx = Arc::new(
        AppContext::from_config(&cfg, Arc::new(ShellRunner), Arc::new(RealFileSystem))
            .with_show_ignored(args.show_ignored),
    );

    spawn_signal_handler(Arc::clone(&ctx));
    supervise(ctx, cfg).await
}

/// Run one supervisor per target until all of them have stopped.
///
/// A target that fails to start is logged and does not affect the others;
/// only if *every* target fails is the error returned.
pub async fn supervise(ctx: Arc<AppContext>, cfg: ConfigFile) -> Result<()> {
    let total = cfg.targets().len();
    if total == 0 {
        anyhow::bail!("no watch targets to supervise");
    }

    let mut set = JoinSet::new();

    for target in cfg.into_targets() {
        let ctx = Arc::clone(&ctx);
        let root = target.root_dir().to_path_buf();
        set.spawn(async move {
            let outcome = match TargetSupervisor::with_notify(ctx, target) {
                Ok(supervisor) => supervisor.run().await,
                Err(e) => Err(e),
            };
            (root, outcome)
        });
    }

    let mut failed = 0;
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((root, Ok(()))) => info!(target_dir = ?root, "target stopped"),
            Ok((root, Err(e))) => {
                failed += 1;
                error!(target_dir = ?root, error = %e, "target failed to start");
            }
            Err(e) => {
                failed += 1;
                error!(error = %e, "target supervisor task aborted");
            }
        }
    }

    if failed == total {
        anyhow::bail!("no watch target could be started ({failed} failed)");
    }

    info!("all targets stopped; good bye");
    Ok(())
}

/// Cancel the shared shutdown token on SIGINT or (on unix) SIGTERM.
fn spawn_signal_handler(ctx: Arc<AppContext>) {
    tokio::spawn(async move {
        if let Err(e) = wait_for_signal().await {
            error!(error = %e, "failed to listen for shutdown signals");
            return;
        }
        warn!("shutdown signal received; stopping all targets");
        ctx.request_shutdown();
    });
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

/// Simple dry-run output: print the interpreter and every target.
fn print_dry_run(cfg: &ConfigFile) {
    println!("syncwatcher dry-run");
    println!("  interpreter = {}", cfg.interpreter());
    println!("  debounce    = {:?}", cfg.quiescence());
    println!();

    println!("targets ({}):", cfg.targets().len());
    for target in cfg.targets() {
        println!("  - {}", target.root_dir().display());
        println!("      script: {}", target.script());
        if !target.ignore().is_empty() {
            println!("      ignore: {:?}", target.ignore().patterns());
        }
        if target.sync_first() {
            println!("      sync_first: true");
        }
        if target.suppress_output_logging() {
            println!("      ignore_script_output: true");
        }
    }
}
