use affix_engine::bridge::{CaptureBridge, UnavailableBridge};
use affix_engine::config::{load_config, validate_config, AppPaths, Config};
use affix_engine::{run_polling, AffixEngine, Session, Tables, TargetProcess, Timeouts};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_PROCESS_NAME: &str = "Nioh3.exe";

/// Alternate config file location
const CONFIG_ENV: &str = "AFFIX_ENGINE_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let config = load_config(config_path.as_deref()).context("Failed to load configuration")?;
    validate_config(&config)?;

    // RUST_LOG overrides the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting Affix-Engine v{}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let Some(pid_arg) = args.next() else {
        bail!("usage: affix-engine <pid> [process-name]");
    };
    let pid: u32 = pid_arg
        .parse()
        .with_context(|| format!("Invalid process id: {}", pid_arg))?;
    let name = args.next().unwrap_or_else(|| DEFAULT_PROCESS_NAME.to_string());

    let paths = AppPaths::discover();
    let tables = Tables::load(
        config.tables.affix_path(paths.as_ref()).as_deref(),
        config.tables.skill_path(paths.as_ref()).as_deref(),
    );
    info!(
        affixes = tables.affixes.len(),
        skills = tables.skills.len(),
        "Resolution tables loaded"
    );

    let bridge = build_bridge(&config);
    let engine = AffixEngine::new(bridge);
    let mut session = Session::new(engine, tables, Timeouts::from(&config.engine));

    session.start(TargetProcess::new(pid, name)).await?;
    info!("{}", session.view());
    info!("Watching for item changes. Press Ctrl+C to stop.");

    let refreshes = run_polling(&mut session, config.engine.poll_interval(), async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Ctrl+C handler failed: {}", e);
        }
    })
    .await;

    info!(refreshes, "Last item view:\n{}", session.view());
    session.stop().await;
    Ok(())
}

#[cfg(target_os = "windows")]
fn build_bridge(config: &Config) -> Arc<dyn CaptureBridge> {
    use affix_engine::bridge::NativeBridge;
    use std::path::Path;

    match NativeBridge::load(Path::new(&config.engine.native_module)) {
        Ok(bridge) => Arc::new(bridge),
        Err(e) => {
            warn!("Native capture module unavailable: {}", e);
            Arc::new(UnavailableBridge)
        }
    }
}

#[cfg(not(target_os = "windows"))]
fn build_bridge(config: &Config) -> Arc<dyn CaptureBridge> {
    warn!(
        "{} can only be loaded on Windows; capture is unavailable",
        config.engine.native_module
    );
    Arc::new(UnavailableBridge)
}
