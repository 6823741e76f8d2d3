use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;

use backlight_arbiter::{
    cli::cli_args_from_env,
    config::Config,
    detect::{InMemoryLegacyRegistry, ResolutionEngine, global_resolver, install_global_resolver},
    logging::init_tracing,
};

fn main() -> Result<()> {
    let args = cli_args_from_env()?;
    let mut config = Config::load(&args.config_path)
        .with_context(|| format!("failed to load config from {}", args.config_path.display()))?;
    if args.backlight.is_some() {
        config.backlight = args.backlight;
    }

    let logging_guard = init_tracing(&config.logging).context("failed to initialize logging")?;

    let registry = Arc::new(InMemoryLegacyRegistry::new());
    let engine = ResolutionEngine::from_config(&config, registry)
        .context("failed to construct backlight resolver")?;
    install_global_resolver(Arc::new(engine))
        .context("failed to install process-wide backlight resolver")?;
    let resolver = global_resolver().context("backlight resolver is not installed")?;

    let resolution = resolver.resolve(config.native_hint);
    let report = json!({
        "run_id": logging_guard.run_id(),
        "selection": resolution.selection,
        "auto_detected": resolution.auto_detected,
        "state": resolver.snapshot(),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("failed to render resolution report")?
    );

    Ok(())
}
