use anyhow::{Context, Result};
use tracing::info;

use vista_core::AppConfig;

pub fn run(config: &AppConfig, init: bool) -> Result<()> {
    if init {
        let path = AppConfig::config_path();
        if path.exists() {
            println!("Configuration already exists at {}", path.display());
            return Ok(());
        }
        config
            .save()
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Wrote default configuration");
        println!("Wrote {}", path.display());
        return Ok(());
    }

    print!("{}", config.to_toml()?);
    Ok(())
}
