//! Config file inspection and creation.

use crate::config::{self, Config, Overrides};

/// Report where settings come from and whether an API key is available
pub fn cmd_check_config(config: &Config, overrides: &Overrides) -> anyhow::Result<()> {
    println!("Checking configuration...\n");

    match config::config_path() {
        Some(path) if path.exists() => println!("✓ Config file: {}", path.display()),
        Some(path) => println!("- Config file: {} (not created, using defaults)", path.display()),
        None => println!("✗ Config file: could not determine config directory"),
    }

    let client_config = config.client_config(overrides);

    println!();
    println!("API:");
    if client_config.api_key.trim().is_empty() {
        println!("✗ Goodreads API key: not set");
        println!("  Use --api-key YOUR_KEY, set GOODREADS_API_KEY, or run init-config");
    } else {
        println!("✓ Goodreads API key: set");
    }
    println!("  Base URL:         {}", client_config.base_url);
    println!("  Format:           {}", client_config.format);
    println!(
        "  Request interval: {} ms",
        client_config.request_interval.as_millis()
    );

    Ok(())
}

/// Write a default config file, leaving an existing one alone unless forced
pub fn cmd_init_config(force: bool) -> anyhow::Result<()> {
    let existing = config::config_path().filter(|path| path.exists());
    if let Some(path) = existing
        && !force
    {
        println!("Config file already exists: {}", path.display());
        println!("Use --force to overwrite it with defaults.");
        return Ok(());
    }

    let path = config::save(&Config::default())?;
    println!("✓ Wrote {}", path.display());
    println!("  Add your key under [credentials] goodreads_api_key");
    Ok(())
}
