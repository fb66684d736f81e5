use rootwalk_domain::{CliOverrides, Config};

/// Runs before logging is initialized, so failures are reported only through the error.
pub fn load_config(path: Option<&str>, cli_overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, cli_overrides)?;
    config.validate()?;

    Ok(config)
}

/// File the configuration was read from, if any.
pub fn config_source(path: Option<&str>) -> String {
    path.map(str::to_string)
        .or_else(Config::get_config_path)
        .unwrap_or_else(|| "built-in defaults".to_string())
}
