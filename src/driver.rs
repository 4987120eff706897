//! Driver resolution for Haul commands.
//!
//! Trips and cycle recaps belong to a driver. Rather than requiring
//! `--driver` on every invocation, the driver is resolved through a chain:
//!
//! 1. `--driver <name>`: explicit per-command override
//! 2. `HAUL_DRIVER` env var: session level
//! 3. `default-driver` in `~/.haul/config.toml`

use std::env;

use crate::config::Config;

/// Error message shown when no driver can be resolved.
pub const DRIVER_REQUIRED: &str = "driver required: pass --driver <name>, \
    set HAUL_DRIVER, or add `default-driver = \"...\"` to ~/.haul/config.toml";

/// Resolve the acting driver from the resolution chain.
pub fn resolve_driver(explicit: Option<&str>, config: &Config) -> Result<String, String> {
    resolve_from(explicit, env::var("HAUL_DRIVER").ok(), config)
}

fn resolve_from(
    explicit: Option<&str>,
    from_env: Option<String>,
    config: &Config,
) -> Result<String, String> {
    if let Some(driver) = explicit {
        let driver = driver.trim();
        if driver.is_empty() {
            return Err("--driver cannot be empty".to_string());
        }
        return Ok(driver.to_string());
    }

    if let Some(driver) = from_env
        && !driver.trim().is_empty()
    {
        return Ok(driver.trim().to_string());
    }

    config
        .default_driver
        .clone()
        .ok_or_else(|| DRIVER_REQUIRED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(driver: Option<&str>) -> Config {
        Config {
            default_driver: driver.map(String::from),
            ..Config::default()
        }
    }

    #[test]
    fn explicit_wins() {
        let driver = resolve_from(
            Some("casey"),
            Some("jordan".into()),
            &config_with(Some("riley")),
        )
        .unwrap();
        assert_eq!(driver, "casey");
    }

    #[test]
    fn env_beats_config() {
        let driver = resolve_from(None, Some("jordan".into()), &config_with(Some("riley"))).unwrap();
        assert_eq!(driver, "jordan");
    }

    #[test]
    fn blank_env_falls_through() {
        let driver = resolve_from(None, Some("   ".into()), &config_with(Some("riley"))).unwrap();
        assert_eq!(driver, "riley");
    }

    #[test]
    fn nothing_configured_is_an_error() {
        let err = resolve_from(None, None, &config_with(None)).unwrap_err();
        assert_eq!(err, DRIVER_REQUIRED);
    }

    #[test]
    fn blank_explicit_is_an_error() {
        assert!(resolve_from(Some(" "), None, &config_with(Some("riley"))).is_err());
    }
}
