//! File and environment configuration for the replay tool

use std::path::Path;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use nexum_uicc_core::{CARD_MAX_APPS, UiccConfig};
use nexum_uicc_manager::{MAX_PHONE_COUNT_DS, ManagerConfig};
use serde::{Deserialize, Serialize};

/// Prefix of environment variables overriding the file
const ENV_PREFIX: &str = "UICC_";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) multi_sim_enabled: bool,
    pub(crate) phone_count: usize,
    pub(crate) max_apps: usize,
    pub(crate) swap_poll_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            multi_sim_enabled: false,
            phone_count: MAX_PHONE_COUNT_DS,
            max_apps: CARD_MAX_APPS,
            swap_poll_ms: 250,
        }
    }
}

impl Config {
    pub(crate) fn manager_config(&self) -> ManagerConfig {
        ManagerConfig::new()
            .with_multi_sim(self.multi_sim_enabled)
            .with_phone_count(self.phone_count)
            .with_card_config(
                UiccConfig::new()
                    .with_max_apps(self.max_apps)
                    .with_swap_poll_interval(Duration::from_millis(self.swap_poll_ms)),
            )
    }
}

/// Load defaults, then the TOML file if given, then `UICC_*` variables
pub(crate) fn load_config(path: Option<&Path>) -> eyre::Result<Config> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));
    if let Some(path) = path {
        if !path.exists() {
            eyre::bail!("config file {} not found", path.display());
        }
        figment = figment.merge(Toml::file(path));
    }
    Ok(figment.merge(Env::prefixed(ENV_PREFIX)).extract()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        figment::Jail::expect_with(|_jail| {
            assert_eq!(load_config(None).unwrap(), Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("uicc.toml", "multi_sim_enabled = true\nmax_apps = 4\n")?;
            jail.set_env("UICC_MAX_APPS", "6");
            jail.set_env("UICC_SWAP_POLL_MS", "40");

            let config = load_config(Some(Path::new("uicc.toml"))).unwrap();
            assert!(config.multi_sim_enabled);
            assert_eq!(config.max_apps, 6);

            let manager = config.manager_config();
            assert_eq!(manager.effective_phone_count(), 2);
            assert_eq!(manager.card.max_apps, 6);
            assert_eq!(manager.card.swap_poll_interval, Duration::from_millis(40));
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_config(Some(Path::new("/nonexistent/uicc.toml"))).is_err());
    }
}
