use serde::Deserialize;
use std::env;

use shipsync_core::settings::TenantSettings;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub tenants: Vec<TenantSettings>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SyncConfig {
    /// Fetch window when no checkpoint exists. The remote API behaves oddly
    /// with sub-day windows, so this should stay at 24 or above.
    #[serde(default = "default_window_hours")]
    pub window_hours: i64,
}

fn default_window_hours() -> i64 {
    24
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default").required(false))
            // Add in the current environment file (optional)
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file that shouldn't be checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of SHIPSYNC)
            // E.g. `SHIPSYNC__SYNC__WINDOW_HOURS=48`
            .add_source(config::Environment::with_prefix("SHIPSYNC").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            window_hours: default_window_hours(),
        }
    }
}
