//! Layered configuration: an optional `config/default` file, then
//! `SOCIALHUB_`-prefixed environment variables, merged over defaults.

mod settings;

use config::{Config, Environment, File};

use crate::utils::Result;
use settings::PartialSettings;

pub use settings::{HubSettings, LoggingSettings, ServerSettings, Settings, StorageSettings};

/// Prefix for environment overrides, e.g. `SOCIALHUB_SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "SOCIALHUB";

/// Loads the configuration from the default file and environment variables
/// and merges it with default values.
pub fn load_config() -> Result<Settings> {
    load_config_from("config/default")
}

/// Same as [`load_config`] with an explicit file stem (extension is inferred).
pub fn load_config_from(file_stem: &str) -> Result<Settings> {
    let builder = Config::builder()
        .add_source(File::with_name(file_stem).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;
    let partial: PartialSettings = config.try_deserialize()?;

    Ok(Settings::merge(partial))
}

#[cfg(test)]
mod tests;
