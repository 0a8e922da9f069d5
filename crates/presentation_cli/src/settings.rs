//! Client configuration loading
//!
//! Layers, lowest precedence first: built-in defaults, an optional config file,
//! `HERE_*` environment variables, then command-line overrides.

use integration_here::HereConfig;
use secrecy::SecretString;

/// Values given on the command line
#[derive(Debug, Default)]
pub struct Overrides {
    pub app_id: Option<String>,
    pub app_code: Option<String>,
    pub base_url: Option<String>,
}

/// Load the client configuration
///
/// `file` is a path without extension (`here` matches `here.toml`,
/// `here.yaml`, ...). A missing file is not an error.
///
/// Environment keys are the field name after `HERE_`, e.g. `HERE_APP_ID`,
/// `HERE_TIMEOUT_SECS`, `HERE_ROUTING_BASE_URL`. Single underscores stay part
/// of the key; `__` would separate nested keys.
pub fn load(file: &str, overrides: Overrides) -> Result<HereConfig, config::ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(file).required(false))
        .add_source(environment());

    let mut here: HereConfig = builder.build()?.try_deserialize()?;
    apply(&mut here, overrides);
    Ok(here)
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("HERE")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn apply(here: &mut HereConfig, overrides: Overrides) {
    if let Some(app_id) = overrides.app_id {
        here.app_id = Some(app_id);
    }
    if let Some(app_code) = overrides.app_code {
        here.app_code = Some(SecretString::from(app_code));
    }
    if let Some(base_url) = overrides.base_url {
        *here = here.clone().with_base_url(&base_url);
    }
}
