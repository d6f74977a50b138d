use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Connection details for the order endpoint — the stand-in for what the
/// host page would inject (ajax URL + anti-forgery nonce).
///
/// Layered: optional `justbought.toml` in the working directory, then
/// `JUSTBOUGHT_*` environment variables; CLI flags override both in main.
/// Nothing else is configurable by design.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    pub endpoint: Option<String>,
    pub token: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name("justbought.toml").required(false))
            .add_source(Environment::with_prefix("JUSTBOUGHT"))
            .build()?;
        s.try_deserialize()
    }
}
