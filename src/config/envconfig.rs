use ::config as config_rs;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Typed configuration read from prefixed environment variables.
///
/// Nested keys use `__`, so `APP_DATABASE__URL` fills `database.url`.
pub trait EnvConfig: Sized + DeserializeOwned {
    const PREFIX: &'static str = "APP";
    const SEPARATOR: &'static str = "__";

    /// Reads `.env` from the working directory, if there is one.
    fn load_dotenv() {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(err) => tracing::debug!(error = %err, "no .env loaded"),
        }
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn from_env() -> Result<Self> {
        Self::load_dotenv();
        Self::load(None)
    }

    /// Same as [`EnvConfig::from_env`] over an explicit variable set instead
    /// of the process environment.
    fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect::<config_rs::Map<String, String>>();
        Self::load(Some(vars))
    }

    fn load(vars: Option<config_rs::Map<String, String>>) -> Result<Self> {
        let settings = config_rs::Config::builder()
            .add_source(
                config_rs::Environment::with_prefix(Self::PREFIX)
                    .prefix_separator("_")
                    .separator(Self::SEPARATOR)
                    .try_parsing(true)
                    .source(vars),
            )
            .build()
            .with_context(|| format!("failed to read {}_* variables", Self::PREFIX))?;

        let cfg = settings
            .try_deserialize::<Self>()
            .with_context(|| format!("failed to deserialize {}_* variables", Self::PREFIX))?;

        cfg.validate()?;
        Ok(cfg)
    }
}
