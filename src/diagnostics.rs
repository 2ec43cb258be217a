//! Missing-key diagnostics for development builds.

use std::str::FromStr;
use tracing::warn;

use crate::I18n;
use crate::error::I18nError;
use crate::locale::CONTEXT_GLUE;

/// Variable read by [`Environment::from_env`].
pub const ENVIRONMENT_VAR: &str = "APP_ENV";

/// Build mode the front-end runs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    #[default]
    Production,
}

impl Environment {
    /// Read the environment from `APP_ENV`. Unset or unknown values mean
    /// production.
    pub fn from_env() -> Self {
        match std::env::var(ENVIRONMENT_VAR) {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                warn!("{}; assuming production", e);
                Environment::Production
            }),
            Err(_) => Environment::Production,
        }
    }

    pub fn is_development(&self) -> bool {
        *self == Environment::Development
    }
}

impl FromStr for Environment {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(I18nError::InvalidOptions(format!(
                "unknown environment '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Context-qualified keys are shown as `context|key`.
pub fn missing_key_message(text_domain: &str, catalog_source: &str, key: &str) -> String {
    format!(
        "[Localization {}] The following i18n key could not be found: \"{}\". Please define it in your {}!",
        text_domain,
        key.replace(CONTEXT_GLUE, "|"),
        catalog_source
    )
}

/// Log every missing key when running a development build.
///
/// Returns whether the callback was installed.
pub fn install_missing_key_diagnostic(
    i18n: &mut I18n,
    text_domain: &str,
    catalog_source: &str,
    environment: Environment,
) -> bool {
    if !environment.is_development() {
        return false;
    }

    let text_domain = text_domain.to_string();
    let catalog_source = catalog_source.to_string();
    i18n.set_missing_key_callback(move |key| {
        warn!(
            text_domain = %text_domain,
            key,
            "{}",
            missing_key_message(&text_domain, &catalog_source, key)
        );
    });
    true
}
