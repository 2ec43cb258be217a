use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::Catalog;
use crate::error::{I18nError, I18nResult};
use crate::locale::LocaleData;

/// File named in missing-key diagnostics when the host does not say otherwise.
pub const DEFAULT_CATALOG_SOURCE: &str = "JsI18n.class.php";

/// Options exported by the host plugin for its front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginOptions {
    /// Label used in diagnostics, normally the plugin's gettext text domain.
    pub text_domain: String,
    /// Translated strings harvested on the host side.
    pub catalog: Catalog,
    /// Host-side source file where missing strings should be defined.
    pub catalog_source: String,
}

impl PluginOptions {
    pub fn new(text_domain: &str, catalog: Catalog) -> Self {
        PluginOptions {
            text_domain: text_domain.to_string(),
            catalog,
            catalog_source: DEFAULT_CATALOG_SOURCE.to_string(),
        }
    }

    /// Parse plugin options from JSON.
    ///
    /// ```json
    /// {
    ///     "textDomain": "my-plugin",
    ///     "i18n": { "Save": "Speichern", "Cancel": "Abbrechen" },
    ///     "catalogSource": "JsI18n.class.php"
    /// }
    /// ```
    ///
    /// Other top-level fields are ignored. Catalog values that are not
    /// strings are skipped with a warning.
    pub fn from_json_str(json: &str) -> I18nResult<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| I18nError::Json(format!("Failed to parse plugin options: {}", e)))?;

        let obj = value.as_object().ok_or_else(|| {
            I18nError::InvalidOptions("root must be an object".to_string())
        })?;

        let text_domain = obj
            .get("textDomain")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                I18nError::InvalidOptions("'textDomain' must be a string".to_string())
            })?;

        let strings = obj
            .get("i18n")
            .and_then(Value::as_object)
            .ok_or_else(|| I18nError::InvalidOptions("'i18n' must be an object".to_string()))?;

        let mut catalog = Catalog::new();
        for (key, value) in strings {
            if let Some(message) = value.as_str() {
                catalog.with_message(key, message);
            } else {
                warn!(key = %key, "Translation is not a string, skipping");
            }
        }

        let catalog_source = match obj.get("catalogSource").and_then(Value::as_str) {
            Some(source) => source.to_string(),
            None => DEFAULT_CATALOG_SOURCE.to_string(),
        };

        debug!(
            text_domain,
            entries = catalog.len(),
            "Parsed plugin options"
        );
        Ok(PluginOptions {
            text_domain: text_domain.to_string(),
            catalog,
            catalog_source,
        })
    }
}

/// Load plugin options from a JSON file
///
/// # Errors
/// - File not found or unreadable
/// - Invalid JSON
/// - Missing `textDomain` or `i18n`
pub fn load_plugin_options_from_file(path: &Path) -> I18nResult<PluginOptions> {
    let content = fs::read_to_string(path)
        .map_err(|e| I18nError::Io(format!("Failed to read file '{}': {}", path.display(), e)))?;
    PluginOptions::from_json_str(&content)
}

/// Load Jed-format locale data from a JSON file
///
/// When the header has no `localeSlug`, the file stem is used, so
/// `de.json` loads as locale `de`.
pub fn load_locale_from_file(path: &Path) -> I18nResult<LocaleData> {
    let content = fs::read_to_string(path)
        .map_err(|e| I18nError::Io(format!("Failed to read file '{}': {}", path.display(), e)))?;
    let mut locale = LocaleData::from_json_str(&content)?;

    if locale.header.locale_slug.is_none() {
        locale.header.locale_slug = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(|stem| stem.to_string());
    }

    Ok(locale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("plugin-i18n-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_plugin_options() {
        let options = PluginOptions::from_json_str(
            r#"{
                "textDomain": "my-plugin",
                "restUrl": "https://example.com/wp-json",
                "i18n": { "Save": "Speichern", "Cancel": "Abbrechen", "count": 3 }
            }"#,
        )
        .unwrap();

        assert_eq!(options.text_domain, "my-plugin");
        assert_eq!(options.catalog_source, DEFAULT_CATALOG_SOURCE);
        assert_eq!(options.catalog.len(), 2);
        assert_eq!(
            options.catalog.get_message("Save"),
            Some(&vec!["Speichern".to_string()])
        );
        assert!(options.catalog.get_message("count").is_none());
    }

    #[test]
    fn test_custom_catalog_source() {
        let options = PluginOptions::from_json_str(
            r#"{ "textDomain": "d", "i18n": {}, "catalogSource": "strings.php" }"#,
        )
        .unwrap();
        assert_eq!(options.catalog_source, "strings.php");
        assert!(options.catalog.is_empty());
    }

    #[test]
    fn test_invalid_plugin_options() {
        assert!(matches!(
            PluginOptions::from_json_str("not json"),
            Err(I18nError::Json(_))
        ));
        assert!(matches!(
            PluginOptions::from_json_str(r#"["a"]"#),
            Err(I18nError::InvalidOptions(_))
        ));
        assert!(matches!(
            PluginOptions::from_json_str(r#"{ "i18n": {} }"#),
            Err(I18nError::InvalidOptions(_))
        ));
        assert!(matches!(
            PluginOptions::from_json_str(r#"{ "textDomain": "d" }"#),
            Err(I18nError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_load_plugin_options_from_file() {
        let path = temp_file(
            "options.json",
            r#"{ "textDomain": "my-plugin", "i18n": { "Save": "Sauver" } }"#,
        );
        let options = load_plugin_options_from_file(&path).unwrap();
        assert_eq!(options.text_domain, "my-plugin");
        assert_eq!(options.catalog.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_plugin_options_from_file(Path::new("/nonexistent/options.json"));
        assert!(matches!(result, Err(I18nError::Io(_))));
    }

    #[test]
    fn test_load_locale_uses_file_stem() {
        let path = temp_file("nl.json", r#"{ "Save": ["Opslaan"] }"#);
        let locale = load_locale_from_file(&path).unwrap();
        assert_eq!(locale.slug(), Some("nl"));
        assert_eq!(locale.forms("Save"), Some(&vec!["Opslaan".to_string()]));
    }

    #[test]
    fn test_load_locale_keeps_header_slug() {
        let path = temp_file(
            "locale-file.json",
            r#"{ "": { "localeSlug": "pt-br" }, "Save": ["Salvar"] }"#,
        );
        let locale = load_locale_from_file(&path).unwrap();
        assert_eq!(locale.slug(), Some("pt-br"));
    }
}
