use icu_locale::Locale;
use icu_plurals::{PluralCategory, PluralRuleType, PluralRules};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::{I18nError, I18nResult};

/// Separator between a message context and its key, as used by gettext and Jed.
pub const CONTEXT_GLUE: char = '\u{4}';

/// Locale used when none has been set.
pub const DEFAULT_LOCALE_SLUG: &str = "en";

/// Build the lookup key for a message, qualified by its context if any.
pub fn context_key(context: Option<&str>, key: &str) -> String {
    match context {
        Some(context) if !context.is_empty() => format!("{}{}{}", context, CONTEXT_GLUE, key),
        _ => key.to_string(),
    }
}

/// Metadata stored under the empty key of Jed locale data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleHeader {
    #[serde(rename = "localeSlug", default, skip_serializing_if = "Option::is_none")]
    pub locale_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_point: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thousands_sep: Option<String>,
}

/// Jed-format locale data.
///
/// ```json
/// {
///     "": { "localeSlug": "de", "decimal_point": ",", "thousands_sep": "." },
///     "Save": ["Speichern"],
///     "%d file": ["%d Datei", "%d Dateien"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleData {
    #[serde(rename = "", default)]
    pub header: LocaleHeader,
    #[serde(flatten)]
    pub messages: BTreeMap<String, Vec<String>>,
}

impl LocaleData {
    pub fn new() -> Self {
        LocaleData::default()
    }

    pub fn with_slug(mut self, slug: &str) -> Self {
        self.header.locale_slug = Some(slug.to_string());
        self
    }

    pub fn with_message(mut self, key: &str, forms: &[&str]) -> Self {
        self.messages.insert(
            key.to_string(),
            forms.iter().map(|form| form.to_string()).collect(),
        );
        self
    }

    pub fn slug(&self) -> Option<&str> {
        self.header.locale_slug.as_deref()
    }

    pub fn forms(&self, lookup_key: &str) -> Option<&Vec<String>> {
        self.messages.get(lookup_key)
    }

    pub fn from_json_str(json: &str) -> I18nResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| I18nError::Json(format!("Failed to parse locale data: {}", e)))
    }
}

/// Parse a locale slug such as `pt-br` or `pt_BR` into an ICU locale.
pub fn parse_locale(slug: &str) -> I18nResult<Locale> {
    slug.replace('_', "-")
        .parse()
        .map_err(|e| I18nError::InvalidLocale(format!("'{}': {}", slug, e)))
}

/// Plural form selection for one locale.
///
/// Jed stores plural translations as an ordered list of forms. The order
/// follows the CLDR categories the language actually uses, so English keeps
/// `[one, other]` and Russian keeps `[one, few, many]`.
pub struct PluralForms {
    slug: String,
    rules: Option<PluralRules>,
    categories: Vec<PluralCategory>,
}

impl PluralForms {
    /// Build plural forms for a slug. Unknown or malformed slugs fall back to
    /// English rules.
    pub fn for_slug(slug: &str) -> Self {
        match Self::try_for_slug(slug) {
            Ok(forms) => forms,
            Err(e) => {
                warn!("Falling back to English plural rules: {}", e);
                PluralForms {
                    slug: slug.to_string(),
                    rules: None,
                    categories: vec![PluralCategory::One, PluralCategory::Other],
                }
            }
        }
    }

    fn try_for_slug(slug: &str) -> I18nResult<Self> {
        let locale = parse_locale(slug)?;
        let rules = PluralRules::try_new(locale.into(), PluralRuleType::Cardinal.into())
            .map_err(|e| {
                I18nError::InvalidLocale(format!(
                    "Failed to create plural rules for '{}': {}",
                    slug, e
                ))
            })?;
        let categories = categories_in_use(&rules);
        debug!(slug, ?categories, "Loaded plural rules");
        Ok(PluralForms {
            slug: slug.to_string(),
            rules: Some(rules),
            categories,
        })
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn categories(&self) -> &[PluralCategory] {
        &self.categories
    }

    /// Index into a list of plural forms for `count`.
    pub fn index_for(&self, count: u64) -> usize {
        let Some(rules) = &self.rules else {
            return if count == 1 { 0 } else { 1 };
        };
        let category = rules.category_for(count as usize);
        self.categories
            .iter()
            .position(|c| *c == category)
            .unwrap_or(self.categories.len().saturating_sub(1))
    }
}

impl std::fmt::Debug for PluralForms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluralForms")
            .field("slug", &self.slug)
            .field("categories", &self.categories)
            .finish()
    }
}

/// Categories used by a language, in CLDR order, found by probing
/// representative numbers.
fn categories_in_use(rules: &PluralRules) -> Vec<PluralCategory> {
    let probes = [
        (PluralCategory::Zero, &[0usize][..]),
        (PluralCategory::One, &[1, 21, 31, 41][..]),
        (PluralCategory::Two, &[2, 22, 32][..]),
        (PluralCategory::Few, &[3, 4, 23, 24][..]),
        (PluralCategory::Many, &[5, 11, 101][..]),
        (PluralCategory::Other, &[6, 7, 8, 9, 10, 25, 100, 1000][..]),
    ];

    let mut categories = Vec::new();
    for (expected, values) in probes.iter() {
        if values.iter().any(|n| rules.category_for(*n) == *expected) {
            categories.push(*expected);
        }
    }
    if categories.is_empty() {
        categories.push(PluralCategory::Other);
    }
    categories
}
