use serde::Deserialize;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

pub mod diagnostics;
pub mod error;
pub mod facade;
pub mod hooks;
pub mod interpolate;
pub mod loader;
pub mod locale;
pub mod localize;
pub mod number_format;


pub use diagnostics::{Environment, install_missing_key_diagnostic, missing_key_message};
pub use error::{I18nError, I18nResult};
pub use facade::{Translator, bootstrap};
pub use hooks::{HookRegistry, SubscriptionId};
pub use interpolate::{Args, sprintf};
pub use loader::{PluginOptions, load_locale_from_file, load_plugin_options_from_file};
pub use locale::{LocaleData, LocaleHeader, PluralForms};
pub use localize::{Component, Localized, localize};
pub use number_format::{NumberFormatOptions, number_format};

/// A catalog value as written in JSON: a single string or a list of forms.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CatalogEntry {
    Single(String),
    Forms(Vec<String>),
}

/// Translations keyed by (optionally context-qualified) message key.
///
/// Each entry holds the translated forms: the singular first, then any
/// plural forms. Merging catalogs is last-write-wins per key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "HashMap<String, CatalogEntry>")]
pub struct Catalog(pub HashMap<String, Vec<String>>);

impl Catalog {
    pub fn new() -> Self {
        Catalog(HashMap::new())
    }
    pub fn with_message(&mut self, key: &str, message: &str) -> &mut Self {
        self.0.insert(key.to_owned(), vec![message.to_owned()]);
        self
    }
    pub fn with_plural_message(&mut self, key: &str, forms: &[&str]) -> &mut Self {
        self.0.insert(
            key.to_owned(),
            forms.iter().map(|form| form.to_string()).collect(),
        );
        self
    }
    pub fn with_context_message(&mut self, context: &str, key: &str, message: &str) -> &mut Self {
        self.with_message(&locale::context_key(Some(context), key), message)
    }
    pub fn get_message(&self, key: &str) -> Option<&Vec<String>> {
        self.0.get(key)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

impl From<HashMap<String, CatalogEntry>> for Catalog {
    fn from(entries: HashMap<String, CatalogEntry>) -> Self {
        Catalog(
            entries
                .into_iter()
                .map(|(key, entry)| match entry {
                    CatalogEntry::Single(message) => (key, vec![message]),
                    CatalogEntry::Forms(forms) => (key, forms),
                })
                .collect(),
        )
    }
}

impl FromIterator<(String, String)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Catalog(
            iter.into_iter()
                .map(|(key, message)| (key, vec![message]))
                .collect(),
        )
    }
}

/// Options for a single [`I18n::translate`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslateOptions {
    pub context: Option<String>,
    pub plural: Option<String>,
    pub count: Option<u64>,
    pub args: Args,
}

impl TranslateOptions {
    pub fn new() -> Self {
        TranslateOptions::default()
    }

    pub fn with_context(mut self, context: &str) -> Self {
        self.context = Some(context.to_string());
        self
    }

    pub fn with_plural(mut self, plural: &str, count: u64) -> Self {
        self.plural = Some(plural.to_string());
        self.count = Some(count);
        self
    }

    pub fn with_args(mut self, args: Args) -> Self {
        self.args = args;
        self
    }
}

/// Runtime configuration applied by [`I18n::configure`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct I18nConfig {
    pub locale_slug: Option<String>,
    pub decimal_point: Option<String>,
    pub thousands_sep: Option<String>,
    pub translations: Catalog,
}

/// Everything the engine knows about the active locale.
#[derive(Debug)]
pub struct State {
    pub locale: LocaleData,
    pub plural_forms: PluralForms,
}

pub struct I18n {
    state: State,
    hooks: HookRegistry,
    missing_key_callback: Option<hooks::MissingKeyCallback>,
}

impl Default for I18n {
    fn default() -> Self {
        I18n::new()
    }
}

impl I18n {
    pub fn new() -> Self {
        I18n {
            state: State {
                locale: LocaleData::new(),
                plural_forms: PluralForms::for_slug(locale::DEFAULT_LOCALE_SLUG),
            },
            hooks: HookRegistry::new(),
            missing_key_callback: None,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn get_locale(&self) -> &LocaleData {
        &self.state.locale
    }

    pub fn get_locale_slug(&self) -> Option<&str> {
        self.state.locale.slug()
    }

    pub fn set_locale(&mut self, locale: LocaleData) {
        self.replace_locale(locale);
        self.emit_change();
    }

    pub fn add_translations(&mut self, catalog: Catalog) {
        self.merge_translations(catalog);
        self.emit_change();
    }

    pub fn configure(&mut self, config: I18nConfig) {
        self.apply_config(config);
        self.emit_change();
    }

    pub fn set_missing_key_callback<F>(&mut self, callback: F)
    where
        F: Fn(&str) + 'static,
    {
        self.missing_key_callback = Some(Rc::new(callback));
    }

    pub fn has_missing_key_callback(&self) -> bool {
        self.missing_key_callback.is_some()
    }

    pub fn register_component_update_hook<F>(&mut self, hook: F)
    where
        F: Fn() + 'static,
    {
        self.hooks.register_component_update_hook(Rc::new(hook));
    }

    pub fn register_translate_hook<F>(&mut self, hook: F)
    where
        F: Fn(String, &TranslateOptions) -> String + 'static,
    {
        self.hooks.register_translate_hook(Rc::new(hook));
    }

    pub fn on_change<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&LocaleData) + 'static,
    {
        self.hooks.subscribe(Rc::new(listener))
    }

    pub fn off_change(&mut self, id: SubscriptionId) -> bool {
        self.hooks.unsubscribe(id)
    }

    pub fn translate(&self, key: &str, options: &TranslateOptions) -> String {
        let (translation, missing) = self.resolve(key, options);
        if let (Some(lookup_key), Some(callback)) = (missing, &self.missing_key_callback) {
            callback(&lookup_key);
        }
        self.hooks.apply_translate_hooks(translation, options)
    }

    /// Look up and interpolate a translation without running any callbacks.
    ///
    /// The second value is the lookup key when the catalog has no entry for
    /// it at all. An entry lacking the requested form falls back silently.
    pub(crate) fn resolve(
        &self,
        key: &str,
        options: &TranslateOptions,
    ) -> (String, Option<String>) {
        let lookup_key = locale::context_key(options.context.as_deref(), key);
        let count = options.count.unwrap_or(1);
        let wants_plural = options.plural.is_some() || options.count.is_some();

        let (translated, missing) = match self.state.locale.forms(&lookup_key) {
            Some(forms) => {
                let index = if wants_plural {
                    self.state.plural_forms.index_for(count)
                } else {
                    0
                };
                let form = forms.get(index).filter(|form| !form.is_empty()).cloned();
                (form, None)
            }
            None => (None, Some(lookup_key)),
        };

        let translation = translated.unwrap_or_else(|| match &options.plural {
            Some(plural) if count != 1 => plural.clone(),
            _ => key.to_string(),
        });

        let translation = if options.args.is_empty() {
            translation
        } else {
            sprintf(&translation, &options.args)
        };
        (translation, missing)
    }

    pub fn number_format(&self, value: f64, options: &NumberFormatOptions) -> String {
        number_format(value, options, &self.state.locale.header)
    }

    pub fn re_render_translations(&self) {
        for hook in self.hooks.component_update_hooks() {
            hook();
        }
        self.emit_change();
    }

    pub fn emit_change(&self) {
        for listener in self.hooks.change_listeners() {
            listener(&self.state.locale);
        }
    }

    pub(crate) fn missing_key_callback(&self) -> Option<hooks::MissingKeyCallback> {
        self.missing_key_callback.clone()
    }

    pub(crate) fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub(crate) fn replace_locale(&mut self, locale: LocaleData) {
        let slug = locale.slug().unwrap_or(locale::DEFAULT_LOCALE_SLUG);
        if slug != self.state.plural_forms.slug() {
            self.state.plural_forms = PluralForms::for_slug(slug);
        }
        debug!(
            slug,
            messages = locale.messages.len(),
            "Switched locale data"
        );
        self.state.locale = locale;
    }

    pub(crate) fn merge_translations(&mut self, catalog: Catalog) {
        debug!(entries = catalog.len(), "Adding translations");
        self.state.locale.messages.extend(catalog.0);
    }

    pub(crate) fn apply_config(&mut self, config: I18nConfig) {
        if let Some(slug) = config.locale_slug {
            let mut locale = self.state.locale.clone();
            locale.header.locale_slug = Some(slug);
            self.replace_locale(locale);
        }
        if let Some(decimal_point) = config.decimal_point {
            self.state.locale.header.decimal_point = Some(decimal_point);
        }
        if let Some(thousands_sep) = config.thousands_sep {
            self.state.locale.header.thousands_sep = Some(thousands_sep);
        }
        if !config.translations.is_empty() {
            self.merge_translations(config.translations);
        }
    }
}
