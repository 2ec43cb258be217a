//! Shared handle to the application's single translation engine.
//!
//! [`bootstrap`] creates the engine once at startup, loads the host plugin's
//! catalog and, in development, installs the missing-key diagnostic. The
//! returned [`Translator`] is cloned into whatever needs localization; all
//! clones operate on the same engine.
//!
//! Hooks, change listeners and the missing-key callback are invoked after
//! the engine's borrow is released, so they may call back into the
//! translator, including mutating calls.

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use tracing::{debug, warn};

use crate::diagnostics::{Environment, install_missing_key_diagnostic};
use crate::loader::PluginOptions;
use crate::localize::{Component, Localized};
use crate::{
    Catalog, I18n, I18nConfig, LocaleData, NumberFormatOptions, State, SubscriptionId,
    TranslateOptions,
};

#[derive(Clone, Default)]
pub struct Translator {
    inner: Rc<RefCell<I18n>>,
}

/// Create the translator for this application instance.
pub fn bootstrap(options: &PluginOptions, environment: Environment) -> Translator {
    let mut i18n = I18n::new();
    i18n.merge_translations(options.catalog.clone());

    let diagnostics = install_missing_key_diagnostic(
        &mut i18n,
        &options.text_domain,
        &options.catalog_source,
        environment,
    );
    debug!(
        text_domain = %options.text_domain,
        entries = options.catalog.len(),
        %environment,
        diagnostics,
        "Translator ready"
    );

    Translator::from_engine(i18n)
}

impl Translator {
    pub fn new() -> Self {
        Translator::default()
    }

    pub fn from_engine(i18n: I18n) -> Self {
        Translator {
            inner: Rc::new(RefCell::new(i18n)),
        }
    }

    pub fn translate(&self, key: &str, options: &TranslateOptions) -> String {
        let (translation, missing, callback, hooks) = {
            let i18n = self.inner.borrow();
            let (translation, missing) = i18n.resolve(key, options);
            (
                translation,
                missing,
                i18n.missing_key_callback(),
                i18n.hooks().translate_hooks(),
            )
        };
        if let (Some(lookup_key), Some(callback)) = (missing, callback) {
            callback(&lookup_key);
        }
        hooks
            .iter()
            .fold(translation, |translation, hook| hook(translation, options))
    }

    /// Translate without options.
    pub fn t(&self, key: &str) -> String {
        self.translate(key, &TranslateOptions::default())
    }

    pub fn number_format(&self, value: f64, options: &NumberFormatOptions) -> String {
        self.inner.borrow().number_format(value, options)
    }

    pub fn configure(&self, config: I18nConfig) {
        self.inner.borrow_mut().apply_config(config);
        self.emit_change();
    }

    pub fn set_locale(&self, locale: LocaleData) {
        self.inner.borrow_mut().replace_locale(locale);
        self.emit_change();
    }

    pub fn get_locale(&self) -> LocaleData {
        self.inner.borrow().get_locale().clone()
    }

    pub fn get_locale_slug(&self) -> Option<String> {
        self.inner.borrow().get_locale_slug().map(str::to_string)
    }

    pub fn add_translations(&self, catalog: Catalog) {
        self.inner.borrow_mut().merge_translations(catalog);
        self.emit_change();
    }

    /// Run every component update hook, then notify state observers.
    pub fn re_render_translations(&self) {
        let hooks = self.inner.borrow().hooks().component_update_hooks();
        debug!(hooks = hooks.len(), "Re-rendering translations");
        for hook in hooks {
            hook();
        }
        self.emit_change();
    }

    pub fn register_component_update_hook<F>(&self, hook: F)
    where
        F: Fn() + 'static,
    {
        self.inner.borrow_mut().register_component_update_hook(hook);
    }

    pub fn register_translate_hook<F>(&self, hook: F)
    where
        F: Fn(String, &TranslateOptions) -> String + 'static,
    {
        self.inner.borrow_mut().register_translate_hook(hook);
    }

    /// Raw engine state. Do not hold the guard across calls that mutate the
    /// translator.
    pub fn state(&self) -> Ref<'_, State> {
        Ref::map(self.inner.borrow(), I18n::state)
    }

    /// Subscribe to locale changes (the state observer).
    pub fn on_change<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&LocaleData) + 'static,
    {
        self.inner.borrow_mut().on_change(listener)
    }

    pub fn off_change(&self, id: SubscriptionId) -> bool {
        match self.inner.try_borrow_mut() {
            Ok(mut i18n) => i18n.off_change(id),
            Err(_) => {
                warn!(?id, "Engine is borrowed, change listener stays subscribed");
                false
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().hooks().listener_count()
    }

    pub fn localize<C: Component>(&self, component: C) -> Localized<C> {
        Localized::new(self.clone(), component)
    }

    fn emit_change(&self) {
        let (listeners, locale) = {
            let i18n = self.inner.borrow();
            (i18n.hooks().change_listeners(), i18n.get_locale().clone())
        };
        for listener in listeners {
            listener(&locale);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tracing_test::traced_test;

    fn options() -> PluginOptions {
        PluginOptions::from_json_str(
            r#"{ "textDomain": "my-plugin", "i18n": { "Save": "Speichern", "Cancel": "Abbrechen" } }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_bootstrap_loads_catalog() {
        let translator = bootstrap(&options(), Environment::Production);
        assert_eq!(translator.t("Save"), "Speichern");
        assert_eq!(translator.t("Cancel"), "Abbrechen");
        assert_eq!(translator.t("Delete"), "Delete");
    }

    #[test]
    fn test_bootstrap_diagnostic_only_in_development() {
        let production = bootstrap(&options(), Environment::Production);
        assert!(!production.inner.borrow().has_missing_key_callback());

        let development = bootstrap(&options(), Environment::Development);
        assert!(development.inner.borrow().has_missing_key_callback());
    }

    #[test]
    fn test_clones_share_engine() {
        let translator = Translator::new();
        let other = translator.clone();
        other.add_translations(Catalog::from_iter([(
            "Save".to_string(),
            "Guardar".to_string(),
        )]));
        assert_eq!(translator.t("Save"), "Guardar");
    }

    #[test]
    fn test_hooks_may_call_back_into_translator() {
        let translator = bootstrap(&options(), Environment::Production);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let hook_translator = translator.clone();
        let hook_seen = seen.clone();
        translator.register_component_update_hook(move || {
            hook_seen.borrow_mut().push(hook_translator.t("Save"));
        });

        let listener_translator = translator.clone();
        let listener_seen = seen.clone();
        translator.on_change(move |_| {
            listener_seen.borrow_mut().push(listener_translator.t("Cancel"));
        });

        translator.re_render_translations();
        assert_eq!(
            *seen.borrow(),
            vec!["Speichern".to_string(), "Abbrechen".to_string()]
        );
    }

    #[test]
    fn test_translate_hook_may_mutate_translator() {
        let translator = bootstrap(&options(), Environment::Development);

        let hook_translator = translator.clone();
        translator.register_translate_hook(move |translation, _| {
            hook_translator.add_translations(Catalog::from_iter([(
                "Seen".to_string(),
                "Gesehen".to_string(),
            )]));
            translation
        });
        let callback_translator = translator.clone();
        translator.inner.borrow_mut().set_missing_key_callback(move |key| {
            callback_translator.register_component_update_hook(|| {});
            assert_eq!(key, "Delete");
        });

        assert_eq!(translator.t("Delete"), "Delete");
        assert_eq!(translator.t("Seen"), "Gesehen");
    }

    #[test]
    #[traced_test]
    fn test_off_change_while_borrowed_warns() {
        let translator = Translator::new();
        let id = translator.on_change(|_| {});
        {
            let _state = translator.state();
            assert!(!translator.off_change(id));
        }
        assert!(logs_contain("change listener stays subscribed"));
        assert_eq!(translator.listener_count(), 1);
        assert!(translator.off_change(id));
        assert_eq!(translator.listener_count(), 0);
    }

    #[test]
    fn test_state_and_locale_slug() {
        let translator = Translator::new();
        assert_eq!(translator.get_locale_slug(), None);

        translator.set_locale(LocaleData::new().with_slug("ru"));
        assert_eq!(translator.get_locale_slug(), Some("ru".to_string()));
        assert_eq!(translator.state().plural_forms.slug(), "ru");
    }

    #[test]
    fn test_configure_notifies_observers() {
        let translator = Translator::new();
        let changes = Rc::new(Cell::new(0));
        let counter = changes.clone();
        let id = translator.on_change(move |_| counter.set(counter.get() + 1));

        translator.configure(I18nConfig {
            locale_slug: Some("fr".to_string()),
            ..I18nConfig::default()
        });
        assert_eq!(changes.get(), 1);
        assert_eq!(translator.get_locale_slug(), Some("fr".to_string()));

        assert!(translator.off_change(id));
        translator.set_locale(LocaleData::new());
        assert_eq!(changes.get(), 1);
    }
}
