use std::cell::Cell;
use std::rc::Rc;

use crate::facade::Translator;
use crate::hooks::SubscriptionId;

/// Something that renders translated output.
pub trait Component {
    fn render(&self, translator: &Translator) -> String;
}

impl<F> Component for F
where
    F: Fn(&Translator) -> String,
{
    fn render(&self, translator: &Translator) -> String {
        self(translator)
    }
}

/// A component bound to a translator.
///
/// The wrapper subscribes to locale changes and reports itself stale until
/// it is rendered again. Dropping it removes the subscription.
pub struct Localized<C> {
    translator: Translator,
    component: C,
    stale: Rc<Cell<bool>>,
    subscription: SubscriptionId,
}

/// Bind `component` to `translator`.
pub fn localize<C: Component>(translator: &Translator, component: C) -> Localized<C> {
    Localized::new(translator.clone(), component)
}

impl<C: Component> Localized<C> {
    pub fn new(translator: Translator, component: C) -> Self {
        let stale = Rc::new(Cell::new(true));
        let flag = stale.clone();
        let subscription = translator.on_change(move |_| flag.set(true));
        Localized {
            translator,
            component,
            stale,
            subscription,
        }
    }

    pub fn render(&self) -> String {
        self.stale.set(false);
        self.component.render(&self.translator)
    }

    pub fn needs_render(&self) -> bool {
        self.stale.get()
    }

    pub fn component(&self) -> &C {
        &self.component
    }
}

impl<C> Drop for Localized<C> {
    fn drop(&mut self) {
        self.translator.off_change(self.subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Catalog, LocaleData, TranslateOptions};

    struct SaveButton;

    impl Component for SaveButton {
        fn render(&self, translator: &Translator) -> String {
            format!("<button>{}</button>", translator.t("Save"))
        }
    }

    #[test]
    fn test_render_uses_translator() {
        let translator = Translator::new();
        translator.add_translations(Catalog::from_iter([(
            "Save".to_string(),
            "Enregistrer".to_string(),
        )]));

        let button = localize(&translator, SaveButton);
        assert!(button.needs_render());
        assert_eq!(button.render(), "<button>Enregistrer</button>");
        assert!(!button.needs_render());
    }

    #[test]
    fn test_locale_change_marks_stale() {
        let translator = Translator::new();
        let label = translator.localize(|t: &Translator| {
            t.translate("Save", &TranslateOptions::new())
        });
        assert_eq!(label.render(), "Save");

        translator.set_locale(
            LocaleData::new()
                .with_slug("de")
                .with_message("Save", &["Speichern"]),
        );
        assert!(label.needs_render());
        assert_eq!(label.render(), "Speichern");

        translator.re_render_translations();
        assert!(label.needs_render());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let translator = Translator::new();
        let button = localize(&translator, SaveButton);
        assert_eq!(translator.listener_count(), 1);
        drop(button);
        assert_eq!(translator.listener_count(), 0);
    }
}
