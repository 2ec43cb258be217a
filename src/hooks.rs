use std::rc::Rc;

use crate::TranslateOptions;
use crate::locale::LocaleData;

/// Called when translated UI must re-render.
pub type ComponentUpdateHook = Rc<dyn Fn()>;
/// Filter applied to every translation, in registration order.
pub type TranslateHook = Rc<dyn Fn(String, &TranslateOptions) -> String>;
/// State observer notified after the locale data changed.
pub type ChangeListener = Rc<dyn Fn(&LocaleData)>;
/// Receives every key that lookup could not find.
pub type MissingKeyCallback = Rc<dyn Fn(&str)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Registered callbacks, each kind kept in registration order.
#[derive(Default)]
pub struct HookRegistry {
    component_update: Vec<ComponentUpdateHook>,
    translate: Vec<TranslateHook>,
    listeners: Vec<(SubscriptionId, ChangeListener)>,
    next_id: u64,
}

impl HookRegistry {
    pub fn new() -> Self {
        HookRegistry::default()
    }

    pub fn register_component_update_hook(&mut self, hook: ComponentUpdateHook) {
        self.component_update.push(hook);
    }

    pub fn register_translate_hook(&mut self, hook: TranslateHook) {
        self.translate.push(hook);
    }

    pub fn subscribe(&mut self, listener: ChangeListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn apply_translate_hooks(&self, translation: String, options: &TranslateOptions) -> String {
        self.translate
            .iter()
            .fold(translation, |translation, hook| hook(translation, options))
    }

    // Snapshots let callers release the engine before running callbacks.

    pub fn component_update_hooks(&self) -> Vec<ComponentUpdateHook> {
        self.component_update.clone()
    }

    pub fn translate_hooks(&self) -> Vec<TranslateHook> {
        self.translate.clone()
    }

    pub fn change_listeners(&self) -> Vec<ChangeListener> {
        self.listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_translate_hooks_run_in_order() {
        let mut hooks = HookRegistry::new();
        hooks.register_translate_hook(Rc::new(|s: String, _: &TranslateOptions| {
            format!("[{}]", s)
        }));
        hooks.register_translate_hook(Rc::new(|s: String, _: &TranslateOptions| {
            s.to_uppercase()
        }));

        assert_eq!(
            hooks.apply_translate_hooks("save".to_string(), &TranslateOptions::new()),
            "[SAVE]"
        );
    }

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut hooks = HookRegistry::new();

        let first_calls = calls.clone();
        let first = hooks.subscribe(Rc::new(move |_: &LocaleData| {
            first_calls.borrow_mut().push("first")
        }));
        let second_calls = calls.clone();
        hooks.subscribe(Rc::new(move |_: &LocaleData| {
            second_calls.borrow_mut().push("second")
        }));
        assert_eq!(hooks.listener_count(), 2);

        assert!(hooks.unsubscribe(first));
        assert!(!hooks.unsubscribe(first));

        let locale = LocaleData::new();
        for listener in hooks.change_listeners() {
            listener(&locale);
        }
        assert_eq!(*calls.borrow(), vec!["second"]);
    }
}
