//! The component state store.
//!
//! Holds at most one selected instance plus a list of saved instances.
//! Every mutation that changes state notifies observers synchronously, in
//! subscription order, before returning.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::{debug, info};

use crate::component::{check_properties, PropValue, PropertyWarning, SelectedComponent};
use crate::registry::{Animation, ComponentDescriptor, ComponentRegistry, HoverEffect};
use crate::style::StyleConfig;

/// What changed in the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StoreEvent {
    Selected { id: String },
    StyleUpdated,
    PropertyUpdated { key: String },
    AnimationToggled { animation: Animation },
    HoverEffectToggled { effect: HoverEffect },
    Reset,
    Loaded { id: String },
    Saved { id: String },
    Removed { id: String },
    Cleared,
}

/// Receives store change notifications.
pub trait StoreObserver: Send + Sync {
    fn on_change(&self, event: &StoreEvent, selected: Option<&SelectedComponent>);
}

impl<F> StoreObserver for F
where
    F: Fn(&StoreEvent, Option<&SelectedComponent>) + Send + Sync,
{
    fn on_change(&self, event: &StoreEvent, selected: Option<&SelectedComponent>) {
        self(event, selected)
    }
}

/// Handle returned by [`ComponentStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Single owner of the selected component.
pub struct ComponentStore {
    registry: Arc<ComponentRegistry>,
    selected: Option<SelectedComponent>,
    saved: Vec<SelectedComponent>,
    observers: Vec<(SubscriptionId, Box<dyn StoreObserver>)>,
    next_subscription: u64,
}

impl ComponentStore {
    pub fn new(registry: Arc<ComponentRegistry>) -> Self {
        Self {
            registry,
            selected: None,
            saved: Vec::new(),
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// The current selection, if any.
    pub fn selected(&self) -> Option<&SelectedComponent> {
        self.selected.as_ref()
    }

    /// Saved instances in save order.
    pub fn saved(&self) -> &[SelectedComponent] {
        &self.saved
    }

    /// Descriptor of the current selection, if its type is registered.
    pub fn selected_descriptor(&self) -> Option<&ComponentDescriptor> {
        self.selected
            .as_ref()
            .and_then(|c| self.registry.get(&c.type_id))
    }

    /// Select a component type, replacing any current selection.
    ///
    /// Unknown types produce a generic fallback instance.
    pub fn select(&mut self, type_id: &str) -> &SelectedComponent {
        let created = now_millis();
        let instance = match self.registry.get(type_id) {
            Some(descriptor) => SelectedComponent::from_descriptor(descriptor, created),
            None => {
                debug!("Unknown component type {}, using fallback", type_id);
                SelectedComponent::fallback(type_id, created)
            }
        };

        info!("Selected {} ({})", instance.name, instance.id);
        let event = StoreEvent::Selected {
            id: instance.id.clone(),
        };
        let selected = self.selected.insert(instance);
        broadcast(&self.observers, &event, Some(&*selected));
        selected
    }

    /// Merge a partial style into the selection.
    pub fn update_style(&mut self, patch: StyleConfig) -> bool {
        let Some(selected) = self.selected.as_mut() else {
            debug!("update_style with nothing selected");
            return false;
        };

        let before = selected.style.clone();
        selected.style.merge(patch);
        if selected.style == before {
            return false;
        }
        self.notify(StoreEvent::StyleUpdated);
        true
    }

    /// Set one property or effect on the selection.
    ///
    /// Values outside a property's declared range or option list are stored
    /// as given; see [`ComponentStore::warnings`].
    pub fn update_property(&mut self, key: &str, value: PropValue) -> bool {
        let Some(selected) = self.selected.as_mut() else {
            debug!("update_property with nothing selected");
            return false;
        };

        if !selected.set_property(key, &value) {
            debug!(
                "Ignoring property {}={} for {}",
                key, value, selected.type_id
            );
            return false;
        }
        self.notify(StoreEvent::PropertyUpdated {
            key: key.to_string(),
        });
        true
    }

    /// Add the animation if absent, remove it if present.
    pub fn toggle_animation(&mut self, id: &str) -> bool {
        let Some(animation) = Animation::from_id(id) else {
            debug!("Unknown animation {}", id);
            return false;
        };
        if !self
            .selected_descriptor()
            .is_some_and(|d| d.offers_animation(animation))
        {
            debug!("Animation {} not offered by selection", id);
            return false;
        }
        let Some(selected) = self.selected.as_mut() else {
            return false;
        };

        toggle(&mut selected.animations, animation);
        self.notify(StoreEvent::AnimationToggled { animation });
        true
    }

    /// Add the hover effect if absent, remove it if present.
    pub fn toggle_hover_effect(&mut self, id: &str) -> bool {
        let Some(effect) = HoverEffect::from_id(id) else {
            debug!("Unknown hover effect {}", id);
            return false;
        };
        if !self
            .selected_descriptor()
            .is_some_and(|d| d.offers_hover_effect(effect))
        {
            debug!("Hover effect {} not offered by selection", id);
            return false;
        }
        let Some(selected) = self.selected.as_mut() else {
            return false;
        };

        toggle(&mut selected.hover_effects, effect);
        self.notify(StoreEvent::HoverEffectToggled { effect });
        true
    }

    /// Clear the selection.
    pub fn reset(&mut self) -> bool {
        if self.selected.take().is_none() {
            return false;
        }
        self.notify(StoreEvent::Reset);
        true
    }

    /// Replace the selection with a previously saved instance.
    pub fn load(&mut self, instance: SelectedComponent) -> &SelectedComponent {
        info!("Loaded {} ({})", instance.name, instance.id);
        let event = StoreEvent::Loaded {
            id: instance.id.clone(),
        };
        let selected = self.selected.insert(instance);
        broadcast(&self.observers, &event, Some(&*selected));
        selected
    }

    /// Append a copy of the selection to the saved list, replacing an
    /// earlier save with the same id.
    pub fn save_current(&mut self) -> Option<&SelectedComponent> {
        let instance = self.selected.clone()?;
        let id = instance.id.clone();
        match self.saved.iter_mut().find(|c| c.id == id) {
            Some(existing) => *existing = instance,
            None => self.saved.push(instance),
        }
        self.notify(StoreEvent::Saved { id: id.clone() });
        self.saved.iter().find(|c| c.id == id)
    }

    /// Remove a saved instance. Clears the selection when it has the same id.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.saved.len();
        self.saved.retain(|c| c.id != id);
        let removed_saved = self.saved.len() != before;

        let removed_selected = self.selected.as_ref().is_some_and(|c| c.id == id);
        if removed_selected {
            self.selected = None;
        }

        if !removed_saved && !removed_selected {
            return false;
        }
        self.notify(StoreEvent::Removed { id: id.to_string() });
        true
    }

    /// Drop every saved instance and the selection.
    pub fn clear(&mut self) {
        self.saved.clear();
        self.selected = None;
        self.notify(StoreEvent::Cleared);
    }

    /// Out-of-bounds property values on the selection.
    pub fn warnings(&self) -> Vec<PropertyWarning> {
        match (self.selected.as_ref(), self.selected_descriptor()) {
            (Some(c), Some(d)) => check_properties(c, d),
            _ => Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: impl StoreObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    fn notify(&self, event: StoreEvent) {
        broadcast(&self.observers, &event, self.selected.as_ref());
    }
}

impl std::fmt::Debug for ComponentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentStore")
            .field("selected", &self.selected)
            .field("saved", &self.saved.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

fn broadcast(
    observers: &[(SubscriptionId, Box<dyn StoreObserver>)],
    event: &StoreEvent,
    selected: Option<&SelectedComponent>,
) {
    for (_, observer) in observers {
        observer.on_change(event, selected);
    }
}

fn toggle<T: PartialEq>(list: &mut Vec<T>, item: T) {
    match list.iter().position(|x| *x == item) {
        Some(i) => {
            list.remove(i);
        }
        None => list.push(item),
    }
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ComponentKind, ComponentProps};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn store() -> ComponentStore {
        ComponentStore::new(Arc::new(ComponentRegistry::builtin()))
    }

    fn recorder(store: &mut ComponentStore) -> Arc<Mutex<Vec<StoreEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        store.subscribe(move |event: &StoreEvent, _: Option<&SelectedComponent>| {
            sink.lock().unwrap().push(event.clone());
        });
        events
    }

    #[test]
    fn select_seeds_exact_default_style() {
        let mut store = store();
        let registry = ComponentRegistry::builtin();

        for kind in ComponentKind::ALL {
            let selected = store.select(kind.id());
            let descriptor = registry.get(kind.id()).unwrap();
            assert_eq!(selected.style, descriptor.default_style);
            assert_eq!(
                selected.style.present_keys(),
                descriptor.default_style.present_keys()
            );
        }
    }

    #[test]
    fn select_button() {
        let mut store = store();
        let selected = store.select("button");

        assert_eq!(selected.type_id, "button");
        assert!(selected.id.starts_with("button_"));
        assert_eq!(
            selected.property_map().get("text"),
            Some(&PropValue::Text("Click Me".into()))
        );
        assert_eq!(selected.style.background_color.as_deref(), Some("#3b82f6"));
    }

    #[test]
    fn select_unknown_falls_back() {
        let mut store = store();
        let selected = store.select("doesnotexist");

        assert_eq!(
            selected.props,
            ComponentProps::Generic {
                text: "doesnotexist".into()
            }
        );
        assert_eq!(selected.style.background_color.as_deref(), Some("#f3f4f6"));
    }

    #[test]
    fn select_replaces_previous_selection() {
        let mut store = store();
        store.select("button");
        store.select("card");

        assert_eq!(store.selected().unwrap().type_id, "card");
    }

    #[test]
    fn update_style_changes_only_given_keys() {
        let mut store = store();
        store.select("card");
        let before = store.selected().unwrap().style.clone();

        let patch = StyleConfig {
            border_radius: Some("20px".into()),
            ..Default::default()
        };
        assert!(store.update_style(patch));

        let after = &store.selected().unwrap().style;
        assert_eq!(after.border_radius.as_deref(), Some("20px"));
        assert_eq!(
            StyleConfig {
                border_radius: before.border_radius.clone(),
                ..after.clone()
            },
            before
        );
    }

    #[test]
    fn update_style_merges_hover_deeply() {
        let mut store = store();
        store.select("button");
        store.update_style(StyleConfig::patch_from_pair("hover.backgroundColor", "#000").unwrap());
        store.update_style(StyleConfig::patch_from_pair("hover.color", "#fff").unwrap());

        let hover = store.selected().unwrap().style.hover.clone().unwrap();
        assert_eq!(hover.background_color.as_deref(), Some("#000"));
        assert_eq!(hover.color.as_deref(), Some("#fff"));
    }

    #[test]
    fn mutations_without_selection_are_noops() {
        let mut store = store();
        let events = recorder(&mut store);

        assert!(!store.update_style(StyleConfig::default()));
        assert!(!store.update_property("text", PropValue::Text("x".into())));
        assert!(!store.toggle_animation("fade"));
        assert!(!store.toggle_hover_effect("lift"));
        assert!(!store.reset());
        assert!(store.selected().is_none());
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn update_property_accepts_out_of_range() {
        let mut store = store();
        store.select("progress");

        assert!(store.update_property("value", PropValue::Number(250.0)));
        assert_eq!(
            store.selected().unwrap().property_map().get("value"),
            Some(&PropValue::Number(250.0))
        );
        assert_eq!(store.warnings().len(), 1);
    }

    #[test]
    fn update_property_ignores_unknown_key() {
        let mut store = store();
        store.select("button");
        let before = store.selected().unwrap().clone();

        assert!(!store.update_property("title", PropValue::Text("x".into())));
        assert_eq!(store.selected().unwrap(), &before);
    }

    #[test]
    fn effects_are_addressed_as_properties() {
        let mut store = store();
        store.select("card");

        assert!(store.update_property("effect", PropValue::Text("glass".into())));
        assert!(store.update_property("pulse", PropValue::Bool(true)));
        let effects = &store.selected().unwrap().effects;
        assert_eq!(effects.preset, Some(crate::component::EffectPreset::Glass));
        assert!(effects.pulse);
    }

    #[test]
    fn toggle_animation_twice_restores() {
        let mut store = store();
        store.select("button");
        let before = store.selected().unwrap().animations.clone();

        assert!(store.toggle_animation("bounce"));
        assert_eq!(store.selected().unwrap().animations, vec![Animation::Bounce]);
        assert!(store.toggle_animation("bounce"));
        assert_eq!(store.selected().unwrap().animations, before);
    }

    #[test]
    fn toggle_hover_effect_twice_restores() {
        let mut store = store();
        store.select("card");
        store.toggle_hover_effect("glow");
        let before = store.selected().unwrap().hover_effects.clone();

        store.toggle_hover_effect("lift");
        store.toggle_hover_effect("lift");
        assert_eq!(store.selected().unwrap().hover_effects, before);
    }

    #[test]
    fn toggle_requires_offered_effect() {
        let mut store = store();
        store.select("modal");

        assert!(!store.toggle_hover_effect("lift"));
        assert!(!store.toggle_animation("bounce"));
        assert!(store.selected().unwrap().animations.is_empty());

        store.select("doesnotexist");
        assert!(!store.toggle_animation("fade"));
    }

    #[test]
    fn reset_clears_selection() {
        let mut store = store();
        store.select("button");

        assert!(store.reset());
        assert!(store.selected().is_none());
    }

    #[test]
    fn observers_see_every_mutation_in_order() {
        let mut store = store();
        let events = recorder(&mut store);

        store.select("button");
        store.update_property("text", PropValue::Text("Go".into()));
        store.toggle_animation("fade");
        store.reset();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], StoreEvent::Selected { .. }));
        assert_eq!(
            events[1],
            StoreEvent::PropertyUpdated {
                key: "text".into()
            }
        );
        assert_eq!(
            events[2],
            StoreEvent::AnimationToggled {
                animation: Animation::Fade
            }
        );
        assert_eq!(events[3], StoreEvent::Reset);
    }

    #[test]
    fn observer_receives_current_instance() {
        let mut store = store();
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        store.subscribe(move |_: &StoreEvent, c: Option<&SelectedComponent>| {
            *sink.lock().unwrap() = c.map(|c| c.name.clone());
        });

        store.select("card");
        assert_eq!(seen.lock().unwrap().as_deref(), Some("Card"));
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut store = store();
        let events = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&events);
        let id = store.subscribe(move |_: &StoreEvent, _: Option<&SelectedComponent>| {
            *sink.lock().unwrap() += 1;
        });

        store.select("button");
        assert!(store.unsubscribe(id));
        store.select("card");

        assert_eq!(*events.lock().unwrap(), 1);
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn save_remove_and_clear() {
        let mut store = store();
        let id = store.select("button").id.clone();
        store.save_current();
        store.save_current();
        assert_eq!(store.saved().len(), 1);

        assert!(store.remove(&id));
        assert!(store.saved().is_empty());
        assert!(store.selected().is_none());
        assert!(!store.remove(&id));

        store.select("card");
        store.save_current();
        store.clear();
        assert!(store.saved().is_empty());
        assert!(store.selected().is_none());
    }

    #[test]
    fn load_replaces_selection() {
        let mut store = store();
        let mut saved = SelectedComponent::fallback("widget", 1);
        saved.name = "My Widget".into();

        store.select("button");
        let loaded = store.load(saved.clone());
        assert_eq!(loaded, &saved);
    }
}
