//! Heart containers widget
//!
//! Glue between the host and the heart calculation: registers the setting
//! schema, resolves the assigned character, builds render data from a single
//! settings snapshot, and hands markup to the mount surface.

use std::collections::HashMap;

use serde_json::{Value, json};

use crate::actor::{ActorResolver, hit_points};
use crate::consts::{ELEMENT_ID, MODULE_TITLE, MOUNT_ANCHOR_ID};
use crate::error::{HeartError, Result};
use crate::hearts::{HeartRow, UnitSize, compute};
use crate::settings::{Settings, SettingsRegistry, SettingsStore, keys};
use crate::template;

/// Data handed to the template for one render
#[derive(Debug, Clone, PartialEq)]
pub enum RenderData {
    /// No character is assigned to the current user
    NoActor,
    Hearts {
        row: HeartRow,
        /// Hearts are expanded
        active: bool,
        icon: String,
    },
}

impl RenderData {
    /// JSON shape consumed by host-side templates
    pub fn to_json(&self) -> Value {
        match self {
            RenderData::NoActor => json!({ "noActor": true }),
            RenderData::Hearts { row, active, icon } => json!({
                "hearts": row.hearts,
                "tempHearts": row.temp_hearts,
                "active": active,
                "icon": icon,
            }),
        }
    }
}

/// Host facility that places widget markup in the page
pub trait MountSurface {
    /// Insert `markup` under `anchor_id`, replacing any element with `element_id`
    fn mount(&mut self, anchor_id: &str, element_id: &str, markup: &str) -> Result<()>;
}

/// Surface that keeps mounted markup in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    elements: HashMap<String, (String, String)>,
    /// Number of mount calls received
    pub mounts: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup currently mounted under `element_id`
    pub fn markup(&self, element_id: &str) -> Option<&str> {
        self.elements.get(element_id).map(|(_, markup)| markup.as_str())
    }

    pub fn anchor(&self, element_id: &str) -> Option<&str> {
        self.elements.get(element_id).map(|(anchor, _)| anchor.as_str())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl MountSurface for MemorySurface {
    fn mount(&mut self, anchor_id: &str, element_id: &str, markup: &str) -> Result<()> {
        self.elements
            .insert(element_id.to_string(), (anchor_id.to_string(), markup.to_string()));
        self.mounts += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Initialized,
    Ready,
}

/// The widget application
pub struct HeartContainers<S, A, M> {
    store: S,
    actor: A,
    surface: M,
    registry: SettingsRegistry,
    lifecycle: Lifecycle,
    mounted: bool,
}

impl<S, A, M> HeartContainers<S, A, M>
where
    S: SettingsStore,
    A: ActorResolver,
    M: MountSurface,
{
    pub fn new(store: S, actor: A, surface: M) -> Self {
        Self {
            store,
            actor,
            surface,
            registry: SettingsRegistry::new(),
            lifecycle: Lifecycle::Created,
            mounted: false,
        }
    }

    /// Initialization hook: register the setting schema
    pub fn on_initialize(&mut self) -> Result<()> {
        if self.lifecycle != Lifecycle::Created {
            return Err(HeartError::Lifecycle("initialize fired more than once"));
        }
        self.registry = SettingsRegistry::with_defaults();
        self.lifecycle = Lifecycle::Initialized;
        log::info!("Registered {} heart container settings", self.registry.len());
        Ok(())
    }

    /// Ready hook: first render when enabled and a character is assigned
    ///
    /// Returns whether the widget was mounted.
    pub fn on_ready(&mut self) -> Result<bool> {
        match self.lifecycle {
            Lifecycle::Created => return Err(HeartError::Lifecycle("ready fired before initialize")),
            Lifecycle::Ready => return Err(HeartError::Lifecycle("ready fired more than once")),
            Lifecycle::Initialized => {}
        }
        self.lifecycle = Lifecycle::Ready;

        let settings = self.settings()?;
        if !settings.enabled {
            log::info!("Heart containers disabled for this client");
            return Ok(false);
        }
        if self.actor.character().is_none() {
            log::info!("No character assigned, heart containers not shown");
            return Ok(false);
        }
        self.render()?;
        Ok(true)
    }

    /// Snapshot of every setting
    pub fn settings(&self) -> Result<Settings> {
        self.require_initialized()?;
        Settings::load(&self.store, &self.registry)
    }

    /// Build render data from one settings snapshot
    pub fn render_data(&self) -> Result<RenderData> {
        let settings = self.settings()?;
        let Some(character) = self.actor.character() else {
            return Ok(RenderData::NoActor);
        };

        let hp = hit_points(&character, &settings.paths)?;
        let row = compute(&hp, UnitSize::from(settings.unit_size));
        log::debug!(
            "{} hearts ({} temporary) for {}/{} hp",
            row.total(),
            row.temp_hearts.len(),
            hp.value,
            hp.max
        );

        Ok(RenderData::Hearts {
            row,
            active: settings.visible,
            icon: settings.icon,
        })
    }

    /// Render and mount, replacing any previous widget element
    pub fn render(&mut self) -> Result<()> {
        let data = self.render_data().inspect_err(|e| {
            if e.is_configuration() {
                log::error!("{} render failed, check the module settings: {}", MODULE_TITLE, e);
            } else {
                log::error!("{} render failed: {}", MODULE_TITLE, e);
            }
        })?;
        let markup = template::render(&data);
        self.surface.mount(MOUNT_ANCHOR_ID, ELEMENT_ID, &markup)?;
        self.mounted = true;
        Ok(())
    }

    /// Flip the persisted visibility, returning the new state
    pub fn toggle(&mut self) -> Result<bool> {
        let visible = !self.settings()?.visible;
        self.registry
            .write(&mut self.store, keys::VISIBLE, Value::Bool(visible))?;
        log::debug!("Heart containers {}", if visible { "shown" } else { "hidden" });
        Ok(visible)
    }

    /// Character data changed: re-render if the widget is on screen
    pub fn on_actor_updated(&mut self) -> Result<()> {
        if self.mounted {
            self.render()?;
        }
        Ok(())
    }

    /// Validate and persist a setting value
    pub fn set_setting(&mut self, key: &str, value: Value) -> Result<()> {
        self.require_initialized()?;
        self.registry.write(&mut self.store, key, value)
    }

    pub fn registry(&self) -> &SettingsRegistry {
        &self.registry
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn surface(&self) -> &M {
        &self.surface
    }

    pub fn actor_mut(&mut self) -> &mut A {
        &mut self.actor
    }

    fn require_initialized(&self) -> Result<()> {
        if self.lifecycle == Lifecycle::Created {
            return Err(HeartError::Lifecycle("settings used before initialize"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::StaticActor;
    use crate::settings::MemoryStore;

    type TestApp = HeartContainers<MemoryStore, StaticActor, MemorySurface>;

    fn app(character: Option<Value>) -> TestApp {
        HeartContainers::new(MemoryStore::new(), StaticActor(character), MemorySurface::new())
    }

    fn hero(value: f64, max: f64) -> Value {
        json!({ "hp": { "value": value, "max": max, "temp": 0, "tempmax": 0 } })
    }

    #[test]
    fn test_lifecycle_order() {
        let mut app = app(Some(hero(35.0, 50.0)));
        assert!(matches!(app.on_ready(), Err(HeartError::Lifecycle(_))));
        app.on_initialize().unwrap();
        assert!(matches!(app.on_initialize(), Err(HeartError::Lifecycle(_))));
        assert!(app.on_ready().unwrap());
        assert!(matches!(app.on_ready(), Err(HeartError::Lifecycle(_))));
    }

    #[test]
    fn test_ready_mounts_widget() {
        let mut app = app(Some(hero(35.0, 50.0)));
        app.on_initialize().unwrap();
        assert!(app.on_ready().unwrap());
        assert!(app.is_mounted());

        let surface = app.surface();
        assert_eq!(surface.anchor(ELEMENT_ID), Some(MOUNT_ANCHOR_ID));
        let markup = surface.markup(ELEMENT_ID).unwrap();
        assert_eq!(markup.matches("<li").count(), 5);
        assert!(markup.contains("pulse"));
    }

    #[test]
    fn test_ready_without_actor() {
        let mut app = app(None);
        app.on_initialize().unwrap();
        assert!(!app.on_ready().unwrap());
        assert!(!app.is_mounted());
        assert_eq!(app.render_data().unwrap(), RenderData::NoActor);
        assert_eq!(app.render_data().unwrap().to_json(), json!({ "noActor": true }));
    }

    #[test]
    fn test_disabled_client() {
        let mut app = app(Some(hero(35.0, 50.0)));
        app.on_initialize().unwrap();
        app.set_setting(keys::ENABLED, json!(false)).unwrap();
        assert!(!app.on_ready().unwrap());
        assert!(app.surface().is_empty());
    }

    #[test]
    fn test_missing_path_is_fatal_to_render() {
        let mut app = app(Some(json!({ "hp": { "max": 50 } })));
        app.on_initialize().unwrap();
        let err = app.on_ready().unwrap_err();
        assert!(matches!(err, HeartError::MissingAttribute { field: "current", .. }));
        assert!(!app.is_mounted());
        assert!(app.surface().is_empty());
    }

    #[test]
    fn test_toggle_persists_visibility() {
        let mut app = app(Some(hero(35.0, 50.0)));
        app.on_initialize().unwrap();
        assert!(app.settings().unwrap().visible);
        assert!(!app.toggle().unwrap());
        assert!(!app.settings().unwrap().visible);

        match app.render_data().unwrap() {
            RenderData::Hearts { active, .. } => assert!(!active),
            other => panic!("unexpected render data: {other:?}"),
        }
        assert!(app.toggle().unwrap());
    }

    #[test]
    fn test_unit_size_from_settings() {
        let mut app = app(Some(hero(35.0, 50.0)));
        app.on_initialize().unwrap();
        app.set_setting(keys::UNIT_SIZE, json!(25)).unwrap();
        assert!(app.set_setting(keys::UNIT_SIZE, json!(0)).is_err());

        match app.render_data().unwrap() {
            RenderData::Hearts { row, .. } => assert_eq!(row.total(), 2),
            other => panic!("unexpected render data: {other:?}"),
        }
    }

    #[test]
    fn test_actor_update_rerenders_in_place() {
        let mut app = app(Some(hero(35.0, 50.0)));
        app.on_initialize().unwrap();

        // Not mounted yet, nothing to refresh
        app.on_actor_updated().unwrap();
        assert_eq!(app.surface().mounts, 0);

        app.on_ready().unwrap();
        app.actor_mut().0 = Some(hero(50.0, 50.0));
        app.on_actor_updated().unwrap();

        let surface = app.surface();
        assert_eq!(surface.mounts, 2);
        assert_eq!(surface.len(), 1);
        assert!(!surface.markup(ELEMENT_ID).unwrap().contains("pulse"));
    }

    #[test]
    fn test_render_data_json_shape() {
        let mut app = app(Some(json!({ "hp": { "value": 10, "max": 10, "temp": 5, "tempmax": 20 } })));
        app.on_initialize().unwrap();
        let json = app.render_data().unwrap().to_json();
        assert_eq!(json["hearts"].as_array().unwrap().len(), 3);
        assert_eq!(json["hearts"][2]["isYellow"], true);
        assert_eq!(json["tempHearts"].as_array().unwrap().len(), 1);
        assert_eq!(json["active"], true);
        assert_eq!(json["icon"], "fa-heart");
    }

    #[test]
    fn test_settings_before_initialize() {
        let app = app(None);
        assert!(matches!(app.settings(), Err(HeartError::Lifecycle(_))));
    }
}
