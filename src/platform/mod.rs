//! Browser platform layer
//!
//! Handles the browser side of the widget:
//! - Settings storage (LocalStorage)
//! - DOM mounting and replace-on-rerender
//! - The toggle click handler
//! - The JS-facing widget handle

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, MouseEvent, Storage};

use crate::actor::StaticActor;
use crate::app::{HeartContainers, MountSurface};
use crate::consts::{ELEMENT_ID, MODULE_ID, MODULE_TITLE, MOUNT_ANCHOR_ID};
use crate::error::{HeartError, Result};
use crate::settings::{Scope, SettingsStore};

fn document() -> Result<Document> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| HeartError::Dom("no document available".to_string()))
}

fn js_err(e: HeartError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Settings store backed by `window.localStorage`
///
/// World-scoped keys are namespaced separately so a host can mirror them from
/// shared storage.
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    pub fn new() -> Result<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| HeartError::Storage("LocalStorage unavailable".to_string()))?;
        Ok(Self { storage })
    }

    fn storage_key(scope: Scope, key: &str) -> String {
        format!("{}.{}.{}", MODULE_ID, scope.as_str(), key)
    }
}

impl SettingsStore for LocalStorageStore {
    fn get(&self, scope: Scope, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(&Self::storage_key(scope, key))
            .map_err(|e| HeartError::Storage(format!("read {key}: {e:?}")))
    }

    fn set(&mut self, scope: Scope, key: &str, raw: &str) -> Result<()> {
        self.storage
            .set_item(&Self::storage_key(scope, key), raw)
            .map_err(|e| HeartError::Storage(format!("write {key}: {e:?}")))
    }
}

/// Mounts markup into the live document
#[derive(Default)]
pub struct DomSurface;

impl MountSurface for DomSurface {
    fn mount(&mut self, anchor_id: &str, element_id: &str, markup: &str) -> Result<()> {
        let document = document()?;
        if let Some(existing) = document.get_element_by_id(element_id) {
            existing.set_outer_html(markup);
            return Ok(());
        }

        let anchor: Element = match document.get_element_by_id(anchor_id) {
            Some(anchor) => anchor,
            None => {
                log::warn!("Mount anchor #{} missing, using body", anchor_id);
                document
                    .body()
                    .ok_or_else(|| HeartError::Dom("document has no body".to_string()))?
                    .into()
            }
        };
        anchor
            .insert_adjacent_html("beforeend", markup)
            .map_err(|e| HeartError::Dom(format!("mount failed: {e:?}")))
    }
}

type WebApp = HeartContainers<LocalStorageStore, StaticActor, DomSurface>;

/// JS handle for the widget
///
/// The host calls `initialize` from its init hook, `ready` from its ready
/// hook, and `updateCharacter` whenever the assigned character changes.
#[wasm_bindgen]
pub struct WebWidget {
    app: Rc<RefCell<WebApp>>,
}

fn parse_character(json: Option<String>) -> Result<Option<Value>> {
    json.map(|s| serde_json::from_str(&s)).transpose().map_err(HeartError::from)
}

#[wasm_bindgen]
impl WebWidget {
    #[wasm_bindgen(constructor)]
    pub fn new(character_json: Option<String>) -> std::result::Result<WebWidget, JsValue> {
        let store = LocalStorageStore::new().map_err(js_err)?;
        let actor = StaticActor(parse_character(character_json).map_err(js_err)?);
        let app = HeartContainers::new(store, actor, DomSurface);
        Ok(WebWidget {
            app: Rc::new(RefCell::new(app)),
        })
    }

    pub fn initialize(&self) -> std::result::Result<(), JsValue> {
        self.app.borrow_mut().on_initialize().map_err(js_err)
    }

    pub fn ready(&self) -> std::result::Result<bool, JsValue> {
        let mounted = self.app.borrow_mut().on_ready().map_err(js_err)?;
        if mounted {
            self.bind_toggle().map_err(js_err)?;
        }
        Ok(mounted)
    }

    #[wasm_bindgen(js_name = updateCharacter)]
    pub fn update_character(&self, character_json: Option<String>) -> std::result::Result<(), JsValue> {
        let character = parse_character(character_json).map_err(js_err)?;
        let mut app = self.app.borrow_mut();
        app.actor_mut().0 = character;
        app.on_actor_updated().map_err(js_err)
    }

    /// Render data as JSON for host-side templates
    #[wasm_bindgen(js_name = renderData)]
    pub fn render_data(&self) -> std::result::Result<String, JsValue> {
        let data = self.app.borrow().render_data().map_err(js_err)?;
        Ok(data.to_json().to_string())
    }

    /// Delegated click handler on the anchor so it survives re-renders
    fn bind_toggle(&self) -> Result<()> {
        let document = document()?;
        let Some(anchor) = document
            .get_element_by_id(MOUNT_ANCHOR_ID)
            .or_else(|| document.body().map(Into::into))
        else {
            return Ok(());
        };

        let app = self.app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let hit = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest(&format!("#{ELEMENT_ID} [data-action='toggle']")).ok().flatten());
            let Some(button) = hit else {
                return;
            };

            match app.borrow_mut().toggle() {
                Ok(visible) => {
                    let _ = button.class_list().toggle_with_force("active", visible);
                    if let Some(root) = button.closest(&format!("#{ELEMENT_ID}")).ok().flatten() {
                        let _ = root.class_list().toggle_with_force("active", visible);
                    }
                }
                Err(e) => log::error!("Toggle failed: {}", e),
            }
        });
        anchor
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(|e| HeartError::Dom(format!("bind toggle: {e:?}")))?;
        closure.forget();
        Ok(())
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    log::info!("{} loaded", MODULE_TITLE);
}
