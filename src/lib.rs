//! Heart Containers - a hit point HUD made of hearts
//!
//! Core modules:
//! - `hearts`: Pure heart tier calculation
//! - `settings`: Setting schema, validation, and the host settings store
//! - `actor`: Character lookup and attribute path resolution
//! - `app`: Widget lifecycle, render data, and the toggle interaction
//! - `template`: Markup for the mount surface
//! - `platform`: Browser storage and DOM mounting (wasm32 only)

pub mod actor;
pub mod app;
pub mod error;
pub mod hearts;
#[cfg(target_arch = "wasm32")]
pub mod platform;
pub mod settings;
pub mod template;

pub use actor::{ActorResolver, StaticActor, hit_points, resolve_path};
pub use app::{HeartContainers, MemorySurface, MountSurface, RenderData};
pub use error::{HeartError, Result};
pub use hearts::{Heart, HeartRow, HitPoints, TempHeart, Tier, UnitSize, compute};
pub use settings::{MemoryStore, Scope, Settings, SettingsRegistry, SettingsStore};

/// Widget constants
pub mod consts {
    /// Namespace for settings and localization keys
    pub const MODULE_ID: &str = "heart-containers";
    pub const MODULE_TITLE: &str = "Heart Containers";

    /// Element the widget is inserted under
    pub const MOUNT_ANCHOR_ID: &str = "ui-bottom";
    /// Id of the widget root, replaced on every re-render
    pub const ELEMENT_ID: &str = "heart-containers-application";

    /// Hit points per heart
    pub const DEFAULT_UNIT_SIZE: u32 = 10;
    pub const MIN_UNIT_SIZE: u32 = 1;
    pub const MAX_UNIT_SIZE: u32 = 100;

    /// Longest heart row rendered; larger hit point pools are truncated
    pub const MAX_HEARTS: usize = 1000;

    /// Font Awesome glyph class
    pub const DEFAULT_ICON: &str = "fa-heart";
}
