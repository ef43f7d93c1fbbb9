//! Character lookup and attribute path resolution
//!
//! Character records are arbitrary JSON documents owned by the host. Hit
//! points are read off them by dotted path (`system.attributes.hp.value`).

use serde_json::Value;

use crate::error::{HeartError, Result};
use crate::hearts::HitPoints;
use crate::settings::AttributePaths;

/// Supplies the character assigned to the current user
pub trait ActorResolver {
    /// `None` when no character is assigned
    fn character(&self) -> Option<Value>;
}

/// Resolver over a fixed record, useful for the native binary and tests
#[derive(Debug, Clone, Default)]
pub struct StaticActor(pub Option<Value>);

impl ActorResolver for StaticActor {
    fn character(&self) -> Option<Value> {
        self.0.clone()
    }
}

/// Walk a dotted path through objects (by key) and arrays (by index)
///
/// An empty path resolves to the record itself. A `null` leaf resolves; only
/// an absent key or a non-container mid-path is unresolved.
pub fn resolve_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(record);
    }
    path.split('.').try_fold(record, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Outcome of reading a number off a record
#[derive(Debug, Clone, PartialEq)]
enum Lookup<'a> {
    Missing,
    Number(f64),
    /// Present, but not a finite number
    Invalid(&'a Value),
}

/// Numeric value at `path`; numeric strings are accepted and `null` reads as zero
fn resolve_number<'a>(record: &'a Value, path: &str) -> Lookup<'a> {
    let Some(found) = resolve_path(record, path) else {
        return Lookup::Missing;
    };
    let number = match found {
        Value::Null => Some(0.0),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() => Lookup::Number(n),
        _ => Lookup::Invalid(found),
    }
}

/// Read a hit point snapshot off a character
///
/// `value` and `max` must resolve to numbers; `temp` and `temp_max` default
/// to zero.
pub fn hit_points(record: &Value, paths: &AttributePaths) -> Result<HitPoints> {
    let required = |field: &'static str, path: &str| match resolve_number(record, path) {
        Lookup::Number(n) => Ok(n),
        Lookup::Missing => Err(HeartError::MissingAttribute {
            field,
            path: path.to_string(),
        }),
        Lookup::Invalid(found) => Err(HeartError::InvalidAttribute {
            field,
            path: path.to_string(),
            found: found.to_string(),
        }),
    };
    let optional = |path: &str| match resolve_number(record, path) {
        Lookup::Number(n) => n,
        Lookup::Missing => 0.0,
        Lookup::Invalid(found) => {
            log::debug!("Ignoring non-numeric {} at {}", found, path);
            0.0
        }
    };

    let value = required("current", &paths.value)?;
    let max = required("max", &paths.max)?;

    Ok(HitPoints::new(value, max).with_temp(optional(&paths.temp), optional(&paths.temp_max)))
}
