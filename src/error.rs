//! Error types for the heart containers widget
//!
//! Errors are fatal to a single render pass only. A missing actor is not an
//! error; see [`crate::app::RenderData::NoActor`].

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, HeartError>;

#[derive(Debug, thiserror::Error)]
pub enum HeartError {
    /// A required hit point attribute did not resolve on the character
    #[error("no proper path set for {field} hit points (path `{path}` did not resolve)")]
    MissingAttribute { field: &'static str, path: String },

    /// A hit point attribute resolved to something that is not a usable number
    #[error("{field} hit points at `{path}` are not a number (found {found})")]
    InvalidAttribute {
        field: &'static str,
        path: String,
        found: String,
    },

    /// A setting value was rejected by its schema
    #[error("invalid value for setting `{key}`: {reason}")]
    InvalidSetting { key: String, reason: String },

    /// Write to a key that was never registered
    #[error("setting `{0}` is not registered")]
    UnknownSetting(String),

    /// Lifecycle hook fired out of order or twice
    #[error("lifecycle violation: {0}")]
    Lifecycle(&'static str),

    /// The host configuration store failed
    #[error("settings store failure: {0}")]
    Storage(String),

    /// The page could not be read or updated
    #[error("dom failure: {0}")]
    Dom(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl HeartError {
    /// True when the error comes from user/world configuration rather than the host
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            HeartError::MissingAttribute { .. }
                | HeartError::InvalidAttribute { .. }
                | HeartError::InvalidSetting { .. }
                | HeartError::UnknownSetting(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        let missing = HeartError::MissingAttribute {
            field: "max",
            path: "hp.max".to_string(),
        };
        let not_a_number = HeartError::InvalidAttribute {
            field: "current",
            path: "hp.value".to_string(),
            found: "\"abc\"".to_string(),
        };
        assert!(missing.is_configuration());
        assert!(not_a_number.is_configuration());
        assert!(not_a_number.to_string().contains("not a number"));
        assert!(missing.to_string().contains("did not resolve"));

        assert!(!HeartError::Dom("mount failed".to_string()).is_configuration());
        assert!(!HeartError::Storage("quota".to_string()).is_configuration());
        assert!(!HeartError::Lifecycle("ready fired twice").is_configuration());
    }
}
