//! User settings shared by the server and the CLI

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_FLOW_PATH_MARKER: &str = "/maestro/";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("flowPathMarker must not be empty")]
    EmptyMarker,
}

/// Settings as sent by a client in `initializationOptions`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Only files whose path contains this marker are treated as flows
    pub flow_path_marker: String,
    /// Mirror debug logging to the client
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            flow_path_marker: DEFAULT_FLOW_PATH_MARKER.to_string(),
            debug: false,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON value; `null` yields the defaults
    pub fn from_json(value: serde_json::Value) -> Result<Self, SettingsError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        let settings: Settings = serde_json::from_value(value)?;
        if settings.flow_path_marker.is_empty() {
            return Err(SettingsError::EmptyMarker);
        }
        Ok(settings)
    }

    /// Whether `path` belongs to a flow folder
    pub fn is_flow_path(&self, path: &str) -> bool {
        path.replace('\\', "/").contains(&self.flow_path_marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_from_null() {
        let settings = Settings::from_json(serde_json::Value::Null).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.flow_path_marker, "/maestro/");
    }

    #[test]
    fn test_partial_settings_keep_defaults() {
        let settings = Settings::from_json(json!({ "debug": true })).unwrap();
        assert!(settings.debug);
        assert_eq!(settings.flow_path_marker, DEFAULT_FLOW_PATH_MARKER);
    }

    #[test]
    fn test_invalid_settings() {
        assert!(matches!(
            Settings::from_json(json!({ "debug": "yes" })),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json(json!({ "flowPathMarker": "" })),
            Err(SettingsError::EmptyMarker)
        ));
    }

    #[test]
    fn test_flow_path_filter() {
        let settings = Settings::default();
        assert!(settings.is_flow_path("/home/dev/app/maestro/login.yaml"));
        assert!(settings.is_flow_path(r"C:\work\app\maestro\login.yaml"));
        assert!(!settings.is_flow_path("/home/dev/app/.github/workflows/ci.yaml"));

        let custom = Settings {
            flow_path_marker: "/flows/".to_string(),
            ..Settings::default()
        };
        assert!(custom.is_flow_path("/repo/flows/a.yaml"));
    }
}
