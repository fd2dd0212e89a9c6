use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::controller::TargetRayMode;
use crate::error::InteractionError;

/// What the driver does when a host breaks its contract (unknown controller,
/// object moved out from under a grab, ...).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractPolicy {
    /// Return the error to the caller.
    Strict,
    /// Log at ERROR and treat the event as a no-op.
    #[default]
    Lenient,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub controller_count: usize,
    /// Pointer length when nothing is hovered.
    pub default_ray_length: f32,
    pub marker_radius: f32,
    pub contract_policy: ContractPolicy,
    /// Modes that never get hover feedback.
    pub hover_suppressed_modes: Vec<TargetRayMode>,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        InteractionConfig {
            controller_count: 2,
            default_ray_length: 5.0,
            marker_radius: 0.25,
            contract_policy: ContractPolicy::Lenient,
            hover_suppressed_modes: vec![TargetRayMode::Screen],
        }
    }
}

impl InteractionConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, InteractionError> {
        let config: InteractionConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, InteractionError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| InteractionError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), InteractionError> {
        if self.controller_count == 0 {
            return Err(InteractionError::InvalidConfig(
                "controller_count must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("default_ray_length", self.default_ray_length),
            ("marker_radius", self.marker_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(InteractionError::InvalidConfig(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
