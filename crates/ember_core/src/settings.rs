//! Engine Settings
//!
//! Runtime configuration for the animation system and the debug renderer.
//! Every field has a default, so a settings file only needs to name what it
//! changes:
//!
//! ```rust,ignore
//! use ember_core::settings::EngineSettings;
//!
//! let settings = EngineSettings::from_json(r#"{ "debug": { "enabled": true, "show_skeletons": true } }"#)?;
//! assert!(settings.debug.draws_skeletons());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{EmberError, Result};

/// Playback configuration for skeletal animation controllers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Frames advanced per tick by newly created controllers.
    pub default_step: f32,
    /// Run independent skinned nodes on the rayon pool
    /// (only honoured when built with the `parallel` feature).
    pub parallel: bool,
}

impl AnimationSettings {
    /// `default_step` must be a finite, non-negative frame count.
    pub fn validate(&self) -> Result<()> {
        if !self.default_step.is_finite() || self.default_step < 0.0 {
            return Err(EmberError::InvalidSettings {
                field: "animation.default_step",
                reason: format!("{} is not a finite, non-negative frame step", self.default_step),
            });
        }
        Ok(())
    }
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            default_step: 1.0,
            parallel: false,
        }
    }
}

/// Debug renderer switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSettings {
    pub enabled: bool,
    pub show_skeletons: bool,
}

impl DebugSettings {
    /// Bone lines are produced only when the debug renderer is on
    /// and skeleton display is requested.
    #[inline]
    #[must_use]
    pub fn draws_skeletons(&self) -> bool {
        self.enabled && self.show_skeletons
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub animation: AnimationSettings,
    pub debug: DebugSettings,
}

impl EngineSettings {
    /// Parses and validates settings. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        log::debug!("Loaded engine settings: {settings:?}");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.animation.validate()
    }
}
