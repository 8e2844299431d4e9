//! Tunable physics constants.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Upper bound on `arc_count`; each pair adds two descriptors to every field.
pub const MAX_ARC_COUNT: usize = 64;

/// Constants shared by the field, pendulum and pole models.
///
/// Every field has a default, so a partial JSON object such as
/// `{"damping": 0.8}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhysicsConfig {
    /// Per-event velocity decay of the hanging magnet. Default: **0.92**.
    pub damping: f64,
    /// Largest horizontal displacement from the pendulum rest point. Default: **100**.
    pub max_swing: f64,
    /// Numerator of the inverse-square pole force. Default: **500**.
    pub strength_multiplier: f64,
    /// Floor applied to pole separations before dividing. Default: **1**.
    pub min_distance: f64,

    /// Number of symmetric arc pairs per field. Default: **5**.
    pub arc_count: usize,
    /// Offset step between consecutive arc pairs. Default: **20**.
    pub arc_spacing: f64,
    /// Smallest vertical arc radius. Default: **20**.
    pub arc_min_radius: f64,
    /// Length of the open field lines leaving a bar magnet. Default: **300**.
    pub straight_length: f64,
    /// Horizontal inset of ambient poles from the box's vertical center line. Default: **20**.
    pub ambient_pole_inset: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            damping: 0.92,
            max_swing: 100.0,
            strength_multiplier: 500.0,
            min_distance: 1.0,
            arc_count: 5,
            arc_spacing: 20.0,
            arc_min_radius: 20.0,
            straight_length: 300.0,
            ambient_pole_inset: 20.0,
        }
    }
}

impl PhysicsConfig {
    /// Reject values the models cannot run with.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("damping", self.damping),
            ("maxSwing", self.max_swing),
            ("strengthMultiplier", self.strength_multiplier),
            ("minDistance", self.min_distance),
            ("arcSpacing", self.arc_spacing),
            ("arcMinRadius", self.arc_min_radius),
            ("straightLength", self.straight_length),
            ("ambientPoleInset", self.ambient_pole_inset),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(CoreError::InvalidConfig(format!("{name} must be finite")));
        }
        if self.damping <= 0.0 || self.damping > 1.0 {
            return Err(CoreError::InvalidConfig(format!(
                "damping must be in (0, 1], got {}",
                self.damping
            )));
        }
        if self.max_swing < 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "maxSwing must be non-negative, got {}",
                self.max_swing
            )));
        }
        if self.min_distance <= 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "minDistance must be positive, got {}",
                self.min_distance
            )));
        }
        if self.arc_count == 0 || self.arc_count > MAX_ARC_COUNT {
            return Err(CoreError::InvalidConfig(format!(
                "arcCount must be in 1..={MAX_ARC_COUNT}, got {}",
                self.arc_count
            )));
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON object and validate it.
    ///
    /// # Errors
    /// Malformed JSON and out-of-range values both map to `InvalidConfig`.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| CoreError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
