//! Tunable constants of the canvas.

use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, Result};
use crate::geometry::{MAX_SCALE, MIN_SCALE};

/// Where wheel zoom is anchored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelAnchor {
    /// Scale about the viewport's top-left corner; translation is untouched.
    /// Content under the cursor drifts while zooming.
    #[default]
    Origin,
    /// Keep the canvas point under the cursor fixed.
    Cursor,
}

/// Canvas configuration.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use slint_workflow_canvas::CanvasConfig;
///
/// let config = CanvasConfig::from_json_str(r#"{ "zoom_step": 1.5 }"#).unwrap();
/// assert_eq!(config.zoom_step, 1.5);
/// assert_eq!(config.node_width, 208.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Fixed width of every node box, canvas units.
    pub node_width: f32,
    /// Fixed height of every node box, canvas units.
    pub node_height: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Scale change per unit of wheel delta.
    pub wheel_sensitivity: f32,
    /// Multiplicative factor of one zoom-in/zoom-out step.
    pub zoom_step: f32,
    /// Control-point offset of committed edges as a fraction of `|dx|`.
    pub curvature: f32,
    /// Fixed control-point offset of the dashed preview curve.
    pub preview_offset: f32,
    /// Hit radius of the connection handles.
    pub handle_radius: f32,
    /// Vertical offset of edge labels from the curve.
    pub label_offset: f32,
    /// Spacing of the background dot grid at scale 1.
    pub grid_spacing: f32,
    pub wheel_anchor: WheelAnchor,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            node_width: 208.0,
            node_height: 72.0,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            wheel_sensitivity: 0.001,
            zoom_step: 1.2,
            curvature: 0.6,
            preview_offset: 50.0,
            handle_radius: 8.0,
            label_offset: -6.0,
            grid_spacing: 25.0,
            wheel_anchor: WheelAnchor::Origin,
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: CanvasConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values describe a usable canvas.
    pub fn validate(&self) -> Result<()> {
        fn invalid(field: &'static str, reason: &str) -> Result<()> {
            Err(CanvasError::InvalidConfig { field, reason: reason.to_owned() })
        }
        // NaN fails every comparison, so it is rejected too
        let positive = |v: f32| v > 0.0;

        if !positive(self.node_width) {
            return invalid("node_width", "must be positive");
        }
        if !positive(self.node_height) {
            return invalid("node_height", "must be positive");
        }
        if !positive(self.min_scale) {
            return invalid("min_scale", "must be positive");
        }
        if self.max_scale.is_nan() || self.min_scale > self.max_scale {
            return invalid("max_scale", "must not be smaller than min_scale");
        }
        if !positive(self.zoom_step - 1.0) {
            return invalid("zoom_step", "must be greater than 1");
        }
        if !positive(self.grid_spacing) {
            return invalid("grid_spacing", "must be positive");
        }
        Ok(())
    }

    /// Half the node box, used to center dropped nodes under the cursor.
    pub fn half_node_size(&self) -> (f32, f32) {
        (self.node_width / 2.0, self.node_height / 2.0)
    }
}
