//! Pan and zoom state of the canvas.

use crate::config::{CanvasConfig, WheelAnchor};
use crate::geometry::{clamp_scale, Point, ViewTransform};

/// Direction of a discrete zoom command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Owns the [`ViewTransform`] and the pan gesture.
///
/// Panning works in viewport pixels: each pointer move adds its raw delta to
/// the translation, independent of the current scale. Every scale mutation
/// goes through [`clamp_scale`] before it is stored.
#[derive(Debug, Clone)]
pub struct ViewportController {
    transform: ViewTransform,
    /// Last raw pointer position while a pan is armed.
    pan_anchor: Option<Point>,
    min_scale: f32,
    max_scale: f32,
    wheel_sensitivity: f32,
    zoom_step: f32,
    wheel_anchor: WheelAnchor,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(&CanvasConfig::default())
    }
}

impl ViewportController {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            transform: ViewTransform::IDENTITY,
            pan_anchor: None,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            wheel_sensitivity: config.wheel_sensitivity,
            zoom_step: config.zoom_step,
            wheel_anchor: config.wheel_anchor,
        }
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Replace the transform wholesale; the scale is clamped.
    pub fn set_transform(&mut self, transform: ViewTransform) {
        self.transform = ViewTransform {
            scale: clamp_scale(transform.scale, self.min_scale, self.max_scale),
            ..transform
        };
    }

    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    /// Current scale as a rounded percentage, for the zoom toolbar.
    pub fn zoom_percent(&self) -> i32 {
        (self.transform.scale * 100.0).round() as i32
    }

    // === Pan ===

    /// Arm a pan at the given raw pointer position.
    ///
    /// Callers only invoke this when the press landed on the empty background.
    pub fn begin_pan(&mut self, pointer: Point) {
        tracing::debug!(x = pointer.x, y = pointer.y, "pan started");
        self.pan_anchor = Some(pointer);
    }

    /// Translate by the pointer delta since the previous event.
    ///
    /// Returns `true` if the transform changed.
    pub fn continue_pan(&mut self, pointer: Point) -> bool {
        let Some(last) = self.pan_anchor else {
            return false;
        };
        let delta = pointer - last;
        self.transform.x += delta.x;
        self.transform.y += delta.y;
        self.pan_anchor = Some(pointer);
        tracing::trace!(x = self.transform.x, y = self.transform.y, "pan moved");
        delta != Point::ZERO
    }

    /// Disarm the pan. Calling it while not panning is a no-op.
    pub fn end_pan(&mut self) {
        if self.pan_anchor.take().is_some() {
            tracing::debug!(x = self.transform.x, y = self.transform.y, "pan ended");
        }
    }

    // === Zoom ===

    /// Wheel zoom. Positive `delta` zooms out.
    ///
    /// `scale' = clamp(scale - delta * sensitivity)`; the translation is kept,
    /// so scaling happens about the viewport origin.
    pub fn zoom_by_wheel(&mut self, delta: f32) {
        let scale = self.transform.scale + (-delta * self.wheel_sensitivity);
        self.transform.scale = clamp_scale(scale, self.min_scale, self.max_scale);
        tracing::trace!(scale = self.transform.scale, "wheel zoom");
    }

    /// Wheel zoom that keeps the canvas point under `cursor` in place.
    ///
    /// `cursor` is relative to the viewport's top-left corner.
    pub fn zoom_by_wheel_at(&mut self, delta: f32, cursor: Point) {
        let old_scale = self.transform.scale;
        let scale = clamp_scale(
            old_scale + (-delta * self.wheel_sensitivity),
            self.min_scale,
            self.max_scale,
        );
        let ratio = scale / old_scale;
        self.transform.x = cursor.x - (cursor.x - self.transform.x) * ratio;
        self.transform.y = cursor.y - (cursor.y - self.transform.y) * ratio;
        self.transform.scale = scale;
        tracing::trace!(scale, "wheel zoom at cursor");
    }

    /// Wheel zoom honouring the configured [`WheelAnchor`].
    pub fn wheel(&mut self, delta: f32, cursor: Point) {
        match self.wheel_anchor {
            WheelAnchor::Origin => self.zoom_by_wheel(delta),
            WheelAnchor::Cursor => self.zoom_by_wheel_at(delta, cursor),
        }
    }

    /// Discrete zoom step from the toolbar.
    pub fn zoom_step(&mut self, direction: ZoomDirection) {
        let factor = match direction {
            ZoomDirection::In => self.zoom_step,
            ZoomDirection::Out => 1.0 / self.zoom_step,
        };
        self.transform.scale =
            clamp_scale(self.transform.scale * factor, self.min_scale, self.max_scale);
        tracing::debug!(scale = self.transform.scale, ?direction, "zoom step");
    }

    pub fn zoom_in(&mut self) {
        self.zoom_step(ZoomDirection::In);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_step(ZoomDirection::Out);
    }

    /// Back to `{0, 0, 1}`.
    pub fn reset_view(&mut self) {
        self.transform = ViewTransform::IDENTITY;
        tracing::debug!("view reset");
    }
}
