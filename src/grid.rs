use crate::geometry::ViewTransform;

/// Below this on-screen spacing the dots merge into noise and are skipped.
pub const MIN_VISIBLE_SPACING: f32 = 4.0;

/// Placement of the background dot pattern in viewport space.
///
/// The pattern scrolls and scales with the view transform, so the dots stay
/// attached to canvas coordinates while panning and zooming.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotGrid {
    /// Distance between dots on screen
    pub spacing: f32,
    /// Position of the first dot column, in `[0, spacing)`
    pub offset_x: f32,
    /// Position of the first dot row, in `[0, spacing)`
    pub offset_y: f32,
}

impl DotGrid {
    /// Pattern for the given transform and canvas-space spacing, or `None`
    /// when the dots would be closer than [`MIN_VISIBLE_SPACING`].
    pub fn for_transform(transform: &ViewTransform, spacing: f32) -> Option<Self> {
        let effective_spacing = spacing * transform.scale;
        if effective_spacing.is_nan() || effective_spacing < MIN_VISIBLE_SPACING {
            return None;
        }
        Some(Self {
            spacing: effective_spacing,
            offset_x: transform.x.rem_euclid(effective_spacing),
            offset_y: transform.y.rem_euclid(effective_spacing),
        })
    }

    /// Dot centers covering a `width` x `height` viewport, row by row.
    pub fn dots(&self, width: f32, height: f32) -> impl Iterator<Item = (f32, f32)> + '_ {
        let columns = axis(self.offset_x, self.spacing, width);
        let rows = axis(self.offset_y, self.spacing, height);
        rows.flat_map(move |y| columns.clone().map(move |x| (x, y)))
    }
}

fn axis(offset: f32, spacing: f32, extent: f32) -> impl Iterator<Item = f32> + Clone {
    let count = ((extent - offset) / spacing).floor().max(-1.0) as i64 + 1;
    (0..count.max(0)).map(move |i| offset + i as f32 * spacing)
}

/// Generate SVG path commands for the dot grid
///
/// Each dot is a small square of side `dot_size` centered on a grid point.
///
/// # Arguments
/// * `width` - Viewport width in pixels
/// * `height` - Viewport height in pixels
/// * `transform` - Current view transform
/// * `spacing` - Canvas-space distance between dots (before zoom)
/// * `dot_size` - Dot size in pixels
///
/// # Returns
/// SVG path commands string (e.g., "M 24.5 24.5 h 1 v 1 h -1 Z M 49.5 ...")
pub fn generate_dot_grid_commands(
    width: f32,
    height: f32,
    transform: &ViewTransform,
    spacing: f32,
    dot_size: f32,
) -> String {
    let Some(grid) = DotGrid::for_transform(transform, spacing) else {
        return String::new();
    };

    let half = dot_size / 2.0;
    let mut commands = String::with_capacity(10000);
    for (x, y) in grid.dots(width, height) {
        if !commands.is_empty() {
            commands.push(' ');
        }
        commands.push_str(&format!(
            "M {} {} h {} v {} h {} Z",
            x - half,
            y - half,
            dot_size,
            dot_size,
            -dot_size
        ));
    }
    commands
}
