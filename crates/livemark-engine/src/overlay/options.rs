use serde::{Deserialize, Serialize};

/// Tunables for the block overlay. Distances are in the host's layout units
/// (pixels for a graphical surface, cells for a terminal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayOptions {
    /// Distance outside the content box that still counts as content.
    pub margin_tolerance: f64,
    /// Distance from a viewport edge at which auto-scroll starts.
    pub edge_threshold: f64,
    /// Scroll distance per tick when the pointer is at (or past) the edge.
    pub max_scroll_speed: f64,
    /// Auto-scroll timer period.
    pub tick_interval_ms: u64,
    /// Width of one handle button; the add button and grip sit side by side
    /// left of the content box.
    pub handle_width: f64,
    pub handle_height: f64,
    /// Pointer travel on a grip before a press turns into a block drag.
    pub drag_threshold: f64,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            margin_tolerance: 4.0,
            edge_threshold: 40.0,
            max_scroll_speed: 20.0,
            tick_interval_ms: 16,
            handle_width: 20.0,
            handle_height: 20.0,
            drag_threshold: 4.0,
        }
    }
}
