// Pointer-driven axis interaction mode
use serde::Serialize;

/// Which axis currently accepts pan/zoom. Exactly one is free at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisMode {
    /// Horizontal pan/zoom, vertical axis fixed.
    #[default]
    XFree,
    /// Vertical zoom, horizontal axis fixed.
    YFree,
}

impl AxisMode {
    pub fn x_fixed(self) -> bool {
        self == AxisMode::YFree
    }

    pub fn y_fixed(self) -> bool {
        self == AxisMode::XFree
    }
}

/// Two-state machine keyed on whether the pointer sits in the left axis
/// label gutter.
#[derive(Debug, Clone)]
pub struct AxisInteractionMode {
    gutter_width_px: f64,
    mode: AxisMode,
}

impl AxisInteractionMode {
    pub fn new(gutter_width_px: f64) -> Self {
        Self {
            gutter_width_px,
            mode: AxisMode::default(),
        }
    }

    pub fn mode(&self) -> AxisMode {
        self.mode
    }

    /// Feed a viewport-relative pointer x position. Returns the new mode when
    /// the pointer crossed the gutter boundary.
    pub fn pointer_moved(&mut self, x_px: f64) -> Option<AxisMode> {
        let target = if x_px < self.gutter_width_px {
            AxisMode::YFree
        } else {
            AxisMode::XFree
        };
        if target == self.mode {
            return None;
        }
        self.mode = target;
        Some(target)
    }
}
