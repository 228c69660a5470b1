use glam::DVec2;

use crate::utils::{floor_to_even, Axis};

/// Screen edge the dock is anchored to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    #[default]
    Bottom,
    Left,
}

impl Edge {
    /// Axis along which the icons are laid out.
    pub fn inline_axis(self) -> Axis {
        match self {
            Edge::Top | Edge::Bottom => Axis::X,
            Edge::Left | Edge::Right => Axis::Y,
        }
    }

    /// Axis pointing into and out of the screen edge.
    pub fn perpendicular_axis(self) -> Axis {
        match self {
            Edge::Top | Edge::Bottom => Axis::Y,
            Edge::Left | Edge::Right => Axis::X,
        }
    }

    /// Sign of the perpendicular direction pointing away from the edge, into the screen.
    pub fn away_sign(self) -> f64 {
        match self {
            Edge::Top | Edge::Left => 1.,
            Edge::Bottom | Edge::Right => -1.,
        }
    }

    pub fn is_vertical(self) -> bool {
        self.inline_axis() == Axis::Y
    }
}

/// Per-frame view of the dock as resolved by the shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DockGeometry {
    pub edge: Edge,
    /// Logical icon size, before the display scale factor.
    pub icon_size: f64,
    pub scale_factor: f64,
    pub pointer: DVec2,
    /// Screen position of the dock corner the icons are ordered from.
    pub anchor: DVec2,
    pub in_fullscreen: bool,
    /// Whether auto-hide currently keeps the icons off screen.
    pub autohide_hidden: bool,
}

impl DockGeometry {
    /// Icon size used by the engine, floored to a multiple of 2.
    pub fn icon_size(&self) -> f64 {
        floor_to_even(self.icon_size)
    }

    /// Icon size in physical pixels.
    pub fn scaled_icon_size(&self) -> f64 {
        self.icon_size() * self.scale_factor
    }
}

impl Default for DockGeometry {
    fn default() -> Self {
        Self {
            edge: Edge::Bottom,
            icon_size: 48.,
            scale_factor: 1.,
            pointer: DVec2::splat(f64::NAN),
            anchor: DVec2::ZERO,
            in_fullscreen: false,
            autohide_hidden: false,
        }
    }
}
