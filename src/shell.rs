//! Interfaces to the shell the dock lives in.
//!
//! The engine never owns shell objects. It reads the launcher icons and the dock geometry through
//! [`IconSource`] and writes its animated state back through [`Scene`].

use glam::DVec2;

use crate::dock::geometry::DockGeometry;
use crate::dock::indicators::{IndicatorId, IndicatorKind, NotificationBadge, RunningDot};
use crate::dock::registry::ProxyId;
use crate::utils::Axis;

/// Opaque identity of a launcher icon in the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IconKey(pub u64);

/// Launcher icon as currently reported by the shell.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceIcon {
    pub key: IconKey,
    /// Resting top-left position on screen, if the icon has been laid out.
    pub position: Option<DVec2>,
    pub n_windows: u32,
    pub n_notifications: u32,
    pub is_favorite: bool,
    /// The icon is on its way out of the dock, e.g. dragged off or being removed.
    pub animating_out: bool,
}

impl SourceIcon {
    pub fn new(key: IconKey, position: DVec2) -> Self {
        Self {
            key,
            position: Some(position),
            n_windows: 0,
            n_notifications: 0,
            is_favorite: true,
            animating_out: false,
        }
    }

    /// Resting position if it is usable for layout.
    pub fn resting_position(&self) -> Option<DVec2> {
        self.position.filter(|p| p.is_finite())
    }
}

/// Where to put an icon's tooltip label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    /// Axis `value` is on, pointing away from the screen edge.
    pub axis: Axis,
    pub value: f64,
    /// Coordinate along the dock. Set on vertical docks to line the label up with the icon; left
    /// to the shell otherwise.
    pub along: Option<f64>,
    /// Fraction of its own width the label is moved back along `axis`, so labels of right docks
    /// end left of the icon.
    pub width_shift: f64,
}

pub trait IconSource {
    /// Launcher icons in dock order.
    fn icons(&self) -> Vec<SourceIcon>;

    fn geometry(&self) -> DockGeometry;

    /// Runs the shell's dock layout routine.
    fn relayout(&mut self);
}

pub trait Scene {
    fn create_proxy(&mut self, id: ProxyId, key: IconKey, icon_size: f64);
    fn release_proxy(&mut self, id: ProxyId);
    fn set_proxy_visible(&mut self, id: ProxyId, visible: bool);
    /// Whether the proxy receives clicks.
    fn set_proxy_reactive(&mut self, id: ProxyId, reactive: bool);
    fn set_proxy_transform(&mut self, id: ProxyId, position: DVec2, scale: f64);
    fn place_label(&mut self, key: IconKey, placement: LabelPlacement);

    /// Sets the opacity of the shell's own icon, which is hidden while a proxy stands in for it.
    fn set_source_icon_opacity(&mut self, key: IconKey, opacity: u8);

    fn create_indicator(&mut self, id: IndicatorId, kind: IndicatorKind);
    fn release_indicator(&mut self, id: IndicatorId);
    fn hide_indicator(&mut self, id: IndicatorId);
    fn show_dot(&mut self, id: IndicatorId, dot: &RunningDot);
    fn show_badge(&mut self, id: IndicatorId, badge: &NotificationBadge);

    /// Shows or hides the layers holding the proxies and the indicators.
    fn set_layers_visible(&mut self, visible: bool);
}

/// Everything the engine talks to during a tick.
pub trait Shell: IconSource + Scene {}

impl<T: IconSource + Scene> Shell for T {}
