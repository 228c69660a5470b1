//! Running-app dots and notification badges.
//!
//! Indicators come from a shared pool that only grows. Every tick the pool is handed out afresh,
//! so an indicator never keeps its association with an icon across frames.

use dockmag_config::{Color, NotificationBadge as BadgeConfig, RunningIndicator};
use glam::DVec2;

use super::geometry::DockGeometry;
use crate::shell::Scene;
use crate::utils::IdCounter;

/// Offset of the dot below the icon, as a fraction of the icon size.
const DOT_OFFSET: f64 = 0.08;
/// Offset of the badge toward the top-right corner, as a fraction of the icon size.
const BADGE_OFFSET: f64 = 0.04;
const BADGE_ROTATION: f64 = 180.;
const BADGE_TRANSLATE: DVec2 = DVec2::new(0.4, 0.);

static INDICATOR_ID_COUNTER: IdCounter = IdCounter::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndicatorId(u64);

impl IndicatorId {
    fn next() -> IndicatorId {
        IndicatorId(INDICATOR_ID_COUNTER.next())
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorKind {
    Dot,
    Badge,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DotStyle {
    #[default]
    Default,
    Dots,
    Dot,
    Dashes,
    Dash,
    Squares,
    Square,
    Segmented,
    Solid,
    Triangles,
    Triangle,
    Diamonds,
    Diamond,
    Binary,
}

impl DotStyle {
    const ALL: [Self; 14] = [
        Self::Default,
        Self::Dots,
        Self::Dot,
        Self::Dashes,
        Self::Dash,
        Self::Squares,
        Self::Square,
        Self::Segmented,
        Self::Solid,
        Self::Triangles,
        Self::Triangle,
        Self::Diamonds,
        Self::Diamond,
        Self::Binary,
    ];

    pub fn from_index(index: u8) -> Self {
        Self::ALL
            .get(usize::from(index))
            .copied()
            .unwrap_or_default()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BadgeStyle {
    #[default]
    Default,
    Dot,
    Dash,
    Square,
    Triangle,
    Diamond,
}

impl BadgeStyle {
    const ALL: [Self; 6] = [
        Self::Default,
        Self::Dot,
        Self::Dash,
        Self::Square,
        Self::Triangle,
        Self::Diamond,
    ];

    pub fn from_index(index: u8) -> Self {
        Self::ALL
            .get(usize::from(index))
            .copied()
            .unwrap_or_default()
    }
}

/// Dot telling that an app has open windows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningDot {
    pub position: DVec2,
    pub scale: f64,
    pub count: u32,
    pub color: Color,
    pub style: DotStyle,
}

impl RunningDot {
    pub fn new(
        icon_position: DVec2,
        icon_scale: f64,
        n_windows: u32,
        geometry: &DockGeometry,
        config: &RunningIndicator,
    ) -> Self {
        let offset = geometry.icon_size() * DOT_OFFSET * geometry.scale_factor;
        Self {
            position: icon_position + DVec2::new(0., offset),
            scale: icon_scale,
            count: n_windows,
            color: config.color,
            style: DotStyle::from_index(config.style),
        }
    }
}

/// Counter of pending notifications.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotificationBadge {
    pub position: DVec2,
    pub scale: f64,
    pub count: u32,
    pub color: Color,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Translation as a fraction of the icon size.
    pub translate: DVec2,
    pub style: BadgeStyle,
}

impl NotificationBadge {
    pub fn new(
        icon_position: DVec2,
        icon_scale: f64,
        n_notifications: u32,
        geometry: &DockGeometry,
        config: &BadgeConfig,
    ) -> Self {
        let offset = geometry.icon_size() * BADGE_OFFSET * geometry.scale_factor;
        Self {
            position: icon_position + DVec2::new(offset, -offset),
            scale: icon_scale,
            count: n_notifications,
            color: config.color,
            rotation: BADGE_ROTATION,
            translate: BADGE_TRANSLATE,
            style: BadgeStyle::from_index(config.style),
        }
    }
}

#[derive(Debug)]
struct Slot {
    id: IndicatorId,
    shown: bool,
    assigned: bool,
}

#[derive(Debug, Default)]
pub struct IndicatorPool {
    dots: Vec<Slot>,
    badges: Vec<Slot>,
}

impl IndicatorPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grows the pool to hold at least the given number of each indicator.
    ///
    /// The pool never shrinks while the dock is enabled.
    pub fn reserve(&mut self, dots: usize, badges: usize, scene: &mut impl Scene) {
        grow(&mut self.dots, dots, IndicatorKind::Dot, scene);
        grow(&mut self.badges, badges, IndicatorKind::Badge, scene);
    }

    /// Marks every indicator as free for this frame.
    pub fn begin_frame(&mut self) {
        for slot in self.dots.iter_mut().chain(&mut self.badges) {
            slot.assigned = false;
        }
    }

    pub fn take(&mut self, kind: IndicatorKind) -> Option<IndicatorId> {
        let slots = match kind {
            IndicatorKind::Dot => &mut self.dots,
            IndicatorKind::Badge => &mut self.badges,
        };
        let slot = slots.iter_mut().find(|slot| !slot.assigned)?;
        slot.assigned = true;
        Some(slot.id)
    }

    /// Hides the indicators that were not handed out this frame.
    pub fn end_frame(&mut self, scene: &mut impl Scene) {
        for slot in self.dots.iter_mut().chain(&mut self.badges) {
            if slot.shown && !slot.assigned {
                scene.hide_indicator(slot.id);
            }
            slot.shown = slot.assigned;
        }
    }

    /// Releases every indicator from the scene.
    pub fn clear(&mut self, scene: &mut impl Scene) {
        for slot in self.dots.drain(..).chain(self.badges.drain(..)) {
            scene.release_indicator(slot.id);
        }
    }

    pub fn len(&self) -> usize {
        self.dots.len() + self.badges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn grow(slots: &mut Vec<Slot>, count: usize, kind: IndicatorKind, scene: &mut impl Scene) {
    while slots.len() < count {
        let id = IndicatorId::next();
        scene.create_indicator(id, kind);
        slots.push(Slot {
            id,
            shown: false,
            assigned: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::tests::fixture::TestShell;

    #[test]
    fn unknown_style_falls_back_to_default() {
        assert_eq!(DotStyle::from_index(6), DotStyle::Square);
        assert_eq!(DotStyle::from_index(13), DotStyle::Binary);
        assert_eq!(DotStyle::from_index(14), DotStyle::Default);
        assert_eq!(BadgeStyle::from_index(5), BadgeStyle::Diamond);
        assert_eq!(BadgeStyle::from_index(200), BadgeStyle::Default);
    }

    #[test]
    fn dot_and_badge_offsets() {
        let geometry = DockGeometry {
            icon_size: 50.,
            scale_factor: 2.,
            ..Default::default()
        };

        let dot = RunningDot::new(
            DVec2::new(10., 20.),
            1.5,
            3,
            &geometry,
            &RunningIndicator::default(),
        );
        assert_abs_diff_eq!(dot.position.x, 10., epsilon = 1e-9);
        assert_abs_diff_eq!(dot.position.y, 28., epsilon = 1e-9);
        assert_eq!(dot.scale, 1.5);
        assert_eq!(dot.count, 3);

        let badge = NotificationBadge::new(
            DVec2::new(10., 20.),
            1.,
            2,
            &geometry,
            &BadgeConfig::default(),
        );
        assert_abs_diff_eq!(badge.position.x, 14., epsilon = 1e-9);
        assert_abs_diff_eq!(badge.position.y, 16., epsilon = 1e-9);
        assert_eq!(badge.rotation, 180.);
        assert_eq!(badge.translate, DVec2::new(0.4, 0.));
    }

    #[test]
    fn pool_only_grows() {
        let mut shell = TestShell::default();
        let mut pool = IndicatorPool::new();

        pool.reserve(2, 3, &mut shell);
        assert_eq!(pool.len(), 5);
        pool.reserve(1, 1, &mut shell);
        assert_eq!(pool.len(), 5);
        pool.reserve(4, 3, &mut shell);
        assert_eq!(pool.len(), 7);
        assert_eq!(shell.indicators.len(), 7);

        pool.clear(&mut shell);
        assert!(pool.is_empty());
        assert!(shell.indicators.is_empty());
    }

    #[test]
    fn unassigned_indicators_are_hidden() {
        let mut shell = TestShell::default();
        let mut pool = IndicatorPool::new();
        pool.reserve(2, 0, &mut shell);

        pool.begin_frame();
        let a = pool.take(IndicatorKind::Dot).unwrap();
        let b = pool.take(IndicatorKind::Dot).unwrap();
        assert_ne!(a, b);
        assert_eq!(pool.take(IndicatorKind::Dot), None);
        assert_eq!(pool.take(IndicatorKind::Badge), None);
        pool.end_frame(&mut shell);
        assert!(shell.hidden_indicators.is_empty());

        pool.begin_frame();
        assert_eq!(pool.take(IndicatorKind::Dot), Some(a));
        pool.end_frame(&mut shell);
        assert_eq!(shell.hidden_indicators, vec![b]);
    }
}
