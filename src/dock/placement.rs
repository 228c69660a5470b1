//! Smoothing toward targets and writing the result to the scene.

use dockmag_config::Config;
use glam::DVec2;

use super::geometry::{DockGeometry, Edge};
use super::indicators::{IndicatorKind, IndicatorPool, NotificationBadge, RunningDot};
use super::registry::IconProxy;
use crate::shell::{LabelPlacement, Scene};
use crate::utils::{blend, blend_point, distance};

pub const SCALE_SMOOTH_COEF: f64 = 2.5;
pub const POS_SMOOTH_COEF: f64 = 2.;
/// Extra smoothing when no icon is magnified, so icons settle gently once the pointer leaves.
pub const ON_LEAVE_COEF: f64 = 1.4;

/// Below this many icon sizes a position counts as arrived.
const CONVERGED_DISTANCE: f64 = 0.01;
/// Above this many icon sizes a position jumps rather than glides.
const SNAP_DISTANCE: f64 = 3.;

const LABEL_OFFSET_HORIZONTAL: f64 = 0.9;
const LABEL_OFFSET_VERTICAL: f64 = 1.1;
const LABEL_WIDTH_SHIFT_RIGHT: f64 = 1. / 1.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionStep {
    Converged,
    Blend,
    Snap,
}

impl PositionStep {
    pub fn for_distance(dst: f64, icon_size: f64) -> Self {
        if dst <= icon_size * CONVERGED_DISTANCE {
            PositionStep::Converged
        } else if dst < icon_size * SNAP_DISTANCE {
            PositionStep::Blend
        } else {
            PositionStep::Snap
        }
    }
}

/// Moves a proxy one step toward its target. Returns whether its position glided.
///
/// Non-finite results are dropped and the previous value is kept.
pub fn smooth(proxy: &mut IconProxy, icon_size: f64, retracting: bool) -> bool {
    let leave = if retracting { ON_LEAVE_COEF } else { 1. };

    let scale = blend(proxy.scale, proxy.target_scale, SCALE_SMOOTH_COEF * leave);
    if scale.is_finite() {
        proxy.scale = scale.max(1.);
    }

    if !proxy.target.is_finite() {
        return false;
    }
    if !proxy.position.is_finite() {
        proxy.position = proxy.target;
        return false;
    }

    let dst = distance(proxy.position, proxy.target);
    match PositionStep::for_distance(dst, icon_size) {
        PositionStep::Blend => {
            let position = blend_point(proxy.position, proxy.target, POS_SMOOTH_COEF * leave);
            if !position.is_finite() {
                return false;
            }
            proxy.position = position;
            true
        }
        PositionStep::Converged | PositionStep::Snap => {
            proxy.position = proxy.target;
            false
        }
    }
}

/// Where the tooltip label goes for an icon at `position` and `scale`.
pub fn label_placement(position: DVec2, scale: f64, geometry: &DockGeometry) -> LabelPlacement {
    let size = geometry.icon_size() * scale * geometry.scale_factor;
    let value = match geometry.edge {
        Edge::Bottom => position.y - size * LABEL_OFFSET_HORIZONTAL,
        Edge::Top => position.y + size * LABEL_OFFSET_HORIZONTAL,
        Edge::Left => position.x + size * LABEL_OFFSET_VERTICAL,
        Edge::Right => position.x - size * LABEL_OFFSET_VERTICAL,
    };
    let vertical = geometry.edge.is_vertical();
    LabelPlacement {
        axis: geometry.edge.perpendicular_axis(),
        value,
        along: vertical.then_some(position.y),
        width_shift: if geometry.edge == Edge::Right {
            LABEL_WIDTH_SHIFT_RIGHT
        } else {
            0.
        },
    }
}

/// Smooths every proxy and writes it, its label and its indicators to the scene.
///
/// Returns whether any proxy glided this tick.
pub fn place(
    proxies: &mut [IconProxy],
    geometry: &DockGeometry,
    config: &Config,
    retracting: bool,
    indicators: &mut IndicatorPool,
    scene: &mut impl Scene,
) -> bool {
    let _span = tracy_client::span!("place");

    let show_dots = !config.running_indicator.off;
    let show_badges = !config.notification_badge.off;

    let dots = if show_dots {
        proxies.iter().filter(|p| p.n_windows > 0).count()
    } else {
        0
    };
    let badges = if show_badges { proxies.len() } else { 0 };
    indicators.reserve(dots, badges, scene);
    indicators.begin_frame();

    let icon_size = geometry.icon_size();
    let mut did_animate = false;

    for proxy in proxies.iter_mut() {
        proxy.dot = None;
        proxy.badge = None;

        scene.set_proxy_visible(proxy.id(), proxy.visible);
        if !proxy.visible {
            continue;
        }

        did_animate |= smooth(proxy, icon_size, retracting);

        if !proxy.position.is_finite() {
            continue;
        }

        scene.set_proxy_transform(proxy.id(), proxy.position, proxy.scale);
        scene.place_label(
            proxy.key(),
            label_placement(proxy.position, proxy.scale, geometry),
        );

        if show_badges && proxy.n_notifications > 0 {
            if let Some(id) = indicators.take(IndicatorKind::Badge) {
                let badge = NotificationBadge::new(
                    proxy.position,
                    proxy.scale,
                    proxy.n_notifications,
                    geometry,
                    &config.notification_badge,
                );
                scene.show_badge(id, &badge);
                proxy.badge = Some(id);
            }
        }

        if show_dots && proxy.n_windows > 0 {
            if let Some(id) = indicators.take(IndicatorKind::Dot) {
                let dot = RunningDot::new(
                    proxy.position,
                    proxy.scale,
                    proxy.n_windows,
                    geometry,
                    &config.running_indicator,
                );
                scene.show_dot(id, &dot);
                proxy.dot = Some(id);
            }
        }
    }

    indicators.end_frame(scene);

    did_animate
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::dock::registry::ProxyRegistry;
    use crate::shell::{IconKey, SourceIcon};
    use crate::tests::fixture::TestShell;
    use crate::utils::Axis;

    fn proxy_at(x: f64) -> IconProxy {
        let mut registry = ProxyRegistry::new();
        let icon = SourceIcon::new(IconKey(0), DVec2::new(x, 0.));
        registry.reconcile(&[icon], false, 50., &mut TestShell::default());
        registry.proxies()[0].clone()
    }

    #[test]
    fn step_boundaries() {
        // 0.01 and 3 icon sizes are both excluded from blending.
        assert_eq!(PositionStep::for_distance(0.5, 50.), PositionStep::Converged);
        assert_eq!(PositionStep::for_distance(0.51, 50.), PositionStep::Blend);
        assert_eq!(PositionStep::for_distance(149.9, 50.), PositionStep::Blend);
        assert_eq!(PositionStep::for_distance(150., 50.), PositionStep::Snap);
        assert_eq!(PositionStep::for_distance(0., 50.), PositionStep::Converged);
    }

    #[test]
    fn blends_within_range() {
        let mut proxy = proxy_at(0.);
        proxy.target = DVec2::new(30., 0.);
        proxy.target_scale = 2.;

        assert!(smooth(&mut proxy, 50., false));
        assert_abs_diff_eq!(proxy.position.x, 10., epsilon = 1e-9);
        assert_abs_diff_eq!(proxy.scale, 4.5 / 3.5, epsilon = 1e-9);
    }

    #[test]
    fn retracting_is_gentler() {
        let mut entering = proxy_at(0.);
        entering.target = DVec2::new(30., 0.);
        let mut leaving = entering.clone();

        smooth(&mut entering, 50., false);
        smooth(&mut leaving, 50., true);
        assert!(leaving.position.x < entering.position.x);
        assert!(leaving.position.x > 0.);
    }

    #[test]
    fn snaps_outside_range() {
        let mut proxy = proxy_at(0.);
        proxy.target = DVec2::new(150., 0.);
        assert!(!smooth(&mut proxy, 50., false));
        assert_eq!(proxy.position, DVec2::new(150., 0.));

        proxy.target = DVec2::new(150.5, 0.);
        assert!(!smooth(&mut proxy, 50., false));
        assert_eq!(proxy.position, DVec2::new(150.5, 0.));
    }

    #[test]
    fn non_finite_values_are_held() {
        let mut proxy = proxy_at(10.);
        proxy.scale = 1.2;
        proxy.target = DVec2::new(f64::NAN, 0.);
        proxy.target_scale = f64::INFINITY;

        assert!(!smooth(&mut proxy, 50., false));
        assert_eq!(proxy.position, DVec2::new(10., 0.));
        assert_eq!(proxy.scale, 1.2);
    }

    #[test]
    fn labels_go_away_from_the_edge() {
        let geometry = DockGeometry {
            icon_size: 50.,
            ..Default::default()
        };
        let position = DVec2::new(100., 500.);

        let label = label_placement(position, 2., &geometry);
        assert_eq!(label.axis, Axis::Y);
        assert_abs_diff_eq!(label.value, 410., epsilon = 1e-9);
        assert_eq!(label.along, None);
        assert_eq!(label.width_shift, 0.);

        let right = DockGeometry {
            edge: Edge::Right,
            ..geometry
        };
        let label = label_placement(position, 1., &right);
        assert_eq!(label.axis, Axis::X);
        assert_abs_diff_eq!(label.value, 45., epsilon = 1e-9);
        // Lined up with the icon and pushed back by part of the label's width.
        assert_eq!(label.along, Some(500.));
        assert_abs_diff_eq!(label.width_shift, 1. / 1.8, epsilon = 1e-9);

        let left = DockGeometry {
            edge: Edge::Left,
            scale_factor: 2.,
            ..geometry
        };
        let label = label_placement(position, 1., &left);
        assert_eq!(label.axis, Axis::X);
        assert_abs_diff_eq!(label.value, 100. + 110., epsilon = 1e-9);
        assert_eq!(label.along, Some(500.));
        assert_eq!(label.width_shift, 0.);
    }

    #[test]
    fn indicators_follow_app_state() {
        let mut shell = TestShell::default();
        let mut registry = ProxyRegistry::new();
        let mut running = SourceIcon::new(IconKey(1), DVec2::new(0., 0.));
        running.n_windows = 2;
        let mut noisy = SourceIcon::new(IconKey(2), DVec2::new(100., 0.));
        noisy.n_notifications = 5;
        noisy.n_windows = 1;
        registry.reconcile(&[running, noisy], false, 50., &mut shell);

        let geometry = DockGeometry {
            icon_size: 50.,
            ..Default::default()
        };
        let mut pool = IndicatorPool::new();
        let mut config = Config::default();

        place(registry.proxies_mut(), &geometry, &config, true, &mut pool, &mut shell);
        let proxies = registry.proxies();
        assert!(proxies[0].dot.is_some());
        assert!(proxies[0].badge.is_none());
        assert!(proxies[1].dot.is_some());
        assert!(proxies[1].badge.is_some());
        assert_eq!(shell.dots.len(), 2);
        assert_eq!(shell.badges[&proxies[1].badge.unwrap()].count, 5);

        config.running_indicator.off = true;
        place(registry.proxies_mut(), &geometry, &config, true, &mut pool, &mut shell);
        let proxies = registry.proxies();
        assert!(proxies.iter().all(|p| p.dot.is_none()));
        assert_eq!(shell.hidden_indicators.len(), 2);
    }
}
