//! Nearest-icon search and neighbor propagation.
//!
//! The icon closest to the pointer grows and rises. Its neighbors are then walked outward on both
//! sides: each one is pulled toward its already-updated inner neighbor with a decaying weight and
//! pushed out by a decaying predicted scale. Together this gives a bell-like falloff without a
//! closed-form curve.

use dockmag_config::Magnification;
use glam::DVec2;

use super::geometry::DockGeometry;
use super::registry::IconProxy;
use crate::utils::{distance, square_center};

/// Pointer hit radius around an icon center, in icon sizes.
pub const HIT_AREA_FACTOR: f64 = 1.25;
/// Scale gained by the nearest icon at full magnify.
pub const ICON_SCALE_COEF: f64 = 0.9;
/// Rise of the nearest icon at full rise, in icon sizes.
pub const RISE_COEF: f64 = 0.25;
/// Initial neighbor pull weight.
pub const PULL_COEF: f64 = 1.8;
const PULL_DECAY: f64 = 0.9;
/// Neighbors affected on each side, at most.
const MAX_PROPAGATION: usize = 80;
/// Extra spacing between pushed neighbors, in icon sizes.
const SPACING: f64 = 0.2;

/// Effect strengths, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub rise: f64,
    pub magnify: f64,
    pub spread: f64,
}

impl Coefficients {
    /// Factor the predicted neighbor scale decays by at each step outward.
    fn scale_decay(&self) -> f64 {
        0.8 - 0.2 * (1. - self.spread)
    }

    fn spreads(&self) -> bool {
        self.spread != 0.
    }
}

impl From<&Magnification> for Coefficients {
    fn from(config: &Magnification) -> Self {
        Self {
            rise: config.rise.0,
            magnify: config.magnify.0,
            spread: config.spread.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    pub index: usize,
    pub distance: f64,
    /// Icon center minus pointer.
    pub pointer_offset: DVec2,
}

/// Resets every proxy to its resting target.
pub fn reset_targets(proxies: &mut [IconProxy]) {
    for proxy in proxies {
        proxy.target = proxy.fixed_position;
        proxy.target_scale = 1.;
        proxy.distance = None;
        proxy.pointer_offset = DVec2::ZERO;
    }
}

/// Finds the icon whose resting center is closest to the pointer, within the hit radius.
///
/// On equal distances the first icon wins. The proxies are left untouched; [`magnify`] records
/// the distance on whichever icon ends up magnified.
pub fn find_nearest(proxies: &[IconProxy], geometry: &DockGeometry) -> Option<Nearest> {
    let size = geometry.scaled_icon_size();
    let hit_radius = geometry.icon_size() * HIT_AREA_FACTOR * geometry.scale_factor;

    let mut nearest: Option<Nearest> = None;
    for (index, proxy) in proxies.iter().enumerate() {
        if !proxy.visible {
            continue;
        }

        let center = square_center(proxy.fixed_position, size);
        let dst = distance(geometry.pointer, center);
        if dst < hit_radius && nearest.map_or(true, |n| dst < n.distance) {
            nearest = Some(Nearest {
                index,
                distance: dst,
                pointer_offset: center - geometry.pointer,
            });
        }
    }

    nearest
}

/// Magnifies `nearest` and propagates the effect to its neighbors.
///
/// Targets must have been reset beforehand. Returns whether magnification applied at all.
pub fn magnify(
    proxies: &mut [IconProxy],
    nearest: Nearest,
    geometry: &DockGeometry,
    coefs: &Coefficients,
) -> bool {
    let _span = tracy_client::span!("magnify");

    let size = geometry.icon_size();
    if nearest.distance >= size * 2. {
        return false;
    }

    let scale_factor = geometry.scale_factor;
    let inline = geometry.edge.inline_axis();
    let perp = geometry.edge.perpendicular_axis();
    let away = geometry.edge.away_sign();

    let center = &mut proxies[nearest.index];
    center.distance = Some(nearest.distance);
    center.pointer_offset = nearest.pointer_offset;
    center.target_scale = 1. + ICON_SCALE_COEF * coefs.magnify;
    *perp.of_mut(&mut center.target) += away * size * RISE_COEF * coefs.rise * scale_factor;

    if coefs.spreads() {
        let offset = inline.of(center.pointer_offset) / 4.;
        *inline.of_mut(&mut center.target) += offset;
        // Sink slightly toward the edge as the pointer moves off center.
        *perp.of_mut(&mut center.target) -= away * offset.abs() / 2.;
    } else {
        *inline.of_mut(&mut center.target) = inline.of(center.fixed_position);
    }

    let mut sz = center.target_scale;
    let mut pull = PULL_COEF;
    let mut prev_left = inline.of(center.target);
    let mut prev_right = prev_left;

    for step in 1..=MAX_PROPAGATION {
        sz *= coefs.scale_decay();
        let push = size * (sz + SPACING) * scale_factor;

        let left = nearest.index.checked_sub(step);
        let right = Some(nearest.index + step).filter(|&i| i < proxies.len());
        if left.is_none() && right.is_none() {
            break;
        }

        for (index, prev, dir) in [(left, &mut prev_left, -1.), (right, &mut prev_right, 1.)] {
            let Some(index) = index else { continue };
            let proxy = &mut proxies[index];

            let own = inline.of(proxy.target);
            let mut value = (own + *prev * pull) / (pull + 1.) + dir * push;
            if !coefs.spreads() {
                value = inline.of(proxy.fixed_position);
            }
            *inline.of_mut(&mut proxy.target) = value;
            *prev = value;

            if sz > 1. {
                proxy.target_scale = sz;
            }
        }

        pull *= PULL_DECAY;
    }

    true
}
