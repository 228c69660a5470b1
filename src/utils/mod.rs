use std::sync::atomic::{AtomicU64, Ordering};

use glam::DVec2;

/// One of the two screen axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn of(self, point: DVec2) -> f64 {
        match self {
            Axis::X => point.x,
            Axis::Y => point.y,
        }
    }

    pub fn of_mut(self, point: &mut DVec2) -> &mut f64 {
        match self {
            Axis::X => &mut point.x,
            Axis::Y => &mut point.y,
        }
    }

    /// Returns a vector of length `value` along this axis.
    pub fn vec(self, value: f64) -> DVec2 {
        match self {
            Axis::X => DVec2::new(value, 0.),
            Axis::Y => DVec2::new(0., value),
        }
    }
}

pub fn distance(a: DVec2, b: DVec2) -> f64 {
    (a - b).length()
}

/// Center of a square of side `size` with its top-left corner at `loc`.
pub fn square_center(loc: DVec2, size: f64) -> DVec2 {
    loc + DVec2::splat(size / 2.)
}

/// Floors to the nearest multiple of 2.
pub fn floor_to_even(value: f64) -> f64 {
    (value / 2.).floor() * 2.
}

/// Exponential blend of `from` toward `to`, where a larger `coef` keeps more of `from`.
pub fn blend(from: f64, to: f64, coef: f64) -> f64 {
    (from * coef + to) / (coef + 1.)
}

pub fn blend_point(from: DVec2, to: DVec2, coef: f64) -> DVec2 {
    (from * coef + to) / (coef + 1.)
}

/// Source of process-wide unique ids for scene objects.
pub struct IdCounter(AtomicU64);

impl IdCounter {
    pub const fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn floor_to_even_rounds_down() {
        assert_eq!(floor_to_even(48.), 48.);
        assert_eq!(floor_to_even(49.9), 48.);
        assert_eq!(floor_to_even(51.), 50.);
        assert_eq!(floor_to_even(1.), 0.);
    }

    #[test]
    fn distance_is_euclidean() {
        assert_abs_diff_eq!(distance(DVec2::ZERO, DVec2::new(3., 4.)), 5., epsilon = 1e-9);
    }

    #[test]
    fn blend_weights_toward_from() {
        assert_abs_diff_eq!(blend(0., 10., 1.), 5., epsilon = 1e-9);
        assert_abs_diff_eq!(blend(0., 10., 4.), 2., epsilon = 1e-9);
        let p = blend_point(DVec2::ZERO, DVec2::new(10., 20.), 1.);
        assert_abs_diff_eq!(p.x, 5., epsilon = 1e-9);
        assert_abs_diff_eq!(p.y, 10., epsilon = 1e-9);
    }

    #[test]
    fn ids_are_unique() {
        let counter = IdCounter::new();
        assert_ne!(counter.next(), counter.next());
    }

    #[test]
    fn axis_accessors() {
        let mut p = DVec2::new(1., 2.);
        assert_eq!(Axis::X.of(p), 1.);
        *Axis::Y.of_mut(&mut p) += 3.;
        assert_eq!(p, DVec2::new(1., 5.));
        assert_eq!(Axis::Y.vec(2.), DVec2::new(0., 2.));
    }
}
