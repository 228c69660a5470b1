use std::time::Duration;

use dockmag_config::Config;
use glam::DVec2;
use proptest::prelude::*;
use proptest_derive::Arbitrary;

use super::fixture::{Fixture, TestShell};
use crate::timers::TimerKind;

const ICONS: usize = 6;

#[derive(Debug, Clone, Copy, Arbitrary)]
enum Op {
    PointerAt(#[proptest(strategy = "0..ICONS")] usize),
    PointerAway,
    PointerLeave,
    FocusWindowChanged,
    Fullscreen(bool),
    Autohide(bool),
    DragBegin,
    DragEnd,
    Preview(bool),
    Relayout,
    SetCoefficients {
        #[proptest(strategy = "0f64..=1.")]
        rise: f64,
        #[proptest(strategy = "0f64..=1.")]
        magnify: f64,
        #[proptest(strategy = "0f64..=1.")]
        spread: f64,
    },
    ToggleIcon(#[proptest(strategy = "0..ICONS")] usize),
    SetWindows(#[proptest(strategy = "0..ICONS")] usize, #[proptest(strategy = "0..4u32")] u32),
    Advance(#[proptest(strategy = "1..400u64")] u64),
    Enable,
    Disable,
}

fn row() -> TestShell {
    let xs: Vec<f64> = (0..ICONS).map(|i| i as f64 * 60.).collect();
    TestShell::with_row(&xs, 48.)
}

fn apply(f: &mut Fixture, op: Op) {
    match op {
        Op::PointerAt(index) => {
            f.shell.point_at(index);
            f.dock.on_pointer_motion();
        }
        Op::PointerAway => f.shell.point_away(),
        Op::PointerLeave => f.dock.on_pointer_leave(),
        Op::FocusWindowChanged => f.dock.on_focus_window_changed(),
        Op::Fullscreen(fullscreen) => {
            f.shell.geometry.in_fullscreen = fullscreen;
            f.dock.on_fullscreen_changed(&mut f.shell);
        }
        Op::Autohide(hidden) => f.shell.geometry.autohide_hidden = hidden,
        Op::DragBegin => f.dock.on_drag_begin(&mut f.shell),
        Op::DragEnd => f.dock.on_drag_end(&mut f.shell),
        Op::Preview(preview) => f.dock.preview(preview),
        Op::Relayout => f.dock.relayout(),
        Op::SetCoefficients {
            rise,
            magnify,
            spread,
        } => {
            let mut config = f.config.borrow_mut();
            config.magnification.rise.0 = rise;
            config.magnification.magnify.0 = magnify;
            config.magnification.spread.0 = spread;
        }
        Op::ToggleIcon(index) => {
            let icon = &mut f.shell.icons[index];
            icon.animating_out = !icon.animating_out;
        }
        Op::SetWindows(index, n) => f.shell.icons[index].n_windows = n,
        Op::Advance(ms) => {
            f.advance(Duration::from_millis(ms));
        }
        Op::Enable => f.dock.enable(),
        Op::Disable => f.dock.disable(&mut f.shell),
    }
}

fn check_invariants(f: &Fixture) {
    let registry = f.dock.registry();
    for proxy in registry.proxies() {
        assert!(proxy.scale >= 1., "{proxy:?}");
        assert!(proxy.target_scale >= 1., "{proxy:?}");
    }
    for proxy in f.shell.proxies.values() {
        assert!(proxy.scale >= 1., "{proxy:?}");
    }
    assert_eq!(f.shell.proxies.len(), registry.len());

    let timers = f.dock.timers();
    assert!(timers.count(TimerKind::Tick) <= 1);
    assert!(timers.count(TimerKind::StopDebounce) <= 1);
    assert!(timers.count(TimerKind::Resume) <= 1);

    if !f.dock.is_enabled() {
        assert_eq!(timers.active(), 0);
        assert!(f.shell.proxies.is_empty());
        assert!(f.shell.indicators.is_empty());
    }
}

/// Runs a pointer sweep directly through ticks and returns the final proxy state.
fn sweep(config: Config, pointers: &[f64]) -> Vec<(DVec2, DVec2, f64)> {
    let mut f = Fixture::new(config, row());
    f.dock.enable();

    for &x in pointers {
        f.shell.geometry.pointer = DVec2::new(x, 24.);
        f.dock.tick(&mut f.shell);
    }

    f.dock
        .registry()
        .proxies()
        .iter()
        .map(|p| (p.position, p.target, p.scale))
        .collect()
}

fn config_with(rise: f64, magnify: f64, spread: f64) -> Config {
    let mut config = Config::default();
    config.magnification.rise.0 = rise;
    config.magnification.magnify.0 = magnify;
    config.magnification.spread.0 = spread;
    config
}

proptest! {
    #[test]
    fn random_operations_keep_invariants(ops: Vec<Op>) {
        let mut f = Fixture::new(Config::default(), row());
        f.dock.enable();

        for op in ops {
            apply(&mut f, op);
            check_invariants(&f);
        }
    }

    #[test]
    fn no_spread_pins_inline_targets(
        pointers in prop::collection::vec(-100f64..500., 1..40),
        rise in 0f64..=1.,
        magnify in 0f64..=1.,
    ) {
        let mut f = Fixture::new(config_with(rise, magnify, 0.), row());
        f.dock.enable();

        for x in pointers {
            f.shell.geometry.pointer = DVec2::new(x, 24.);
            f.dock.tick(&mut f.shell);

            for proxy in f.dock.registry().proxies() {
                prop_assert_eq!(proxy.target.x, proxy.fixed_position.x);
            }
        }
    }

    #[test]
    fn sweeps_are_deterministic(
        pointers in prop::collection::vec(-100f64..500., 1..40),
        rise in 0f64..=1.,
        magnify in 0f64..=1.,
        spread in 0f64..=1.,
    ) {
        let a = sweep(config_with(rise, magnify, spread), &pointers);
        let b = sweep(config_with(rise, magnify, spread), &pointers);
        prop_assert_eq!(a, b);
    }
}
