//! Dock magnification engine.
//!
//! The engine keeps an animated proxy for every launcher icon in the dock and drives them from a
//! timer while the pointer is around. The shell keeps owning the real icons; while the engine is
//! enabled they are made transparent and the proxies are drawn in their place.
//!
//! ### Ticks
//!
//! Every tick runs the same stages in order:
//!
//! 1. The proxies are reconciled with the icons the shell reports and sorted by distance from the
//!    dock anchor.
//! 2. The icon nearest to the pointer is found, unless magnification is suppressed or a preview
//!    is running.
//! 3. The nearest icon is magnified and its neighbors are pushed out.
//! 4. Every proxy is smoothed toward its target and written to the scene along with its label and
//!    indicators.
//!
//! Anything that moved keeps the loop alive for another quiet period.
//!
//! ### Lifecycle
//!
//! [`Dock::enable`] and [`Dock::disable`] bracket everything the engine puts into the scene.
//! Disabling releases all proxies and indicators, cancels every timer and restores the shell's
//! icons. Dragging an icon has the same effect on the scene, except the engine comes back on its
//! own shortly after the drag ends.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use dockmag_config::Config;
use glam::DVec2;

use self::frame_loop::{FrameLoop, LoopState, RELAYOUT_FULL, RELAYOUT_SHORT};
use self::indicators::IndicatorPool;
use self::magnify::{find_nearest, magnify, reset_targets, Coefficients, Nearest};
use self::registry::ProxyRegistry;
use crate::shell::{Scene, Shell};
use crate::timers::{TimerKind, Timers};

pub mod frame_loop;
pub mod geometry;
pub mod indicators;
pub mod magnify;
pub mod placement;
pub mod registry;

/// How long a preview keeps the middle icon magnified.
pub const PREVIEW_DURATION: Duration = Duration::from_millis(1200);

#[derive(Debug)]
pub struct Dock<T: Timers> {
    config: Rc<RefCell<Config>>,
    enabled: bool,
    registry: ProxyRegistry,
    indicators: IndicatorPool,
    frame_loop: FrameLoop<T>,
    /// Remaining preview time.
    preview: Option<Duration>,
    /// Proxy count at the previous tick.
    icons_count: usize,
    layers_visible: bool,
}

impl<T: Timers> Dock<T> {
    pub fn new(config: Rc<RefCell<Config>>, timers: T) -> Self {
        Self {
            config,
            enabled: false,
            registry: ProxyRegistry::new(),
            indicators: IndicatorPool::new(),
            frame_loop: FrameLoop::new(timers),
            preview: None,
            icons_count: 0,
            layers_visible: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn loop_state(&self) -> LoopState {
        self.frame_loop.state()
    }

    pub fn registry(&self) -> &ProxyRegistry {
        &self.registry
    }

    pub fn indicators(&self) -> &IndicatorPool {
        &self.indicators
    }

    pub fn timers(&self) -> &T {
        self.frame_loop.timers()
    }

    pub fn timers_mut(&mut self) -> &mut T {
        self.frame_loop.timers_mut()
    }

    pub fn enable(&mut self) {
        if self.enabled {
            return;
        }
        if self.config.borrow().magnification.off {
            debug!("not enabling dock magnification: turned off in config");
            return;
        }

        debug!("enabling dock magnification");
        self.enabled = true;
        self.frame_loop.set_relayout(RELAYOUT_FULL);
    }

    pub fn disable(&mut self, scene: &mut impl Scene) {
        if !self.enabled {
            return;
        }

        debug!("disabling dock magnification");
        self.enabled = false;
        self.frame_loop.shutdown();
        self.preview = None;
        self.tear_down(scene);
    }

    /// Removes everything the engine put into the scene.
    fn tear_down(&mut self, scene: &mut impl Scene) {
        self.registry.clear(scene);
        self.indicators.clear(scene);
        self.icons_count = 0;
        self.set_layers_visible(false, scene);
    }

    fn set_layers_visible(&mut self, visible: bool, scene: &mut impl Scene) {
        if self.layers_visible != visible {
            self.layers_visible = visible;
            scene.set_layers_visible(visible);
        }
    }

    fn fps(&self) -> f64 {
        self.config.borrow().magnification.fps.0
    }

    /// Starts the loop and rearms its stop.
    fn start_animation(&mut self) {
        if !self.enabled {
            return;
        }

        let fps = self.fps();
        self.frame_loop.start(fps);
        self.frame_loop.request_stop();
    }

    pub fn on_timer(&mut self, kind: TimerKind, shell: &mut impl Shell) {
        match kind {
            TimerKind::Tick => {
                self.tick(shell);
            }
            TimerKind::StopDebounce => self.frame_loop.stop_debounce_fired(),
            TimerKind::Resume => {
                if self.frame_loop.resume() {
                    self.frame_loop.set_relayout(RELAYOUT_FULL);
                    self.start_animation();
                }
            }
        }
    }

    pub fn on_pointer_enter(&mut self) {
        self.start_animation();
    }

    pub fn on_pointer_motion(&mut self) {
        self.start_animation();
    }

    /// Keeps animating until the icons settle, then stops.
    pub fn on_pointer_leave(&mut self) {
        self.frame_loop.request_stop();
    }

    pub fn on_focus_window_changed(&mut self) {
        if !self.enabled {
            return;
        }

        self.frame_loop.stop();
        self.start_animation();
        self.frame_loop.set_relayout(RELAYOUT_SHORT);
    }

    pub fn on_fullscreen_changed(&mut self, shell: &mut impl Shell) {
        if !self.enabled {
            return;
        }

        let in_fullscreen = shell.geometry().in_fullscreen;
        self.set_layers_visible(!in_fullscreen, shell);
    }

    pub fn on_drag_begin(&mut self, scene: &mut impl Scene) {
        if !self.enabled {
            return;
        }

        self.frame_loop.request_suspend();
        if self.frame_loop.state() == LoopState::DraggingSuspended {
            self.tear_down(scene);
        }
    }

    pub fn on_drag_end(&mut self, scene: &mut impl Scene) {
        if !self.enabled {
            return;
        }

        let was_suspended = self.frame_loop.state() == LoopState::DraggingSuspended;
        self.frame_loop.schedule_resume();
        if !was_suspended && self.frame_loop.state() == LoopState::DraggingSuspended {
            self.tear_down(scene);
        }
    }

    /// Shows the effect on the middle icon for a moment.
    pub fn preview(&mut self, preview: bool) {
        if preview {
            self.preview = Some(PREVIEW_DURATION);
            self.start_animation();
        } else {
            self.preview = None;
        }
    }

    /// Makes the next ticks run the shell layout, as after enabling.
    pub fn relayout(&mut self) {
        self.frame_loop.set_relayout(RELAYOUT_FULL);
        self.on_pointer_enter();
    }

    /// Runs one animation step. Returns whether anything animated.
    pub fn tick(&mut self, shell: &mut impl Shell) -> bool {
        let _span = tracy_client::span!("Dock::tick");

        if !self.enabled {
            return false;
        }

        if self.frame_loop.apply_pending_suspend() {
            self.tear_down(shell);
            return false;
        }

        let config = self.config.clone();
        let config = config.borrow();
        if config.magnification.off {
            drop(config);
            self.disable(shell);
            return false;
        }

        if self.frame_loop.take_relayout() {
            shell.relayout();
        }

        let geometry = shell.geometry();
        let icons = shell.icons();

        let reconciled = self.registry.reconcile(
            &icons,
            config.favorites_only,
            geometry.icon_size(),
            shell,
        );
        if !reconciled.is_empty() {
            trace!("reconciled proxies: {reconciled:?}");
        }
        if self.registry.len() != self.icons_count {
            self.icons_count = self.registry.len();
            self.frame_loop.set_relayout(RELAYOUT_SHORT);
        }
        self.registry.sort_by_anchor(geometry.anchor);

        let hidden = geometry.autohide_hidden;
        for proxy in self.registry.proxies() {
            shell.set_proxy_reactive(proxy.id(), !hidden);
        }

        let coefs = Coefficients::from(&config.magnification);
        let proxies = self.registry.proxies_mut();
        reset_targets(proxies);

        let mut nearest = find_nearest(proxies, &geometry);
        if config.magnification.is_inert() || (hidden && !config.peek_hidden_icons) {
            nearest = None;
        }

        match self.preview {
            Some(remaining) if !remaining.is_zero() => {
                let index = proxies.len() / 2;
                nearest = proxies.get(index).filter(|p| p.visible).map(|_| Nearest {
                    index,
                    distance: 0.,
                    pointer_offset: DVec2::ZERO,
                });
                self.preview = Some(remaining.saturating_sub(self.frame_loop.interval()));
            }
            _ => self.preview = None,
        }

        let magnified = match nearest {
            Some(nearest) => magnify(proxies, nearest, &geometry, &coefs),
            None => false,
        };

        let moved = placement::place(
            proxies,
            &geometry,
            &config,
            nearest.is_none(),
            &mut self.indicators,
            shell,
        );
        drop(config);

        if !geometry.in_fullscreen {
            self.set_layers_visible(true, shell);
        }

        let did_animate = magnified || moved;
        if did_animate {
            self.frame_loop.request_stop();
        }

        trace!(
            "tick: nearest={:?} magnified={magnified} moved={moved}",
            nearest.map(|n| n.index)
        );
        did_animate
    }
}
