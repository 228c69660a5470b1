#[macro_use]
extern crate tracing;

use std::cell::RefCell;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use calloop::timer::{TimeoutAction, Timer};
use calloop::{EventLoop, LoopSignal};
use clap::{Parser, ValueEnum};
use dockmag::dock::geometry::{DockGeometry, Edge};
use dockmag::dock::indicators::{IndicatorId, IndicatorKind, NotificationBadge, RunningDot};
use dockmag::dock::registry::ProxyId;
use dockmag::dock::Dock;
use dockmag::shell::{IconKey, IconSource, LabelPlacement, Scene, SourceIcon};
use dockmag::timers::{CalloopTimers, TimerDispatch, TimerKind};
use dockmag_config::Config;
use glam::DVec2;
use tracing_subscriber::EnvFilter;

const SCREEN_SIZE: DVec2 = DVec2::new(1920., 1080.);
const ICON_SIZE: f64 = 48.;
const ICON_SPACING: f64 = 8.;
const EDGE_MARGIN: f64 = 8.;
const POINTER_INTERVAL: Duration = Duration::from_millis(10);
/// Part of the run during which the pointer sweeps over the dock; it leaves afterwards.
const SWEEP_PART: f64 = 0.7;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the config file. The built-in defaults are used if unset.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of icons in the dock.
    #[arg(long, default_value_t = 8)]
    icons: usize,
    /// How long to run for, in seconds.
    #[arg(long, default_value_t = 4.)]
    seconds: f64,
    /// Screen edge the dock sits on.
    #[arg(long, value_enum, default_value_t = CliEdge::Bottom)]
    edge: CliEdge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliEdge {
    Top,
    Right,
    Bottom,
    Left,
}

impl From<CliEdge> for Edge {
    fn from(edge: CliEdge) -> Self {
        match edge {
            CliEdge::Top => Edge::Top,
            CliEdge::Right => Edge::Right,
            CliEdge::Bottom => Edge::Bottom,
            CliEdge::Left => Edge::Left,
        }
    }
}

/// In-memory dock with a pointer that can be moved around.
struct SimShell {
    edge: Edge,
    count: usize,
    icons: Vec<SourceIcon>,
    pointer: DVec2,
    proxies: HashMap<ProxyId, IconKey>,
    indicators: HashMap<IndicatorId, IndicatorKind>,
}

impl SimShell {
    fn new(edge: Edge, count: usize) -> Self {
        let mut shell = Self {
            edge,
            count,
            icons: Vec::with_capacity(count),
            pointer: DVec2::NAN,
            proxies: HashMap::new(),
            indicators: HashMap::new(),
        };

        let step = edge.inline_axis().vec(ICON_SIZE + ICON_SPACING);
        let start = shell.start();
        for i in 0..count {
            let mut icon = SourceIcon::new(IconKey(i as u64), start + step * i as f64);
            // Some variety for the indicators.
            icon.n_windows = (i % 3) as u32;
            icon.n_notifications = u32::from(i % 4 == 1);
            shell.icons.push(icon);
        }

        shell
    }

    fn dock_length(&self) -> f64 {
        let count = self.count.max(1) as f64;
        count * ICON_SIZE + (count - 1.) * ICON_SPACING
    }

    /// Top-left corner of the first icon.
    fn start(&self) -> DVec2 {
        let length = self.dock_length();
        let far = |extent: f64| extent - ICON_SIZE - EDGE_MARGIN;
        match self.edge {
            Edge::Top => DVec2::new((SCREEN_SIZE.x - length) / 2., EDGE_MARGIN),
            Edge::Bottom => DVec2::new((SCREEN_SIZE.x - length) / 2., far(SCREEN_SIZE.y)),
            Edge::Left => DVec2::new(EDGE_MARGIN, (SCREEN_SIZE.y - length) / 2.),
            Edge::Right => DVec2::new(far(SCREEN_SIZE.x), (SCREEN_SIZE.y - length) / 2.),
        }
    }

    /// Puts the pointer at `progress` of the way along the dock, padded by one icon on each side.
    fn sweep(&mut self, progress: f64) {
        let inline = self.edge.inline_axis();
        let center = self.start() + DVec2::splat(ICON_SIZE / 2.);
        let span = self.dock_length() + ICON_SIZE;
        self.pointer = center + inline.vec(progress * span - ICON_SIZE);
    }

    fn leave(&mut self) {
        self.pointer = DVec2::NAN;
    }
}

impl IconSource for SimShell {
    fn icons(&self) -> Vec<SourceIcon> {
        self.icons.clone()
    }

    fn geometry(&self) -> DockGeometry {
        DockGeometry {
            edge: self.edge,
            icon_size: ICON_SIZE,
            scale_factor: 1.,
            pointer: self.pointer,
            anchor: self.start(),
            in_fullscreen: false,
            autohide_hidden: false,
        }
    }

    fn relayout(&mut self) {
        trace!("relayout");
    }
}

impl Scene for SimShell {
    fn create_proxy(&mut self, id: ProxyId, key: IconKey, icon_size: f64) {
        trace!("create proxy {id:?} for {key:?} at size {icon_size}");
        self.proxies.insert(id, key);
    }

    fn release_proxy(&mut self, id: ProxyId) {
        trace!("release proxy {id:?}");
        self.proxies.remove(&id);
    }

    fn set_proxy_visible(&mut self, _id: ProxyId, _visible: bool) {}

    fn set_proxy_reactive(&mut self, _id: ProxyId, _reactive: bool) {}

    fn set_proxy_transform(&mut self, id: ProxyId, position: DVec2, scale: f64) {
        trace!("proxy {id:?}: {position} × {scale:.3}");
    }

    fn place_label(&mut self, _key: IconKey, _placement: LabelPlacement) {}

    fn set_source_icon_opacity(&mut self, key: IconKey, opacity: u8) {
        trace!("source icon {key:?} opacity {opacity}");
    }

    fn create_indicator(&mut self, id: IndicatorId, kind: IndicatorKind) {
        self.indicators.insert(id, kind);
    }

    fn release_indicator(&mut self, id: IndicatorId) {
        self.indicators.remove(&id);
    }

    fn hide_indicator(&mut self, _id: IndicatorId) {}

    fn show_dot(&mut self, id: IndicatorId, dot: &RunningDot) {
        trace!("dot {id:?}: {} windows at {}", dot.count, dot.position);
    }

    fn show_badge(&mut self, id: IndicatorId, badge: &NotificationBadge) {
        trace!("badge {id:?}: {} at {}", badge.count, badge.position);
    }

    fn set_layers_visible(&mut self, visible: bool) {
        debug!("layers visible: {visible}");
    }
}

struct State {
    dock: Dock<CalloopTimers<State>>,
    shell: SimShell,
    signal: LoopSignal,
}

impl State {
    fn log_scales(&self) {
        let scales: Vec<_> = self
            .dock
            .registry()
            .proxies()
            .iter()
            .map(|p| format!("{:.2}", p.scale))
            .collect();
        debug!("scales: {}", scales.join(" "));
    }

    fn finish(&mut self) {
        debug!(
            "finishing with {} proxies and {} indicators",
            self.shell.proxies.len(),
            self.shell.indicators.len()
        );
        self.dock.disable(&mut self.shell);
        self.signal.stop();
    }
}

impl TimerDispatch for State {
    fn dispatch_timer(&mut self, kind: TimerKind) {
        self.dock.on_timer(kind, &mut self.shell);
        if kind == TimerKind::Tick {
            self.log_scales();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let directives = env::var("RUST_LOG").unwrap_or_else(|_| "dockmag=debug,info".to_owned());
    let env_filter = EnvFilter::builder().parse_lossy(directives);
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(env_filter)
        .init();

    let cli = Cli::parse();

    let _client = tracy_client::Client::start();

    let config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(err) => {
                warn!("{err:?}");
                Config::default()
            }
        },
        None => Config::default(),
    };
    let config = Rc::new(RefCell::new(config));

    let mut event_loop = EventLoop::try_new().context("error creating event loop")?;
    let handle = event_loop.handle();

    let dock = Dock::new(config, CalloopTimers::new(handle.clone()));
    let mut state = State {
        dock,
        shell: SimShell::new(cli.edge.into(), cli.icons),
        signal: event_loop.get_signal(),
    };
    state.dock.enable();

    let start = Instant::now();
    let total = Duration::from_secs_f64(cli.seconds.max(0.1));
    let mut left = false;
    handle
        .insert_source(Timer::immediate(), move |_, _, state: &mut State| {
            let progress = start.elapsed().as_secs_f64() / total.as_secs_f64();
            if progress >= 1. {
                state.finish();
                return TimeoutAction::Drop;
            }

            if progress < SWEEP_PART {
                state.shell.sweep(progress / SWEEP_PART);
                state.dock.on_pointer_motion();
            } else if !left {
                left = true;
                state.shell.leave();
                state.dock.on_pointer_leave();
            }

            TimeoutAction::ToDuration(POINTER_INTERVAL)
        })
        .map_err(|err| err.error)
        .context("error inserting pointer timer")?;

    event_loop
        .run(None, &mut state, |_| ())
        .context("error running event loop")?;

    Ok(())
}
