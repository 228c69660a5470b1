use std::collections::HashMap;

use glam::DVec2;

use super::indicators::IndicatorId;
use crate::shell::{IconKey, Scene, SourceIcon};
use crate::utils::distance;
use crate::utils::IdCounter;

static PROXY_ID_COUNTER: IdCounter = IdCounter::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProxyId(u64);

impl ProxyId {
    fn next() -> ProxyId {
        ProxyId(PROXY_ID_COUNTER.next())
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Animated stand-in for one launcher icon.
#[derive(Debug, Clone)]
pub struct IconProxy {
    id: ProxyId,
    key: IconKey,
    /// Current, smoothed top-left position.
    pub position: DVec2,
    /// Position the proxy is heading to this frame.
    pub target: DVec2,
    /// Un-magnified resting position, as laid out by the shell.
    pub fixed_position: DVec2,
    pub scale: f64,
    pub target_scale: f64,
    /// Pointer distance, set only on the nearest icon.
    pub distance: Option<f64>,
    /// Icon center minus pointer, set together with `distance`.
    pub pointer_offset: DVec2,
    /// Whether the shell gave this icon a usable position this frame.
    pub visible: bool,
    pub n_windows: u32,
    pub n_notifications: u32,
    pub dot: Option<IndicatorId>,
    pub badge: Option<IndicatorId>,
}

impl IconProxy {
    fn new(icon: &SourceIcon) -> Self {
        let resting = icon.resting_position();
        let position = resting.unwrap_or(DVec2::NAN);
        Self {
            id: ProxyId::next(),
            key: icon.key,
            position,
            target: position,
            fixed_position: position,
            scale: 1.,
            target_scale: 1.,
            distance: None,
            pointer_offset: DVec2::ZERO,
            visible: resting.is_some(),
            n_windows: icon.n_windows,
            n_notifications: icon.n_notifications,
            dot: None,
            badge: None,
        }
    }

    pub fn id(&self) -> ProxyId {
        self.id
    }

    pub fn key(&self) -> IconKey {
        self.key
    }

    /// Refreshes what the shell owns, keeping the animated state.
    fn update_from(&mut self, icon: &SourceIcon) {
        self.n_windows = icon.n_windows;
        self.n_notifications = icon.n_notifications;

        match icon.resting_position() {
            Some(resting) => {
                self.fixed_position = resting;
                if !self.position.is_finite() {
                    self.position = resting;
                }
                self.visible = true;
            }
            None => self.visible = false,
        }
    }
}

/// Changes made by one reconciliation pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Reconciled {
    pub added: usize,
    pub removed: usize,
}

impl Reconciled {
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

#[derive(Debug, Default)]
pub struct ProxyRegistry {
    proxies: Vec<IconProxy>,
}

impl ProxyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Brings the proxies in line with the icons the shell currently shows.
    ///
    /// Proxies of vanished icons are released, new icons get a proxy at their resting position
    /// and everything else keeps its animated state.
    pub fn reconcile(
        &mut self,
        icons: &[SourceIcon],
        favorites_only: bool,
        icon_size: f64,
        scene: &mut impl Scene,
    ) -> Reconciled {
        let _span = tracy_client::span!("ProxyRegistry::reconcile");

        let mut live: HashMap<IconKey, &SourceIcon> = HashMap::with_capacity(icons.len());
        for icon in icons {
            if icon.animating_out || (favorites_only && !icon.is_favorite) {
                continue;
            }
            live.entry(icon.key).or_insert(icon);
        }

        let mut rv = Reconciled::default();

        self.proxies.retain(|proxy| {
            if live.contains_key(&proxy.key) {
                return true;
            }

            debug!("releasing proxy {:?} of icon {:?}", proxy.id, proxy.key);
            scene.release_proxy(proxy.id);
            scene.set_source_icon_opacity(proxy.key, 255);
            rv.removed += 1;
            false
        });

        let mut index: HashMap<IconKey, usize> = self
            .proxies
            .iter()
            .enumerate()
            .map(|(idx, proxy)| (proxy.key, idx))
            .collect();

        for icon in icons {
            // Only the first occurrence of a key counts.
            if !live
                .get(&icon.key)
                .is_some_and(|live| std::ptr::eq(*live, icon))
            {
                continue;
            }

            if let Some(&idx) = index.get(&icon.key) {
                self.proxies[idx].update_from(icon);
                continue;
            }

            let proxy = IconProxy::new(icon);
            debug!("creating proxy {:?} for icon {:?}", proxy.id, proxy.key);
            scene.create_proxy(proxy.id, proxy.key, icon_size);
            scene.set_source_icon_opacity(proxy.key, 0);
            index.insert(proxy.key, self.proxies.len());
            self.proxies.push(proxy);
            rv.added += 1;
        }

        rv
    }

    /// Orders the proxies by distance of their resting position from the dock anchor.
    ///
    /// Proxies without a usable position go last.
    pub fn sort_by_anchor(&mut self, anchor: DVec2) {
        let key = |proxy: &IconProxy| {
            if proxy.visible {
                distance(anchor, proxy.fixed_position)
            } else {
                f64::INFINITY
            }
        };
        self.proxies.sort_by(|a, b| key(a).total_cmp(&key(b)));
    }

    pub fn proxies(&self) -> &[IconProxy] {
        &self.proxies
    }

    pub fn proxies_mut(&mut self) -> &mut [IconProxy] {
        &mut self.proxies
    }

    pub fn get(&self, key: IconKey) -> Option<&IconProxy> {
        self.proxies.iter().find(|p| p.key == key)
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    /// Releases every proxy from the scene and gives the shell its icons back.
    pub fn clear(&mut self, scene: &mut impl Scene) {
        for proxy in self.proxies.drain(..) {
            scene.release_proxy(proxy.id);
            scene.set_source_icon_opacity(proxy.key, 255);
        }
    }
}
