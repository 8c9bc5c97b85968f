#![forbid(unsafe_code)]

//! The field engine: lifecycle, input routing and per-frame evaluation.
//!
//! ```text
//!   new()        mount()          frame() once measured       unmount()
//! ─────────► Unmounted ──► Measuring ─────────────────► Ready ──────────► Unmounted
//!                              │                                  ▲
//!                              └───────────── unmount() ──────────┘
//! ```
//!
//! # Input path
//!
//! [`mount`](FieldEngine::mount) registers two listeners with the host. They
//! only write into a shared inbox (the [`PointerSampler`] and the
//! [`ViewportTracker`]); nothing is evaluated inside a host callback.
//!
//! # Frame path
//!
//! [`frame`](FieldEngine::frame) is called by the host once per display
//! frame. It pulls the due pointer sample and settled viewport, takes ONE
//! snapshot of both, evaluates every element against it, advances the
//! springs by the elapsed frame time and composes a [`Frame`].
//!
//! # Teardown
//!
//! [`unmount`](FieldEngine::unmount) cancels the pending pointer sample and
//! resize debounce, detaches every listener and drops all smoothing state.
//! Listeners hold only a weak reference to the inbox, so an engine dropped
//! without unmounting leaves inert callbacks behind rather than live ones.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use driftfield_core::event::{EventKind, HostEvent};
use driftfield_core::geometry::{Vec2, Viewport};
use driftfield_core::pointer_sampler::{PointerSampler, PointerSignal};
use driftfield_core::viewport_tracker::ViewportTracker;

use crate::catalog::{Catalog, JitterTable, Theme};
use crate::compositor::{Compositor, Frame, Scene};
use crate::config::EngineConfig;
use crate::field::{FieldSnapshot, target_displacement};
use crate::host::{EventHost, ListenerId};
use crate::idle::MotionTable;
use crate::smoother::{DisplacementState, SpringSmoother};

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Not attached to a host.
    Unmounted,
    /// Attached; waiting for a measured viewport and the ready delay.
    Measuring,
    /// Producing frames.
    Ready,
}

/// Input state written by host listeners and read at frame time.
#[derive(Debug)]
struct Inbox {
    sampler: PointerSampler,
    viewport: ViewportTracker,
}

impl Inbox {
    fn route(&mut self, event: &HostEvent, now: Duration) {
        match *event {
            HostEvent::PointerMove(pointer) => {
                self.sampler.push(pointer, now);
            }
            HostEvent::Resize { width, height } => {
                self.viewport.observe(width, height, now);
            }
        }
    }

    fn cancel(&mut self) {
        self.sampler.cancel();
        self.viewport.cancel();
    }
}

/// Everything that exists only while mounted.
struct Mounted {
    listeners: Vec<ListenerId>,
    jitter: JitterTable,
    catalog: Catalog,
    motions: MotionTable,
    mounted_at: Duration,
    ready_at: Option<Duration>,
    last_frame: Option<Duration>,
}

/// Pointer-reactive background engine.
pub struct FieldEngine {
    config: EngineConfig,
    theme: Theme,
    inbox: Rc<RefCell<Inbox>>,
    mounted: Option<Mounted>,
    smoother: SpringSmoother,
    glow: Option<DisplacementState>,
    compositor: Compositor,
    frames: u64,
}

impl std::fmt::Debug for FieldEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldEngine")
            .field("state", &self.state())
            .field("theme", &self.theme)
            .field("elements", &self.catalog().map_or(0, Catalog::len))
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

impl Default for FieldEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl FieldEngine {
    /// Create an unmounted engine.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let inbox = Inbox {
            sampler: PointerSampler::new(config.sampling_policy()),
            viewport: ViewportTracker::new(config.viewport.settle()),
        };
        Self {
            smoother: SpringSmoother::new(config.timing.max_frame_dt()),
            compositor: Compositor::new(config.timing.layer_fade()),
            config,
            theme: Theme::default(),
            inbox: Rc::new(RefCell::new(inbox)),
            mounted: None,
            glow: None,
            frames: 0,
        }
    }

    /// Set the initial theme (builder pattern).
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current theme.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        match &self.mounted {
            None => EngineState::Unmounted,
            Some(m) if m.ready_at.is_some() => EngineState::Ready,
            Some(_) => EngineState::Measuring,
        }
    }

    /// Element catalog while mounted.
    #[must_use]
    pub fn catalog(&self) -> Option<&Catalog> {
        self.mounted.as_ref().map(|m| &m.catalog)
    }

    /// Spring state for every element.
    #[must_use]
    pub const fn smoother(&self) -> &SpringSmoother {
        &self.smoother
    }

    /// Latest published pointer signal.
    #[must_use]
    pub fn pointer(&self) -> PointerSignal {
        self.inbox.borrow().sampler.signal()
    }

    /// Latest applied viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.inbox.borrow().viewport.viewport()
    }

    /// Whether a pointer sample or a resize is waiting to be applied.
    #[must_use]
    pub fn has_pending_input(&self) -> bool {
        let inbox = self.inbox.borrow();
        inbox.sampler.has_pending() || inbox.viewport.has_pending()
    }

    /// Listeners currently registered with the host.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.mounted.as_ref().map_or(0, |m| m.listeners.len())
    }

    /// Frames produced since construction.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Attach to `host`: register listeners, sample the viewport and build the
    /// catalog. A second mount while mounted is ignored.
    pub fn mount<H: EventHost + ?Sized>(&mut self, host: &mut H, now: Duration) {
        if self.mounted.is_some() {
            tracing::debug!(target: "driftfield.engine", "mount ignored: already mounted");
            return;
        }

        {
            let mut inbox = self.inbox.borrow_mut();
            inbox.sampler = PointerSampler::new(self.config.sampling_policy());
            inbox.viewport = ViewportTracker::new(self.config.viewport.settle());
            let (width, height) = host.viewport_size();
            inbox.viewport.observe(width, height, now);
        }

        let listeners = vec![
            host.add_listener(EventKind::PointerMove, self.listener()),
            host.add_listener(EventKind::Resize, self.listener()),
        ];

        let jitter = JitterTable::generate(self.config.seed, self.config.stars.count);
        let catalog = Catalog::build(self.theme, &jitter);
        let motions = MotionTable::build(&catalog);

        tracing::debug!(
            target: "driftfield.engine",
            listeners = listeners.len(),
            elements = catalog.len(),
            theme = ?self.theme,
            "mounted; measuring"
        );

        self.smoother.clear();
        self.glow = None;
        self.mounted = Some(Mounted {
            listeners,
            jitter,
            catalog,
            motions,
            mounted_at: now,
            ready_at: None,
            last_frame: None,
        });
    }

    fn listener(&self) -> crate::host::Listener {
        let inbox: Weak<RefCell<Inbox>> = Rc::downgrade(&self.inbox);
        Box::new(move |event, now| {
            let Some(inbox) = inbox.upgrade() else {
                return;
            };
            // A re-entrant dispatch while the engine holds the inbox drops
            // the event; the next one carries a fresher position anyway.
            if let Ok(mut inbox) = inbox.try_borrow_mut() {
                inbox.route(event, now);
            }
        })
    }

    /// Switch theme. While mounted the catalog is rebuilt in place; springs of
    /// elements that survive keep their motion.
    pub fn set_theme(&mut self, theme: Theme) {
        if theme == self.theme {
            return;
        }
        self.theme = theme;
        let Some(mounted) = self.mounted.as_mut() else {
            return;
        };
        mounted.catalog = Catalog::build(theme, &mounted.jitter);
        mounted.motions = MotionTable::build(&mounted.catalog);
        let catalog = &mounted.catalog;
        self.smoother.retain(|id| catalog.contains(id.as_str()));
        tracing::debug!(
            target: "driftfield.engine",
            theme = ?theme,
            elements = catalog.len(),
            "catalog rebuilt for theme"
        );
    }

    /// Produce the frame for `now`, or `None` while unmounted or measuring.
    pub fn frame(&mut self, now: Duration) -> Option<Frame> {
        let mounted = self.mounted.as_mut()?;

        let (signal, viewport) = {
            let mut inbox = self.inbox.borrow_mut();
            inbox.viewport.poll(now);
            inbox.sampler.poll(now);
            (inbox.sampler.signal(), inbox.viewport.viewport())
        };
        if !viewport.is_measured() {
            return None;
        }

        let ready_at = match mounted.ready_at {
            Some(at) => at,
            None => {
                let due = mounted.mounted_at.saturating_add(self.config.timing.ready_delay());
                if now < due {
                    return None;
                }
                mounted.ready_at = Some(now);
                tracing::debug!(
                    target: "driftfield.engine",
                    width = viewport.width,
                    height = viewport.height,
                    "ready"
                );
                now
            }
        };

        let dt = mounted
            .last_frame
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        mounted.last_frame = Some(now);

        let snapshot = FieldSnapshot::new(signal, viewport);
        for element in mounted.catalog.elements() {
            let tuning = self.config.categories.get(element.category);
            let target = target_displacement(element, &snapshot, &self.config.field, tuning);
            self.smoother.set_target(&element.id, target, tuning.spring);
        }
        self.smoother.advance(dt);

        let glow = snapshot.pointer.map(|pointer| {
            let config = self.config.categories.glow;
            let state = self
                .glow
                .get_or_insert_with(|| DisplacementState::new(config, pointer));
            state.reconfigure(config);
            state.set_target(pointer);
            state.advance(dt.min(self.config.timing.max_frame_dt()));
            state.rendered()
        });

        let frame = self.compositor.compose(&Scene {
            catalog: &mounted.catalog,
            motions: &mounted.motions,
            smoother: &self.smoother,
            viewport,
            since_ready: now.saturating_sub(ready_at),
            glow,
        });
        self.frames += 1;
        let pointer_norm = signal.normalized(viewport);
        tracing::trace!(
            target: "driftfield.engine",
            frame = self.frames,
            nodes = frame.nodes.len(),
            pointer_x = pointer_norm.x,
            pointer_y = pointer_norm.y,
            dt_us = dt.as_micros() as u64,
            "frame composed"
        );
        Some(frame)
    }

    /// Detach from `host`, cancel pending input and drop all animation state.
    /// Calling it while unmounted does nothing.
    pub fn unmount<H: EventHost + ?Sized>(&mut self, host: &mut H) {
        let Some(mounted) = self.mounted.take() else {
            return;
        };
        self.inbox.borrow_mut().cancel();
        let detached = mounted
            .listeners
            .iter()
            .filter(|&&id| host.remove_listener(id))
            .count();
        self.smoother.clear();
        self.glow = None;
        tracing::debug!(
            target: "driftfield.engine",
            detached,
            frames = self.frames,
            "unmounted"
        );
    }

    /// Pointer glow center, once the pointer has moved.
    #[must_use]
    pub fn glow_position(&self) -> Option<Vec2> {
        self.glow.as_ref().map(DisplacementState::rendered)
    }
}

impl Drop for FieldEngine {
    fn drop(&mut self) {
        if let Some(mounted) = &self.mounted {
            tracing::warn!(
                target: "driftfield.engine",
                listeners = mounted.listeners.len(),
                "engine dropped while mounted; call unmount() to detach listeners"
            );
        }
    }
}
