//! Password-manager badge avoidance.
//!
//! Browser password-manager extensions (LastPass, 1Password, Dashlane,
//! Bitwarden) inject a clickable badge near the right edge of inputs they
//! mistake for password fields. When the OTP input is embedded on a web
//! surface, that badge lands on top of the last slots. This component
//! probes the surface geometry after focus is gained and reports whether
//! the input should grow to push the badge clear of the typed characters.
//!
//! Geometry is reached through the [`SurfaceProbe`] capability trait so the
//! core stays testable and renderer-agnostic; a terminal host simply never
//! provides one and the component stays inert. All queries are best-effort:
//! a `None` answer skips that tick and the next scheduled probe retries.
//!
//! Probing is a chain of `tick` commands fired 0 ms, 2 s and 5 s after
//! focus, with a forced decision at 6 s. Each link carries the component id
//! and a per-focus-session tag; regaining focus bumps the tag, so timers
//! armed for a previous session are rejected on arrival. Once a decision is
//! made (`done`), no further probe runs for the lifetime of the instance.
//!
//! Detection is deliberately conservative: if neither a known marker
//! element nor a conflicting hit-test result is observed, the answer is
//! "no badge". A missed badge costs a little overlap; a false positive
//! visibly resizes the input for no reason.

use bubbletea_rs::{tick, Cmd, Msg};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

static LAST_ID: AtomicUsize = AtomicUsize::new(0);

fn next_id() -> usize {
    LAST_ID.fetch_add(1, Ordering::Relaxed)
}

/// Horizontal inset from the container's right edge to the probe point, in
/// surface pixels. Password-manager badges center themselves inside this
/// margin.
pub const BADGE_MARGIN_RIGHT: f32 = 18.0;

/// Viewport room required to the right of the container before the input is
/// allowed to grow.
pub const BADGE_SPACE_WIDTH: f32 = 40.0;

/// Selectors identifying the marker elements the known password managers
/// inject into the document. Hosts implementing [`SurfaceProbe`] match
/// these in their `badge_marker_present` query.
pub const PASSWORD_MANAGER_SELECTORS: [&str; 4] = [
    "[data-lastpass-icon-root]",          // LastPass
    "com-1password-button",               // 1Password
    "[data-dashlanecreated]",             // Dashlane
    "[style$=\"2147483647 !important;\"]", // Bitwarden
];

const FIRST_PROBE_DELAY: Duration = Duration::from_millis(0);
const SECOND_PROBE_DELAY: Duration = Duration::from_millis(2000);
const THIRD_PROBE_DELAY: Duration = Duration::from_millis(3000);
const DECIDE_DELAY: Duration = Duration::from_millis(1000);
const SPACE_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Axis-aligned rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Width of the rectangle.
    pub width: f32,
    /// Height of the rectangle.
    pub height: f32,
}

impl Rect {
    /// The right edge of the rectangle.
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// The vertical center of the rectangle.
    pub fn center_y(&self) -> f32 {
        self.top + self.height / 2.0
    }
}

/// Geometry capability the embedding host implements.
///
/// Every query is best-effort: return `None` whenever the underlying
/// element references are not currently available. The component treats a
/// `None` as a skipped tick, never as an error.
pub trait SurfaceProbe: Send {
    /// Bounding rectangle of the widget's container element.
    fn container_rect(&self) -> Option<Rect>;

    /// Width of the viewport the container lives in.
    fn viewport_width(&self) -> Option<f32>;

    /// Whether any element matching [`PASSWORD_MANAGER_SELECTORS`] exists
    /// in the document.
    fn badge_marker_present(&self) -> bool;

    /// Hit-test at a surface point: `Some(true)` if the topmost element is
    /// the container itself, `Some(false)` if something else sits on top of
    /// it, `None` if the test cannot be performed right now.
    fn hit_container(&self, x: f32, y: f32) -> Option<bool>;
}

/// How the widget reacts to a detected badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PushStrategy {
    /// Grow the input so the badge no longer overlaps typed characters.
    #[default]
    IncreaseWidth,
    /// Ignore badges entirely: no probing, no timers, no geometry work.
    None,
}

impl PushStrategy {
    /// Whether the strategy may change the input's width.
    pub fn affects_width(&self) -> bool {
        matches!(self, PushStrategy::IncreaseWidth)
    }
}

impl std::str::FromStr for PushStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increase-width" => Ok(PushStrategy::IncreaseWidth),
            // Legacy alias kept for configurations written against older
            // releases.
            "experimental-no-flickering" => Ok(PushStrategy::IncreaseWidth),
            "none" => Ok(PushStrategy::None),
            other => Err(format!("unknown push strategy: {other}")),
        }
    }
}

// --- Messages ---

/// Message carrying one scheduled badge probe.
#[derive(Debug, Clone)]
pub struct ProbeMsg {
    /// Identifier of the component instance this probe targets.
    pub id: usize,
    /// Focus-session tag; probes from a superseded session are dropped.
    pub tag: usize,
    attempt: usize,
}

/// Message forcing the probe state machine to its final decision.
#[derive(Debug, Clone)]
pub struct DecideMsg {
    /// Identifier of the component instance this message targets.
    pub id: usize,
    /// Focus-session tag; stale deadlines are dropped.
    pub tag: usize,
}

/// Message carrying one badge-space poll tick.
#[derive(Debug, Clone)]
pub struct SpacePollMsg {
    /// Identifier of the component instance this poll targets.
    pub id: usize,
    epoch: usize,
}

impl From<ProbeMsg> for Msg {
    fn from(msg: ProbeMsg) -> Self {
        Box::new(msg) as Msg
    }
}

impl From<DecideMsg> for Msg {
    fn from(msg: DecideMsg) -> Self {
        Box::new(msg) as Msg
    }
}

impl From<SpacePollMsg> for Msg {
    fn from(msg: SpacePollMsg) -> Self {
        Box::new(msg) as Msg
    }
}

// --- Model ---

/// The badge-avoidance component.
///
/// Owned by the OTP model, which forwards messages and relays focus
/// transitions via [`focus_gained`](Model::focus_gained) /
/// [`focus_lost`](Model::focus_lost).
pub struct Model {
    strategy: PushStrategy,
    probe: Option<Box<dyn SurfaceProbe>>,

    id: usize,
    // Bumped on every focus gain; pending probe timers from the previous
    // session fail the tag check when they arrive.
    session: usize,
    space_epoch: usize,

    focused: bool,
    has_badge: bool,
    has_space: bool,
    done: bool,
    refocused: bool,
    refocus_requested: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("pwm::Model")
            .field("strategy", &self.strategy)
            .field("id", &self.id)
            .field("session", &self.session)
            .field("has_badge", &self.has_badge)
            .field("has_space", &self.has_space)
            .field("done", &self.done)
            .finish()
    }
}

/// Creates a new badge-avoidance component with the given strategy and no
/// surface capability.
pub fn new(strategy: PushStrategy) -> Model {
    Model {
        strategy,
        probe: None,
        id: next_id(),
        session: 0,
        space_epoch: 0,
        focused: false,
        has_badge: false,
        has_space: false,
        done: false,
        refocused: false,
        refocus_requested: false,
    }
}

impl Default for Model {
    fn default() -> Self {
        new(PushStrategy::default())
    }
}

impl Model {
    /// Returns the component's unique identifier.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The configured strategy.
    pub fn strategy(&self) -> PushStrategy {
        self.strategy
    }

    /// Replaces the strategy. Takes effect for subsequent probing; an
    /// already-made decision is kept.
    pub fn set_strategy(&mut self, strategy: PushStrategy) {
        self.strategy = strategy;
    }

    /// Installs the surface capability and returns the command arming the
    /// badge-space poll, which runs on a 1 s cadence independent of focus.
    ///
    /// Installing a new capability supersedes the poll chain armed for the
    /// previous one.
    pub fn set_probe(&mut self, probe: Box<dyn SurfaceProbe>) -> Option<Cmd> {
        self.probe = Some(probe);
        if self.strategy == PushStrategy::None {
            return None;
        }
        self.space_epoch += 1;
        Some(self.space_cmd(Duration::from_millis(0)))
    }

    /// Whether a badge has been detected. Sticky: a badge, once seen, is
    /// assumed present for the life of the instance.
    pub fn has_badge(&self) -> bool {
        self.has_badge
    }

    /// Whether the viewport currently has room to grow the input.
    pub fn has_badge_space(&self) -> bool {
        self.has_space
    }

    /// Whether the probe state machine has reached its final decision.
    pub fn done(&self) -> bool {
        self.done
    }

    /// Whether the input should currently be rendered wider to push a
    /// detected badge clear of the typed characters.
    pub fn will_push_badge(&self) -> bool {
        self.strategy.affects_width() && self.has_badge && self.has_space
    }

    /// True exactly once after a detection that happened while the input
    /// held focus: the widget should blur and refocus its emulated input,
    /// preserving the selection range, to clear caret artifacts some
    /// browsers leave behind when a badge is injected mid-focus.
    pub fn take_refocus_request(&mut self) -> bool {
        std::mem::take(&mut self.refocus_requested)
    }

    /// Initializes the component, arming the badge-space poll when a
    /// surface capability is already present.
    pub fn init(&self) -> Option<Cmd> {
        if self.strategy == PushStrategy::None || self.probe.is_none() {
            return None;
        }
        Some(self.space_cmd(Duration::from_millis(0)))
    }

    /// Records a focus gain and arms a fresh probe session.
    ///
    /// Returns `None` when the strategy is [`PushStrategy::None`] (no
    /// geometry work at all), when no surface capability is installed
    /// (there is no geometry to probe), or after the decision has been
    /// made.
    pub fn focus_gained(&mut self) -> Option<Cmd> {
        self.focused = true;
        if self.strategy == PushStrategy::None || self.probe.is_none() || self.done {
            return None;
        }
        self.session += 1;
        Some(self.probe_cmd(FIRST_PROBE_DELAY, 0))
    }

    /// Records a focus loss. Probe timers armed for the current session
    /// keep their tag and may still arrive; detection simply observes the
    /// blurred state.
    pub fn focus_lost(&mut self) {
        self.focused = false;
    }

    fn probe_cmd(&self, delay: Duration, attempt: usize) -> Cmd {
        let id = self.id;
        let tag = self.session;
        tick(delay, move |_| Box::new(ProbeMsg { id, tag, attempt }) as Msg)
    }

    fn decide_cmd(&self, delay: Duration) -> Cmd {
        let id = self.id;
        let tag = self.session;
        tick(delay, move |_| Box::new(DecideMsg { id, tag }) as Msg)
    }

    fn space_cmd(&self, delay: Duration) -> Cmd {
        let id = self.id;
        let epoch = self.space_epoch;
        tick(delay, move |_| Box::new(SpacePollMsg { id, epoch }) as Msg)
    }

    /// Handles probe, decision and space-poll messages. Other messages are
    /// ignored.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        if let Some(probe_msg) = msg.downcast_ref::<ProbeMsg>() {
            if probe_msg.id != self.id || probe_msg.tag != self.session {
                return None;
            }
            if self.done {
                return None;
            }

            self.track_badge();
            if self.done {
                // Decision made early; drop the rest of the chain.
                return None;
            }

            return match probe_msg.attempt {
                0 => Some(self.probe_cmd(SECOND_PROBE_DELAY, 1)),
                1 => Some(self.probe_cmd(THIRD_PROBE_DELAY, 2)),
                _ => Some(self.decide_cmd(DECIDE_DELAY)),
            };
        }

        if let Some(decide_msg) = msg.downcast_ref::<DecideMsg>() {
            if decide_msg.id != self.id || decide_msg.tag != self.session {
                return None;
            }
            self.done = true;
            return None;
        }

        if let Some(poll_msg) = msg.downcast_ref::<SpacePollMsg>() {
            if poll_msg.id != self.id || poll_msg.epoch != self.space_epoch {
                return None;
            }
            if self.strategy == PushStrategy::None {
                return None;
            }
            self.check_space();
            return Some(self.space_cmd(SPACE_POLL_INTERVAL));
        }

        None
    }

    /// The detection routine: marker scan first, hit-test second. Any
    /// unanswered query skips this tick; the chain retries.
    fn track_badge(&mut self) {
        if self.done || self.strategy == PushStrategy::None {
            return;
        }
        let probe = match self.probe.as_ref() {
            Some(p) => p,
            None => return,
        };
        let rect = match probe.container_rect() {
            Some(r) => r,
            None => return,
        };

        let x = rect.right() - BADGE_MARGIN_RIGHT;
        let y = rect.center_y();

        if !probe.badge_marker_present() {
            match probe.hit_container(x, y) {
                // The container answers the hit-test: nothing overlaps it.
                Some(true) => return,
                // Geometry unavailable this tick.
                None => return,
                // Something sits on top of the probe point.
                Some(false) => {}
            }
        }

        self.has_badge = true;
        self.done = true;

        if self.focused && !self.refocused {
            self.refocused = true;
            self.refocus_requested = true;
        }
    }

    fn check_space(&mut self) {
        let probe = match self.probe.as_ref() {
            Some(p) => p,
            None => return,
        };
        let (viewport, rect) = match (probe.viewport_width(), probe.container_rect()) {
            (Some(v), Some(r)) => (v, r),
            _ => return,
        };
        self.has_space = viewport - rect.right() >= BADGE_SPACE_WIDTH;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, Default)]
    struct FakeSurface {
        rect: Option<Rect>,
        viewport: Option<f32>,
        markers: bool,
        hit_is_container: Option<bool>,
        last_hit: Option<(f32, f32)>,
    }

    #[derive(Clone, Default)]
    struct SharedSurface(Arc<Mutex<FakeSurface>>);

    impl SharedSurface {
        fn set<F: FnOnce(&mut FakeSurface)>(&self, f: F) {
            f(&mut self.0.lock().unwrap());
        }

        fn last_hit(&self) -> Option<(f32, f32)> {
            self.0.lock().unwrap().last_hit
        }
    }

    impl SurfaceProbe for SharedSurface {
        fn container_rect(&self) -> Option<Rect> {
            self.0.lock().unwrap().rect
        }

        fn viewport_width(&self) -> Option<f32> {
            self.0.lock().unwrap().viewport
        }

        fn badge_marker_present(&self) -> bool {
            self.0.lock().unwrap().markers
        }

        fn hit_container(&self, x: f32, y: f32) -> Option<bool> {
            let mut state = self.0.lock().unwrap();
            state.last_hit = Some((x, y));
            state.hit_is_container
        }
    }

    fn container() -> Rect {
        Rect {
            left: 100.0,
            top: 50.0,
            width: 200.0,
            height: 40.0,
        }
    }

    fn probed_model(surface: &SharedSurface) -> Model {
        let mut m = new(PushStrategy::IncreaseWidth);
        let _ = m.set_probe(Box::new(surface.clone()));
        m
    }

    #[test]
    fn test_none_strategy_arms_nothing() {
        let surface = SharedSurface::default();
        surface.set(|s| {
            s.rect = Some(container());
            s.viewport = Some(400.0);
            s.hit_is_container = Some(false);
        });

        let mut m = new(PushStrategy::None);
        assert!(m.set_probe(Box::new(surface.clone())).is_none());
        assert!(m.init().is_none());
        assert!(m.focus_gained().is_none());
        assert!(!m.will_push_badge());
    }

    #[test]
    fn test_no_capability_arms_no_probing() {
        let mut m = new(PushStrategy::IncreaseWidth);
        assert!(m.init().is_none());
        assert!(m.focus_gained().is_none());
    }

    #[test]
    fn test_probe_point_geometry() {
        let surface = SharedSurface::default();
        surface.set(|s| {
            s.rect = Some(container());
            s.hit_is_container = Some(true);
        });

        let mut m = probed_model(&surface);
        let _ = m.focus_gained();
        let msg: Msg = ProbeMsg {
            id: m.id,
            tag: m.session,
            attempt: 0,
        }
        .into();
        let _ = m.update(&msg);

        // right edge (300) minus the 18px margin, vertically centered.
        assert_eq!(surface.last_hit(), Some((282.0, 70.0)));
        assert!(!m.has_badge());
    }

    #[test]
    fn test_detection_at_second_probe_stops_chain() {
        let surface = SharedSurface::default();
        surface.set(|s| {
            s.rect = Some(container());
            s.hit_is_container = Some(true);
        });

        let mut m = probed_model(&surface);
        let _ = m.focus_gained();
        let tag = m.session;

        let first: Msg = ProbeMsg {
            id: m.id,
            tag,
            attempt: 0,
        }
        .into();
        assert!(m.update(&first).is_some());
        assert!(!m.has_badge());

        // A badge element now covers the probe point.
        surface.set(|s| s.hit_is_container = Some(false));

        let second: Msg = ProbeMsg {
            id: m.id,
            tag,
            attempt: 1,
        }
        .into();
        assert!(m.update(&second).is_none());
        assert!(m.has_badge());
        assert!(m.done());
        assert!(m.take_refocus_request());
        assert!(!m.take_refocus_request());

        // Nothing fires after the decision.
        let third: Msg = ProbeMsg {
            id: m.id,
            tag,
            attempt: 2,
        }
        .into();
        assert!(m.update(&third).is_none());
    }

    #[test]
    fn test_marker_elements_short_circuit_hit_test() {
        let surface = SharedSurface::default();
        surface.set(|s| {
            s.rect = Some(container());
            s.markers = true;
            s.hit_is_container = Some(true);
        });

        let mut m = probed_model(&surface);
        let _ = m.focus_gained();
        let msg: Msg = ProbeMsg {
            id: m.id,
            tag: m.session,
            attempt: 0,
        }
        .into();
        let _ = m.update(&msg);

        assert!(m.has_badge());
        // The hit-test never ran.
        assert!(surface.last_hit().is_none());
    }

    #[test]
    fn test_refocus_bumps_session_and_rejects_stale_probes() {
        let surface = SharedSurface::default();
        surface.set(|s| {
            s.rect = Some(container());
            s.hit_is_container = Some(false);
        });

        let mut m = probed_model(&surface);
        let _ = m.focus_gained();
        let stale_tag = m.session;
        m.focus_lost();
        let _ = m.focus_gained();
        assert_ne!(stale_tag, m.session);

        let stale: Msg = ProbeMsg {
            id: m.id,
            tag: stale_tag,
            attempt: 0,
        }
        .into();
        assert!(m.update(&stale).is_none());
        assert!(!m.has_badge());
    }

    #[test]
    fn test_deadline_decides_without_badge() {
        let surface = SharedSurface::default();
        surface.set(|s| s.rect = Some(container()));

        let mut m = probed_model(&surface);
        let _ = m.focus_gained();
        let msg: Msg = DecideMsg {
            id: m.id,
            tag: m.session,
        }
        .into();
        assert!(m.update(&msg).is_none());
        assert!(m.done());
        assert!(!m.has_badge());

        // Probing never rearms once decided.
        assert!(m.focus_gained().is_none());
    }

    #[test]
    fn test_ambiguous_hit_test_is_no_badge() {
        let surface = SharedSurface::default();
        surface.set(|s| {
            s.rect = Some(container());
            s.hit_is_container = None;
        });

        let mut m = probed_model(&surface);
        let _ = m.focus_gained();
        let msg: Msg = ProbeMsg {
            id: m.id,
            tag: m.session,
            attempt: 0,
        }
        .into();
        // The chain keeps going, but nothing was decided.
        assert!(m.update(&msg).is_some());
        assert!(!m.has_badge());
        assert!(!m.done());
    }

    #[test]
    fn test_space_poll_tracks_viewport_room() {
        let surface = SharedSurface::default();
        surface.set(|s| {
            s.rect = Some(container());
            s.viewport = Some(400.0);
        });

        let mut m = probed_model(&surface);
        let msg: Msg = SpacePollMsg {
            id: m.id,
            epoch: m.space_epoch,
        }
        .into();
        // 400 - 300 = 100 >= 40.
        assert!(m.update(&msg).is_some());
        assert!(m.has_badge_space());

        surface.set(|s| s.viewport = Some(320.0));
        let msg: Msg = SpacePollMsg {
            id: m.id,
            epoch: m.space_epoch,
        }
        .into();
        let _ = m.update(&msg);
        // 320 - 300 = 20 < 40.
        assert!(!m.has_badge_space());
    }

    #[test]
    fn test_will_push_requires_badge_space_and_strategy() {
        let surface = SharedSurface::default();
        surface.set(|s| {
            s.rect = Some(container());
            s.viewport = Some(400.0);
            s.markers = true;
        });

        let mut m = probed_model(&surface);
        let _ = m.focus_gained();

        let probe: Msg = ProbeMsg {
            id: m.id,
            tag: m.session,
            attempt: 0,
        }
        .into();
        let _ = m.update(&probe);
        assert!(m.has_badge());
        assert!(!m.will_push_badge());

        let poll: Msg = SpacePollMsg {
            id: m.id,
            epoch: m.space_epoch,
        }
        .into();
        let _ = m.update(&poll);
        assert!(m.will_push_badge());

        m.set_strategy(PushStrategy::None);
        assert!(!m.will_push_badge());
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!(
            "increase-width".parse::<PushStrategy>(),
            Ok(PushStrategy::IncreaseWidth)
        );
        assert_eq!(
            "experimental-no-flickering".parse::<PushStrategy>(),
            Ok(PushStrategy::IncreaseWidth)
        );
        assert_eq!("none".parse::<PushStrategy>(), Ok(PushStrategy::None));
        assert!("push-harder".parse::<PushStrategy>().is_err());
    }
}
