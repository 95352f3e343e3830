use std::fmt;
use std::time::{Duration, Instant};

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::config::Timing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Backspace,
    Char(char),
    Enter,
}

/// One timed synthetic keystroke; `fire_at` is the offset from plan start.
#[derive(Debug, Clone, Copy)]
pub struct PlanAction {
    pub kind: ActionKind,
    pub fire_at: Duration,
}

#[derive(Debug)]
struct Plan {
    actions: Vec<PlanAction>,
    cursor: usize,
    started: Instant,
    panic: bool,
}

/// Reported once when the last action of a plan has been handed out.
/// `submit` asks the caller to push one logical Submit through the normal key
/// path; only panic plans set it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanDone {
    pub submit: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum StartError {
    InFlight,
    NothingToType,
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartError::InFlight => write!(f, "another plan is already in flight"),
            StartError::NothingToType => write!(f, "target adds nothing to the buffer"),
        }
    }
}

impl std::error::Error for StartError {}

/// Holds at most one plan of timed synthetic keystrokes and the counter that
/// swallows our own injected keys when the global listener echoes them back.
/// All methods run on the single state-owning thread; `cancel` drops the plan
/// and zeroes the counter before returning, so nothing fires afterwards.
pub struct Scheduler {
    timing: Timing,
    plan: Option<Plan>,
    expected_synthetic: usize,
}

impl Scheduler {
    pub fn new(timing: Timing) -> Self {
        Self {
            timing,
            plan: None,
            expected_synthetic: 0,
        }
    }

    pub fn in_flight(&self) -> bool {
        self.plan.is_some()
    }

    pub fn panicking(&self) -> bool {
        self.plan.as_ref().is_some_and(|p| p.panic)
    }

    pub fn expected_synthetic(&self) -> usize {
        self.expected_synthetic
    }

    /// Actions not yet handed out, in firing order.
    pub fn pending(&self) -> &[PlanAction] {
        self.plan
            .as_ref()
            .map(|p| &p.actions[p.cursor..])
            .unwrap_or(&[])
    }

    /// Plans the remainder of `target` beyond `buffer` at ordinary typing
    /// cadence. Rejected while a plan is in flight or when there is nothing
    /// left to type.
    pub fn start_autocomplete(
        &mut self,
        buffer: &str,
        target: &str,
        now: Instant,
        rng: &mut impl Rng,
    ) -> Result<(), StartError> {
        if self.plan.is_some() {
            return Err(StartError::InFlight);
        }
        if !target.starts_with(buffer) || target.len() == buffer.len() {
            return Err(StartError::NothingToType);
        }

        let kinds: Vec<ActionKind> = target[buffer.len()..].chars().map(ActionKind::Char).collect();
        let actions = build_actions(&self.timing, self.timing.type_mean_ms, kinds, rng);
        self.expected_synthetic = actions.len();
        self.plan = Some(Plan {
            actions,
            cursor: 0,
            started: now,
            panic: false,
        });
        log::debug!("autocomplete plan: {} keys", self.expected_synthetic);
        Ok(())
    }

    /// Full-word completion at panic cadence. Cancels any in-flight plan
    /// first. When the target extends the buffer only the suffix is typed,
    /// otherwise the buffer is erased and the target typed from scratch; a
    /// final Enter (physical only) closes the plan.
    pub fn start_panic(&mut self, buffer: &str, target: &str, now: Instant, rng: &mut impl Rng) {
        self.cancel();

        let mut kinds: Vec<ActionKind> = Vec::new();
        if target.starts_with(buffer) {
            kinds.extend(target[buffer.len()..].chars().map(ActionKind::Char));
        } else {
            kinds.extend(std::iter::repeat(ActionKind::Backspace).take(buffer.chars().count()));
            kinds.extend(target.chars().map(ActionKind::Char));
        }
        kinds.push(ActionKind::Enter);

        let actions = build_actions(&self.timing, self.timing.panic_mean_ms, kinds, rng);
        self.expected_synthetic = actions.len();
        self.plan = Some(Plan {
            actions,
            cursor: 0,
            started: now,
            panic: true,
        });
        log::debug!("panic plan: {} keys -> {target:?}", self.expected_synthetic);
    }

    /// Drops the plan and zeroes the suppression counter in one step.
    pub fn cancel(&mut self) {
        if self.plan.take().is_some() {
            log::debug!("plan cancelled");
        }
        self.expected_synthetic = 0;
    }

    /// Called by the key handler for every listener-delivered key. While the
    /// counter is positive the event is one of our own injected keys and must
    /// be swallowed.
    pub fn absorb_synthetic(&mut self) -> bool {
        if self.expected_synthetic > 0 {
            self.expected_synthetic -= 1;
            true
        } else {
            false
        }
    }

    /// Hands out every action whose fire time has passed, in order. The
    /// completion marker comes at most once per plan. Echo suppression ends
    /// with the plan: echoes arrive between injections, so anything still
    /// expected at completion will never come.
    pub fn take_due(&mut self, now: Instant) -> (Vec<ActionKind>, Option<PlanDone>) {
        let Some(plan) = self.plan.as_mut() else {
            return (Vec::new(), None);
        };

        let elapsed = now.saturating_duration_since(plan.started);
        let mut due = Vec::new();
        while plan.cursor < plan.actions.len() && plan.actions[plan.cursor].fire_at <= elapsed {
            due.push(plan.actions[plan.cursor].kind);
            plan.cursor += 1;
        }

        if plan.cursor == plan.actions.len() {
            let submit = plan.panic;
            self.plan = None;
            self.expected_synthetic = 0;
            (due, Some(PlanDone { submit }))
        } else {
            (due, None)
        }
    }
}

fn build_actions(
    timing: &Timing,
    mean_ms: u64,
    kinds: Vec<ActionKind>,
    rng: &mut impl Rng,
) -> Vec<PlanAction> {
    // sd is clamped above zero, so construction only fails on a broken
    // config; fall back to an unjittered cadence at the mean in that case
    let dist = Normal::new(mean_ms as f64, (timing.jitter_sd_ms as f64).max(1.0)).ok();
    let mut fire_at = Duration::ZERO;
    kinds
        .into_iter()
        .map(|kind| {
            let delay = dist
                .map(|d| d.sample(rng))
                .unwrap_or(mean_ms as f64)
                .clamp(timing.min_delay_ms as f64, timing.max_delay_ms as f64);
            fire_at += Duration::from_millis(delay.round() as u64);
            PlanAction { kind, fire_at }
        })
        .collect()
}
