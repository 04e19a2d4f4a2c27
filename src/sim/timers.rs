//! Delayed and periodic actions on simulated time
//!
//! Every chase phase change, effect reversal, heartbeat beat and flicker step
//! is a timer here instead of a free-floating callback. Timers carry the
//! registry epoch they were scheduled in; `reset` bumps the epoch so nothing
//! scheduled before a respawn or game over can ever fire afterwards.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::events::TransientEffect;

/// Convert simulation seconds to a registry duration (microsecond precision)
pub fn secs(seconds: f32) -> Duration {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_micros((seconds as f64 * 1_000_000.0).round() as u64)
}

/// Logical owner of a timer, used for cancelling related timers together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerGroup {
    /// Approach delay and chase timeout
    Chase,
    /// Heartbeat cadence during a chase
    Heartbeat,
    /// Adrenaline cooldown after a chase
    Adrenaline,
    /// Reversal of one transient effect
    Effect(TransientEffect),
}

/// What to do when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerAction {
    /// Approaching -> Chasing
    BeginPursuit,
    /// Chase ran its full length without a capture
    ChaseTimeout,
    HeartbeatTick,
    ClearAdrenaline,
    FlickerStep,
    EndJumpScare,
    EndBlood,
    EndPanic,
    EndStatic,
    EndFogInversion,
}

/// One-shot or periodic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Once,
    Every(Duration),
}

/// Cancel token returned by the schedule calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    id: u64,
    epoch: u32,
}

/// A timer that has come due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub handle: TimerHandle,
    pub group: TimerGroup,
    pub action: TimerAction,
}

#[derive(Debug, Clone)]
struct ActiveTimer {
    handle: TimerHandle,
    group: TimerGroup,
    kind: TimerKind,
    due: Duration,
    action: TimerAction,
}

/// Outstanding timers keyed by session epoch
#[derive(Debug, Clone, Default)]
pub struct TimerRegistry {
    now: Duration,
    epoch: u32,
    next_id: u64,
    timers: Vec<ActiveTimer>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Number of outstanding timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn group_pending(&self, group: TimerGroup) -> bool {
        self.timers.iter().any(|t| t.group == group)
    }

    /// Fire `action` once after `delay`
    pub fn schedule_once(
        &mut self,
        group: TimerGroup,
        delay: Duration,
        action: TimerAction,
    ) -> TimerHandle {
        self.insert(group, TimerKind::Once, delay, action)
    }

    /// Fire `action` every `period`, first time one period from now
    pub fn schedule_every(
        &mut self,
        group: TimerGroup,
        period: Duration,
        action: TimerAction,
    ) -> TimerHandle {
        // A zero period would re-fire forever within one advance
        let period = period.max(Duration::from_millis(1));
        self.insert(group, TimerKind::Every(period), period, action)
    }

    fn insert(
        &mut self,
        group: TimerGroup,
        kind: TimerKind,
        delay: Duration,
        action: TimerAction,
    ) -> TimerHandle {
        let handle = TimerHandle {
            id: self.next_id,
            epoch: self.epoch,
        };
        self.next_id += 1;
        self.timers.push(ActiveTimer {
            handle,
            group,
            kind,
            due: self.now + delay,
            action,
        });
        handle
    }

    /// Cancel one timer. Already fired or cancelled handles are ignored.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() != before
    }

    /// Cancel every timer in a group, returning how many were dropped
    pub fn cancel_group(&mut self, group: TimerGroup) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| t.group != group);
        before - self.timers.len()
    }

    /// Drop everything and start a new epoch
    pub fn reset(&mut self) {
        if !self.timers.is_empty() {
            log::debug!(
                "Cancelling {} timers (epoch {} -> {})",
                self.timers.len(),
                self.epoch,
                self.epoch + 1
            );
        }
        self.timers.clear();
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Move simulated time forward. Call `pop_due` afterwards to collect fired timers.
    pub fn advance(&mut self, dt: Duration) {
        self.now += dt;
    }

    /// Take the earliest due timer, re-arming it if periodic
    ///
    /// Timers are popped one at a time so that handling one action can
    /// cancel timers that are due in the same frame.
    pub fn pop_due(&mut self) -> Option<Fired> {
        let epoch = self.epoch;
        self.timers.retain(|t| t.handle.epoch == epoch);

        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= self.now)
            .min_by_key(|(_, t)| (t.due, t.handle.id))
            .map(|(i, _)| i)?;

        let timer = &mut self.timers[idx];
        let fired = Fired {
            handle: timer.handle,
            group: timer.group,
            action: timer.action,
        };
        match timer.kind {
            TimerKind::Every(period) => timer.due += period,
            TimerKind::Once => {
                self.timers.remove(idx);
            }
        }
        Some(fired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(reg: &mut TimerRegistry) -> Vec<TimerAction> {
        std::iter::from_fn(|| reg.pop_due()).map(|f| f.action).collect()
    }

    #[test]
    fn test_secs_rounds_to_micros() {
        assert_eq!(secs(0.1), Duration::from_millis(100));
        assert_eq!(secs(3.0), Duration::from_secs(3));
        assert_eq!(secs(-1.0), Duration::ZERO);
        assert_eq!(secs(f32::INFINITY), Duration::ZERO);
    }

    #[test]
    fn test_once_fires_exactly_at_deadline() {
        let mut reg = TimerRegistry::new();
        reg.schedule_once(TimerGroup::Chase, secs(3.0), TimerAction::BeginPursuit);

        for _ in 0..29 {
            reg.advance(secs(0.1));
            assert!(drain(&mut reg).is_empty());
        }
        reg.advance(secs(0.1));
        assert_eq!(drain(&mut reg), vec![TimerAction::BeginPursuit]);
        assert!(reg.is_empty());
    }

    #[test]
    fn test_periodic_rearms() {
        let mut reg = TimerRegistry::new();
        reg.schedule_every(
            TimerGroup::Heartbeat,
            Duration::from_millis(500),
            TimerAction::HeartbeatTick,
        );
        reg.advance(Duration::from_millis(1600));
        assert_eq!(drain(&mut reg).len(), 3);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_due_order_is_deadline_then_schedule_order() {
        let mut reg = TimerRegistry::new();
        reg.schedule_once(TimerGroup::Chase, secs(2.0), TimerAction::ChaseTimeout);
        reg.schedule_once(TimerGroup::Chase, secs(1.0), TimerAction::BeginPursuit);
        reg.schedule_once(
            TimerGroup::Adrenaline,
            secs(1.0),
            TimerAction::ClearAdrenaline,
        );
        reg.advance(secs(5.0));
        assert_eq!(
            drain(&mut reg),
            vec![
                TimerAction::BeginPursuit,
                TimerAction::ClearAdrenaline,
                TimerAction::ChaseTimeout
            ]
        );
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut reg = TimerRegistry::new();
        let h = reg.schedule_once(TimerGroup::Chase, secs(1.0), TimerAction::ChaseTimeout);
        assert!(reg.cancel(h));
        assert!(!reg.cancel(h));

        let fired = reg.schedule_once(TimerGroup::Chase, secs(0.5), TimerAction::BeginPursuit);
        reg.advance(secs(1.0));
        assert_eq!(drain(&mut reg), vec![TimerAction::BeginPursuit]);
        assert!(!reg.cancel(fired));
    }

    #[test]
    fn test_cancel_group_leaves_others() {
        let mut reg = TimerRegistry::new();
        reg.schedule_once(TimerGroup::Chase, secs(1.0), TimerAction::BeginPursuit);
        reg.schedule_once(TimerGroup::Chase, secs(2.0), TimerAction::ChaseTimeout);
        reg.schedule_every(TimerGroup::Heartbeat, secs(0.5), TimerAction::HeartbeatTick);

        assert_eq!(reg.cancel_group(TimerGroup::Chase), 2);
        assert_eq!(reg.cancel_group(TimerGroup::Chase), 0);
        assert!(reg.group_pending(TimerGroup::Heartbeat));
    }

    #[test]
    fn test_reset_drops_stale_epoch() {
        let mut reg = TimerRegistry::new();
        let old = reg.schedule_once(TimerGroup::Chase, secs(1.0), TimerAction::ChaseTimeout);
        reg.schedule_every(TimerGroup::Heartbeat, secs(0.5), TimerAction::HeartbeatTick);
        reg.reset();
        assert_eq!(reg.epoch(), 1);

        reg.advance(secs(30.0));
        assert!(drain(&mut reg).is_empty());
        // Old handle cannot touch timers of the new epoch
        reg.schedule_once(TimerGroup::Chase, secs(1.0), TimerAction::BeginPursuit);
        assert!(!reg.cancel(old));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_cancel_inside_drain_loop() {
        let mut reg = TimerRegistry::new();
        reg.schedule_once(TimerGroup::Chase, secs(1.0), TimerAction::ChaseTimeout);
        reg.schedule_every(TimerGroup::Heartbeat, secs(1.0), TimerAction::HeartbeatTick);
        reg.advance(secs(1.0));

        let first = reg.pop_due().unwrap();
        assert_eq!(first.action, TimerAction::ChaseTimeout);
        reg.cancel_group(TimerGroup::Heartbeat);
        assert!(reg.pop_due().is_none());
    }
}
