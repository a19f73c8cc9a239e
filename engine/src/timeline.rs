//! Finite-state timeline driving the tree animation.
//!
//! Timers are modelled as deadlines on a simulated clock owned by the
//! timeline. The host advances the clock once per frame; every deadline that
//! falls inside the advance fires in order.

use crate::state::AnimationState;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One scheduled automatic transition, relative to mount time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledStep {
    pub at_ms: u64,
    pub state: AnimationState,
}

impl ScheduledStep {
    pub const fn new(at_ms: u64, state: AnimationState) -> Self {
        Self { at_ms, state }
    }

    pub fn at(&self) -> Duration {
        Duration::from_millis(self.at_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSchedule {
    pub steps: Vec<ScheduledStep>,
    /// When set, a manual toggle drops whatever automatic steps are still pending.
    pub toggle_cancels_pending: bool,
}

impl Default for TimelineSchedule {
    fn default() -> Self {
        Self {
            steps: vec![
                ScheduledStep::new(1_000, AnimationState::Morphing),
                ScheduledStep::new(4_000, AnimationState::Formed),
                ScheduledStep::new(5_500, AnimationState::Revealed),
            ],
            toggle_cancels_pending: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnimationTimeline {
    state: AnimationState,
    reduced_motion: bool,
    clock: Duration,
    pending: Vec<ScheduledStep>,
    toggle_cancels_pending: bool,
}

impl AnimationTimeline {
    /// Mounts the timeline at clock zero.
    ///
    /// Under reduced motion the timeline jumps straight to
    /// [`AnimationState::Revealed`] and schedules nothing.
    pub fn mount(reduced_motion: bool, schedule: &TimelineSchedule) -> Self {
        let mut timeline = Self {
            state: AnimationState::Scattered,
            reduced_motion,
            clock: Duration::ZERO,
            pending: Vec::new(),
            toggle_cancels_pending: schedule.toggle_cancels_pending,
        };

        if reduced_motion {
            timeline.transition(AnimationState::Revealed, "reduced motion");
        } else {
            timeline.pending = schedule.steps.clone();
            timeline.pending.sort_by_key(|step| step.at_ms);
            debug!(
                "Timeline mounted with {} scheduled transitions",
                timeline.pending.len()
            );
        }

        timeline
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Changes the motion preference without touching state or pending steps.
    pub fn set_reduced_motion(&mut self, reduced_motion: bool) {
        self.reduced_motion = reduced_motion;
    }

    /// Simulated time since mount.
    pub fn elapsed(&self) -> Duration {
        self.clock
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Moves the clock forward by `delta`, firing due steps.
    ///
    /// Returns the new state when at least one transition fired.
    pub fn advance(&mut self, delta: Duration) -> Option<AnimationState> {
        let target = self.clock.saturating_add(delta);
        self.advance_to(target)
    }

    /// Moves the clock to `at` (never backwards), firing due steps.
    pub fn advance_to(&mut self, at: Duration) -> Option<AnimationState> {
        if at > self.clock {
            self.clock = at;
        }

        let due = self
            .pending
            .iter()
            .take_while(|step| step.at() <= self.clock)
            .count();
        if due == 0 {
            return None;
        }

        let fired: Vec<ScheduledStep> = self.pending.drain(..due).collect();
        for step in fired {
            self.transition(step.state, "scheduled");
        }
        Some(self.state)
    }

    /// User-triggered restart or collapse.
    ///
    /// Pending automatic steps keep running unless the schedule asked for
    /// `toggle_cancels_pending`, so a later step can still override this.
    pub fn toggle(&mut self) -> AnimationState {
        if self.toggle_cancels_pending {
            self.cancel();
        }
        let next = self.state.toggled();
        self.transition(next, "manual toggle");
        next
    }

    /// Drops every pending step. Used on teardown.
    pub fn cancel(&mut self) {
        if !self.pending.is_empty() {
            debug!("Timeline cancelled {} pending transitions", self.pending.len());
            self.pending.clear();
        }
    }

    fn transition(&mut self, next: AnimationState, cause: &str) {
        if next != self.state {
            debug!(
                "Timeline {} -> {} ({cause}) at {} ms",
                self.state,
                next,
                self.clock.as_millis()
            );
        }
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn full_motion() -> AnimationTimeline {
        AnimationTimeline::mount(false, &TimelineSchedule::default())
    }

    #[test]
    fn auto_advances_on_schedule() {
        let mut timeline = full_motion();
        assert_eq!(timeline.state(), AnimationState::Scattered);
        assert_eq!(timeline.pending_count(), 3);

        assert_eq!(timeline.advance_to(ms(999)), None);
        assert_eq!(timeline.state(), AnimationState::Scattered);

        assert_eq!(timeline.advance_to(ms(1_000)), Some(AnimationState::Morphing));
        assert_eq!(timeline.advance_to(ms(3_999)), None);
        assert_eq!(timeline.state(), AnimationState::Morphing);

        assert_eq!(timeline.advance_to(ms(4_000)), Some(AnimationState::Formed));
        assert_eq!(timeline.advance_to(ms(5_500)), Some(AnimationState::Revealed));
        assert!(!timeline.has_pending());
    }

    #[test]
    fn long_frame_fires_every_due_step_in_order() {
        let mut timeline = full_motion();
        assert_eq!(timeline.advance(ms(6_000)), Some(AnimationState::Revealed));
        assert_eq!(timeline.pending_count(), 0);
    }

    #[test]
    fn small_deltas_accumulate() {
        let mut timeline = full_motion();
        for _ in 0..60 {
            timeline.advance(ms(16));
        }
        assert_eq!(timeline.elapsed(), ms(960));
        assert_eq!(timeline.state(), AnimationState::Scattered);
        timeline.advance(ms(40));
        assert_eq!(timeline.state(), AnimationState::Morphing);
    }

    #[test]
    fn reduced_motion_reveals_immediately_without_timers() {
        let timeline = AnimationTimeline::mount(true, &TimelineSchedule::default());
        assert_eq!(timeline.state(), AnimationState::Revealed);
        assert!(!timeline.has_pending());
        assert!(timeline.reduced_motion());
    }

    #[test]
    fn toggle_from_revealed_collapses_and_from_scattered_restarts() {
        let mut revealed = AnimationTimeline::mount(true, &TimelineSchedule::default());
        assert_eq!(revealed.toggle(), AnimationState::Scattered);
        assert_eq!(revealed.toggle(), AnimationState::Morphing);
    }

    #[test]
    fn pending_step_overrides_manual_toggle_by_default() {
        let mut timeline = full_motion();
        timeline.advance_to(ms(4_200));
        assert_eq!(timeline.state(), AnimationState::Formed);

        assert_eq!(timeline.toggle(), AnimationState::Scattered);
        timeline.advance_to(ms(5_500));
        assert_eq!(timeline.state(), AnimationState::Revealed);
    }

    #[test]
    fn toggle_can_cancel_pending_steps() {
        let schedule = TimelineSchedule {
            toggle_cancels_pending: true,
            ..TimelineSchedule::default()
        };
        let mut timeline = AnimationTimeline::mount(false, &schedule);
        timeline.advance_to(ms(4_200));
        timeline.toggle();
        timeline.advance_to(ms(10_000));
        assert_eq!(timeline.state(), AnimationState::Scattered);
    }

    #[test]
    fn cancel_stops_all_pending_steps() {
        let mut timeline = full_motion();
        timeline.advance_to(ms(1_500));
        timeline.cancel();
        assert_eq!(timeline.advance_to(ms(60_000)), None);
        assert_eq!(timeline.state(), AnimationState::Morphing);
    }

    #[test]
    fn unsorted_schedule_fires_by_deadline() {
        let schedule = TimelineSchedule {
            steps: vec![
                ScheduledStep::new(300, AnimationState::Formed),
                ScheduledStep::new(100, AnimationState::Morphing),
            ],
            toggle_cancels_pending: false,
        };
        let mut timeline = AnimationTimeline::mount(false, &schedule);
        assert_eq!(timeline.advance_to(ms(150)), Some(AnimationState::Morphing));
        assert_eq!(timeline.advance_to(ms(300)), Some(AnimationState::Formed));
    }

    #[test]
    fn clock_never_runs_backwards() {
        let mut timeline = full_motion();
        timeline.advance_to(ms(2_000));
        timeline.advance_to(ms(500));
        assert_eq!(timeline.elapsed(), ms(2_000));
    }
}
