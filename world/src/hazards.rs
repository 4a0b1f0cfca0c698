//! Animated hazard tiles.
//!
//! A hazard sweeps its animation forward and back once, which takes
//! `2n - 2` frame steps for `n` frames, then goes dormant for a fixed
//! duration before starting over. It only deals damage while active.

use std::time::Duration;

use angkor_escape_core::{CellCoord, HazardKind, HazardSnapshot, Rect};

/// Smallest frame count that still produces a forward and backward sweep.
const MIN_FRAMES: usize = 2;

#[derive(Clone, Debug)]
pub(crate) struct Hazard {
    cell: CellCoord,
    kind: HazardKind,
    bounds: Rect,
    frame_count: usize,
    frame_duration: Duration,
    dormant_duration: Duration,
    frame: usize,
    forward: bool,
    active: bool,
    steps: usize,
    last_step: Duration,
    dormant_since: Duration,
}

impl Hazard {
    pub(crate) fn new(
        cell: CellCoord,
        kind: HazardKind,
        bounds: Rect,
        frame_count: usize,
        frame_duration: Duration,
        dormant_duration: Duration,
        now: Duration,
    ) -> Self {
        Self {
            cell,
            kind,
            bounds,
            frame_count: frame_count.max(MIN_FRAMES),
            frame_duration,
            dormant_duration,
            frame: 0,
            forward: true,
            active: true,
            steps: 0,
            last_step: now,
            dormant_since: now,
        }
    }

    pub(crate) fn cell(&self) -> CellCoord {
        self.cell
    }

    pub(crate) fn kind(&self) -> HazardKind {
        self.kind
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    fn full_cycle(&self) -> usize {
        self.frame_count * 2 - 2
    }

    /// Advances the duty cycle to `now`. Returns `true` when the active flag flipped.
    pub(crate) fn update(&mut self, now: Duration) -> bool {
        let was_active = self.active;

        if !self.active {
            if now.saturating_sub(self.dormant_since) < self.dormant_duration {
                return false;
            }
            self.active = true;
            self.frame = 0;
            self.forward = true;
            self.steps = 0;
        }

        if now.saturating_sub(self.last_step) > self.frame_duration {
            self.last_step = now;
            self.step_frame();
            self.steps += 1;
            if self.steps >= self.full_cycle() {
                self.active = false;
                self.dormant_since = now;
            }
        }

        self.active != was_active
    }

    fn step_frame(&mut self) {
        if self.forward {
            self.frame += 1;
            if self.frame == self.frame_count {
                self.frame = self.frame_count - 2;
                self.forward = false;
            }
        } else if self.frame == 0 {
            self.frame = 1;
            self.forward = true;
        } else {
            self.frame -= 1;
        }
    }

    pub(crate) fn snapshot(&self) -> HazardSnapshot {
        HazardSnapshot {
            cell: self.cell,
            kind: self.kind,
            bounds: self.bounds,
            frame: self.frame,
            active: self.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spike(frames: usize) -> Hazard {
        Hazard::new(
            CellCoord::new(3, 5),
            HazardKind::Spike,
            Rect::new(192.0, 320.0, 64.0, 64.0),
            frames,
            Duration::from_millis(150),
            Duration::from_millis(1_500),
            Duration::ZERO,
        )
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn sweeps_forward_then_back_before_going_dormant() {
        let mut hazard = spike(4);
        let mut frames = Vec::new();
        let mut now = 0;
        while hazard.is_active() {
            now += 151;
            let _ = hazard.update(ms(now));
            frames.push(hazard.snapshot().frame);
        }

        assert_eq!(frames, vec![1, 2, 3, 2, 1, 0]);
        assert_eq!(now, 6 * 151);
    }

    #[test]
    fn frame_steps_require_strictly_more_than_frame_duration() {
        let mut hazard = spike(4);
        assert!(!hazard.update(ms(150)));
        assert_eq!(hazard.snapshot().frame, 0);
        assert!(!hazard.update(ms(151)));
        assert_eq!(hazard.snapshot().frame, 1);
    }

    #[test]
    fn dormant_phase_lasts_before_reactivation() {
        let mut hazard = spike(2);
        assert!(!hazard.update(ms(151)));
        assert!(hazard.update(ms(302)), "two steps finish a two-frame sweep");
        assert!(!hazard.is_active());

        assert!(!hazard.update(ms(302 + 1_499)));
        assert!(!hazard.is_active());
        assert!(hazard.update(ms(302 + 1_500)));
        assert!(hazard.is_active());
        assert_eq!(hazard.snapshot().frame, 1, "the first step follows reactivation");
    }

    #[test]
    fn single_frame_strips_are_padded() {
        let mut hazard = spike(1);
        assert!(!hazard.update(ms(151)));
        assert!(hazard.update(ms(302)));
    }
}
