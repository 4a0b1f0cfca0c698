//! Presentation collaborators driven by simulation events.

use angkor_escape_core::{AudioCues, HealthDisplay, SoundCue};

/// Colour band of the HP bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthBand {
    /// More than 60 % of the maximum.
    Healthy,
    /// More than 30 % of the maximum.
    Wounded,
    /// Anything lower.
    Critical,
}

/// Player HP bar mirroring the damage the simulation reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HpBar {
    current: u32,
    max: u32,
}

impl HpBar {
    /// Creates a full bar.
    #[must_use]
    pub const fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Health currently shown.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Health of a full bar.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Filled fraction in `[0, 1]`.
    #[must_use]
    pub fn ratio(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        self.current as f32 / self.max as f32
    }

    /// Colour band for the current fill.
    #[must_use]
    pub fn band(&self) -> HealthBand {
        let ratio = self.ratio();
        if ratio > 0.6 {
            HealthBand::Healthy
        } else if ratio > 0.3 {
            HealthBand::Wounded
        } else {
            HealthBand::Critical
        }
    }

    /// Text rendering such as `[#######---] 70/100`.
    #[must_use]
    pub fn render(&self, width: usize) -> String {
        let filled = (self.ratio() * width as f32).round() as usize;
        let filled = filled.min(width);
        format!(
            "[{}{}] {}/{}",
            "#".repeat(filled),
            "-".repeat(width - filled),
            self.current,
            self.max
        )
    }
}

impl HealthDisplay for HpBar {
    fn reduce(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    fn heal(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.max);
    }
}

/// Audio sink that logs cues instead of playing them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoggingAudio {
    footsteps: bool,
    cues: usize,
}

impl LoggingAudio {
    /// Creates a silent sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the footstep loop is running.
    #[must_use]
    pub const fn footsteps_playing(&self) -> bool {
        self.footsteps
    }

    /// Number of cues started so far.
    #[must_use]
    pub const fn cues_played(&self) -> usize {
        self.cues
    }
}

impl AudioCues for LoggingAudio {
    fn play(&mut self, cue: SoundCue) {
        if cue == SoundCue::Footsteps {
            if self.footsteps {
                return;
            }
            self.footsteps = true;
        }
        self.cues += 1;
        log::debug!("audio: play {cue:?}");
    }

    fn stop(&mut self, cue: SoundCue) {
        if cue == SoundCue::Footsteps {
            self.footsteps = false;
        }
        log::debug!("audio: stop {cue:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_clamps_between_zero_and_max() {
        let mut bar = HpBar::new(100);

        bar.reduce(130);
        assert_eq!(bar.current(), 0);
        assert_eq!(bar.band(), HealthBand::Critical);

        bar.heal(250);
        assert_eq!(bar.current(), 100);
        assert_eq!(bar.band(), HealthBand::Healthy);
    }

    #[test]
    fn bands_follow_fill_ratio() {
        let mut bar = HpBar::new(100);
        bar.reduce(40);
        assert_eq!(bar.band(), HealthBand::Wounded);
        bar.reduce(30);
        assert_eq!(bar.band(), HealthBand::Critical);
        assert_eq!(bar.render(10), "[###-------] 30/100");
    }

    #[test]
    fn footstep_loop_starts_once() {
        let mut audio = LoggingAudio::new();

        audio.play(SoundCue::Footsteps);
        audio.play(SoundCue::Footsteps);
        assert!(audio.footsteps_playing());
        assert_eq!(audio.cues_played(), 1);

        audio.stop(SoundCue::Footsteps);
        audio.play(SoundCue::Hit);
        assert!(!audio.footsteps_playing());
        assert_eq!(audio.cues_played(), 2);
    }
}
