use std::{f32::consts::TAU, time::Duration};

/// The short synthesized tone played for sound notifications.
///
/// A sine oscillator feeds a gain stage whose gain ramps exponentially from
/// `start_gain` down to `floor_gain` over `decay`; the oscillator stops at `stop_after`.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneCue {
    pub frequency_hz: f32,
    pub start_gain: f32,
    pub floor_gain: f32,
    pub decay: Duration,
    pub stop_after: Duration,
}

impl Default for ToneCue {
    fn default() -> Self {
        ToneCue {
            frequency_hz: 1000.0,
            start_gain: 1.0,
            floor_gain: 0.0001,
            decay: Duration::from_millis(500),
            stop_after: Duration::from_millis(600),
        }
    }
}

impl ToneCue {
    /// Gain applied at `t` seconds after the start
    pub fn gain_at(&self, t: f32) -> f32 {
        let decay = self.decay.as_secs_f32();
        if t <= 0.0 {
            return self.start_gain;
        }
        if t >= decay {
            return self.floor_gain;
        }

        self.start_gain * (self.floor_gain / self.start_gain).powf(t / decay)
    }

    pub fn sample_count(&self, sample_rate: u32) -> usize {
        (self.stop_after.as_secs_f64() * f64::from(sample_rate)).round() as usize
    }

    /// Renders mono samples in `[-1.0, 1.0]` at `sample_rate`
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let rate = sample_rate as f32;

        (0..self.sample_count(sample_rate))
            .map(|n| {
                let t = n as f32 / rate;
                (TAU * self.frequency_hz * t).sin() * self.gain_at(t)
            })
            .collect()
    }
}

/// Audio device able to play a [ToneCue]
pub trait AudioOutput: Send + Sync {
    fn play(&self, cue: &ToneCue) -> anyhow::Result<()>;
}
