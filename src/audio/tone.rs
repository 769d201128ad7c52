//! Sine tone iterators.

use std::f32::consts::PI;

use crate::misc::SampleRate;

/// A bounded sine wave, one sample per `next` call.
#[derive(Clone, Copy, Debug)]
pub struct Tone {
    i: usize,
    freq: f32,
    sample_rate: f32,
    duration: usize,
}

/// A [`Tone`] with linear attack and release ramps so scheduled notes
/// start and stop without clicking.
#[derive(Clone, Copy, Debug)]
pub struct SmoothTone {
    inner: Tone,
    attack: usize,
    release: usize,
}

// Ramp lengths in seconds.
const ATTACK: f32 = 0.01;
const RELEASE: f32 = 0.05;

impl Tone {
    pub fn new(freq: f32, sample_rate: SampleRate, duration: f32) -> Self {
        Self {
            i: 0,
            freq,
            sample_rate: sample_rate.hz(),
            duration: (sample_rate.hz() * duration) as usize,
        }
    }
}

impl Iterator for Tone {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.i >= self.duration {
            return None;
        }

        self.i += 1;
        Some((self.i as f32 * self.freq * 2.0 * PI / self.sample_rate).sin())
    }
}

impl SmoothTone {
    pub fn new(freq: f32, sample_rate: SampleRate, duration: f32) -> Self {
        Self {
            inner: Tone::new(freq, sample_rate, duration),
            attack: (sample_rate.hz() * ATTACK) as usize,
            release: (sample_rate.hz() * RELEASE) as usize,
        }
    }
}

impl Iterator for SmoothTone {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let mut raw = self.inner.next()?;

        let i = self.inner.i;
        if i < self.attack {
            raw *= i as f32 / self.attack as f32;
        }

        let remaining = self.inner.duration - i;
        if remaining < self.release {
            raw *= remaining as f32 / self.release as f32;
        }

        Some(raw)
    }
}
