//! Note scheduler feeding the output stream.
//!
//! Notes are scheduled at absolute sample timestamps against a running
//! sample clock. Callers snapshot the clock once with [`Player::now`] and
//! derive every note's start from that snapshot, so relative spacing
//! within a prompt never drifts no matter when the call itself runs.

use parking_lot::Mutex;

use super::tone::SmoothTone;
use crate::misc::SampleRate;
use crate::theory::Pitch;

/// How long each scheduled note sounds, in seconds.
pub const NOTE_LENGTH: f32 = 0.4;

pub struct Player {
    sample_rate: SampleRate,
    gain: f32,
    state: Mutex<State>,
}

struct State {
    clock: u64,
    notes: Vec<ScheduledNote>,
}

struct ScheduledNote {
    start: u64,
    tone: SmoothTone,
}

impl Player {
    pub fn new(sample_rate: SampleRate, gain: f32) -> Self {
        Self {
            sample_rate,
            gain,
            state: Mutex::new(State {
                clock: 0,
                notes: Vec::new(),
            }),
        }
    }

    /// Snapshot of the stream clock, in samples.
    pub fn now(&self) -> u64 {
        self.state.lock().clock
    }

    /// Schedule one note at an absolute sample timestamp.
    pub fn schedule(&self, pitch: Pitch, start: u64) {
        let tone = SmoothTone::new(pitch.frequency(), self.sample_rate, NOTE_LENGTH);
        self.state
            .lock()
            .notes
            .push(ScheduledNote { start, tone });
    }

    /// Schedule a melodic run starting at `start`, spaced `spacing`
    /// seconds apart. All timestamps derive from the one `start` value.
    pub fn schedule_all(&self, pitches: &[Pitch], start: u64, spacing: f32) {
        for (i, &pitch) in pitches.iter().enumerate() {
            self.schedule(pitch, start + i as u64 * self.sample_rate.samples(spacing));
        }
    }

    /// Play a note immediately. Key echo for the virtual keyboard.
    pub fn play_now(&self, pitch: Pitch) {
        self.schedule(pitch, self.now());
    }

    /// Fill an interleaved output buffer. Called from the audio callback.
    pub fn write(&self, output: &mut [f32], channels: usize) {
        let mut state = self.state.lock();
        let mut last = 0.0;

        for (i, e) in output.iter_mut().enumerate() {
            if i % channels == 0 {
                last = state.mix() * self.gain;
            }

            *e = last;
        }
    }
}

impl State {
    /// Advance the clock one sample and mix every active note.
    fn mix(&mut self) -> f32 {
        let clock = self.clock;
        self.clock += 1;

        let mut sum = 0.0;
        self.notes.retain_mut(|note| {
            if clock < note.start {
                return true;
            }

            match note.tone.next() {
                Some(sample) => {
                    sum += sample;
                    true
                }
                None => false,
            }
        });

        sum
    }
}
