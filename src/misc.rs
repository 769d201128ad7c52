//! Small shared helpers.

use hashbrown::HashMap;

/// Samples per second of the output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRate(pub u32);

impl SampleRate {
    pub fn hz(&self) -> f32 {
        self.0 as f32
    }

    /// Convert a duration in seconds to a sample count.
    pub fn samples(&self, seconds: f32) -> u64 {
        (self.hz() * seconds) as u64
    }
}

impl From<u32> for SampleRate {
    fn from(hz: u32) -> Self {
        Self(hz)
    }
}

pub trait Similarity {
    fn similarity(&self, other: &Self) -> f64;
}

impl<T: AsRef<str>> Similarity for T {
    fn similarity(&self, other: &Self) -> f64 {
        similarity(self.as_ref(), other.as_ref())
    }
}

/// Bigram similarity between two strings, 0.0..=1.0.
/// Used for fuzzy audio device matching.
pub fn similarity(str1: &str, str2: &str) -> f64 {
    let a = str1.replace(' ', "");
    let b = str2.replace(' ', "");

    if a == b {
        return 1.0;
    }

    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let mut first_bigrams = HashMap::<&str, i32>::new();
    for i in 0..a.len() - 1 {
        let bigram = &a[i..i + 2];
        *first_bigrams.entry(bigram).or_insert(0) += 1;
    }

    let mut intersection_size = 0;
    for i in 0..b.len() - 1 {
        let bigram = &b[i..i + 2];
        if let Some(count) = first_bigrams.get_mut(bigram) {
            if *count > 0 {
                *count -= 1;
                intersection_size += 1;
            }
        }
    }

    (2.0 * intersection_size as f64) / (str1.len() + str2.len() - 2) as f64
}
