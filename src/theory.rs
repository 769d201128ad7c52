//! Fixed note and interval tables, pitch parsing and pitch math.
//!
//! Every game draws its prompts from these tables. Ordering and spelling
//! come from the tables themselves, sharps only (no flat spellings).

use std::fmt;

/// Chromatic run the interval game samples from, low to high.
pub const CHROMATIC: [&str; 13] = [
    "C4", "C#4", "D4", "D#4", "E4", "F4", "F#4", "G4", "G#4", "A4", "A#4", "B4", "C5",
];

/// C major scale backing the dictation keyboard and the sight reading staff.
pub const SCALE: [&str; 8] = ["C4", "D4", "E4", "F4", "G4", "A4", "B4", "C5"];

/// A named semitone distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub name: &'static str,
    pub semitones: i32,
}

/// The twelve intervals the game quizzes on.
pub const INTERVALS: [Interval; 12] = [
    Interval { name: "2da Menor", semitones: 1 },
    Interval { name: "2da Mayor", semitones: 2 },
    Interval { name: "3ra Menor", semitones: 3 },
    Interval { name: "3ra Mayor", semitones: 4 },
    Interval { name: "4ta Justa", semitones: 5 },
    Interval { name: "Tritono", semitones: 6 },
    Interval { name: "5ta Justa", semitones: 7 },
    Interval { name: "6ta Menor", semitones: 8 },
    Interval { name: "6ta Mayor", semitones: 9 },
    Interval { name: "7ma Menor", semitones: 10 },
    Interval { name: "7ma Mayor", semitones: 11 },
    Interval { name: "Octava", semitones: 12 },
];

const NAMES_IN_OCTAVE: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

const A4_HZ: f32 = 440.0;
const MIDI_A4: i32 = 69;

/// Solfege label for a letter name.
pub fn solfege(letter: char) -> Option<&'static str> {
    Some(match letter.to_ascii_uppercase() {
        'C' => "Do",
        'D' => "Re",
        'E' => "Mi",
        'F' => "Fa",
        'G' => "Sol",
        'A' => "La",
        'B' => "Si",
        _ => return None,
    })
}

/// A letter name plus optional sharp plus octave, like `C#4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pitch {
    letter: char,
    sharp: bool,
    octave: i32,
}

impl Pitch {
    /// Parse `C4` / `c#4` style names. Case insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let letter = chars.next()?.to_ascii_uppercase();
        if !('A'..='G').contains(&letter) {
            return None;
        }

        let rest = chars.as_str();
        let (sharp, octave) = match rest.strip_prefix('#') {
            Some(oct) => (true, oct),
            None => (false, rest),
        };

        Some(Self {
            letter,
            sharp,
            octave: octave.parse().ok()?,
        })
    }

    pub fn letter(&self) -> char {
        self.letter
    }

    pub fn octave(&self) -> i32 {
        self.octave
    }

    /// Solfege label of the letter name, ignoring the accidental.
    pub fn solfege(&self) -> &'static str {
        solfege(self.letter).unwrap_or("?")
    }

    fn semitone_in_octave(&self) -> i32 {
        let base = match self.letter {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            _ => 11,
        };
        base + self.sharp as i32
    }

    fn midi(&self) -> i32 {
        (self.octave + 1) * 12 + self.semitone_in_octave()
    }

    fn from_midi(midi: i32) -> Self {
        let name = NAMES_IN_OCTAVE[midi.rem_euclid(12) as usize];
        Self {
            letter: name.chars().next().unwrap_or('C'),
            sharp: name.ends_with('#'),
            octave: midi.div_euclid(12) - 1,
        }
    }

    /// Move up (or down) by a number of semitones, respelled from the
    /// fixed sharp table.
    pub fn transpose(&self, semitones: i32) -> Self {
        Self::from_midi(self.midi() + semitones)
    }

    /// Equal temperament frequency, A4 = 440 Hz.
    pub fn frequency(&self) -> f32 {
        A4_HZ * 2f32.powf((self.midi() - MIDI_A4) as f32 / 12.0)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.letter,
            if self.sharp { "#" } else { "" },
            self.octave
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_tables() {
        for name in CHROMATIC.iter().chain(SCALE.iter()) {
            let pitch = Pitch::parse(name).unwrap();
            assert_eq!(&pitch.to_string(), name);
        }
    }

    #[test]
    fn test_transpose() {
        let c4 = Pitch::parse("C4").unwrap();
        assert_eq!(c4.transpose(7), Pitch::parse("G4").unwrap());
        assert_eq!(c4.transpose(12), Pitch::parse("C5").unwrap());
        assert_eq!(c4.transpose(1), Pitch::parse("C#4").unwrap());
        assert_eq!(c4.transpose(-1), Pitch::parse("B3").unwrap());
    }

    #[test]
    fn test_frequency() {
        let a4 = Pitch::parse("A4").unwrap();
        assert!((a4.frequency() - 440.0).abs() < 0.01);

        let c4 = Pitch::parse("C4").unwrap();
        assert!((c4.frequency() - 261.63).abs() < 0.01);
    }

    #[test]
    fn test_solfege() {
        let labels = ["Do", "Re", "Mi", "Fa", "Sol", "La", "Si", "Do"];
        for (name, label) in SCALE.iter().zip(labels) {
            assert_eq!(Pitch::parse(name).unwrap().solfege(), label);
        }
        assert_eq!(solfege('x'), None);
    }

    #[test]
    fn test_interval_table() {
        for (i, interval) in INTERVALS.iter().enumerate() {
            assert_eq!(interval.semitones, i as i32 + 1);
        }
    }
}
