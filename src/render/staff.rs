//! Text grid staff engraving.
//!
//! Takes notes encoded as `letter/octave:duration` (duration optional,
//! defaults to quarter) and lays out one treble clef 4/4 measure,
//! justified to a column width. Every call rebuilds the grid from
//! scratch, nothing accumulates between renders.

use crate::theory::Pitch;

/// Note duration. Only quarters exist so far, one beat each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteValue {
    #[default]
    Quarter,
}

impl NoteValue {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "q" => Some(Self::Quarter),
            _ => None,
        }
    }
}

/// One note of a measure, parsed from the `c/4:q` encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaffNote {
    pub pitch: Pitch,
    pub value: NoteValue,
}

impl StaffNote {
    /// Parse `c/4:q` or `c/4` (quarter assumed).
    pub fn parse(s: &str) -> Option<Self> {
        let (key, value) = match s.split_once(':') {
            Some((key, value)) => (key, NoteValue::parse(value)?),
            None => (s, NoteValue::default()),
        };

        let (letter, octave) = key.split_once('/')?;
        Some(Self {
            pitch: Pitch::parse(&format!("{letter}{octave}"))?,
            value,
        })
    }
}

// Rows of the grid, top to bottom. Row 0 is the top staff line (F5),
// every diatonic step down is one row. C4 sits on a ledger row below.
const TOP_DIATONIC: i32 = 5 * 7 + 3; // F5
const ROWS: usize = 11;
const MARGIN: usize = 8; // clef and time signature columns

fn row(pitch: Pitch) -> Option<usize> {
    let letter_index = (pitch.letter() as u8 - b'A' + 5) % 7; // C=0 .. B=6
    let diatonic = pitch.octave() * 7 + letter_index as i32;
    let row = TOP_DIATONIC - diatonic;
    (0..ROWS as i32).contains(&row).then_some(row as usize)
}

fn is_line(row: usize) -> bool {
    row % 2 == 0 && row <= 8
}

/// Engrave a measure into `width` wide text rows.
/// Deterministic: the same notes always produce the same grid.
pub fn engrave(notes: &[StaffNote], width: usize) -> Vec<String> {
    let width = width.max(MARGIN + 2 * (notes.len() + 1));
    let mut grid = vec![vec![' '; width]; ROWS];

    // Staff lines, stopping short of the margin decorations.
    for (r, grid_row) in grid.iter_mut().enumerate() {
        if is_line(r) {
            for cell in grid_row[2..].iter_mut() {
                *cell = '-';
            }
        }
    }

    // Clef on the G line, stacked 4/4 around the middle line.
    grid[6][0] = '𝄞';
    grid[2][4] = '4';
    grid[6][4] = '4';

    // Justify the noteheads over the remaining width.
    let span = width - MARGIN;
    for (i, note) in notes.iter().enumerate() {
        let x = MARGIN + span * (i + 1) / (notes.len() + 1);
        let Some(r) = row(note.pitch) else { continue };

        // Ledger line through middle C.
        if !is_line(r) && r == ROWS - 1 {
            grid[r][x - 1] = '-';
            grid[r][x + 1] = '-';
        }

        grid[r][x] = '●';
    }

    grid.into_iter().map(String::from_iter).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn notes(encoded: &[&str]) -> Vec<StaffNote> {
        encoded.iter().map(|x| StaffNote::parse(x).unwrap()).collect()
    }

    #[test]
    fn test_parse_default_duration() {
        let with = StaffNote::parse("c/4:q").unwrap();
        let without = StaffNote::parse("c/4").unwrap();
        assert_eq!(with, without);
        assert_eq!(with.value, NoteValue::Quarter);
        assert_eq!(with.pitch, Pitch::parse("C4").unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(StaffNote::parse("c4"), None);
        assert_eq!(StaffNote::parse("c/4:x"), None);
        assert_eq!(StaffNote::parse("h/4"), None);
    }

    #[test]
    fn test_row_positions() {
        // Bottom staff line is E4, top line F5, middle C on the ledger row.
        assert_eq!(row(Pitch::parse("F5").unwrap()), Some(0));
        assert_eq!(row(Pitch::parse("E4").unwrap()), Some(8));
        assert_eq!(row(Pitch::parse("C4").unwrap()), Some(10));
        assert_eq!(row(Pitch::parse("C6").unwrap()), None);
    }

    #[test]
    fn test_engrave_counts_noteheads() {
        let grid = engrave(&notes(&["c/4:q", "e/4:q", "g/4:q", "c/5:q"]), 40);
        assert_eq!(grid.len(), ROWS);
        let heads = grid
            .iter()
            .flat_map(|row| row.chars())
            .filter(|c| *c == '●')
            .count();
        assert_eq!(heads, 4);
    }

    #[test]
    fn test_engrave_deterministic() {
        let measure = notes(&["d/4", "f/4", "a/4", "b/4"]);
        assert_eq!(engrave(&measure, 40), engrave(&measure, 40));
    }

    #[test]
    fn test_middle_c_gets_ledger_line() {
        let grid = engrave(&notes(&["c/4"]), 40);
        let bottom = &grid[ROWS - 1];
        assert!(bottom.contains("-●-"));
    }
}
