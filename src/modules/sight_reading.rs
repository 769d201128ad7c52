//! Sight reading game.
//! Engraves a random measure, the user names the notes in solfege.

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use parking_lot::Mutex;
use rand::seq::SliceRandom;

use super::{draw_frame, is_quit, poll_key, Console, InitContext, Module};
use crate::{
    quiz::{self, RoundState, Verdict},
    render::staff::{self, StaffNote},
};

/// Notes available to the generator, in the renderer's encoding.
const NOTES: [&str; 8] = ["c/4", "d/4", "e/4", "f/4", "g/4", "a/4", "b/4", "c/5"];

/// One 4/4 measure of quarters, so always four notes.
const MEASURE_LENGTH: usize = 4;
const STAFF_WIDTH: usize = 48;
const TICK: Duration = Duration::from_millis(120);

/// A wrong answer keeps the same measure, the user edits the text and
/// checks again. The dictation game differs here.
const RETRY_SAME_PROMPT: bool = true;

pub struct SightReading {
    state: Mutex<GameState>,
}

#[derive(Default)]
struct GameState {
    round: RoundState,
    measure: Vec<StaffNote>,
    text: String,
    feedback: Option<(bool, String)>,
}

impl SightReading {
    pub fn new(_ctx: InitContext) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(GameState::default()),
        })
    }

    fn random_measure() -> Vec<StaffNote> {
        let mut rng = rand::thread_rng();
        (0..MEASURE_LENGTH)
            .map(|_| {
                let note = NOTES.choose(&mut rng).expect("fixed table");
                StaffNote::parse(&format!("{note}:q")).expect("fixed table")
            })
            .collect()
    }

    fn handle_key(&self, key: KeyEvent) {
        let mut state = self.state.lock();

        match key.code {
            KeyCode::Enter => state.submit(),
            KeyCode::Backspace => {
                state.reset_feedback();
                state.text.pop();
            }
            KeyCode::Char('n') if key.modifiers.contains(crossterm::event::KeyModifiers::CONTROL) => {
                state.begin_round(Self::random_measure());
            }
            KeyCode::Char(c) if !c.is_control() => {
                state.reset_feedback();
                state.text.push(c);
            }
            _ => {}
        }
    }

    fn frame(&self) -> Vec<String> {
        let state = self.state.lock();
        let mut lines = vec![
            "Lectura a Primera Vista".into(),
            "Identifica las notas que aparecen en la partitura.".into(),
            String::new(),
        ];

        lines.extend(staff::engrave(&state.measure, STAFF_WIDTH));
        lines.push(String::new());
        lines.push("Escribe las notas (ej: Do Re Mi):".into());
        lines.push(format!("> {}_", state.text));
        lines.push(String::new());

        match &state.feedback {
            Some((true, msg)) => lines.push(format!("✔ {msg}")),
            Some((false, msg)) => lines.push(format!("✘ {msg}")),
            None => {}
        }

        lines.push(String::new());
        lines.push("[Enter] comprobar  [Ctrl+N] nueva partitura  [Esc] salir".into());
        lines
    }
}

impl GameState {
    fn begin_round(&mut self, measure: Vec<StaffNote>) {
        self.measure = measure;
        self.round = RoundState::AwaitingInput;
        self.text.clear();
        self.feedback = None;
    }

    /// Editing after an answer implicitly resets the round, keeping the
    /// same measure.
    fn reset_feedback(&mut self) {
        if self.round.answered() && RETRY_SAME_PROMPT {
            self.feedback = None;
            self.round = RoundState::AwaitingInput;
        }
    }

    /// Canonical solfege rendering of the measure.
    fn solfege(&self) -> Vec<&'static str> {
        self.measure.iter().map(|x| x.pitch.solfege()).collect()
    }

    /// Parse the text field and compare. Permissive parsing means this
    /// never fails, a garbled answer is just incorrect.
    fn submit(&mut self) {
        if self.round != RoundState::AwaitingInput {
            return;
        }

        let expected = self.solfege();
        let answer = quiz::parse_answer(&self.text);
        match quiz::compare(&expected, &answer) {
            Verdict::Correct => {
                self.round = RoundState::AnsweredCorrect;
                self.feedback = Some((true, "¡Correcto! Muy bien hecho.".into()));
            }
            Verdict::Incorrect { .. } => {
                self.round = RoundState::AnsweredIncorrect;
                self.feedback = Some((
                    false,
                    format!("Incorrecto. La respuesta era: {}", expected.join(" ")),
                ));
            }
        }
    }
}

impl Module for SightReading {
    fn name(&self) -> &'static str {
        "sight-reading"
    }

    fn run(&self) -> Result<()> {
        let _console = Console::begin()?;

        // The first measure appears without a start gesture, there is no
        // audio to unlock here.
        self.state.lock().begin_round(Self::random_measure());

        loop {
            draw_frame(&self.frame())?;

            let Some(key) = poll_key(TICK)? else { continue };
            if is_quit(&key) {
                return Ok(());
            }

            self.handle_key(key);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn measure(encoded: &[&str]) -> Vec<StaffNote> {
        encoded.iter().map(|x| StaffNote::parse(x).unwrap()).collect()
    }

    #[test]
    fn test_correct_free_text_round() {
        let mut state = GameState::default();
        state.begin_round(measure(&["c/4:q", "e/4:q", "g/4:q", "c/5:q"]));

        state.text = "do, mi sol do".into();
        state.submit();
        assert_eq!(state.round, RoundState::AnsweredCorrect);
    }

    #[test]
    fn test_incorrect_reports_answer() {
        let mut state = GameState::default();
        state.begin_round(measure(&["c/4:q", "e/4:q", "g/4:q", "c/5:q"]));

        state.text = "do re sol do".into();
        state.submit();
        assert_eq!(state.round, RoundState::AnsweredIncorrect);
        let (_, msg) = state.feedback.as_ref().unwrap();
        assert!(msg.contains("Do Mi Sol Do"));
    }

    #[test]
    fn test_retry_same_measure() {
        let mut state = GameState::default();
        state.begin_round(measure(&["c/4", "d/4", "e/4", "f/4"]));

        state.text = "do".into();
        state.submit();
        assert!(state.round.answered());

        // Editing resets the round against the same measure.
        state.reset_feedback();
        state.text = "do re mi fa".into();
        state.submit();
        assert_eq!(state.round, RoundState::AnsweredCorrect);
        assert_eq!(state.measure.len(), 4);
    }

    #[test]
    fn test_random_measure_in_domain() {
        for _ in 0..50 {
            let measure = SightReading::random_measure();
            assert_eq!(measure.len(), MEASURE_LENGTH);
            for note in measure {
                let name = format!(
                    "{}/{}",
                    note.pitch.letter().to_ascii_lowercase(),
                    note.pitch.octave()
                );
                assert!(NOTES.contains(&name.as_str()));
            }
        }
    }

    #[test]
    fn test_double_submit_ignored() {
        let mut state = GameState::default();
        state.begin_round(measure(&["c/4", "d/4", "e/4", "f/4"]));

        state.text = "do re mi fa".into();
        state.submit();
        let feedback = state.feedback.clone();
        state.submit();
        assert_eq!(state.feedback, feedback);
    }
}
