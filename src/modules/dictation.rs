//! Melodic dictation game.
//! Plays a short melody, the user replays it on a virtual keyboard.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{ensure, Result};
use crossterm::event::{KeyCode, KeyEvent};
use parking_lot::Mutex;
use rand::seq::SliceRandom;

use super::{draw_frame, is_quit, poll_key, Console, InitContext, Module};
use crate::{
    audio::player::Player,
    quiz::{self, AnswerPad, RoundState, Verdict},
    theory::{Pitch, SCALE},
};

/// Seconds between melody notes.
const SPACING: f32 = 0.5;
/// Delay before a fresh melody is played, covers the frame transition.
const PLAY_DELAY: Duration = Duration::from_millis(500);
const TICK: Duration = Duration::from_millis(50);

/// An answered round only advances by generating a new melody, the same
/// prompt is never retried. The sight reading game differs here.
const RETRY_SAME_PROMPT: bool = false;

pub struct Dictation {
    ctx: InitContext,
    player: Player,
    length: usize,
    state: Mutex<GameState>,
}

#[derive(Default)]
struct GameState {
    round: RoundState,
    melody: Vec<Pitch>,
    pad: AnswerPad,
    verdict: Option<Verdict>,
    play_at: Option<Instant>,
}

impl Dictation {
    pub fn new(ctx: InitContext) -> Result<Arc<Self>> {
        let length = *ctx.args.get_one::<usize>("length").unwrap_or(&4);
        ensure!(length >= 1, "Melody length must be at least 1");
        ensure!(length <= 16, "Melody length must be at most 16");

        let player = Player::new(ctx.sample_rate(), ctx.gain);
        Ok(Arc::new(Self {
            ctx,
            player,
            length,
            state: Mutex::new(GameState::default()),
        }))
    }

    fn tick(&self) {
        let mut state = self.state.lock();
        if state.play_at.is_some_and(|at| at <= Instant::now()) {
            state.play_at = None;
            self.play(&state);
        }
    }

    fn new_round(&self, state: &mut GameState) {
        state.begin_round(random_melody(self.length));
        state.play_at = Some(Instant::now() + PLAY_DELAY);
    }

    fn play(&self, state: &GameState) {
        let now = self.player.now();
        self.player.schedule_all(&state.melody, now, SPACING);
    }

    fn handle_key(&self, key: KeyEvent) {
        let mut state = self.state.lock();

        if state.round == RoundState::NotStarted {
            if key.code == KeyCode::Enter {
                self.new_round(&mut state);
            }
            return;
        }

        match key.code {
            KeyCode::Char(c @ '1'..='8') => {
                let pitch = Pitch::parse(SCALE[c as usize - '1' as usize]).expect("fixed table");
                if state.note_input(pitch) {
                    self.player.play_now(pitch);
                }
            }
            KeyCode::Char('r') => self.play(&state),
            KeyCode::Char('x') | KeyCode::Backspace => state.clear(),
            KeyCode::Enter => {
                if state.round.answered() {
                    if !RETRY_SAME_PROMPT {
                        self.new_round(&mut state);
                    }
                } else {
                    state.check();
                }
            }
            _ => {}
        }
    }

    fn frame(&self) -> Vec<String> {
        let state = self.state.lock();
        let mut lines = vec![
            "Dictado Musical".into(),
            "Escucha la melodía y repítela.".into(),
            String::new(),
        ];

        if state.round == RoundState::NotStarted {
            lines.push("Pulsa [Enter] para comenzar el dictado.".into());
            lines.push("[Esc] salir".into());
            return lines;
        }

        // Answer slots, the mismatching one marked after a wrong answer.
        let mismatch = match state.verdict {
            Some(Verdict::Incorrect { mismatch }) => Some(mismatch),
            _ => None,
        };
        let slots = (0..self.length)
            .map(|i| {
                let name = state.pad.get(i).unwrap_or(" ");
                match mismatch {
                    Some(m) if m == i => format!("[{name:^4}]!"),
                    _ => format!("[{name:^4}]"),
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(slots);
        lines.push(String::new());

        let keyboard = SCALE
            .iter()
            .enumerate()
            .map(|(i, note)| format!("{}:{}", i + 1, note))
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(keyboard);
        lines.push(String::new());

        match state.verdict {
            Some(Verdict::Correct) => {
                lines.push("✔ ¡Correcto! Has reproducido la melodía.".into());
                lines.push("[Enter] siguiente melodía".into());
            }
            Some(Verdict::Incorrect { .. }) => {
                lines.push(format!("✘ Incorrecto. Era: {}", state.solfege().join(" ")));
                lines.push("[Enter] siguiente melodía".into());
            }
            None => lines.push("[Enter] comprobar cuando esté completa".into()),
        }

        lines.push(String::new());
        lines.push("[r] repetir melodía  [x] borrar  [Esc] salir".into());
        lines
    }
}

/// Uniform independent sampling from the scale, repeats allowed.
fn random_melody(length: usize) -> Vec<Pitch> {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            SCALE
                .choose(&mut rng)
                .and_then(|x| Pitch::parse(x))
                .expect("fixed table")
        })
        .collect()
}

impl GameState {
    fn begin_round(&mut self, melody: Vec<Pitch>) {
        self.pad = AnswerPad::new(melody.len());
        self.melody = melody;
        self.round = RoundState::AwaitingInput;
        self.verdict = None;
    }

    /// Append a selected note. No-op once the pad is full or the round
    /// is answered. Returns whether the note was accepted.
    fn note_input(&mut self, pitch: Pitch) -> bool {
        if self.round != RoundState::AwaitingInput {
            return false;
        }

        self.pad.push(pitch.to_string())
    }

    /// Wipe the answer without touching the melody. Disabled once the
    /// round is answered.
    fn clear(&mut self) {
        if !self.round.answered() {
            self.pad.clear();
        }
    }

    /// Compare, only ever with a complete answer.
    fn check(&mut self) {
        if self.round != RoundState::AwaitingInput || !self.pad.is_full() {
            return;
        }

        let expected = self.melody.iter().map(Pitch::to_string).collect::<Vec<_>>();
        let verdict = quiz::compare(&expected, self.pad.tokens());
        self.round = if verdict.is_correct() {
            RoundState::AnsweredCorrect
        } else {
            RoundState::AnsweredIncorrect
        };
        self.verdict = Some(verdict);
    }

    /// Canonical display form of the melody.
    fn solfege(&self) -> Vec<&'static str> {
        self.melody.iter().map(Pitch::solfege).collect()
    }
}

impl Module for Dictation {
    fn name(&self) -> &'static str {
        "dictation"
    }

    fn output(&self, output: &mut [f32]) {
        self.player.write(output, self.ctx.channels());
    }

    fn run(&self) -> Result<()> {
        let _console = Console::begin()?;

        loop {
            self.tick();
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

    fn melody(notes: &[&str]) -> Vec<Pitch> {
        notes.iter().map(|x| Pitch::parse(x).unwrap()).collect()
    }

    #[test]
    fn test_full_correct_round() {
        let mut state = GameState::default();
        state.begin_round(melody(&["C4", "E4", "G4", "C5"]));

        for note in ["C4", "E4", "G4", "C5"] {
            assert!(state.note_input(Pitch::parse(note).unwrap()));
        }
        state.check();
        assert_eq!(state.verdict, Some(Verdict::Correct));
        assert_eq!(state.round, RoundState::AnsweredCorrect);
    }

    #[test]
    fn test_incorrect_marks_position() {
        let mut state = GameState::default();
        state.begin_round(melody(&["C4", "E4", "G4", "C5"]));

        for note in ["C4", "D4", "G4", "C5"] {
            state.note_input(Pitch::parse(note).unwrap());
        }
        state.check();
        assert_eq!(state.verdict, Some(Verdict::Incorrect { mismatch: 1 }));
        assert_eq!(state.solfege(), ["Do", "Mi", "Sol", "Do"]);
    }

    #[test]
    fn test_input_capped_and_gated() {
        let mut state = GameState::default();
        state.begin_round(melody(&["C4", "E4"]));
        let c4 = Pitch::parse("C4").unwrap();

        // Arbitrary rapid repeated input never overflows the pad.
        for _ in 0..100 {
            state.note_input(c4);
        }
        assert_eq!(state.pad.len(), 2);

        state.check();
        assert_eq!(state.round, RoundState::AnsweredIncorrect);

        // No input and no clear once answered.
        assert!(!state.note_input(c4));
        state.clear();
        assert_eq!(state.pad.len(), 2);
    }

    #[test]
    fn test_incomplete_answer_not_compared() {
        let mut state = GameState::default();
        state.begin_round(melody(&["C4", "E4", "G4", "C5"]));

        state.note_input(Pitch::parse("C4").unwrap());
        state.check();
        assert_eq!(state.verdict, None);
        assert_eq!(state.round, RoundState::AwaitingInput);
    }

    #[test]
    fn test_random_melody_in_domain() {
        for length in [1, 4, 8] {
            let melody = random_melody(length);
            assert_eq!(melody.len(), length);
            for note in melody {
                assert!(SCALE.contains(&note.to_string().as_str()));
            }
        }
    }

    #[test]
    fn test_clear_keeps_prompt() {
        let mut state = GameState::default();
        state.begin_round(melody(&["C4", "E4"]));

        state.note_input(Pitch::parse("C4").unwrap());
        state.clear();
        assert!(state.pad.is_empty());
        assert_eq!(state.melody.len(), 2);
        assert_eq!(state.round, RoundState::AwaitingInput);
    }
}
