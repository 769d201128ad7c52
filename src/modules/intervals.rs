//! Interval recognition game.
//! Plays two notes melodically, the user names the distance.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use parking_lot::Mutex;
use rand::seq::SliceRandom;

use super::{draw_frame, is_quit, poll_key, Console, InitContext, Module};
use crate::{
    audio::player::Player,
    quiz::{RoundState, Score},
    theory::{Interval, Pitch, CHROMATIC, INTERVALS},
};

/// Seconds between the root and the transposed note.
const SPACING: f32 = 0.5;
/// Delay before a fresh prompt is played, covers the frame transition.
const PLAY_DELAY: Duration = Duration::from_millis(500);
/// Pause on a correct answer before the next round starts by itself.
const AUTO_ADVANCE: Duration = Duration::from_millis(1500);
const TICK: Duration = Duration::from_millis(50);

pub struct Intervals {
    ctx: InitContext,
    player: Player,
    state: Mutex<GameState>,
}

#[derive(Default)]
struct GameState {
    round: RoundState,
    prompt: Option<Prompt>,
    score: Score,
    feedback: Option<(bool, String)>,
    selection: String,
    play_at: Option<Instant>,
    advance_at: Option<Instant>,
}

struct Prompt {
    root: Pitch,
    interval: Interval,
}

impl Prompt {
    /// Uniform root and interval. The top five chromatic entries are
    /// excluded as roots so the transposed note stays in range.
    fn random() -> Self {
        let mut rng = rand::thread_rng();
        let root = CHROMATIC[..CHROMATIC.len() - 5]
            .choose(&mut rng)
            .and_then(|x| Pitch::parse(x))
            .expect("fixed table");

        Self {
            root,
            interval: *INTERVALS.choose(&mut rng).expect("fixed table"),
        }
    }

    fn notes(&self) -> [Pitch; 2] {
        [self.root, self.root.transpose(self.interval.semitones)]
    }
}

impl Intervals {
    pub fn new(ctx: InitContext) -> Arc<Self> {
        let player = Player::new(ctx.sample_rate(), ctx.gain);
        Arc::new(Self {
            ctx,
            player,
            state: Mutex::new(GameState::default()),
        })
    }

    /// Fire any due timers. Deadlines live in the game state, so they
    /// cannot outlast the view.
    fn tick(&self) {
        let mut state = self.state.lock();
        let now = Instant::now();

        if state.play_at.is_some_and(|at| at <= now) {
            state.play_at = None;
            self.play(&state);
        }

        if state.advance_at.is_some_and(|at| at <= now) {
            state.advance_at = None;
            self.new_round(&mut state);
        }
    }

    fn new_round(&self, state: &mut GameState) {
        state.begin_round(Prompt::random());
        state.play_at = Some(Instant::now() + PLAY_DELAY);
    }

    fn play(&self, state: &GameState) {
        if let Some(prompt) = &state.prompt {
            let now = self.player.now();
            self.player.schedule_all(&prompt.notes(), now, SPACING);
        }
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
            KeyCode::Char(c @ '0'..='9') if state.round == RoundState::AwaitingInput => {
                if state.selection.len() < 2 {
                    state.selection.push(c);
                }
            }
            KeyCode::Backspace => {
                state.selection.pop();
            }
            KeyCode::Char('r') => self.play(&state),
            KeyCode::Enter => match state.round {
                RoundState::AwaitingInput => {
                    if let Some(selected) = state.take_selection() {
                        if state.answer(&selected) {
                            state.advance_at = Some(Instant::now() + AUTO_ADVANCE);
                        }
                    }
                }
                RoundState::AnsweredIncorrect => self.new_round(&mut state),
                _ => {}
            },
            _ => {}
        }
    }

    fn frame(&self) -> Vec<String> {
        let state = self.state.lock();
        let mut lines = vec![
            "Identificador de Intervalos".into(),
            "Escucha y selecciona el intervalo correcto.".into(),
            String::new(),
        ];

        if state.round == RoundState::NotStarted {
            lines.push("Pulsa [Enter] para comenzar el entrenamiento.".into());
            lines.push("[Esc] salir".into());
            return lines;
        }

        lines.push(format!(
            "Puntuación: {} / {}",
            state.score.correct, state.score.total
        ));
        lines.push(String::new());

        for (i, interval) in INTERVALS.iter().enumerate() {
            lines.push(format!("  {:>2}) {}", i + 1, interval.name));
        }

        lines.push(String::new());
        lines.push(format!("Intervalo: {}_", state.selection));
        lines.push(String::new());

        match &state.feedback {
            Some((true, msg)) => lines.push(format!("✔ {msg}")),
            Some((false, msg)) => {
                lines.push(format!("✘ {msg}"));
                lines.push("[Enter] siguiente".into());
            }
            None => lines.push("Escribe el número y pulsa [Enter].".into()),
        }

        lines.push(String::new());
        lines.push("[r] repetir intervalo  [Esc] salir".into());
        lines
    }
}

impl GameState {
    /// Install a fresh prompt, wiping the answer and feedback with it.
    fn begin_round(&mut self, prompt: Prompt) {
        self.prompt = Some(prompt);
        self.round = RoundState::AwaitingInput;
        self.feedback = None;
        self.selection.clear();
        self.advance_at = None;
    }

    /// The 1-based menu number currently typed, if valid.
    fn take_selection(&mut self) -> Option<Interval> {
        let text = std::mem::take(&mut self.selection);
        let n = text.parse::<usize>().ok()?;
        (1..=INTERVALS.len()).contains(&n).then(|| INTERVALS[n - 1])
    }

    /// Compare a selected label against the prompt. Runs once per round,
    /// immediately on selection. Returns whether it was correct.
    fn answer(&mut self, selected: &Interval) -> bool {
        let Some(prompt) = &self.prompt else {
            return false;
        };
        if self.round != RoundState::AwaitingInput {
            return false;
        }

        let correct = selected.name == prompt.interval.name;
        self.score.record(correct);
        self.round = if correct {
            RoundState::AnsweredCorrect
        } else {
            RoundState::AnsweredIncorrect
        };
        self.feedback = Some(if correct {
            (true, "¡Correcto!".into())
        } else {
            (false, format!("Incorrecto, era {}", prompt.interval.name))
        });

        correct
    }
}

impl Module for Intervals {
    fn name(&self) -> &'static str {
        "intervals"
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
