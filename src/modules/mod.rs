//! The game modules and the console plumbing they share.

use std::{
    io::{stdout, Write},
    panic, process,
    time::Duration,
};

use anyhow::Result;
use clap::ArgMatches;
use cpal::SupportedStreamConfig;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue, style, terminal,
};

use crate::misc::SampleRate;

pub mod dictation;
pub mod intervals;
pub mod sight_reading;

pub trait Module {
    fn name(&self) -> &'static str;

    /// Fill an interleaved sample buffer. Called from the audio callback.
    /// Games without sound leave the default, which outputs silence.
    fn output(&self, output: &mut [f32]) {
        output.fill(0.0);
    }

    /// The blocking key-event loop. Runs on the main thread until the
    /// user quits; every pending timer dies when this returns.
    fn run(&self) -> Result<()>;
}

pub struct InitContext {
    pub args: ArgMatches,
    pub output: SupportedStreamConfig,
    pub gain: f32,
}

impl InitContext {
    pub fn sample_rate(&self) -> SampleRate {
        SampleRate(self.output.sample_rate().0)
    }

    pub fn channels(&self) -> usize {
        self.output.channels() as usize
    }
}

/// Raw mode session guard. Restores the terminal on drop and from the
/// panic hook, so a crash never leaves the console unusable.
pub struct Console;

impl Console {
    pub fn begin() -> Result<Self> {
        panic::set_hook(Box::new(|info| {
            restore();
            eprintln!("{info}");
            process::exit(1)
        }));

        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            terminal::DisableLineWrap,
            cursor::Hide
        )?;

        Ok(Self)
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        restore();
        let _ = panic::take_hook();
    }
}

fn restore() {
    let _ = terminal::disable_raw_mode();
    let _ = execute!(
        stdout(),
        terminal::EnableLineWrap,
        terminal::LeaveAlternateScreen,
        cursor::Show
    );
}

/// Repaint the whole frame from the top left.
pub fn draw_frame(lines: &[String]) -> Result<()> {
    let mut stdout = stdout();
    queue!(stdout, terminal::Clear(terminal::ClearType::All))?;

    for (i, line) in lines.iter().enumerate() {
        queue!(stdout, cursor::MoveTo(0, i as u16), style::Print(line))?;
    }

    stdout.flush()?;
    Ok(())
}

/// Wait up to `timeout` for a key press. Release events are dropped.
pub fn poll_key(timeout: Duration) -> Result<Option<KeyEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    match event::read()? {
        Event::Key(key) if key.kind != KeyEventKind::Release => Ok(Some(key)),
        _ => Ok(None),
    }
}

/// Keys that quit a game from anywhere: Esc or Ctrl+C.
pub fn is_quit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
