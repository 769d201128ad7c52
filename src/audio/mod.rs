//! Audio output.
//! Tone synthesis, note scheduling and device selection.

pub mod devices;
pub mod player;
pub mod tone;
