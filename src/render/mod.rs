//! Notation rendering.

pub mod staff;
