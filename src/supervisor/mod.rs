//! Render-pass supervision.
//!
//! This module owns the interactive lifecycle: it acquires the terminal,
//! spawns the rendering unit, and multiplexes single-key commands against the
//! unit's liveness. Restart is destructive cancellation followed by a fresh
//! unit running resolution from scratch.

mod controller;
mod unit;

pub use controller::run_supervisor;
pub(crate) use unit::RenderUnit;
