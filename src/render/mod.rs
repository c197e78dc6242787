//! Chart rendering.
//!
//! The pipeline talks to the [`Renderer`] trait only; [`TermRenderer`] is the
//! shipped implementation drawing ratatui charts to stdout. The supervisor owns
//! raw mode and the alternate screen, so the renderer only ever draws frames.

mod charts;

use std::io;

use anyhow::{Context, Result};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::model::PlotGroup;

/// Chart-drawing collaborator: consumes fully-assembled plot groups.
pub trait Renderer {
    fn render(&mut self, groups: &[PlotGroup]) -> Result<()>;
}

pub struct TermRenderer {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TermRenderer {
    pub fn new() -> Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend).context("create terminal")?;
        Ok(Self { terminal })
    }
}

impl Renderer for TermRenderer {
    fn render(&mut self, groups: &[PlotGroup]) -> Result<()> {
        self.terminal.clear().ok();
        self.terminal
            .draw(|f| charts::draw(f.area(), f, groups))
            .context("draw plot groups")?;
        Ok(())
    }
}
