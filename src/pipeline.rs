//! The rendering unit.
//!
//! One pass: open cases, resolve vectors, build restart series, assemble plot
//! groups, draw them, then park until the supervisor terminates the unit.
//! Everything is recomputed from scratch on every (re)start so edited decks
//! are picked up; nothing survives across restarts.

use anyhow::Result;

use crate::assemble::assemble_groups;
use crate::model::{ColorCycle, PlotGroup, RunConfig};
use crate::render::{Renderer, TermRenderer};
use crate::resolve::resolve_vectors;
use crate::restart::build_restart_series;
use crate::source::CaseRegistry;

/// Resolve and assemble one pass worth of plot groups. The case registry lives
/// exactly as long as the pass.
pub fn assemble_pass(cfg: &RunConfig) -> Result<Vec<PlotGroup>> {
    let (registry, vector_tokens) = CaseRegistry::open(&cfg.tokens)?;
    let resolved = resolve_vectors(registry.reference(), &vector_tokens)?;
    let restart_series = build_restart_series(&registry, &resolved.restart);
    let mut cycle = ColorCycle::default();
    Ok(assemble_groups(
        &registry,
        &resolved,
        &restart_series,
        cfg,
        &mut cycle,
    ))
}

/// Unit body run inside the supervised task: assemble, draw, then park until
/// the supervisor aborts us. A terminal renderer has no windows the operator
/// could close, so self-exit only happens on failure.
pub async fn execute(cfg: RunConfig) -> Result<()> {
    let groups = assemble_pass(&cfg)?;
    let mut renderer = TermRenderer::new()?;
    renderer.render(&groups)?;
    futures::future::pending::<()>().await;
    Ok(())
}
