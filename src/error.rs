use thiserror::Error;

/// Fatal input conditions. Everything softer (a pattern matching nothing, a case
/// missing its restart pair) is a warning and a skip, not an error.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("none of the arguments could be opened as a simulation case")]
    NoCases,

    #[error("no vectors to plot: no token matched the reference case or the restart grammar")]
    NoVectors,
}
