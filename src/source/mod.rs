//! Simulation case access.
//!
//! The pipeline only ever sees the capability traits below; the shipped
//! implementation reads JSON case decks (`json`), and binary simulator formats
//! would plug in at the same seam. A case's vocabulary is fixed once opened and
//! is never refreshed mid-run.

mod json;

pub use json::JsonCase;

use std::path::Path;

use tracing::debug;
use wildmatch::WildMatch;

use crate::error::PlotError;

/// Read access to a case's plain summary vectors.
pub trait SummaryAccess: Send + Sync {
    /// Vocabulary keys matching a `*`/`?` wildcard pattern, sorted.
    fn keys(&self, pattern: &str) -> Vec<String>;
    fn has_key(&self, key: &str) -> bool;
    /// Simulation days per sample for `key`.
    fn timestamps(&self, key: &str) -> Option<&[f64]>;
    fn values(&self, key: &str) -> Option<&[f64]>;
}

/// Read access to a case's grid geometry.
pub trait GridAccess: Send + Sync {
    /// Flat active-cell index for 1-based `(i, j, k)`; `None` when the
    /// coordinate is out of range or the cell is inactive. Active-cell
    /// numbering differs between cases, so this is always resolved per case.
    fn active_index(&self, i: u32, j: u32, k: u32) -> Option<usize>;
}

/// Read access to a case's restart snapshots.
pub trait RestartAccess: Send + Sync {
    /// Number of report steps that carry `key`.
    fn step_count(&self, key: &str) -> usize;
    /// Simulation days of one report step.
    fn days(&self, step: usize) -> Option<f64>;
    fn cell_value(&self, key: &str, step: usize, active: usize) -> Option<f64>;
}

/// Wildcard expansion shared by `SummaryAccess` implementations.
pub(crate) fn match_keys<'a>(
    keys: impl IntoIterator<Item = &'a String>,
    pattern: &str,
) -> Vec<String> {
    let matcher = WildMatch::new(pattern);
    keys.into_iter()
        .filter(|key| matcher.matches(key))
        .cloned()
        .collect()
}

/// One opened simulation case: summary vectors plus, when the deck provides
/// them, grid and restart snapshot access.
pub struct SummaryCase {
    label: String,
    summary: Box<dyn SummaryAccess>,
    grid: Option<Box<dyn GridAccess>>,
    restart: Option<Box<dyn RestartAccess>>,
}

impl SummaryCase {
    pub fn new(
        label: String,
        summary: Box<dyn SummaryAccess>,
        grid: Option<Box<dyn GridAccess>>,
        restart: Option<Box<dyn RestartAccess>>,
    ) -> Self {
        Self {
            label,
            summary,
            grid,
            restart,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn summary(&self) -> &dyn SummaryAccess {
        self.summary.as_ref()
    }

    pub fn grid(&self) -> Option<&dyn GridAccess> {
        self.grid.as_deref()
    }

    pub fn restart(&self) -> Option<&dyn RestartAccess> {
        self.restart.as_deref()
    }
}

/// The set of cases named on the command line, in invocation order. The first
/// case is the reference case for vector resolution.
pub struct CaseRegistry {
    cases: Vec<SummaryCase>,
}

impl std::fmt::Debug for CaseRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaseRegistry")
            .field(
                "cases",
                &self.cases.iter().map(SummaryCase::label).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl CaseRegistry {
    /// Classify tokens: anything that opens as a case deck is a case argument,
    /// everything else is returned as a vector token. Zero openable cases is
    /// fatal.
    pub fn open(tokens: &[String]) -> Result<(Self, Vec<String>), PlotError> {
        let mut cases = Vec::new();
        let mut vectors = Vec::new();
        for token in tokens {
            match JsonCase::open(Path::new(token)) {
                Ok(case) => {
                    debug!(case = case.label(), path = %token, "opened case");
                    cases.push(case);
                }
                Err(err) => {
                    debug!(token = %token, error = %err, "not an openable case, treating as vector token");
                    vectors.push(token.clone());
                }
            }
        }
        Ok((Self::from_cases(cases)?, vectors))
    }

    /// Build a registry from already-opened cases. Fatal when empty.
    pub fn from_cases(cases: Vec<SummaryCase>) -> Result<Self, PlotError> {
        if cases.is_empty() {
            return Err(PlotError::NoCases);
        }
        Ok(Self { cases })
    }

    pub fn reference(&self) -> &SummaryCase {
        &self.cases[0]
    }

    pub fn cases(&self) -> &[SummaryCase] {
        &self.cases
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory capability implementations for component tests.

    use std::collections::BTreeMap;

    use super::{GridAccess, RestartAccess, SummaryAccess, SummaryCase};

    #[derive(Default)]
    pub struct FakeSummary {
        vectors: BTreeMap<String, (Vec<f64>, Vec<f64>)>,
    }

    impl FakeSummary {
        pub fn with(mut self, key: &str, times: &[f64], values: &[f64]) -> Self {
            self.vectors
                .insert(key.to_string(), (times.to_vec(), values.to_vec()));
            self
        }
    }

    impl SummaryAccess for FakeSummary {
        fn keys(&self, pattern: &str) -> Vec<String> {
            super::match_keys(self.vectors.keys(), pattern)
        }

        fn has_key(&self, key: &str) -> bool {
            self.vectors.contains_key(key)
        }

        fn timestamps(&self, key: &str) -> Option<&[f64]> {
            self.vectors.get(key).map(|(t, _)| t.as_slice())
        }

        fn values(&self, key: &str) -> Option<&[f64]> {
            self.vectors.get(key).map(|(_, v)| v.as_slice())
        }
    }

    /// Grid where every coordinate inside `dims` is active, numbered in
    /// i-fastest order.
    pub struct FakeGrid {
        pub dims: (u32, u32, u32),
    }

    impl GridAccess for FakeGrid {
        fn active_index(&self, i: u32, j: u32, k: u32) -> Option<usize> {
            let (ni, nj, nk) = self.dims;
            if i == 0 || j == 0 || k == 0 || i > ni || j > nj || k > nk {
                return None;
            }
            let (i, j, k) = (i - 1, j - 1, k - 1);
            Some((i + j * ni + k * ni * nj) as usize)
        }
    }

    pub struct FakeRestart {
        pub days: Vec<f64>,
        /// quantity -> per-step flat cell arrays
        pub cells: BTreeMap<String, Vec<Vec<f64>>>,
    }

    impl RestartAccess for FakeRestart {
        fn step_count(&self, key: &str) -> usize {
            self.cells.get(key).map(|steps| steps.len()).unwrap_or(0)
        }

        fn days(&self, step: usize) -> Option<f64> {
            self.days.get(step).copied()
        }

        fn cell_value(&self, key: &str, step: usize, active: usize) -> Option<f64> {
            self.cells.get(key)?.get(step)?.get(active).copied()
        }
    }

    pub fn summary_case(label: &str, summary: FakeSummary) -> SummaryCase {
        SummaryCase::new(label.to_string(), Box::new(summary), None, None)
    }

    pub fn full_case(
        label: &str,
        summary: FakeSummary,
        grid: FakeGrid,
        restart: FakeRestart,
    ) -> SummaryCase {
        SummaryCase::new(
            label.to_string(),
            Box::new(summary),
            Some(Box::new(grid)),
            Some(Box::new(restart)),
        )
    }
}
