//! JSON case decks.
//!
//! One `serde_json` document per case: plain summary vectors, an optional grid
//! with an ACTNUM-style active map, and optional restart steps. Restart step
//! times are given either as simulation days or as RFC3339 dates resolved
//! against the case start.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use super::{GridAccess, RestartAccess, SummaryAccess, SummaryCase};

#[derive(Debug, Deserialize)]
struct CaseDoc {
    #[serde(default)]
    name: Option<String>,
    /// RFC3339 simulation start, required only when restart steps are dated.
    #[serde(default)]
    start: Option<String>,
    summary: BTreeMap<String, VectorDoc>,
    #[serde(default)]
    grid: Option<GridDoc>,
    #[serde(default)]
    restart: Option<RestartDoc>,
}

#[derive(Debug, Deserialize)]
struct VectorDoc {
    days: Vec<f64>,
    values: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct GridDoc {
    /// `[ni, nj, nk]`
    dims: [u32; 3],
    /// Flat i-fastest map of length `ni*nj*nk`: active-cell index or -1.
    active: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct RestartDoc {
    steps: Vec<StepDoc>,
}

#[derive(Debug, Deserialize)]
struct StepDoc {
    #[serde(default)]
    days: Option<f64>,
    #[serde(default)]
    date: Option<String>,
    /// quantity -> one value per active cell
    cells: BTreeMap<String, Vec<f64>>,
}

struct JsonSummary {
    vectors: BTreeMap<String, (Vec<f64>, Vec<f64>)>,
}

impl SummaryAccess for JsonSummary {
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

struct JsonGrid {
    dims: [u32; 3],
    active: Vec<i64>,
}

impl GridAccess for JsonGrid {
    fn active_index(&self, i: u32, j: u32, k: u32) -> Option<usize> {
        let [ni, nj, nk] = self.dims;
        if i == 0 || j == 0 || k == 0 || i > ni || j > nj || k > nk {
            return None;
        }
        let flat = (i - 1) + (j - 1) * ni + (k - 1) * ni * nj;
        match self.active.get(flat as usize)? {
            idx if *idx >= 0 => Some(*idx as usize),
            _ => None,
        }
    }
}

struct JsonRestart {
    days: Vec<f64>,
    steps: Vec<BTreeMap<String, Vec<f64>>>,
}

impl RestartAccess for JsonRestart {
    fn step_count(&self, key: &str) -> usize {
        self.steps
            .iter()
            .take_while(|cells| cells.contains_key(key))
            .count()
    }

    fn days(&self, step: usize) -> Option<f64> {
        self.days.get(step).copied()
    }

    fn cell_value(&self, key: &str, step: usize, active: usize) -> Option<f64> {
        self.steps.get(step)?.get(key)?.get(active).copied()
    }
}

/// Opens JSON case decks into [`SummaryCase`]s.
pub struct JsonCase;

impl JsonCase {
    pub fn open(path: &Path) -> Result<SummaryCase> {
        let raw = std::fs::read(path)
            .with_context(|| format!("read case deck {}", path.display()))?;
        let doc: CaseDoc = serde_json::from_slice(&raw)
            .with_context(|| format!("parse case deck {}", path.display()))?;

        let label = doc.name.unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().to_uppercase())
                .unwrap_or_else(|| path.display().to_string())
        });

        if doc.summary.is_empty() {
            bail!("case deck {} has an empty summary section", path.display());
        }
        let mut vectors = BTreeMap::new();
        for (key, vector) in doc.summary {
            if vector.days.len() != vector.values.len() {
                bail!(
                    "summary vector {key}: {} timestamps but {} values",
                    vector.days.len(),
                    vector.values.len()
                );
            }
            vectors.insert(key, (vector.days, vector.values));
        }

        let start = doc
            .start
            .as_deref()
            .map(|s| OffsetDateTime::parse(s, &Rfc3339).context("parse case start date"))
            .transpose()?;

        let grid = doc
            .grid
            .map(|g| {
                let expected = g.dims.iter().map(|&d| d as usize).product::<usize>();
                if g.active.len() != expected {
                    bail!(
                        "grid active map has {} entries, dims {:?} require {expected}",
                        g.active.len(),
                        g.dims
                    );
                }
                Ok(Box::new(JsonGrid {
                    dims: g.dims,
                    active: g.active,
                }) as Box<dyn GridAccess>)
            })
            .transpose()?;

        let restart = doc
            .restart
            .map(|r| {
                let mut days = Vec::with_capacity(r.steps.len());
                let mut steps = Vec::with_capacity(r.steps.len());
                for (idx, step) in r.steps.into_iter().enumerate() {
                    days.push(step_days(idx, step.days, step.date.as_deref(), start)?);
                    steps.push(step.cells);
                }
                anyhow::Ok(Box::new(JsonRestart { days, steps }) as Box<dyn RestartAccess>)
            })
            .transpose()?;

        Ok(SummaryCase::new(
            label,
            Box::new(JsonSummary { vectors }),
            grid,
            restart,
        ))
    }
}

fn step_days(
    idx: usize,
    days: Option<f64>,
    date: Option<&str>,
    start: Option<OffsetDateTime>,
) -> Result<f64> {
    if let Some(d) = days {
        return Ok(d);
    }
    let date = date
        .with_context(|| format!("restart step {idx} has neither days nor date"))?;
    let stamp = OffsetDateTime::parse(date, &Rfc3339)
        .with_context(|| format!("parse restart step {idx} date"))?;
    let start =
        start.with_context(|| format!("restart step {idx} is dated but the case has no start"))?;
    Ok((stamp - start).as_seconds_f64() / 86_400.0)
}
