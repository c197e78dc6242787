/// Number of case series per plot group that receive a legend entry unless the
/// operator disables truncation.
pub const DEFAULT_LEGEND_CAP: usize = 5;

/// One render pass worth of configuration, built from CLI arguments. This is the
/// only data handed across the supervisor/rendering-unit boundary; each unit
/// re-opens and re-resolves everything else from scratch.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Original invocation tokens, cases and vectors still mixed.
    pub tokens: Vec<String>,
    /// Overlay historic variants (`FOPR` -> `FOPRH`) from the reference case.
    pub historic: bool,
    /// All series in one shared figure instead of one figure per vector.
    pub single: bool,
    /// Suppress every legend entry.
    pub no_legend: bool,
    /// `None` disables legend truncation entirely.
    pub legend_cap: Option<usize>,
}

/// A grid-cell-indexed restart vector, `NAME:I,J,K` with 1-based coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartVector {
    pub name: String,
    pub i: u32,
    pub j: u32,
    pub k: u32,
}

impl RestartVector {
    /// Parse the strict restart grammar: uppercase name, colon, three positive
    /// integers joined by commas, nothing else. Anything looser is not a restart
    /// vector and falls through to the unmatched-token diagnostic.
    pub fn parse(token: &str) -> Option<Self> {
        let (name, coords) = token.split_once(':')?;
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_uppercase()) {
            return None;
        }
        let mut parts = coords.split(',');
        let mut triple = [0u32; 3];
        for slot in triple.iter_mut() {
            let part = parts.next()?;
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            *slot = part.parse().ok().filter(|&v| v > 0)?;
        }
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            i: triple[0],
            j: triple[1],
            k: triple[2],
        })
    }

    pub fn label(&self) -> String {
        format!("{}:{},{},{}", self.name, self.i, self.j, self.k)
    }
}

/// A user identifier after classification.
#[derive(Debug, Clone, PartialEq)]
pub enum VectorSpec {
    /// Key or wildcard pattern resolved against the reference case vocabulary.
    Plain { pattern: String },
    RestartIndexed(RestartVector),
}

/// Time series extracted from one case's restart snapshots for one restart
/// vector: `(simulation days, value)` per report step, in step order.
#[derive(Debug, Clone, PartialEq)]
pub struct RestartSeries {
    pub vector: RestartVector,
    pub case: String,
    pub points: Vec<(f64, f64)>,
}

/// How a series is drawn. `color` indexes the renderer's palette; assignment is
/// owned by the assembler's [`ColorCycle`], never by ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesStyle {
    pub color: usize,
    /// Historic overlays draw markers without connecting lines.
    pub markers_only: bool,
}

/// One curve within a plot group. `label: None` is the omit-from-legend
/// sentinel: the series is still drawn, it just gets no legend entry.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub label: Option<String>,
    pub points: Vec<(f64, f64)>,
    pub style: SeriesStyle,
}

/// An ordered set of series rendered together in one figure.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotGroup {
    pub title: String,
    pub series: Vec<PlotSeries>,
    pub reset_color_cycle: bool,
}

/// Explicit color-cycle state threaded through assembly.
#[derive(Debug, Default)]
pub struct ColorCycle {
    next: usize,
}

impl ColorCycle {
    pub fn next(&mut self) -> usize {
        let idx = self.next;
        self.next += 1;
        idx
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}
