//! Plot request assembly.
//!
//! Pure assembly over already-resolved data: no I/O happens here. Resolved
//! plain vectors and restart series are grouped into figures according to the
//! layout flags, with the color cycle threaded through explicitly.

use tracing::debug;

use crate::model::{
    ColorCycle, PlotGroup, PlotSeries, RestartSeries, RunConfig, SeriesStyle,
};
use crate::resolve::ResolvedVectors;
use crate::source::CaseRegistry;

/// Suffix appended to a vector's base name for its historic variant, qualifier
/// preserved: `FOPR` -> `FOPRH`, `WOPR:OP1` -> `WOPRH:OP1`.
fn historic_key(key: &str) -> String {
    match key.split_once(':') {
        Some((base, qualifier)) => format!("{base}H:{qualifier}"),
        None => format!("{key}H"),
    }
}

/// Group everything into an ordered list of plot groups.
///
/// Non-single mode: one group per plain vector, then one per restart vector,
/// color cycle reset at each group start. Single mode: exactly one group with
/// an empty title, labels prefixed with the originating vector, cycle never
/// reset.
pub fn assemble_groups(
    registry: &CaseRegistry,
    resolved: &ResolvedVectors,
    restart_series: &[RestartSeries],
    cfg: &RunConfig,
    cycle: &mut ColorCycle,
) -> Vec<PlotGroup> {
    if cfg.single {
        let mut series = Vec::new();
        for key in &resolved.plain {
            push_plain_series(&mut series, registry, key, cfg, cycle, true);
        }
        for vector in &resolved.restart {
            push_restart_series(&mut series, registry, restart_series, vector, cfg, cycle, true);
        }
        return vec![PlotGroup {
            title: String::new(),
            series,
            reset_color_cycle: false,
        }];
    }

    let mut groups = Vec::new();
    for key in &resolved.plain {
        cycle.reset();
        let mut series = Vec::new();
        push_plain_series(&mut series, registry, key, cfg, cycle, false);
        groups.push(PlotGroup {
            title: key.clone(),
            series,
            reset_color_cycle: true,
        });
    }
    for vector in &resolved.restart {
        cycle.reset();
        let mut series = Vec::new();
        push_restart_series(&mut series, registry, restart_series, vector, cfg, cycle, false);
        groups.push(PlotGroup {
            title: vector.label(),
            series,
            reset_color_cycle: true,
        });
    }
    groups
}

fn push_plain_series(
    out: &mut Vec<PlotSeries>,
    registry: &CaseRegistry,
    key: &str,
    cfg: &RunConfig,
    cycle: &mut ColorCycle,
    prefix_labels: bool,
) {
    for (case_idx, case) in registry.cases().iter().enumerate() {
        let summary = case.summary();
        if !summary.has_key(key) {
            debug!(case = case.label(), key, "case lacks vector, skipped");
            continue;
        }
        let (Some(times), Some(values)) = (summary.timestamps(key), summary.values(key)) else {
            continue;
        };
        out.push(PlotSeries {
            label: legend_label(cfg, case_idx, key, case.label(), prefix_labels),
            points: times.iter().copied().zip(values.iter().copied()).collect(),
            style: SeriesStyle {
                color: cycle.next(),
                markers_only: false,
            },
        });
    }

    // Historic overlay: reference case only, marker-only, never legended.
    if cfg.historic {
        let reference = registry.reference().summary();
        let hist = historic_key(key);
        if reference.has_key(&hist) {
            if let (Some(times), Some(values)) =
                (reference.timestamps(&hist), reference.values(&hist))
            {
                out.push(PlotSeries {
                    label: None,
                    points: times.iter().copied().zip(values.iter().copied()).collect(),
                    style: SeriesStyle {
                        color: cycle.next(),
                        markers_only: true,
                    },
                });
            }
        }
    }
}

fn push_restart_series(
    out: &mut Vec<PlotSeries>,
    registry: &CaseRegistry,
    restart_series: &[RestartSeries],
    vector: &crate::model::RestartVector,
    cfg: &RunConfig,
    cycle: &mut ColorCycle,
    prefix_labels: bool,
) {
    for (case_idx, case) in registry.cases().iter().enumerate() {
        let Some(series) = restart_series
            .iter()
            .find(|s| &s.vector == vector && s.case == case.label())
        else {
            continue;
        };
        out.push(PlotSeries {
            label: legend_label(cfg, case_idx, &vector.label(), &series.case, prefix_labels),
            points: series.points.clone(),
            style: SeriesStyle {
                color: cycle.next(),
                markers_only: false,
            },
        });
    }
}

/// Legend text for one case series. `None` means omit from the legend; the
/// series itself is always kept.
fn legend_label(
    cfg: &RunConfig,
    case_idx: usize,
    vector: &str,
    case: &str,
    prefix: bool,
) -> Option<String> {
    if cfg.no_legend {
        return None;
    }
    if let Some(cap) = cfg.legend_cap {
        if case_idx >= cap {
            return None;
        }
    }
    if prefix {
        Some(format!("{} {}", vector.to_lowercase(), case.to_lowercase()))
    } else {
        Some(case.to_string())
    }
}
