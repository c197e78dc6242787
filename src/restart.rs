//! Restart series extraction.
//!
//! For every (restart vector, case) pair, walk the case's restart snapshots in
//! report-step order and collect `(days, value)` points. All grid resolution is
//! per case: active-cell numbering differs between cases. A case missing any
//! ingredient is skipped with a warning; the remaining cases proceed.

use tracing::{error, warn};

use crate::model::{RestartSeries, RestartVector};
use crate::source::{CaseRegistry, SummaryCase};

/// Quantity whose record count defines how many report steps a case exposes.
const REFERENCE_QUANTITY: &str = "SWAT";

/// Derived third-phase saturation: computed as `1 - SWAT - SGAS` from the same
/// step and cell, never read from storage.
const DERIVED_OIL_SATURATION: &str = "SOIL";
const WATER_SATURATION: &str = "SWAT";
const GAS_SATURATION: &str = "SGAS";

/// Build one series per (vector, case) pair that has usable restart data.
pub fn build_restart_series(
    registry: &CaseRegistry,
    vectors: &[RestartVector],
) -> Vec<RestartSeries> {
    let mut series = Vec::new();
    for vector in vectors {
        for case in registry.cases() {
            if let Some(built) = build_one(case, vector) {
                series.push(built);
            }
        }
    }
    series
}

fn build_one(case: &SummaryCase, vector: &RestartVector) -> Option<RestartSeries> {
    let label = vector.label();
    let (grid, restart) = match (case.grid(), case.restart()) {
        (Some(grid), Some(restart)) => (grid, restart),
        _ => {
            warn!(
                case = case.label(),
                vector = %label,
                "case has no grid/restart pair, skipped"
            );
            return None;
        }
    };

    let active = match grid.active_index(vector.i, vector.j, vector.k) {
        Some(active) => active,
        None => {
            warn!(
                case = case.label(),
                vector = %label,
                "cell is inactive or outside the grid, skipped"
            );
            return None;
        }
    };

    let steps = restart.step_count(REFERENCE_QUANTITY);
    if steps == 0 {
        error!(
            case = case.label(),
            "restart data lacks {REFERENCE_QUANTITY}, case contributes no report steps"
        );
        return None;
    }

    let mut points = Vec::with_capacity(steps);
    for step in 0..steps {
        let days = match restart.days(step) {
            Some(days) => days,
            None => {
                warn!(case = case.label(), step, "report step has no timestamp, case skipped");
                return None;
            }
        };
        let value = if vector.name == DERIVED_OIL_SATURATION {
            match (
                restart.cell_value(WATER_SATURATION, step, active),
                restart.cell_value(GAS_SATURATION, step, active),
            ) {
                (Some(swat), Some(sgas)) => 1.0 - swat - sgas,
                _ => {
                    warn!(
                        case = case.label(),
                        step,
                        "missing {WATER_SATURATION}/{GAS_SATURATION} for derived saturation, case skipped"
                    );
                    return None;
                }
            }
        } else {
            match restart.cell_value(&vector.name, step, active) {
                Some(value) => value,
                None => {
                    warn!(
                        case = case.label(),
                        vector = %label,
                        step,
                        "quantity absent at report step, case skipped"
                    );
                    return None;
                }
            }
        };
        points.push((days, value));
    }

    Some(RestartSeries {
        vector: vector.clone(),
        case: case.label().to_string(),
        points,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::PlotError;
    use crate::source::fake::{full_case, summary_case, FakeGrid, FakeRestart, FakeSummary};

    fn vector(token: &str) -> RestartVector {
        RestartVector::parse(token).expect("valid vector")
    }

    fn registry_of(cases: Vec<crate::source::SummaryCase>) -> CaseRegistry {
        // Registry construction goes through token classification in
        // production; tests assemble it directly from fakes.
        CaseRegistry::from_cases(cases).expect("cases")
    }

    fn restart_with(cells: &[(&str, &[&[f64]])], days: &[f64]) -> FakeRestart {
        let mut map = BTreeMap::new();
        for (key, steps) in cells {
            map.insert(
                key.to_string(),
                steps.iter().map(|s| s.to_vec()).collect::<Vec<_>>(),
            );
        }
        FakeRestart {
            days: days.to_vec(),
            cells: map,
        }
    }

    fn summary() -> FakeSummary {
        FakeSummary::default().with("FOPR", &[0.0], &[1.0])
    }

    #[test]
    fn derived_saturation_ignores_stored_fields() {
        let restart = restart_with(
            &[
                ("SWAT", &[&[0.2, 0.5], &[0.3, 0.6]]),
                ("SGAS", &[&[0.1, 0.2], &[0.1, 0.1]]),
                // A stored SOIL must never be consulted.
                ("SOIL", &[&[9.0, 9.0], &[9.0, 9.0]]),
            ],
            &[0.0, 30.0],
        );
        let case = full_case("C1", summary(), FakeGrid { dims: (2, 1, 1) }, restart);
        let series = build_restart_series(&registry_of(vec![case]), &[vector("SOIL:2,1,1")]);

        assert_eq!(series.len(), 1);
        let expected: Vec<(f64, f64)> = vec![
            (0.0, 1.0 - 0.5 - 0.2),
            (30.0, 1.0 - 0.6 - 0.1),
        ];
        assert_eq!(series[0].points, expected);
    }

    #[test]
    fn series_length_follows_reference_quantity_count() {
        let restart = restart_with(
            &[
                ("SWAT", &[&[0.2], &[0.3], &[0.4]]),
                ("PRESSURE", &[&[250.0], &[240.0], &[230.0]]),
            ],
            &[0.0, 10.0, 20.0],
        );
        let case = full_case("C1", summary(), FakeGrid { dims: (1, 1, 1) }, restart);
        let series = build_restart_series(&registry_of(vec![case]), &[vector("PRESSURE:1,1,1")]);

        assert_eq!(series[0].points.len(), 3);
        assert_eq!(series[0].points[2], (20.0, 230.0));
        assert_eq!(series[0].case, "C1");
    }

    #[test]
    fn case_without_restart_pair_is_skipped_others_proceed() {
        let bare = summary_case("BARE", summary());
        let full = full_case(
            "FULL",
            summary(),
            FakeGrid { dims: (1, 1, 1) },
            restart_with(&[("SWAT", &[&[0.25]])], &[0.0]),
        );
        let series =
            build_restart_series(&registry_of(vec![bare, full]), &[vector("SWAT:1,1,1")]);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].case, "FULL");
        assert_eq!(series[0].points, vec![(0.0, 0.25)]);
    }

    #[test]
    fn derived_saturation_requires_both_stored_phases() {
        let case = full_case(
            "C1",
            summary(),
            FakeGrid { dims: (1, 1, 1) },
            restart_with(&[("SWAT", &[&[0.25]])], &[0.0]),
        );
        let series = build_restart_series(&registry_of(vec![case]), &[vector("SOIL:1,1,1")]);
        assert!(series.is_empty());
    }

    #[test]
    fn case_lacking_reference_quantity_contributes_nothing() {
        let case = full_case(
            "C1",
            summary(),
            FakeGrid { dims: (1, 1, 1) },
            restart_with(&[("PRESSURE", &[&[250.0]])], &[0.0]),
        );
        let series =
            build_restart_series(&registry_of(vec![case]), &[vector("PRESSURE:1,1,1")]);
        assert!(series.is_empty());
    }

    #[test]
    fn out_of_grid_cell_is_skipped() {
        let case = full_case(
            "C1",
            summary(),
            FakeGrid { dims: (2, 2, 2) },
            restart_with(&[("SWAT", &[&[0.2; 8]])], &[0.0]),
        );
        let series = build_restart_series(&registry_of(vec![case]), &[vector("SWAT:3,1,1")]);
        assert!(series.is_empty());
    }

    #[test]
    fn registry_requires_at_least_one_case() {
        assert!(matches!(
            CaseRegistry::from_cases(vec![]).unwrap_err(),
            PlotError::NoCases
        ));
    }
}
