//! Bilateral plan composition above the selection engine: one main body,
//! one branch search per iliac side, plus oversizing warnings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::selection::{
    find_branch_options, select_main_body, BranchSearchResult, SelectedMainBody,
};

/// Anatomical inputs, all in millimeters. Parsing and validation of raw form
/// input happens on the caller's side; diameters must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientMeasurements {
    pub neck_diameter: f64,
    pub contralateral_iliac_diameter: f64,
    pub ipsilateral_iliac_diameter: f64,
    pub contralateral_distance: f64,
    pub ipsilateral_distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BranchSide {
    /// Docks on the short leg.
    Contralateral,
    /// Docks on the long leg.
    Ipsilateral,
}

#[derive(Debug, Error, PartialEq)]
pub enum SizingError {
    #[error("no compatible main body for a {neck_diameter} mm neck within the 10-30% oversizing band")]
    NoCompatibleMainBody { neck_diameter: f64 },
}

const HIGH_OVERSIZING_PERCENT: f64 = 25.0;
const LOW_OVERSIZING_PERCENT: f64 = 10.0;

/// Advisory flags on the selected main body's oversizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OversizingWarning {
    /// Above 25%: verify anatomical compatibility.
    High { percent: f64 },
    /// Below 10%: elevated risk of a type I endoleak.
    Low { percent: f64 },
}

/// Branch search outcome for one iliac side, with the inputs that produced
/// it so the caller can render them without re-deriving anything.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideAssessment {
    pub side: BranchSide,
    pub iliac_diameter: f64,
    pub target_distance: f64,
    pub result: BranchSearchResult,
}

impl SideAssessment {
    /// No catalog branch seals in this iliac diameter. Expected outcome,
    /// rendered as guidance rather than raised as an error.
    pub fn no_compatible_branches(&self) -> bool {
        self.result.options.is_empty()
    }

    pub fn needs_bridge(&self) -> bool {
        self.result.needs_bridge
    }

    /// Remaining distance clamped for display; the raw value goes negative
    /// when body and leg already overshoot the target.
    pub fn displayed_remaining(&self) -> f64 {
        self.result.remaining_distance.max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProsthesisPlan {
    pub main_body: SelectedMainBody,
    /// Contralateral first, ipsilateral second.
    pub sides: [SideAssessment; 2],
    pub warnings: Vec<OversizingWarning>,
}

/// Computes the full bilateral plan: main body for the neck, then one branch
/// search per side using that body's length and the side's leg.
pub fn plan_prosthesis(measurements: &PatientMeasurements) -> Result<ProsthesisPlan, SizingError> {
    let main_body = select_main_body(measurements.neck_diameter).ok_or(
        SizingError::NoCompatibleMainBody {
            neck_diameter: measurements.neck_diameter,
        },
    )?;
    let body = main_body.component;

    let contralateral = SideAssessment {
        side: BranchSide::Contralateral,
        iliac_diameter: measurements.contralateral_iliac_diameter,
        target_distance: measurements.contralateral_distance,
        result: find_branch_options(
            measurements.contralateral_iliac_diameter,
            body.length,
            body.short_leg,
            measurements.contralateral_distance,
        ),
    };
    let ipsilateral = SideAssessment {
        side: BranchSide::Ipsilateral,
        iliac_diameter: measurements.ipsilateral_iliac_diameter,
        target_distance: measurements.ipsilateral_distance,
        result: find_branch_options(
            measurements.ipsilateral_iliac_diameter,
            body.length,
            body.long_leg,
            measurements.ipsilateral_distance,
        ),
    };

    let mut warnings = Vec::new();
    if main_body.oversizing_percent > HIGH_OVERSIZING_PERCENT {
        warnings.push(OversizingWarning::High {
            percent: main_body.oversizing_percent,
        });
    }
    if main_body.oversizing_percent < LOW_OVERSIZING_PERCENT {
        warnings.push(OversizingWarning::Low {
            percent: main_body.oversizing_percent,
        });
    }

    Ok(ProsthesisPlan {
        main_body,
        sides: [contralateral, ipsilateral],
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::{plan_prosthesis, BranchSide, OversizingWarning, PatientMeasurements, SizingError};

    fn measurements() -> PatientMeasurements {
        PatientMeasurements {
            neck_diameter: 24.0,
            contralateral_iliac_diameter: 12.0,
            ipsilateral_iliac_diameter: 12.0,
            contralateral_distance: 150.0,
            ipsilateral_distance: 150.0,
        }
    }

    #[test]
    fn plan_wires_each_side_to_its_leg() {
        let plan = plan_prosthesis(&measurements()).expect("neck 24 has a compatible body");
        assert_eq!(plan.main_body.component.code, "CXT281412E");

        let [contralateral, ipsilateral] = &plan.sides;
        assert_eq!(contralateral.side, BranchSide::Contralateral);
        assert_eq!(ipsilateral.side, BranchSide::Ipsilateral);

        // Body 55 mm; short leg 30 -> coverage 85; long leg 65 -> coverage 120.
        assert_eq!(contralateral.result.remaining_distance, 150.0 - 85.0 + 30.0);
        assert_eq!(ipsilateral.result.remaining_distance, 150.0 - 120.0 + 30.0);

        assert!(!contralateral.no_compatible_branches());
        assert!(!contralateral.needs_bridge());
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn missing_main_body_is_a_sizing_error() {
        let mut input = measurements();
        input.neck_diameter = 100.0;
        assert_eq!(
            plan_prosthesis(&input),
            Err(SizingError::NoCompatibleMainBody {
                neck_diameter: 100.0
            })
        );
    }

    #[test]
    fn high_oversizing_is_flagged() {
        let mut input = measurements();
        // Band [17.05, 20.15] selects the 20 mm body at +29.0%.
        input.neck_diameter = 15.5;
        let plan = plan_prosthesis(&input).unwrap();
        assert_eq!(plan.main_body.component.code, "CXT201412E");
        assert_eq!(
            plan.warnings,
            vec![OversizingWarning::High { percent: 29.0 }]
        );
    }

    #[test]
    fn low_oversizing_warning_never_fires_for_engine_selected_bodies() {
        // Band filtering keeps every selected body at >= 10% oversizing, so
        // only the High warning is reachable today; this pins that down so
        // a future band change shows up here rather than silently.
        let mut input = measurements();
        let mut neck = 14.0;
        while neck <= 35.0 {
            input.neck_diameter = neck;
            if let Ok(plan) = plan_prosthesis(&input) {
                assert!(
                    !plan
                        .warnings
                        .iter()
                        .any(|w| matches!(w, OversizingWarning::Low { .. })),
                    "neck {neck}: unexpected low-oversizing warning"
                );
            }
            neck += 0.1;
        }
    }

    #[test]
    fn displayed_remaining_is_clamped_at_zero() {
        let mut input = measurements();
        input.contralateral_distance = 40.0;
        let plan = plan_prosthesis(&input).unwrap();
        let contralateral = &plan.sides[0];
        assert_eq!(contralateral.result.remaining_distance, -15.0);
        assert_eq!(contralateral.displayed_remaining(), 0.0);
    }

    #[test]
    fn incompatible_iliac_diameter_reports_no_branches() {
        let mut input = measurements();
        input.ipsilateral_iliac_diameter = 50.0;
        let plan = plan_prosthesis(&input).unwrap();
        let ipsilateral = &plan.sides[1];
        assert!(ipsilateral.no_compatible_branches());
        assert!(ipsilateral.needs_bridge());
    }
}
