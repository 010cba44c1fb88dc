//! Tolerance-band selection of main bodies and combinatorial search over
//! iliac branch extensions.
//!
//! Both entry points are pure functions of their numeric inputs and the
//! static catalog: no shared mutable state, safe to call from any number of
//! concurrent callers. Inputs are millimeters throughout. Callers must
//! supply positive vessel diameters; the functions do not panic on
//! non-positive input, but the result is unspecified.

use std::fmt;

use serde::Serialize;

use crate::catalog::{branches, main_bodies, Branch, MainBody};

/// Minimum axial overlap (mm) required between any two chained components,
/// main-body leg to branch as well as branch to branch. Domain constant.
pub const OVERLAP_MM: f64 = 30.0;

const MIN_OVERSIZING_FACTOR: f64 = 1.10;
const MAX_OVERSIZING_FACTOR: f64 = 1.30;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn oversizing_percent(component_diameter: f64, vessel_diameter: f64) -> f64 {
    round1((component_diameter / vessel_diameter - 1.0) * 100.0)
}

/// Closed tolerance band `[d * 1.10, d * 1.30]`, inclusive at both ends.
fn within_band(component_diameter: f64, vessel_diameter: f64) -> bool {
    component_diameter >= vessel_diameter * MIN_OVERSIZING_FACTOR
        && component_diameter <= vessel_diameter * MAX_OVERSIZING_FACTOR
}

/// A main body chosen for a given aortic neck, with the oversizing it
/// implies (percentage over the native vessel diameter, one decimal).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelectedMainBody {
    #[serde(flatten)]
    pub component: MainBody,
    pub oversizing_percent: f64,
}

impl fmt::Display for SelectedMainBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Ø{} mm, L{} mm, +{:.1}%)",
            self.component.code,
            self.component.diameter,
            self.component.length,
            self.oversizing_percent
        )
    }
}

/// Picks the main body for the measured aortic neck diameter.
///
/// Candidates are catalog entries whose diameter falls in the closed band
/// `[neck * 1.10, neck * 1.30]`. The catalog is listed ascending by
/// diameter, so the first in-band entry is the minimal-oversizing choice.
/// Returns `None` when no entry is compatible; this is an expected outcome
/// the caller turns into diameter-specific guidance, not an error.
pub fn select_main_body(neck_diameter: f64) -> Option<SelectedMainBody> {
    let component = *main_bodies()
        .iter()
        .find(|body| within_band(body.diameter, neck_diameter))?;

    Some(SelectedMainBody {
        component,
        oversizing_percent: oversizing_percent(component.diameter, neck_diameter),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchKind {
    Single,
    Double,
}

/// One viable extension strategy: a single branch, or two branches of equal
/// diameter chained in series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchOption {
    pub kind: BranchKind,
    pub components: Vec<Branch>,
    pub total_coverage: f64,
    /// `total_coverage - total_distance`; never negative for an emitted
    /// option.
    pub excess: f64,
    pub oversizing_percent: f64,
}

impl fmt::Display for BranchOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.components.as_slice()) {
            (BranchKind::Single, [branch]) => write!(
                f,
                "Single branch: {} (Ø{} mm, L{} mm, +{:.1}%)",
                branch.code, branch.diameter, branch.length, self.oversizing_percent
            ),
            (BranchKind::Double, [first, second]) => write!(
                f,
                "Double branch: {} + {} (Ø{} mm, +{:.1}%)",
                first.code, second.code, first.diameter, self.oversizing_percent
            ),
            _ => write!(f, "Branch option (+{:.1}%)", self.oversizing_percent),
        }
    }
}

/// How the double-branch search enumerates candidate pairs.
///
/// The reference implementations of this algorithm disagree here, so the
/// policy is a switch rather than a hard-coded choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PairEnumeration {
    /// All ordered pairs `(i, j)`: a mixed pair appears once per ordering.
    Ordered,
    /// Unordered pairs `i <= j` only, deduplicating mixed pairs.
    Unordered,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchSettings {
    pub pair_enumeration: PairEnumeration,
    /// Whether `i == j` is searched, i.e. stocking two units of the same
    /// catalog entry.
    pub allow_duplicate_entry: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            pair_enumeration: PairEnumeration::Ordered,
            allow_duplicate_entry: true,
        }
    }
}

/// Outcome of one branch search. Recomputed from scratch on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchSearchResult {
    /// Viable options, ascending by excess; ties keep generation order
    /// (singles before doubles, catalog order within each).
    pub options: Vec<BranchOption>,
    /// True when no catalog branch (or pair) is long enough even in
    /// principle. Coarser than `options.is_empty()`: it can be set while
    /// double options exist.
    pub needs_bridge: bool,
    /// Distance still to cover past the main-body leg, including the
    /// overlap the first branch consumes. May be negative when the body
    /// and leg already overshoot the target; clamp before display.
    pub remaining_distance: f64,
    /// Branches whose diameter fell in the tolerance band, catalog order.
    pub considered_branches: Vec<Branch>,
}

/// Branch search with [`SearchSettings::default`].
pub fn find_branch_options(
    target_diameter: f64,
    body_length: f64,
    leg_length: f64,
    total_distance: f64,
) -> BranchSearchResult {
    find_branch_options_with(
        target_diameter,
        body_length,
        leg_length,
        total_distance,
        SearchSettings::default(),
    )
}

/// Searches single- and double-branch strategies covering `total_distance`
/// from a main body of `body_length` with a leg of `leg_length`, sealing in
/// an iliac artery of `target_diameter`.
pub fn find_branch_options_with(
    target_diameter: f64,
    body_length: f64,
    leg_length: f64,
    total_distance: f64,
    settings: SearchSettings,
) -> BranchSearchResult {
    let considered: Vec<Branch> = branches()
        .iter()
        .copied()
        .filter(|branch| within_band(branch.diameter, target_diameter))
        .collect();

    let current_coverage = body_length + leg_length;
    // The leg's distal OVERLAP_MM is consumed by the first connection, so it
    // counts back into what remains to cover.
    let remaining_distance = total_distance - current_coverage + OVERLAP_MM;

    let mut options = Vec::new();

    for branch in &considered {
        let total_coverage = current_coverage + branch.length - OVERLAP_MM;
        if total_coverage >= total_distance {
            options.push(BranchOption {
                kind: BranchKind::Single,
                components: vec![*branch],
                total_coverage,
                excess: total_coverage - total_distance,
                oversizing_percent: oversizing_percent(branch.diameter, target_diameter),
            });
        }
    }

    for (i, first) in considered.iter().enumerate() {
        for (j, second) in considered.iter().enumerate() {
            if settings.pair_enumeration == PairEnumeration::Unordered && j < i {
                continue;
            }
            if !settings.allow_duplicate_entry && i == j {
                continue;
            }
            // Chained branches must share a diameter to connect in series.
            if first.diameter != second.diameter {
                continue;
            }

            let total_coverage =
                current_coverage + first.length + second.length - 2.0 * OVERLAP_MM;
            // Reject pairs a single branch could already satisfy; they add
            // no coverage beyond what remains needed.
            let adds_needed_length =
                first.length + second.length - OVERLAP_MM > remaining_distance;
            if total_coverage >= total_distance && adds_needed_length {
                options.push(BranchOption {
                    kind: BranchKind::Double,
                    components: vec![*first, *second],
                    total_coverage,
                    excess: total_coverage - total_distance,
                    oversizing_percent: oversizing_percent(first.diameter, target_diameter),
                });
            }
        }
    }

    let longest_considered = considered
        .iter()
        .map(|branch| branch.length)
        .fold(0.0, f64::max);
    let needs_bridge = options.is_empty() || remaining_distance > longest_considered;

    // Stable sort: equal-excess options keep their generation order.
    options.sort_by(|a, b| a.excess.total_cmp(&b.excess));

    BranchSearchResult {
        options,
        needs_bridge,
        remaining_distance,
        considered_branches: considered,
    }
}
