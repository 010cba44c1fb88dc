//! Static device catalog: main bodies and iliac branch extensions.
//!
//! List order matters: it is the tie-break order for selection, and the main
//! bodies are listed ascending by diameter so the first in-band entry is the
//! minimal-oversizing choice.

use anyhow::{bail, Result};
use serde::Serialize;

/// Bifurcated central component of a modular aortic graft, docked at the
/// aortic neck. All dimensions in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MainBody {
    pub code: &'static str,
    pub diameter: f64,
    pub length: f64,
    /// Contralateral leg.
    pub short_leg: f64,
    /// Ipsilateral leg.
    pub long_leg: f64,
}

/// Tubular extension connecting a main-body leg down to the iliac artery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Branch {
    pub code: &'static str,
    pub diameter: f64,
    pub length: f64,
}

const MAIN_BODIES: [MainBody; 6] = [
    MainBody { code: "CXT201412E", diameter: 20.0, length: 55.0, short_leg: 30.0, long_leg: 65.0 },
    MainBody { code: "CXT231412E", diameter: 23.0, length: 55.0, short_leg: 30.0, long_leg: 65.0 },
    MainBody { code: "CXT261412E", diameter: 26.0, length: 55.0, short_leg: 30.0, long_leg: 65.0 },
    MainBody { code: "CXT281412E", diameter: 28.5, length: 55.0, short_leg: 30.0, long_leg: 65.0 },
    MainBody { code: "CXT321414E", diameter: 32.0, length: 65.0, short_leg: 30.0, long_leg: 75.0 },
    MainBody { code: "CXT361414E", diameter: 36.0, length: 65.0, short_leg: 30.0, long_leg: 75.0 },
];

const BRANCHES: [Branch; 21] = [
    Branch { code: "PLC121000", diameter: 12.0, length: 100.0 },
    Branch { code: "PLC121200", diameter: 12.0, length: 120.0 },
    Branch { code: "PLC121400", diameter: 12.0, length: 140.0 },
    Branch { code: "PLC141000", diameter: 14.5, length: 100.0 },
    Branch { code: "PLC141200", diameter: 14.5, length: 120.0 },
    Branch { code: "PLC141400", diameter: 14.5, length: 140.0 },
    Branch { code: "PLC161000", diameter: 16.0, length: 95.0 },
    Branch { code: "PLC161200", diameter: 16.0, length: 115.0 },
    Branch { code: "PLC161400", diameter: 16.0, length: 135.0 },
    Branch { code: "PLC181000", diameter: 18.0, length: 95.0 },
    Branch { code: "PLC181200", diameter: 18.0, length: 115.0 },
    Branch { code: "PLC181400", diameter: 18.0, length: 135.0 },
    Branch { code: "PLC201000", diameter: 20.0, length: 95.0 },
    Branch { code: "PLC201200", diameter: 20.0, length: 115.0 },
    Branch { code: "PLC201400", diameter: 20.0, length: 135.0 },
    Branch { code: "PLC231000", diameter: 23.0, length: 100.0 },
    Branch { code: "PLC231200", diameter: 23.0, length: 120.0 },
    Branch { code: "PLC231400", diameter: 23.0, length: 140.0 },
    Branch { code: "PLC271000", diameter: 27.0, length: 100.0 },
    Branch { code: "PLC271200", diameter: 27.0, length: 120.0 },
    Branch { code: "PLC271400", diameter: 27.0, length: 140.0 },
];

pub fn main_bodies() -> &'static [MainBody] {
    &MAIN_BODIES
}

pub fn branches() -> &'static [Branch] {
    &BRANCHES
}

/// Integrity check for the static catalog, intended to run once at startup.
/// A failure here is a programming error in the catalog data, not a sizing
/// outcome, so the host should abort rather than continue.
pub fn verify_catalog() -> Result<()> {
    let mut previous_diameter = 0.0;
    for body in main_bodies() {
        if body.diameter <= 0.0 || body.length <= 0.0 {
            bail!("Main body {} has a non-positive dimension.", body.code);
        }
        if body.short_leg <= 0.0 || body.long_leg <= 0.0 {
            bail!("Main body {} has a non-positive leg length.", body.code);
        }
        if body.short_leg >= body.long_leg {
            bail!(
                "Main body {} short leg ({} mm) is not shorter than its long leg ({} mm).",
                body.code,
                body.short_leg,
                body.long_leg
            );
        }
        if body.diameter <= previous_diameter {
            bail!(
                "Main bodies must be listed ascending by diameter; {} breaks the order.",
                body.code
            );
        }
        previous_diameter = body.diameter;
    }

    for branch in branches() {
        if branch.diameter <= 0.0 || branch.length <= 0.0 {
            bail!("Branch {} has a non-positive dimension.", branch.code);
        }
    }

    let mut codes: Vec<&str> = main_bodies()
        .iter()
        .map(|body| body.code)
        .chain(branches().iter().map(|branch| branch.code))
        .collect();
    codes.sort_unstable();
    codes.dedup();
    if codes.len() != main_bodies().len() + branches().len() {
        bail!("Catalog codes must be unique across main bodies and branches.");
    }

    Ok(())
}
