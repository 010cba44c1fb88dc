//! WASM bridge exposing the sizing engine to the browser UI.
//!
//! Business "not found" outcomes (no compatible device, bridge required)
//! cross the boundary as ordinary serialized values; only malformed input
//! and serialization failures become JS errors.

use evarsize_core::catalog::{branches, main_bodies, verify_catalog, Branch, MainBody};
use evarsize_core::plan::{self, PatientMeasurements, ProsthesisPlan, SizingError};
use evarsize_core::selection;
use serde::Serialize;
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

fn serialize<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    to_value(value).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// One-time startup: installs the panic hook and checks catalog integrity.
/// A failure here means the shipped catalog data is malformed; the host
/// should surface it and stop rather than size against bad data.
#[wasm_bindgen]
pub fn init() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    verify_catalog().map_err(|e| JsValue::from_str(&format!("Catalog verification failed: {}", e)))
}

/// Main-body selection for a measured aortic neck diameter (mm).
/// Resolves to `null` when no catalog body lies in the oversizing band.
#[wasm_bindgen]
pub fn select_main_body(neck_diameter: f64) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    serialize(&selection::select_main_body(neck_diameter))
}

/// Branch search for one iliac side. All inputs in millimeters.
#[wasm_bindgen]
pub fn find_branch_options(
    target_diameter: f64,
    body_length: f64,
    leg_length: f64,
    total_distance: f64,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    serialize(&selection::find_branch_options(
        target_diameter,
        body_length,
        leg_length,
        total_distance,
    ))
}

/// Tagged payload so the UI can branch on the expected "no compatible main
/// body" outcome without catching exceptions.
#[derive(Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
enum PlanPayload {
    Ok { plan: ProsthesisPlan },
    NoCompatibleMainBody { neck_diameter: f64, message: String },
}

/// Full bilateral plan from a `PatientMeasurements`-shaped object.
#[wasm_bindgen]
pub fn plan_prosthesis(measurements: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let measurements: PatientMeasurements = serde_wasm_bindgen::from_value(measurements)
        .map_err(|e| JsValue::from_str(&format!("Invalid measurements: {}", e)))?;

    let payload = match plan::plan_prosthesis(&measurements) {
        Ok(plan) => PlanPayload::Ok { plan },
        Err(err) => {
            let message = err.to_string();
            let SizingError::NoCompatibleMainBody { neck_diameter } = err;
            PlanPayload::NoCompatibleMainBody {
                neck_diameter,
                message,
            }
        }
    };

    serialize(&payload)
}

#[derive(Serialize)]
struct CatalogPayload {
    main_bodies: &'static [MainBody],
    branches: &'static [Branch],
}

/// The static device catalog, for UI display.
#[wasm_bindgen]
pub fn device_catalog() -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    serialize(&CatalogPayload {
        main_bodies: main_bodies(),
        branches: branches(),
    })
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::{device_catalog, find_branch_options, init, plan_prosthesis, select_main_body};
    use evarsize_core::plan::PatientMeasurements;
    use serde::Deserialize;
    use serde_wasm_bindgen::{from_value, to_value};
    use wasm_bindgen_test::wasm_bindgen_test;

    fn measurements_value(neck_diameter: f64) -> wasm_bindgen::JsValue {
        let measurements = PatientMeasurements {
            neck_diameter,
            contralateral_iliac_diameter: 12.0,
            ipsilateral_iliac_diameter: 12.0,
            contralateral_distance: 150.0,
            ipsilateral_distance: 150.0,
        };
        to_value(&measurements).expect("measurements")
    }

    #[wasm_bindgen_test]
    fn init_accepts_the_reference_catalog() {
        init().expect("reference catalog should verify");
    }

    #[wasm_bindgen_test]
    fn plan_round_trips_with_ok_status() {
        #[derive(Deserialize)]
        struct PlanStatus {
            status: String,
        }

        let value = plan_prosthesis(measurements_value(24.0)).expect("plan should serialize");
        let payload: PlanStatus = from_value(value).expect("payload");
        assert_eq!(payload.status, "ok");
    }

    #[wasm_bindgen_test]
    fn incompatible_neck_is_a_payload_not_an_exception() {
        #[derive(Deserialize)]
        struct NoBodyPayload {
            status: String,
            neck_diameter: f64,
            message: String,
        }

        let value = plan_prosthesis(measurements_value(100.0)).expect("expected outcome stays Ok");
        let payload: NoBodyPayload = from_value(value).expect("payload");
        assert_eq!(payload.status, "noCompatibleMainBody");
        assert_eq!(payload.neck_diameter, 100.0);
        assert!(payload.message.contains("100"));
    }

    #[wasm_bindgen_test]
    fn select_main_body_resolves_to_nothing_for_no_match() {
        let value = select_main_body(100.0).expect("serialization");
        assert!(value.is_null() || value.is_undefined());
    }

    #[wasm_bindgen_test]
    fn branch_search_payload_carries_ranked_options() {
        #[derive(Deserialize)]
        struct OptionSummary {
            kind: String,
            excess: f64,
        }

        #[derive(Deserialize)]
        struct SearchSummary {
            options: Vec<OptionSummary>,
            needs_bridge: bool,
        }

        let value = find_branch_options(12.0, 55.0, 30.0, 150.0).expect("serialization");
        let payload: SearchSummary = from_value(value).expect("payload");
        assert!(!payload.needs_bridge);
        assert_eq!(payload.options.len(), 3);
        assert_eq!(payload.options[0].kind, "single");
        assert_eq!(payload.options[0].excess, 5.0);
    }

    #[wasm_bindgen_test]
    fn device_catalog_lists_both_component_families() {
        #[derive(Deserialize)]
        struct CodedEntry {
            code: String,
        }

        #[derive(Deserialize)]
        struct CatalogSummary {
            main_bodies: Vec<CodedEntry>,
            branches: Vec<CodedEntry>,
        }

        let value = device_catalog().expect("serialization");
        let payload: CatalogSummary = from_value(value).expect("payload");
        assert_eq!(payload.main_bodies.len(), 6);
        assert_eq!(payload.branches.len(), 21);
        assert_eq!(payload.main_bodies[0].code, "CXT201412E");
    }
}
