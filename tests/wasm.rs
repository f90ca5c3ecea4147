//! Browser-side smoke tests, run with `wasm-pack test --headless --firefox`.
//! The native test suite covers the pipeline against a fake host; these only
//! prove the wasm surface wires up against a real document.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn version_reports_crate_name() {
    assert!(calloutcore::version().starts_with("calloutcore v"));
}

#[wasm_bindgen_test]
fn conductor_bootstraps_once_against_real_document() {
    let persist = js_sys::Function::new_no_args("");
    let mut conductor = calloutcore::WatchConductor::new(persist);

    // an unreadable settings record falls back to defaults
    conductor.bootstrap(JsValue::UNDEFINED).expect("bootstrap");
    assert!(conductor.is_watching());

    // a second readiness signal must be a no-op
    conductor.bootstrap(JsValue::UNDEFINED).expect("double bootstrap");
    assert!(conductor.is_watching());
}
