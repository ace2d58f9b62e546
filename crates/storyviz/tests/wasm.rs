//! WASM browser tests - run with `wasm-pack test --headless --chrome`

#![cfg(target_arch = "wasm32")]

use storyviz::CoverageTreeApp;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const DATASET: &str = r#"{
    "title": "Survey",
    "children": [
        { "title": "Visit", "children": [{ "title": "Reason", "availability": "both" }] },
        { "title": "Patient", "children": [{ "title": "Age", "availability": "restricted" }] }
    ]
}"#;

fn container(id: &str) {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .expect("document");
    let div = document.create_element("div").expect("div");
    div.set_id(id);
    div.set_attribute("style", "width: 900px; height: 480px").expect("style");
    document.body().expect("body").append_child(&div).expect("append");
}

#[wasm_bindgen_test]
fn test_missing_container_is_an_error() {
    assert!(CoverageTreeApp::from_dataset("no-such-element", DATASET).is_err());
}

#[wasm_bindgen_test]
fn test_invalid_dataset_is_an_error() {
    container("bad-data");
    assert!(CoverageTreeApp::from_dataset("bad-data", "{").is_err());
}

#[wasm_bindgen_test]
fn test_toggle_and_bulk_operations() {
    container("tree");
    let mut app = CoverageTreeApp::from_dataset("tree", DATASET).expect("mount");
    assert_eq!(app.visible_count(), 3);

    assert!(app.toggle_path("0/0"));
    assert_eq!(app.visible_count(), 4);
    assert!(!app.toggle_path("0/0/0"), "leaves do not toggle");
    assert!(!app.toggle_path("not a path"));

    app.expand_all();
    assert_eq!(app.visible_count(), 5);
    app.collapse_all();
    assert_eq!(app.visible_count(), 3);
}

#[wasm_bindgen_test]
fn test_drop_detaches() {
    container("short-lived");
    let app = CoverageTreeApp::from_dataset("short-lived", DATASET).expect("mount");
    drop(app);
}
