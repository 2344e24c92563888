#![cfg(target_arch = "wasm32")]
use dsviz_orchestrator_wasm::{abi_version, DsvizSession};
use serde_wasm_bindgen as swb;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn form(json: serde_json::Value) -> JsValue {
    swb::to_value(&json).unwrap()
}

fn drain(session: &mut DsvizSession) -> serde_json::Value {
    let mut frame = session.update(0.0).unwrap();
    while session.is_busy() {
        frame = session.update(5000.0).unwrap();
    }
    swb::from_value(frame).unwrap()
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn construct_with_defaults() {
    assert!(DsvizSession::new(JsValue::UNDEFINED).is_ok());
    assert!(DsvizSession::new(JsValue::NULL).is_ok());
}

#[wasm_bindgen_test]
fn heap_insert_produces_a_frame() {
    let mut s = DsvizSession::new(JsValue::UNDEFINED).unwrap();
    s.switch_view("heap-view").unwrap();
    assert!(s.run("minheap", "init", form(serde_json::json!({ "capacity": 4 }))).unwrap());
    drain(&mut s);
    assert!(s.run("minheap", "insert", form(serde_json::json!({ "value": "3" }))).unwrap());
    let frame = drain(&mut s);
    assert_eq!(frame["kind"], "minheap");
    assert_eq!(frame["array"], serde_json::json!([3]));
    assert!(s.status_lines().length() > 0);
}

#[wasm_bindgen_test]
fn rejected_operation_returns_false() {
    let mut s = DsvizSession::new(JsValue::UNDEFINED).unwrap();
    assert!(!s.run("avl", "insert", form(serde_json::json!({ "value": 1 }))).unwrap());
    let latest = s.status_lines().get(0).as_string().unwrap();
    assert_eq!(latest, "[ERROR] AVL Tree not initialized.");
}

#[wasm_bindgen_test]
fn graph_run_exposes_aux_line() {
    let mut s = DsvizSession::new(JsValue::UNDEFINED).unwrap();
    s.switch_view("graph").unwrap();
    assert!(s.run("graph", "init", form(serde_json::json!({ "vertices": 3 }))).unwrap());
    drain(&mut s);
    for (from, to) in [(0, 1), (1, 2)] {
        let edge = serde_json::json!({ "from": from, "to": to, "weight": 1 });
        assert!(s.run("graph", "add_edge", form(edge)).unwrap());
        drain(&mut s);
    }
    assert!(s.run("graph", "bfs", form(serde_json::json!({ "start": 0 }))).unwrap());
    s.update(0.0).unwrap();
    assert!(s.aux_line().is_some_and(|l| l.starts_with("BFS Queue: [")));
}
