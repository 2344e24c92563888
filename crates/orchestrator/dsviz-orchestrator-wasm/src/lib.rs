use js_sys::Array;
use serde_json::Value;
use serde_wasm_bindgen as swb;
use std::time::Duration;
use wasm_bindgen::prelude::*;

use dsviz_animation_core::Config;
use dsviz_api_core::StructureKind;
use dsviz_orchestrator::{InputForm, Session};

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Accepts a view id (`"avl-view"`) or a wire tag (`"avl"`, `"heap"`, ...).
fn parse_kind(name: &str) -> Result<StructureKind, JsError> {
    StructureKind::from_view_id(name)
        .or_else(|| serde_json::from_value(Value::String(name.to_string())).ok())
        .ok_or_else(|| JsError::new(&format!("unknown structure '{name}'")))
}

/// Form fields may arrive as strings or numbers; both become raw text.
fn parse_form(form: JsValue) -> Result<InputForm, JsError> {
    let mut out = InputForm::new();
    if jsvalue_is_undefined_or_null(&form) {
        return Ok(out);
    }
    let fields: serde_json::Map<String, Value> =
        swb::from_value(form).map_err(|e| JsError::new(&format!("form error: {e}")))?;
    for (name, value) in fields {
        match value {
            Value::String(s) => out.set(&name, s),
            Value::Null => {}
            other => out.set(&name, other),
        }
    }
    Ok(out)
}

#[wasm_bindgen]
pub struct DsvizSession {
    core: Session,
}

#[wasm_bindgen]
impl DsvizSession {
    /// Create a session on the reference engine. Pass a config object or
    /// undefined/null for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<DsvizSession, JsError> {
        #[cfg(feature = "console_error")]
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        Ok(DsvizSession {
            core: Session::with_reference_engine(cfg),
        })
    }

    #[wasm_bindgen(js_name = switch_view)]
    pub fn switch_view(&mut self, kind: &str) -> Result<(), JsError> {
        self.core.switch_view(parse_kind(kind)?);
        Ok(())
    }

    /// Submit an operation. Returns false when it was rejected; the reason is
    /// on the status log.
    #[wasm_bindgen]
    pub fn run(&mut self, kind: &str, op: &str, form: JsValue) -> Result<bool, JsError> {
        let kind = parse_kind(kind)?;
        let form = parse_form(form)?;
        Ok(self.core.submit(kind, op, &form).is_ok())
    }

    /// Advance by `dt_ms` milliseconds and return the active view's frame.
    #[wasm_bindgen]
    pub fn update(&mut self, dt_ms: f64) -> Result<JsValue, JsError> {
        let dt = Duration::from_secs_f64(dt_ms.max(0.0) / 1000.0);
        let frame = self.core.update(dt);
        swb::to_value(&frame).map_err(|e| JsError::new(&format!("frame error: {e}")))
    }

    /// Current frame without advancing time.
    #[wasm_bindgen]
    pub fn frame(&mut self) -> Result<JsValue, JsError> {
        let frame = self.core.frame();
        swb::to_value(&frame).map_err(|e| JsError::new(&format!("frame error: {e}")))
    }

    #[wasm_bindgen(js_name = step_now)]
    pub fn step_now(&mut self) -> bool {
        self.core.step_now()
    }

    #[wasm_bindgen(js_name = is_busy)]
    pub fn is_busy(&self) -> bool {
        self.core.is_busy()
    }

    /// Status lines newest first, formatted as `[TAG] text`.
    #[wasm_bindgen(js_name = status_lines)]
    pub fn status_lines(&self) -> Array {
        self.core
            .status()
            .lines()
            .map(|line| JsValue::from_str(&line.to_string()))
            .collect()
    }

    #[wasm_bindgen(js_name = aux_line)]
    pub fn aux_line(&self) -> Option<String> {
        self.core.aux_line()
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_from_view_ids_and_tags() {
        assert_eq!(parse_kind("graph-view").ok(), Some(StructureKind::Graph));
        assert_eq!(parse_kind("minheap").ok(), Some(StructureKind::Heap));
        assert_eq!(parse_kind("tree").ok(), Some(StructureKind::Tree));
    }
}
