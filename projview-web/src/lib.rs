/// projview Web - WASM facade over the parameter store and matrix readout
///
/// The browser UI owns the sliders and the canvases; this module holds the
/// parameters and hands back the composed matrix, raw or formatted.
use projview_core::{
    format_matrix, parse_commands, Axis, AxisGroup, ParamEdit, ParameterStore, Transform,
    TransformMatrix,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WebViewer {
    store: ParameterStore,
}

#[wasm_bindgen]
impl WebViewer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebViewer {
        WebViewer {
            store: ParameterStore::new(),
        }
    }

    /// Set one value, e.g. `set_param("rotation", "z", 1.57)`
    pub fn set_param(&mut self, group: &str, axis: &str, value: f32) -> Result<(), JsValue> {
        self.try_set_param(group, axis, value).map(|_| ()).map_err(to_js)
    }

    /// Apply a command line such as `scale.x=1.5; t.y=-2`
    pub fn apply_command(&mut self, line: &str) -> Result<(), JsValue> {
        self.try_apply_command(line).map(|_| ()).map_err(to_js)
    }

    pub fn reset(&mut self) {
        self.store.reset();
    }

    /// Increments whenever a parameter actually changes
    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    /// Composed matrix as 16 row-major values
    pub fn matrix(&self) -> Vec<f32> {
        self.composed().rows().iter().flatten().copied().collect()
    }

    /// Composed matrix as 16 row-major strings with two decimals
    pub fn formatted_matrix(&self) -> Vec<String> {
        format_matrix(&self.composed())
            .into_iter()
            .flatten()
            .collect()
    }
}

impl WebViewer {
    fn try_set_param(&mut self, group: &str, axis: &str, value: f32) -> projview_core::Result<bool> {
        let group: AxisGroup = group.parse()?;
        let axis: Axis = axis.parse()?;
        Ok(self.store.apply(ParamEdit::new(group, axis, value)))
    }

    fn try_apply_command(&mut self, line: &str) -> projview_core::Result<bool> {
        let edits = parse_commands(line)?;
        log::debug!("web command applied {} edit(s)", edits.len());
        Ok(self.store.set(edits.into_iter().collect()))
    }

    fn composed(&self) -> TransformMatrix {
        Transform::compose(&self.store.get())
    }
}

impl Default for WebViewer {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js(err: projview_core::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}
