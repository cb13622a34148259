/// Slider-style parameter controls for the terminal UI.
///
/// These enforce the input ranges of the UI (the core accepts any value).
use std::f32::consts::TAU;

use projview_core::{
    parse_commands, Axis, AxisGroup, ParamEdit, ParameterPatch, ParameterStore,
};

/// Range and step of one slider group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderSpec {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl SliderSpec {
    pub fn for_group(group: AxisGroup) -> Self {
        match group {
            AxisGroup::Scale => Self {
                min: 0.1,
                max: 2.0,
                step: 0.1,
            },
            AxisGroup::Rotation => Self {
                min: 0.0,
                max: TAU,
                step: 0.1,
            },
            AxisGroup::Translation => Self {
                min: -5.0,
                max: 5.0,
                step: 0.1,
            },
        }
    }

    /// Clamp into range; NaN is passed through unchanged
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            value
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Move by `steps` slider steps, snapping onto the step grid
    pub fn nudge(&self, value: f32, steps: i32) -> f32 {
        let base = if value.is_finite() { value } else { self.min };
        let index = ((base - self.min) / self.step).round() + steps as f32;
        self.clamp(self.min + index * self.step)
    }
}

/// Which slider is selected, plus the typed command line
#[derive(Debug, Clone)]
pub struct ControlPanel {
    pub group: AxisGroup,
    pub axis: Axis,
    command: Option<String>,
    message: Option<String>,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self {
            group: AxisGroup::Scale,
            axis: Axis::X,
            command: None,
            message: None,
        }
    }

    pub fn select_group(&mut self, group: AxisGroup) {
        self.group = group;
    }

    pub fn select_axis(&mut self, axis: Axis) {
        self.axis = axis;
    }

    pub fn cycle_group(&mut self) {
        let at = AxisGroup::ALL.iter().position(|g| *g == self.group).unwrap_or(0);
        self.group = AxisGroup::ALL[(at + 1) % AxisGroup::ALL.len()];
    }

    /// Step the selected slider and write it to the store
    pub fn nudge(&mut self, store: &mut ParameterStore, steps: i32) -> ParamEdit {
        let params = store.get();
        let current = match self.group {
            AxisGroup::Scale => params.scale,
            AxisGroup::Rotation => params.rotation,
            AxisGroup::Translation => params.translation,
        };
        let current = match self.axis {
            Axis::X => current.x,
            Axis::Y => current.y,
            Axis::Z => current.z,
        };
        let edit = ParamEdit::new(
            self.group,
            self.axis,
            SliderSpec::for_group(self.group).nudge(current, steps),
        );
        store.apply(edit);
        edit
    }

    pub fn is_editing_command(&self) -> bool {
        self.command.is_some()
    }

    pub fn command_line(&self) -> Option<&str> {
        self.command.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn begin_command(&mut self) {
        self.command = Some(String::new());
        self.message = None;
    }

    pub fn cancel_command(&mut self) {
        self.command = None;
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(line) = self.command.as_mut() {
            line.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(line) = self.command.as_mut() {
            line.pop();
        }
    }

    /// Parse and apply the pending command line
    pub fn submit_command(&mut self, store: &mut ParameterStore) {
        let Some(line) = self.command.take() else {
            return;
        };
        self.message = Some(match run_command(&line, store) {
            Ok(message) => message,
            Err(e) => {
                log::debug!("rejected command `{}`: {}", line, e);
                format!("error: {e}")
            }
        });
    }
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one command line: `reset`, or assignments such as `scale.x=1.5`.
///
/// Values are clamped to the slider ranges before they reach the store.
pub fn run_command(line: &str, store: &mut ParameterStore) -> projview_core::Result<String> {
    if line.trim().eq_ignore_ascii_case("reset") {
        store.reset();
        return Ok("parameters reset".to_string());
    }

    let edits = parse_commands(line)?;
    let count = edits.len();
    let patch: ParameterPatch = edits
        .into_iter()
        .map(|e| ParamEdit::new(e.group, e.axis, SliderSpec::for_group(e.group).clamp(e.value)))
        .collect();
    store.set(patch);
    Ok(format!("applied {count} edit(s)"))
}
