/// Parameter store holding the user-edited transform
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::transform::{Axes3, TransformParameters};

/// Which triple a parameter edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisGroup {
    Scale,
    Rotation,
    Translation,
}

impl AxisGroup {
    pub const ALL: [AxisGroup; 3] = [AxisGroup::Scale, AxisGroup::Rotation, AxisGroup::Translation];

    pub fn name(self) -> &'static str {
        match self {
            AxisGroup::Scale => "scale",
            AxisGroup::Rotation => "rotation",
            AxisGroup::Translation => "translation",
        }
    }
}

impl fmt::Display for AxisGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AxisGroup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scale" | "s" => Ok(AxisGroup::Scale),
            "rotation" | "rotate" | "r" => Ok(AxisGroup::Rotation),
            "translation" | "translate" | "position" | "t" => Ok(AxisGroup::Translation),
            _ => Err(Error::UnknownGroup(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            _ => Err(Error::UnknownAxis(s.to_string())),
        }
    }
}

/// A single-field edit, as produced by one slider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamEdit {
    pub group: AxisGroup,
    pub axis: Axis,
    pub value: f32,
}

impl ParamEdit {
    pub fn new(group: AxisGroup, axis: Axis, value: f32) -> Self {
        Self { group, axis, value }
    }
}

/// Optional value per axis; `None` leaves the stored axis untouched
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PartialAxes {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

impl PartialAxes {
    fn slot(&mut self, axis: Axis) -> &mut Option<f32> {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }

    fn merge_into(&self, target: &mut Axes3) {
        if let Some(x) = self.x {
            target.x = x;
        }
        if let Some(y) = self.y {
            target.y = y;
        }
        if let Some(z) = self.z {
            target.z = z;
        }
    }
}

/// A partial update across all three groups
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParameterPatch {
    pub scale: PartialAxes,
    pub rotation: PartialAxes,
    pub translation: PartialAxes,
}

impl ParameterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style single field setter
    pub fn with(mut self, group: AxisGroup, axis: Axis, value: f32) -> Self {
        *self.group_mut(group).slot(axis) = Some(value);
        self
    }

    fn group_mut(&mut self, group: AxisGroup) -> &mut PartialAxes {
        match group {
            AxisGroup::Scale => &mut self.scale,
            AxisGroup::Rotation => &mut self.rotation,
            AxisGroup::Translation => &mut self.translation,
        }
    }
}

impl From<ParamEdit> for ParameterPatch {
    fn from(edit: ParamEdit) -> Self {
        ParameterPatch::new().with(edit.group, edit.axis, edit.value)
    }
}

impl FromIterator<ParamEdit> for ParameterPatch {
    fn from_iter<I: IntoIterator<Item = ParamEdit>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ParameterPatch::new(), |patch, e| patch.with(e.group, e.axis, e.value))
    }
}

/// Current transform parameters plus a change counter.
///
/// The store is a plain value: construct one per viewer (or per test) and pass
/// it by reference. `revision()` only moves when a stored value changes
/// bit-wise, so repeating an edit is a no-op for dependents.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    params: TransformParameters,
    revision: u64,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::with_params(TransformParameters::default())
    }

    pub fn with_params(params: TransformParameters) -> Self {
        Self {
            params,
            revision: 0,
        }
    }

    /// Snapshot of the current parameters
    pub fn get(&self) -> TransformParameters {
        self.params
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Merge the supplied fields; returns whether anything changed
    pub fn set(&mut self, patch: ParameterPatch) -> bool {
        let mut next = self.params;
        patch.scale.merge_into(&mut next.scale);
        patch.rotation.merge_into(&mut next.rotation);
        patch.translation.merge_into(&mut next.translation);
        self.replace(next)
    }

    pub fn apply(&mut self, edit: ParamEdit) -> bool {
        self.set(edit.into())
    }

    /// Restore the defaults
    pub fn reset(&mut self) -> bool {
        self.replace(TransformParameters::default())
    }

    fn replace(&mut self, next: TransformParameters) -> bool {
        if next.same_bits(&self.params) {
            return false;
        }
        self.params = next;
        self.revision = self.revision.wrapping_add(1);
        log::trace!("parameters changed (revision {}): {:?}", self.revision, self.params);
        true
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}
