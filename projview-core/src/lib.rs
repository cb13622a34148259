/// projview core library - transform composition and shared scene data
///
/// This library holds everything the viewports agree on: the static letter
/// geometry, the user-edited transform parameters, the composed 4x4 matrix
/// and its formatting, and the cameras that look at the shape.

pub mod command;
pub mod error;
pub mod geometry;
pub mod object;
pub mod params;
pub mod presenter;
pub mod projection;
pub mod transform;

// Re-export commonly used types
pub use command::parse_commands;
pub use error::{Error, Result};
pub use geometry::{build_shape, LineMesh, Segment};
pub use object::RenderableObject;
pub use params::{Axis, AxisGroup, ParamEdit, ParameterPatch, ParameterStore, PartialAxes};
pub use presenter::{format_cell, format_matrix, MatrixGrid};
pub use projection::{Camera, OrbitController, OrthoView, Projection};
pub use transform::{Axes3, Transform, TransformMatrix, TransformParameters};
