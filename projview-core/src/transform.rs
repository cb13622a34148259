/// Transform parameters and 4x4 matrix composition
use nalgebra::{Matrix4, Rotation3, Vector3};

/// A value per axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axes3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Axes3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    pub fn to_vector(self) -> Vector3<f32> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn from_vector(v: &Vector3<f32>) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    /// Bit-level equality, so that NaN equals the same NaN
    pub fn same_bits(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits()
            && self.y.to_bits() == other.y.to_bits()
            && self.z.to_bits() == other.z.to_bits()
    }
}

/// Scale, rotation (radians) and translation of the shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformParameters {
    pub scale: Axes3,
    pub rotation: Axes3,
    pub translation: Axes3,
}

impl TransformParameters {
    pub const IDENTITY: Self = Self {
        scale: Axes3::splat(1.0),
        rotation: Axes3::splat(0.0),
        translation: Axes3::splat(0.0),
    };

    pub fn same_bits(&self, other: &Self) -> bool {
        self.scale.same_bits(&other.scale)
            && self.rotation.same_bits(&other.rotation)
            && self.translation.same_bits(&other.translation)
    }
}

impl Default for TransformParameters {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Row-major 4x4 matrix for presentation
///
/// Replaced wholesale whenever parameters change; there are no element setters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformMatrix {
    rows: [[f32; 4]; 4],
}

impl TransformMatrix {
    pub fn identity() -> Self {
        Self::from_matrix(&Matrix4::identity())
    }

    pub fn from_matrix(m: &Matrix4<f32>) -> Self {
        let mut rows = [[0.0; 4]; 4];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = m[(r, c)];
            }
        }
        Self { rows }
    }

    pub fn rows(&self) -> &[[f32; 4]; 4] {
        &self.rows
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.rows[row][col]
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_fn(|r, c| self.rows[r][c])
    }

    /// Bit-level equality over all sixteen cells
    pub fn same_bits(&self, other: &Self) -> bool {
        self.rows
            .iter()
            .flatten()
            .zip(other.rows.iter().flatten())
            .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Default for TransformMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    pub fn rotation_x(angle: f32) -> Matrix4<f32> {
        Rotation3::from_axis_angle(&Vector3::x_axis(), angle).to_homogeneous()
    }

    pub fn rotation_y(angle: f32) -> Matrix4<f32> {
        Rotation3::from_axis_angle(&Vector3::y_axis(), angle).to_homogeneous()
    }

    pub fn rotation_z(angle: f32) -> Matrix4<f32> {
        Rotation3::from_axis_angle(&Vector3::z_axis(), angle).to_homogeneous()
    }

    /// Create a rotation matrix from per-axis angles
    pub fn rotation_matrix(rotation: &Axes3) -> Matrix4<f32> {
        let rx = Self::rotation_x(rotation.x);
        let ry = Self::rotation_y(rotation.y);
        let rz = Self::rotation_z(rotation.z);

        // Apply rotations in order: X, then Y, then Z
        rz * ry * rx
    }

    /// Create a translation matrix
    pub fn translation_matrix(translation: &Axes3) -> Matrix4<f32> {
        Matrix4::new_translation(&translation.to_vector())
    }

    /// Create a scale matrix
    pub fn scale_matrix(scale: &Axes3) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&scale.to_vector())
    }

    /// Compose `T * Rz * Ry * Rx * S`.
    ///
    /// The product is evaluated left to right as
    /// `(((T * Rz) * Ry) * Rx) * S`, so repeated calls with the same input
    /// give bit-identical output. NaN and infinite inputs are not checked.
    pub fn compose(params: &TransformParameters) -> TransformMatrix {
        let t = Self::translation_matrix(&params.translation);
        let rz = Self::rotation_z(params.rotation.z);
        let ry = Self::rotation_y(params.rotation.y);
        let rx = Self::rotation_x(params.rotation.x);
        let s = Self::scale_matrix(&params.scale);

        TransformMatrix::from_matrix(&(t * rz * ry * rx * s))
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}
