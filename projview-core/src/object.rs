/// Renderable wireframe object with its own transform fields
use std::rc::Rc;

use nalgebra::{Matrix4, Rotation3, Vector3};

use crate::geometry::LineMesh;
use crate::transform::{Axes3, TransformParameters};

/// A line mesh placed in the world.
///
/// The mesh is shared read-only between every copy; the transform fields are
/// owned per instance. Copies are kept in step by value with
/// [`RenderableObject::copy_transform_from`], never by sharing.
#[derive(Debug, Clone)]
pub struct RenderableObject {
    mesh: Rc<LineMesh>,
    pub scale: Vector3<f32>,
    /// Euler angles in radians, applied X then Y then Z
    pub rotation: Vector3<f32>,
    pub translation: Vector3<f32>,
}

impl RenderableObject {
    pub fn new(mesh: Rc<LineMesh>) -> Self {
        Self {
            mesh,
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation: Vector3::zeros(),
            translation: Vector3::zeros(),
        }
    }

    pub fn mesh(&self) -> &LineMesh {
        &self.mesh
    }

    pub fn shares_mesh_with(&self, other: &RenderableObject) -> bool {
        Rc::ptr_eq(&self.mesh, &other.mesh)
    }

    pub fn set_transform(&mut self, params: &TransformParameters) {
        self.scale = params.scale.to_vector();
        self.rotation = params.rotation.to_vector();
        self.translation = params.translation.to_vector();
    }

    /// Copy scale, rotation and translation from another object
    pub fn copy_transform_from(&mut self, source: &RenderableObject) {
        self.scale = source.scale;
        self.rotation = source.rotation;
        self.translation = source.translation;
    }

    pub fn transform(&self) -> TransformParameters {
        TransformParameters {
            scale: Axes3::from_vector(&self.scale),
            rotation: Axes3::from_vector(&self.rotation),
            translation: Axes3::from_vector(&self.translation),
        }
    }

    /// Local-to-world matrix used for rendering.
    ///
    /// Built through nalgebra's Euler constructor rather than the elementary
    /// product in [`crate::transform::Transform::compose`], so the two agree
    /// up to floating-point rounding only.
    pub fn local_matrix(&self) -> Matrix4<f32> {
        let rotation =
            Rotation3::from_euler_angles(self.rotation.x, self.rotation.y, self.rotation.z);
        Matrix4::new_translation(&self.translation)
            * rotation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::build_shape;
    use crate::transform::Transform;
    use approx::assert_relative_eq;

    fn object() -> RenderableObject {
        RenderableObject::new(Rc::new(build_shape().unwrap()))
    }

    #[test]
    fn test_new_object_is_identity() {
        let obj = object();
        assert_eq!(obj.transform(), TransformParameters::default());
        assert_relative_eq!(obj.local_matrix(), Matrix4::identity());
    }

    #[test]
    fn test_local_matrix_matches_composer() {
        let params = TransformParameters {
            scale: Axes3::new(2.0, 0.5, 1.3),
            rotation: Axes3::new(0.4, 1.2, 5.5),
            translation: Axes3::new(-4.0, 0.3, 2.2),
        };
        let mut obj = object();
        obj.set_transform(&params);
        assert_relative_eq!(
            obj.local_matrix(),
            Transform::compose(&params).to_matrix(),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_clone_does_not_alias_transform() {
        let master = object();
        let mut copy = master.clone();
        assert!(copy.shares_mesh_with(&master));

        copy.scale.x = 3.0;
        assert_eq!(master.scale.x, 1.0);

        let mut master = master;
        master.translation.y = 2.0;
        copy.copy_transform_from(&master);
        assert_eq!(copy.transform(), master.transform());
    }
}
