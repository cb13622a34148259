/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

/// Projection model with its frustum parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective { fov: f32, aspect: f32 },
    Orthographic { left: f32, right: f32, bottom: f32, top: f32 },
}

/// Axis-aligned orthographic viewpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OrthoView {
    Top,
    Front,
    Side,
}

impl OrthoView {
    pub const ALL: [OrthoView; 3] = [OrthoView::Top, OrthoView::Front, OrthoView::Side];

    /// Eye position and up vector; the camera always looks at the origin
    pub fn pose(self, distance: f32) -> (Point3<f32>, Vector3<f32>) {
        match self {
            // Looking straight down, so Y cannot be the up vector
            OrthoView::Top => (Point3::new(0.0, distance, 0.0), Vector3::new(0.0, 0.0, -1.0)),
            OrthoView::Front => (Point3::new(0.0, 0.0, distance), Vector3::y()),
            OrthoView::Side => (Point3::new(distance, 0.0, 0.0), Vector3::y()),
        }
    }
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub near: f32,
    pub far: f32,
    pub projection: Projection,
}

impl Camera {
    pub const DEFAULT_FOV_DEGREES: f32 = 75.0;
    pub const ORTHO_HALF_EXTENT: f32 = 5.0;
    pub const ORTHO_DISTANCE: f32 = 10.0;

    /// Perspective camera at (5, 5, 5) looking at the origin
    pub fn perspective(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(5.0, 5.0, 5.0),
            target: Point3::origin(),
            up: Vector3::y(),
            near: 0.1,
            far: 1000.0,
            projection: Projection::Perspective {
                fov: Self::DEFAULT_FOV_DEGREES.to_radians(),
                aspect: aspect_ratio(width, height),
            },
        }
    }

    /// Orthographic camera for one of the fixed projection views
    pub fn orthographic(view: OrthoView, half_extent: f32) -> Self {
        let (position, up) = view.pose(Self::ORTHO_DISTANCE);
        Self {
            position,
            target: Point3::origin(),
            up,
            near: 0.1,
            far: 1000.0,
            projection: Projection::Orthographic {
                left: -half_extent,
                right: half_extent,
                bottom: -half_extent,
                top: half_extent,
            },
        }
    }

    pub fn is_perspective(&self) -> bool {
        matches!(self.projection, Projection::Perspective { .. })
    }

    /// Update the aspect ratio after a resize; orthographic frusta stay fixed
    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        if let Projection::Perspective { aspect, .. } = &mut self.projection {
            *aspect = aspect_ratio(width, height);
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.projection {
            Projection::Perspective { fov, aspect } => {
                Matrix4::new_perspective(aspect, fov, self.near, self.far)
            }
            Projection::Orthographic {
                left,
                right,
                bottom,
                top,
            } => Matrix4::new_orthographic(left, right, bottom, top, self.near, self.far),
        }
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world-space point through `view_projection` into normalized
    /// device coordinates.
    ///
    /// Returns `None` for points behind the camera or outside the near/far
    /// range. X and Y are not clipped.
    pub fn project(view_projection: &Matrix4<f32>, point: &Point3<f32>) -> Option<Point3<f32>> {
        let clip = view_projection * point.to_homogeneous();
        if clip.w <= 1e-6 {
            return None;
        }
        let ndc = Point3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w);
        if !(-1.0..=1.0).contains(&ndc.z) {
            return None;
        }
        Some(ndc)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(800, 600)
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

/// Orbit/pan/zoom navigation around a target point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitController {
    pub target: Point3<f32>,
    pub distance: f32,
    /// Horizontal angle around +Y, measured from +Z towards +X
    pub azimuth: f32,
    /// Vertical angle above the XZ plane
    pub elevation: f32,
}

impl OrbitController {
    pub const MIN_DISTANCE: f32 = 0.5;
    pub const MAX_DISTANCE: f32 = 500.0;
    const ELEVATION_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

    /// Derive spherical coordinates from an existing camera pose
    pub fn from_camera(camera: &Camera) -> Self {
        let offset = camera.position - camera.target;
        let distance = offset.norm().max(Self::MIN_DISTANCE);
        Self {
            target: camera.target,
            distance,
            azimuth: offset.x.atan2(offset.z),
            elevation: (offset.y / distance).clamp(-1.0, 1.0).asin(),
        }
    }

    /// Camera eye position from spherical coordinates
    pub fn position(&self) -> Point3<f32> {
        let x = self.distance * self.elevation.cos() * self.azimuth.sin();
        let y = self.distance * self.elevation.sin();
        let z = self.distance * self.elevation.cos() * self.azimuth.cos();
        self.target + Vector3::new(x, y, z)
    }

    pub fn orbit(&mut self, d_azimuth: f32, d_elevation: f32) {
        self.azimuth += d_azimuth;
        self.elevation =
            (self.elevation + d_elevation).clamp(-Self::ELEVATION_LIMIT, Self::ELEVATION_LIMIT);
    }

    /// Move the target in the camera plane; deltas are in units of distance
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let forward = (self.target - self.position()).normalize();
        let right = forward.cross(&Vector3::y()).normalize();
        let up = right.cross(&forward);
        self.target += (right * dx + up * dy) * self.distance;
    }

    /// Scale the distance; factors below one move closer
    pub fn zoom(&mut self, factor: f32) {
        self.distance = (self.distance * factor).clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }

    pub fn apply(&self, camera: &mut Camera) {
        camera.position = self.position();
        camera.target = self.target;
        camera.up = Vector3::y();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::perspective(800, 600);
        assert!(camera.is_perspective());
        match camera.projection {
            Projection::Perspective { aspect, fov } => {
                assert!((aspect - 800.0 / 600.0).abs() < 1e-6);
                assert_relative_eq!(fov, 75f32.to_radians());
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::perspective(800, 600);
        let view = camera.view_matrix();
        assert!(view.norm() > 0.0);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let origin = Point3::origin();
        let persp = Camera::perspective(400, 400);
        let ndc = Camera::project(&persp.view_projection(), &origin).unwrap();
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-5);

        for view in OrthoView::ALL {
            let cam = Camera::orthographic(view, Camera::ORTHO_HALF_EXTENT);
            let ndc = Camera::project(&cam.view_projection(), &origin).unwrap();
            assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-5);
            assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_orthographic_axes() {
        // Front view: +X right, +Y up
        let front = Camera::orthographic(OrthoView::Front, 5.0);
        let p = Camera::project(&front.view_projection(), &Point3::new(2.5, 5.0, 0.0)).unwrap();
        assert_relative_eq!(p.x, 0.5, epsilon = 1e-5);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-5);

        // Top view: +X right, -Z up
        let top = Camera::orthographic(OrthoView::Top, 5.0);
        let p = Camera::project(&top.view_projection(), &Point3::new(5.0, 0.0, -2.5)).unwrap();
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 0.5, epsilon = 1e-5);

        // Side view: looking down -X, so +Z points left
        let side = Camera::orthographic(OrthoView::Side, 5.0);
        let p = Camera::project(&side.view_projection(), &Point3::new(0.0, 0.0, 5.0)).unwrap();
        assert_relative_eq!(p.x, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_point_behind_camera_is_rejected() {
        let camera = Camera::perspective(400, 400);
        let behind = Point3::new(10.0, 10.0, 10.0);
        assert!(Camera::project(&camera.view_projection(), &behind).is_none());
    }

    #[test]
    fn test_orbit_round_trip() {
        let mut camera = Camera::perspective(400, 300);
        let orbit = OrbitController::from_camera(&camera);
        assert_relative_eq!(orbit.distance, 75f32.sqrt(), epsilon = 1e-5);
        assert_relative_eq!(orbit.azimuth, std::f32::consts::FRAC_PI_4, epsilon = 1e-5);

        orbit.apply(&mut camera);
        assert_relative_eq!(camera.position, Point3::new(5.0, 5.0, 5.0), epsilon = 1e-4);
    }

    #[test]
    fn test_orbit_zoom_and_pan() {
        let mut orbit = OrbitController::from_camera(&Camera::default());
        let before = orbit.distance;

        orbit.orbit(0.0, 10.0);
        assert!(orbit.elevation < std::f32::consts::FRAC_PI_2);

        orbit.zoom(0.5);
        assert_relative_eq!(orbit.distance, before * 0.5, epsilon = 1e-5);
        orbit.zoom(1e-6);
        assert_eq!(orbit.distance, OrbitController::MIN_DISTANCE);

        let mut panned = OrbitController::from_camera(&Camera::default());
        panned.pan(0.1, 0.0);
        assert!(panned.target != Point3::origin());
        assert_relative_eq!(panned.distance, before);
    }
}
