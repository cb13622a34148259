/// Viewport registry: one camera, render target and object copy per view
use std::fmt;
use std::rc::Rc;

use projview_core::{Camera, LineMesh, OrbitController, OrthoView, RenderableObject};

use crate::error::{SurfaceError, ViewportError};
use crate::renderer::{render_scene, Framebuffer, CELL_ASPECT};
use crate::surface::{PaneRect, RenderTarget};

/// Role of a viewport; the derived order is the render order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewRole {
    Main,
    Top,
    Front,
    Side,
}

impl ViewRole {
    pub fn title(self) -> &'static str {
        match self {
            ViewRole::Main => "Main 3D View",
            ViewRole::Top => "Top View (XZ plane)",
            ViewRole::Front => "Front View (XY plane)",
            ViewRole::Side => "Side View (YZ plane)",
        }
    }
}

impl From<OrthoView> for ViewRole {
    fn from(view: OrthoView) -> Self {
        match view {
            OrthoView::Top => ViewRole::Top,
            OrthoView::Front => ViewRole::Front,
            OrthoView::Side => ViewRole::Side,
        }
    }
}

impl fmt::Display for ViewRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewRole::Main => "main",
            ViewRole::Top => "top",
            ViewRole::Front => "front",
            ViewRole::Side => "side",
        };
        f.write_str(name)
    }
}

/// What to create: role, camera, and where pointer input lands
#[derive(Debug, Clone)]
pub struct ViewportSpec {
    pub role: ViewRole,
    pub camera: Camera,
    pub input_region: Option<PaneRect>,
}

impl ViewportSpec {
    /// Perspective master view
    pub fn main(camera: Camera) -> Self {
        Self {
            role: ViewRole::Main,
            camera,
            input_region: None,
        }
    }

    /// Fixed axis-aligned orthographic view
    pub fn orthographic(view: OrthoView, half_extent: f32) -> Self {
        Self {
            role: view.into(),
            camera: Camera::orthographic(view, half_extent),
            input_region: None,
        }
    }

    /// Route pointer input inside `region` to this viewport's navigation
    pub fn with_input_region(mut self, region: PaneRect) -> Self {
        self.input_region = Some(region);
        self
    }
}

/// Stable reference to a registered viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewportHandle {
    id: u64,
    role: ViewRole,
}

impl ViewportHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn role(&self) -> ViewRole {
        self.role
    }
}

/// Camera navigation request for a perspective viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Navigation {
    Orbit { d_azimuth: f32, d_elevation: f32 },
    Pan { dx: f32, dy: f32 },
    Zoom(f32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewportStatus {
    Active,
    Lost { since_frame: u64, reason: String },
}

/// One view: camera, private object copy, framebuffer and render target
pub struct Viewport {
    handle: ViewportHandle,
    pub camera: Camera,
    orbit: Option<OrbitController>,
    pub object: RenderableObject,
    framebuffer: Framebuffer,
    target: Box<dyn RenderTarget>,
    status: ViewportStatus,
}

impl Viewport {
    pub fn handle(&self) -> ViewportHandle {
        self.handle
    }

    pub fn role(&self) -> ViewRole {
        self.handle.role
    }

    pub fn status(&self) -> &ViewportStatus {
        &self.status
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn is_navigable(&self) -> bool {
        self.orbit.is_some()
    }

    /// Rasterize the object and hand the frame to the target
    pub fn render(&mut self) -> Result<(), SurfaceError> {
        let (width, height) = self.target.size();
        self.framebuffer.resize(width, height);
        self.camera
            .set_viewport_size(width as u32, (height as f32 * CELL_ASPECT) as u32);
        render_scene(&mut self.framebuffer, &self.object, &self.camera);
        self.target.present(&self.framebuffer)
    }

    pub(crate) fn mark_rendered(&mut self, frame_index: u64) -> Option<ViewportStatus> {
        let previous = std::mem::replace(&mut self.status, ViewportStatus::Active);
        match previous {
            ViewportStatus::Active => None,
            lost => {
                log::info!("{} viewport recovered at frame {}", self.role(), frame_index);
                Some(lost)
            }
        }
    }

    pub(crate) fn mark_lost(&mut self, frame_index: u64, err: &SurfaceError) {
        match &self.status {
            ViewportStatus::Active => {
                log::warn!("{} viewport suspended: {}", self.role(), err);
                self.status = ViewportStatus::Lost {
                    since_frame: frame_index,
                    reason: err.to_string(),
                };
            }
            ViewportStatus::Lost { .. } => {
                log::debug!("{} viewport still unavailable: {}", self.role(), err);
            }
        }
    }

    fn navigate(&mut self, navigation: Navigation) -> Result<(), ViewportError> {
        let orbit = self
            .orbit
            .as_mut()
            .ok_or(ViewportError::NotNavigable(self.handle.role))?;
        match navigation {
            Navigation::Orbit {
                d_azimuth,
                d_elevation,
            } => orbit.orbit(d_azimuth, d_elevation),
            Navigation::Pan { dx, dy } => orbit.pan(dx, dy),
            Navigation::Zoom(factor) => orbit.zoom(factor),
        }
        orbit.apply(&mut self.camera);
        Ok(())
    }
}

/// Pointer region bound to a navigable viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InputBinding {
    viewport: ViewportHandle,
    region: PaneRect,
}

/// Result of releasing viewports
#[derive(Debug, Default)]
pub struct TeardownReport {
    pub released: usize,
    pub errors: Vec<(ViewRole, SurfaceError)>,
}

impl TeardownReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Owns every viewport and its resources.
///
/// Viewports are kept sorted by [`ViewRole`], so iteration yields the master
/// first and then top, front, side. Dropping the registry releases whatever
/// is still registered.
pub struct ViewportRegistry {
    mesh: Rc<LineMesh>,
    viewports: Vec<Viewport>,
    bindings: Vec<InputBinding>,
    next_id: u64,
}

impl ViewportRegistry {
    pub fn new(mesh: Rc<LineMesh>) -> Self {
        Self {
            mesh,
            viewports: Vec::new(),
            bindings: Vec::new(),
            next_id: 1,
        }
    }

    pub fn create_viewport(
        &mut self,
        spec: ViewportSpec,
        target: Box<dyn RenderTarget>,
    ) -> Result<ViewportHandle, ViewportError> {
        if self.viewports.iter().any(|v| v.role() == spec.role) {
            // The target never became ours to keep; give it back its resources
            let mut target = target;
            if let Err(e) = target.release() {
                log::warn!("failed to release rejected {} target: {}", spec.role, e);
            }
            return Err(ViewportError::DuplicateRole(spec.role));
        }

        let handle = ViewportHandle {
            id: self.next_id,
            role: spec.role,
        };
        self.next_id += 1;

        let orbit = spec
            .camera
            .is_perspective()
            .then(|| OrbitController::from_camera(&spec.camera));
        if let (Some(region), true) = (spec.input_region, orbit.is_some()) {
            self.bindings.push(InputBinding {
                viewport: handle,
                region,
            });
        }

        let (width, height) = target.size();
        let viewport = Viewport {
            handle,
            camera: spec.camera,
            orbit,
            object: RenderableObject::new(Rc::clone(&self.mesh)),
            framebuffer: Framebuffer::new(width, height),
            target,
            status: ViewportStatus::Active,
        };

        let at = self
            .viewports
            .partition_point(|v| v.role() < handle.role);
        self.viewports.insert(at, viewport);

        log::debug!("created {} viewport ({}x{} cells)", handle.role, width, height);
        Ok(handle)
    }

    /// Handles in render order
    pub fn list_viewports(&self) -> Vec<ViewportHandle> {
        self.viewports.iter().map(Viewport::handle).collect()
    }

    pub fn len(&self) -> usize {
        self.viewports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.viewports.is_empty()
    }

    pub fn get(&self, handle: ViewportHandle) -> Option<&Viewport> {
        self.viewports.iter().find(|v| v.handle == handle)
    }

    pub fn get_mut(&mut self, handle: ViewportHandle) -> Option<&mut Viewport> {
        self.viewports.iter_mut().find(|v| v.handle == handle)
    }

    pub fn by_role(&self, role: ViewRole) -> Option<&Viewport> {
        self.viewports.iter().find(|v| v.role() == role)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Viewport> {
        self.viewports.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Viewport> {
        self.viewports.iter_mut()
    }

    /// The master viewport, if registered, and the auxiliaries in order
    pub fn split_master_mut(&mut self) -> (Option<&mut Viewport>, &mut [Viewport]) {
        let has_master = self
            .viewports
            .first()
            .is_some_and(|v| v.role() == ViewRole::Main);
        let (head, rest) = self.viewports.split_at_mut(usize::from(has_master));
        (head.first_mut(), rest)
    }

    pub fn mesh(&self) -> &Rc<LineMesh> {
        &self.mesh
    }

    /// Move the camera of a perspective viewport; other viewports are untouched
    pub fn navigate(
        &mut self,
        handle: ViewportHandle,
        navigation: Navigation,
    ) -> Result<(), ViewportError> {
        self.get_mut(handle)
            .ok_or(ViewportError::UnknownViewport(handle.id))?
            .navigate(navigation)
    }

    /// Viewport whose input region contains the given cell
    pub fn hit_test(&self, col: u16, row: u16) -> Option<ViewportHandle> {
        self.bindings
            .iter()
            .find(|b| b.region.contains(col, row))
            .map(|b| b.viewport)
    }

    pub fn attached_inputs(&self) -> usize {
        self.bindings.len()
    }

    /// Release one viewport: detach its input and free its render target
    pub fn release(&mut self, handle: ViewportHandle) -> Result<(), ViewportError> {
        let index = self
            .viewports
            .iter()
            .position(|v| v.handle == handle)
            .ok_or(ViewportError::UnknownViewport(handle.id))?;
        let viewport = self.viewports.remove(index);
        self.bindings.retain(|b| b.viewport != handle);
        if let Err((role, e)) = release_viewport(viewport) {
            log::warn!("releasing {} viewport failed: {}", role, e);
        }
        Ok(())
    }

    /// Release every viewport, continuing past individual failures
    pub fn release_all(&mut self) -> TeardownReport {
        self.bindings.clear();

        let mut report = TeardownReport::default();
        for viewport in self.viewports.drain(..) {
            report.released += 1;
            if let Err((role, e)) = release_viewport(viewport) {
                log::warn!("releasing {} viewport failed: {}", role, e);
                report.errors.push((role, e));
            }
        }
        if report.released > 0 {
            log::debug!("released {} viewports", report.released);
        }
        report
    }
}

fn release_viewport(mut viewport: Viewport) -> Result<(), (ViewRole, SurfaceError)> {
    viewport
        .target
        .release()
        .map_err(|e| (viewport.role(), e))
}

impl Drop for ViewportRegistry {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use projview_core::build_shape;
    use std::cell::Cell;

    struct NullTarget {
        released: Rc<Cell<usize>>,
    }

    impl RenderTarget for NullTarget {
        fn size(&self) -> (usize, usize) {
            (8, 4)
        }

        fn present(&mut self, _frame: &Framebuffer) -> Result<(), SurfaceError> {
            Ok(())
        }

        fn release(&mut self) -> Result<(), SurfaceError> {
            self.released.set(self.released.get() + 1);
            Ok(())
        }
    }

    fn registry() -> ViewportRegistry {
        ViewportRegistry::new(Rc::new(build_shape().unwrap()))
    }

    fn target(released: &Rc<Cell<usize>>) -> Box<dyn RenderTarget> {
        Box::new(NullTarget {
            released: released.clone(),
        })
    }

    fn full_set(registry: &mut ViewportRegistry, released: &Rc<Cell<usize>>) -> ViewportHandle {
        // Registered out of order on purpose
        for view in [OrthoView::Side, OrthoView::Top] {
            registry
                .create_viewport(ViewportSpec::orthographic(view, 5.0), target(released))
                .unwrap();
        }
        let main = registry
            .create_viewport(
                ViewportSpec::main(Camera::perspective(80, 40))
                    .with_input_region(PaneRect::new(0, 0, 40, 20)),
                target(released),
            )
            .unwrap();
        registry
            .create_viewport(
                ViewportSpec::orthographic(OrthoView::Front, 5.0),
                target(released),
            )
            .unwrap();
        main
    }

    #[test]
    fn test_list_order_is_master_then_top_front_side() {
        let released = Rc::new(Cell::new(0));
        let mut registry = registry();
        full_set(&mut registry, &released);

        let roles: Vec<_> = registry.list_viewports().iter().map(|h| h.role()).collect();
        assert_eq!(
            roles,
            vec![ViewRole::Main, ViewRole::Top, ViewRole::Front, ViewRole::Side]
        );
    }

    #[test]
    fn test_viewports_share_mesh_but_not_transform() {
        let released = Rc::new(Cell::new(0));
        let mut registry = registry();
        full_set(&mut registry, &released);

        let (master, aux) = registry.split_master_mut();
        let master = master.unwrap();
        master.object.scale.x = 2.0;
        for viewport in aux.iter() {
            assert!(viewport.object.shares_mesh_with(&master.object));
            assert_eq!(viewport.object.scale.x, 1.0);
        }
    }

    #[test]
    fn test_duplicate_role_is_rejected() {
        let released = Rc::new(Cell::new(0));
        let mut registry = registry();
        registry
            .create_viewport(ViewportSpec::orthographic(OrthoView::Top, 5.0), target(&released))
            .unwrap();
        let err = registry
            .create_viewport(ViewportSpec::orthographic(OrthoView::Top, 5.0), target(&released))
            .unwrap_err();
        assert_eq!(err, ViewportError::DuplicateRole(ViewRole::Top));
        assert_eq!(released.get(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_navigation_only_moves_master_camera() {
        let released = Rc::new(Cell::new(0));
        let mut registry = registry();
        let main = full_set(&mut registry, &released);
        let before: Vec<Camera> = registry.iter().map(|v| v.camera.clone()).collect();

        registry
            .navigate(main, Navigation::Orbit { d_azimuth: 0.3, d_elevation: 0.1 })
            .unwrap();
        registry.navigate(main, Navigation::Zoom(0.5)).unwrap();

        let after: Vec<Camera> = registry.iter().map(|v| v.camera.clone()).collect();
        assert_ne!(before[0], after[0]);
        assert_eq!(before[1..], after[1..]);
        for viewport in registry.iter() {
            assert_eq!(viewport.object.scale.x, 1.0);
        }
    }

    #[test]
    fn test_orthographic_viewport_is_not_navigable() {
        let released = Rc::new(Cell::new(0));
        let mut registry = registry();
        full_set(&mut registry, &released);
        let top = registry.by_role(ViewRole::Top).unwrap().handle();
        assert_eq!(
            registry.navigate(top, Navigation::Zoom(2.0)),
            Err(ViewportError::NotNavigable(ViewRole::Top))
        );
    }

    #[test]
    fn test_hit_test_and_release_detach_input() {
        let released = Rc::new(Cell::new(0));
        let mut registry = registry();
        let main = full_set(&mut registry, &released);

        assert_eq!(registry.hit_test(10, 10), Some(main));
        assert_eq!(registry.hit_test(50, 10), None);
        assert_eq!(registry.attached_inputs(), 1);

        registry.release(main).unwrap();
        assert_eq!(registry.attached_inputs(), 0);
        assert_eq!(registry.hit_test(10, 10), None);
        assert_eq!(released.get(), 1);
        assert_eq!(
            registry.release(main),
            Err(ViewportError::UnknownViewport(main.id()))
        );
    }

    #[test]
    fn test_drop_releases_everything() {
        let released = Rc::new(Cell::new(0));
        {
            let mut registry = registry();
            full_set(&mut registry, &released);
        }
        assert_eq!(released.get(), 4);
    }

    #[test]
    fn test_render_fills_framebuffer() {
        let released = Rc::new(Cell::new(0));
        let mut registry = registry();
        full_set(&mut registry, &released);
        for viewport in registry.iter_mut() {
            viewport.render().unwrap();
            assert!(viewport.framebuffer().filled_cells() > 0);
        }
    }
}
