/// Create/run/destroy cycles of the full four-view setup
use std::cell::Cell;
use std::rc::Rc;

use projview_core::{build_shape, Axis, AxisGroup, Camera, OrthoView, ParamEdit, ParameterStore};
use projview_terminal::{
    FrameContext, FrameHost, FrameTask, Framebuffer, PaneRect, RenderTarget, Result,
    SurfaceError, SyncLoop, ViewRole, ViewportRegistry, ViewportSpec,
};

/// Counts live targets through a shared counter
struct CountingTarget {
    live: Rc<Cell<i64>>,
    released: bool,
}

impl CountingTarget {
    fn new(live: &Rc<Cell<i64>>) -> Self {
        live.set(live.get() + 1);
        Self {
            live: Rc::clone(live),
            released: false,
        }
    }
}

impl RenderTarget for CountingTarget {
    fn size(&self) -> (usize, usize) {
        (20, 10)
    }

    fn present(&mut self, _frame: &Framebuffer) -> std::result::Result<(), SurfaceError> {
        if self.released {
            return Err(SurfaceError::Released);
        }
        Ok(())
    }

    fn release(&mut self) -> std::result::Result<(), SurfaceError> {
        if !self.released {
            self.released = true;
            self.live.set(self.live.get() - 1);
        }
        Ok(())
    }
}

fn four_views(live: &Rc<Cell<i64>>) -> ViewportRegistry {
    let mut registry = ViewportRegistry::new(Rc::new(build_shape().unwrap()));
    registry
        .create_viewport(
            ViewportSpec::main(Camera::perspective(40, 20))
                .with_input_region(PaneRect::new(0, 1, 40, 20)),
            Box::new(CountingTarget::new(live)),
        )
        .unwrap();
    for view in OrthoView::ALL {
        registry
            .create_viewport(
                ViewportSpec::orthographic(view, Camera::ORTHO_HALF_EXTENT),
                Box::new(CountingTarget::new(live)),
            )
            .unwrap();
    }
    registry
}

/// Edits the rotation once per frame, then stops
struct Spinner {
    frames: u64,
    starts: Rc<Cell<u32>>,
    stops: Rc<Cell<u32>>,
    seen: u64,
}

impl FrameHost for Spinner {
    fn between_frames(&mut self, ctx: FrameContext<'_>) -> Result<()> {
        if self.seen == 0 {
            self.starts.set(self.starts.get() + 1);
        }
        self.seen += 1;

        // Every viewport carries the transform of the snapshot just rendered
        let expected = ctx.store.get();
        for viewport in ctx.sync.viewports().iter() {
            assert_eq!(viewport.object.transform(), expected);
        }

        ctx.store.apply(ParamEdit::new(
            AxisGroup::Rotation,
            Axis::Y,
            self.seen as f32 * 0.1,
        ));
        if self.seen >= self.frames {
            ctx.cancel.cancel();
        }
        Ok(())
    }

    fn on_stop(&mut self) {
        self.stops.set(self.stops.get() + 1);
    }
}

#[test]
fn repeated_cycles_leave_nothing_behind() {
    let live = Rc::new(Cell::new(0));
    let starts = Rc::new(Cell::new(0));
    let stops = Rc::new(Cell::new(0));

    for cycle in 0..25 {
        let registry = four_views(&live);
        assert_eq!(live.get(), 4);
        assert_eq!(registry.attached_inputs(), 1);

        let task = FrameTask::new(SyncLoop::new(registry));
        let mut host = Spinner {
            frames: 3 + cycle % 4,
            starts: Rc::clone(&starts),
            stops: Rc::clone(&stops),
            seen: 0,
        };
        let summary = task.run(&mut ParameterStore::new(), &mut host).unwrap();

        assert_eq!(summary.frames, 3 + cycle % 4);
        assert_eq!(summary.teardown.released, 4);
        assert!(summary.teardown.is_clean());
        assert_eq!(live.get(), 0);
    }
    assert_eq!(starts.get(), 25);
    assert_eq!(stops.get(), 25);
}

#[test]
fn dropping_a_registry_releases_its_targets() {
    let live = Rc::new(Cell::new(0));
    {
        let mut sync = SyncLoop::new(four_views(&live));
        sync.tick(&ParameterStore::new());
        assert_eq!(live.get(), 4);
    }
    assert_eq!(live.get(), 0);
}

#[test]
fn released_viewport_is_gone_and_others_keep_rendering() {
    let live = Rc::new(Cell::new(0));
    let mut registry = four_views(&live);
    let side = registry.by_role(ViewRole::Side).unwrap().handle();
    registry.release(side).unwrap();
    assert_eq!(live.get(), 3);
    assert!(registry.get(side).is_none());
    assert!(registry.release(side).is_err());

    let mut sync = SyncLoop::new(registry);
    let report = sync.tick(&ParameterStore::new());
    assert_eq!(
        report.rendered,
        vec![ViewRole::Main, ViewRole::Top, ViewRole::Front]
    );
}

#[test]
fn displayed_matrix_is_stable_without_edits() {
    let live = Rc::new(Cell::new(0));
    let mut sync = SyncLoop::new(four_views(&live));
    let mut store = ParameterStore::new();
    store.apply(ParamEdit::new(AxisGroup::Translation, Axis::X, 3.0));
    store.apply(ParamEdit::new(AxisGroup::Scale, Axis::Y, 2.0));

    sync.tick(&store);
    let first = sync.formatted_matrix().clone();
    assert_eq!(first[0][3], "3.00");
    assert_eq!(first[1][1], "2.00");

    for _ in 0..10 {
        let report = sync.tick(&store);
        assert!(!report.recomputed);
        assert_eq!(sync.formatted_matrix(), &first);
    }
}

#[test]
fn orbiting_the_main_view_leaves_orthographic_cameras_alone() {
    let live = Rc::new(Cell::new(0));
    let mut registry = four_views(&live);
    let top_before = registry.by_role(ViewRole::Top).unwrap().camera.position;

    let main = registry.hit_test(5, 5).unwrap();
    assert_eq!(main.role(), ViewRole::Main);
    let before = registry.get(main).unwrap().camera.position;
    registry
        .navigate(
            main,
            projview_terminal::Navigation::Orbit {
                d_azimuth: 0.5,
                d_elevation: 0.2,
            },
        )
        .unwrap();

    assert_ne!(registry.get(main).unwrap().camera.position, before);
    assert_eq!(
        registry.by_role(ViewRole::Top).unwrap().camera.position,
        top_before
    );

    let top = registry.by_role(ViewRole::Top).unwrap().handle();
    assert!(registry
        .navigate(top, projview_terminal::Navigation::Zoom(0.5))
        .is_err());
}
