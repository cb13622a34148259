/// Per-frame synchronization of the shared transform across viewports
use std::cell::Cell;
use std::rc::Rc;

use projview_core::{
    format_matrix, MatrixGrid, ParameterStore, Transform, TransformMatrix, TransformParameters,
};

use crate::error::{Result, SurfaceError};
use crate::viewport::{TeardownReport, ViewRole, ViewportRegistry};

/// What happened during one tick
#[derive(Debug)]
pub struct TickReport {
    pub frame_index: u64,
    /// Whether the display matrix was recomposed this tick
    pub recomputed: bool,
    pub rendered: Vec<ViewRole>,
    pub failed: Vec<(ViewRole, SurfaceError)>,
}

/// Drives one frame at a time: compose, propagate, render.
///
/// The matrix shown and the fields written onto every object come from the
/// same parameter snapshot within a tick.
pub struct SyncLoop {
    viewports: ViewportRegistry,
    /// Parameters the display matrix was composed from
    composed_from: Option<TransformParameters>,
    matrix: TransformMatrix,
    formatted: MatrixGrid,
    frame_index: u64,
}

impl SyncLoop {
    pub fn new(viewports: ViewportRegistry) -> Self {
        let matrix = TransformMatrix::identity();
        Self {
            viewports,
            composed_from: None,
            formatted: format_matrix(&matrix),
            matrix,
            frame_index: 0,
        }
    }

    pub fn viewports(&self) -> &ViewportRegistry {
        &self.viewports
    }

    pub fn viewports_mut(&mut self) -> &mut ViewportRegistry {
        &mut self.viewports
    }

    /// Matrix composed from the snapshot of the latest tick
    pub fn display_matrix(&self) -> &TransformMatrix {
        &self.matrix
    }

    pub fn formatted_matrix(&self) -> &MatrixGrid {
        &self.formatted
    }

    /// Number of ticks run so far
    pub fn frames(&self) -> u64 {
        self.frame_index
    }

    pub fn tick(&mut self, store: &ParameterStore) -> TickReport {
        let frame_index = self.frame_index;
        self.frame_index += 1;

        let params = store.get();
        let recomputed = !self
            .composed_from
            .is_some_and(|last| last.same_bits(&params));
        if recomputed {
            self.matrix = Transform::compose(&params);
            self.formatted = format_matrix(&self.matrix);
            self.composed_from = Some(params);
            log::debug!(
                "frame {}: recomposed matrix for revision {}",
                frame_index,
                store.revision()
            );
        }

        let (master, auxiliaries) = self.viewports.split_master_mut();
        match master {
            Some(master) => {
                master.object.set_transform(&params);
                for viewport in auxiliaries.iter_mut() {
                    viewport.object.copy_transform_from(&master.object);
                }
            }
            None => {
                for viewport in auxiliaries.iter_mut() {
                    viewport.object.set_transform(&params);
                }
            }
        }

        let mut rendered = Vec::with_capacity(self.viewports.len());
        let mut failed = Vec::new();
        for viewport in self.viewports.iter_mut() {
            match viewport.render() {
                Ok(()) => {
                    viewport.mark_rendered(frame_index);
                    rendered.push(viewport.role());
                }
                Err(e) => {
                    viewport.mark_lost(frame_index, &e);
                    failed.push((viewport.role(), e));
                }
            }
        }

        TickReport {
            frame_index,
            recomputed,
            rendered,
            failed,
        }
    }

    /// Release every viewport
    pub fn shutdown(&mut self) -> TeardownReport {
        self.viewports.release_all()
    }
}

/// Shared stop flag for a [`FrameTask`]
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Everything the host may touch between two frames
pub struct FrameContext<'a> {
    pub store: &'a mut ParameterStore,
    pub sync: &'a mut SyncLoop,
    pub cancel: &'a CancelToken,
    pub report: &'a TickReport,
}

/// The scheduler side of the frame loop: input, pacing and UI output
pub trait FrameHost {
    /// Runs after every tick. Returning an error stops the loop.
    fn between_frames(&mut self, ctx: FrameContext<'_>) -> Result<()>;

    /// Runs once when the loop stops, before viewports are released
    fn on_stop(&mut self) {}
}

#[derive(Debug)]
pub struct RunSummary {
    pub frames: u64,
    pub teardown: TeardownReport,
}

/// A frame loop with an owned cancellation token.
///
/// `run` consumes the task, so nothing of the loop outlives it; every
/// viewport is released on the way out, including when the host fails.
pub struct FrameTask {
    sync: SyncLoop,
    cancel: CancelToken,
}

impl FrameTask {
    pub fn new(sync: SyncLoop) -> Self {
        Self {
            sync,
            cancel: CancelToken::new(),
        }
    }

    /// A handle the host can use to stop the loop
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn run<H: FrameHost>(mut self, store: &mut ParameterStore, host: &mut H) -> Result<RunSummary> {
        let result = loop {
            if self.cancel.is_cancelled() {
                break Ok(());
            }
            let report = self.sync.tick(store);
            let ctx = FrameContext {
                store: &mut *store,
                sync: &mut self.sync,
                cancel: &self.cancel,
                report: &report,
            };
            if let Err(e) = host.between_frames(ctx) {
                log::error!("frame loop stopped by host error: {}", e);
                break Err(e);
            }
        };

        host.on_stop();
        let teardown = self.sync.shutdown();
        log::info!(
            "frame loop stopped after {} frames, released {} viewports",
            self.sync.frames(),
            teardown.released
        );

        result.map(|()| RunSummary {
            frames: self.sync.frames(),
            teardown,
        })
    }
}
