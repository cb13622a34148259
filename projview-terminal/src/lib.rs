/// Terminal front end for projview: one perspective view and three
/// orthographic views of the same object, drawn as ASCII in separate panes
/// and kept in sync with a shared set of transform parameters.
pub mod app;
pub mod config;
pub mod controls;
pub mod error;
pub mod logging;
pub mod renderer;
pub mod surface;
pub mod sync;
pub mod viewport;

pub use app::{TerminalApp, TerminalHost};
pub use config::{Layout, ViewerConfig};
pub use controls::{run_command, ControlPanel, SliderSpec};
pub use error::{Error, Result, SurfaceError, ViewportError};
pub use logging::{init_logging, LoggingConfig};
pub use renderer::{render_scene, Framebuffer};
pub use surface::{HostArea, PaneRect, RenderTarget, TerminalPane};
pub use sync::{CancelToken, FrameContext, FrameHost, FrameTask, RunSummary, SyncLoop, TickReport};
pub use viewport::{
    Navigation, TeardownReport, ViewRole, Viewport, ViewportHandle, ViewportRegistry,
    ViewportSpec, ViewportStatus,
};
