/// Terminal front end: layout, input handling and the readout panel
use std::io::{stdout, Stdout, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use projview_core::{Axis, AxisGroup, Camera, LineMesh, ParameterStore};

use crate::config::{Layout, ViewerConfig};
use crate::controls::ControlPanel;
use crate::error::Result;
use crate::surface::{HostArea, TerminalPane};
use crate::sync::{FrameContext, FrameHost, FrameTask, RunSummary, SyncLoop};
use crate::viewport::{Navigation, ViewRole, ViewportHandle, ViewportRegistry, ViewportSpec};

const ORBIT_STEP: f32 = 0.1;
const DRAG_ORBIT_PER_CELL: f32 = 0.05;
const DRAG_PAN_PER_CELL: f32 = 0.01;

/// Main application struct for the terminal viewer
pub struct TerminalApp {
    mesh: Rc<LineMesh>,
    config: ViewerConfig,
}

impl TerminalApp {
    pub fn new(mesh: LineMesh, config: ViewerConfig) -> Self {
        Self {
            mesh: Rc::new(mesh),
            config,
        }
    }

    pub fn run(&mut self) -> Result<RunSummary> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> Result<RunSummary> {
        let (cols, rows) = terminal::size()?;
        let host_area = HostArea::new(cols, rows);
        let layout = Layout::compute(cols, rows, &self.config);

        let mut registry = ViewportRegistry::new(Rc::clone(&self.mesh));
        let camera = Camera::perspective(layout.main.width as u32, layout.main.height as u32 * 2);
        registry.create_viewport(
            ViewportSpec::main(camera).with_input_region(layout.main),
            Box::new(TerminalPane::new(
                stdout(),
                layout.main,
                ViewRole::Main.title(),
                host_area.clone(),
            )),
        )?;
        for (view, rect) in &layout.ortho {
            registry.create_viewport(
                ViewportSpec::orthographic(*view, self.config.ortho_half_extent),
                Box::new(TerminalPane::new(
                    stdout(),
                    *rect,
                    ViewRole::from(*view).title(),
                    host_area.clone(),
                )),
            )?;
        }

        let task = FrameTask::new(SyncLoop::new(registry));
        let mut store = ParameterStore::new();
        let mut host = TerminalHost::new(self.config.clone(), layout, host_area);
        task.run(&mut store, &mut host)
    }
}

/// Drag in progress on a navigable viewport
#[derive(Debug, Clone, Copy)]
struct Drag {
    viewport: ViewportHandle,
    button: MouseButton,
    col: u16,
    row: u16,
}

/// Frame host for the terminal: pacing, keyboard/mouse input, readout
pub struct TerminalHost {
    out: Stdout,
    config: ViewerConfig,
    layout: Layout,
    host_area: HostArea,
    controls: ControlPanel,
    drag: Option<Drag>,
    frame_start: Instant,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalHost {
    fn new(config: ViewerConfig, layout: Layout, host_area: HostArea) -> Self {
        let now = Instant::now();
        Self {
            out: stdout(),
            config,
            layout,
            host_area,
            controls: ControlPanel::new(),
            drag: None,
            frame_start: now,
            last_fps_sample: now,
            frame_count: 0,
            fps: 0.0,
        }
    }

    fn handle_event(&mut self, event: Event, ctx: &mut FrameContext<'_>) -> Result<()> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key, ctx),
            Event::Mouse(mouse) => self.handle_mouse(mouse, ctx),
            Event::Resize(cols, rows) => {
                self.host_area.set(cols, rows);
                queue!(self.out, terminal::Clear(ClearType::All))?;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut FrameContext<'_>) {
        if self.controls.is_editing_command() {
            match key.code {
                KeyCode::Enter => self.controls.submit_command(ctx.store),
                KeyCode::Esc => self.controls.cancel_command(),
                KeyCode::Backspace => self.controls.pop_char(),
                KeyCode::Char(c) => self.controls.push_char(c),
                _ => {}
            }
            return;
        }

        let orbit = |d_azimuth, d_elevation| Navigation::Orbit {
            d_azimuth,
            d_elevation,
        };
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => ctx.cancel.cancel(),
            KeyCode::Char(':') => self.controls.begin_command(),
            KeyCode::Char('1') => self.controls.select_group(AxisGroup::Scale),
            KeyCode::Char('2') => self.controls.select_group(AxisGroup::Rotation),
            KeyCode::Char('3') => self.controls.select_group(AxisGroup::Translation),
            KeyCode::Tab => self.controls.cycle_group(),
            KeyCode::Char('x') => self.controls.select_axis(Axis::X),
            KeyCode::Char('y') => self.controls.select_axis(Axis::Y),
            KeyCode::Char('z') => self.controls.select_axis(Axis::Z),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => {
                self.controls.nudge(ctx.store, 1);
            }
            KeyCode::Char('-') | KeyCode::Left => {
                self.controls.nudge(ctx.store, -1);
            }
            KeyCode::Char('0') => {
                ctx.store.reset();
            }
            KeyCode::Char('w') | KeyCode::Up => self.navigate_main(ctx, orbit(0.0, ORBIT_STEP)),
            KeyCode::Char('s') | KeyCode::Down => {
                self.navigate_main(ctx, orbit(0.0, -ORBIT_STEP))
            }
            KeyCode::Char('a') => self.navigate_main(ctx, orbit(-ORBIT_STEP, 0.0)),
            KeyCode::Char('d') => self.navigate_main(ctx, orbit(ORBIT_STEP, 0.0)),
            KeyCode::PageUp => self.navigate_main(ctx, Navigation::Zoom(0.9)),
            KeyCode::PageDown => self.navigate_main(ctx, Navigation::Zoom(1.1)),
            _ => {}
        }
    }

    fn navigate_main(&mut self, ctx: &mut FrameContext<'_>, navigation: Navigation) {
        let viewports = ctx.sync.viewports_mut();
        if let Some(main) = viewports.by_role(ViewRole::Main).map(|v| v.handle()) {
            if let Err(e) = viewports.navigate(main, navigation) {
                log::debug!("navigation ignored: {}", e);
            }
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, ctx: &mut FrameContext<'_>) {
        let viewports = ctx.sync.viewports_mut();
        match mouse.kind {
            MouseEventKind::Down(button) => {
                self.drag = viewports
                    .hit_test(mouse.column, mouse.row)
                    .map(|viewport| Drag {
                        viewport,
                        button,
                        col: mouse.column,
                        row: mouse.row,
                    });
            }
            MouseEventKind::Drag(_) => {
                let Some(drag) = self.drag.as_mut() else {
                    return;
                };
                let dx = mouse.column as f32 - drag.col as f32;
                let dy = mouse.row as f32 - drag.row as f32;
                drag.col = mouse.column;
                drag.row = mouse.row;
                let navigation = match drag.button {
                    MouseButton::Left => Navigation::Orbit {
                        d_azimuth: -dx * DRAG_ORBIT_PER_CELL,
                        d_elevation: dy * DRAG_ORBIT_PER_CELL * 2.0,
                    },
                    _ => Navigation::Pan {
                        dx: -dx * DRAG_PAN_PER_CELL,
                        dy: dy * DRAG_PAN_PER_CELL * 2.0,
                    },
                };
                if let Err(e) = viewports.navigate(drag.viewport, navigation) {
                    log::debug!("drag ignored: {}", e);
                }
            }
            MouseEventKind::Up(_) => self.drag = None,
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                if let Some(viewport) = viewports.hit_test(mouse.column, mouse.row) {
                    let factor = if mouse.kind == MouseEventKind::ScrollUp { 0.9 } else { 1.1 };
                    if let Err(e) = viewports.navigate(viewport, Navigation::Zoom(factor)) {
                        log::debug!("zoom ignored: {}", e);
                    }
                }
            }
            _ => {}
        }
    }

    fn draw_overlay(&mut self, ctx: &FrameContext<'_>) -> Result<()> {
        let (cols, rows) = self.host_area.get();
        let width = cols as usize;

        queue!(
            self.out,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(fit(
                &format!(
                    "projview | FPS: {:.1} | 1/2/3,Tab=group x/y/z=axis +/-=adjust :=command 0=reset WASD/drag=orbit q=quit",
                    self.fps
                ),
                width
            )),
            ResetColor
        )?;

        let panel = self.layout.panel;
        if self.host_area.fits(&panel) {
            let lines = readout_lines(ctx, &self.controls);
            for (i, line) in lines.iter().take(panel.height as usize).enumerate() {
                queue!(
                    self.out,
                    cursor::MoveTo(panel.x, panel.y + i as u16),
                    Print(fit(line, panel.width as usize))
                )?;
            }
        }

        let status = match (self.controls.command_line(), self.controls.message()) {
            (Some(line), _) => format!(":{line}"),
            (None, Some(message)) => message.to_string(),
            (None, None) => String::new(),
        };
        if rows > 0 {
            queue!(
                self.out,
                cursor::MoveTo(0, rows - 1),
                Print(fit(&status, width))
            )?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn update_fps(&mut self) {
        self.frame_count += 1;
        let now = Instant::now();
        if (now - self.last_fps_sample).as_secs() >= 1 {
            self.fps = self.frame_count as f32 / (now - self.last_fps_sample).as_secs_f32();
            self.frame_count = 0;
            self.last_fps_sample = now;
        }
    }
}

impl FrameHost for TerminalHost {
    fn between_frames(&mut self, mut ctx: FrameContext<'_>) -> Result<()> {
        self.draw_overlay(&ctx)?;
        self.update_fps();

        // Wait out the rest of the frame while handling input
        let target_frame_time = self.config.frame_time();
        loop {
            let elapsed = self.frame_start.elapsed();
            let timeout = target_frame_time.saturating_sub(elapsed);
            if !event::poll(timeout)? {
                break;
            }
            let event = event::read()?;
            self.handle_event(event, &mut ctx)?;
            if ctx.cancel.is_cancelled() || timeout == Duration::ZERO {
                break;
            }
        }
        self.frame_start = Instant::now();
        Ok(())
    }

    fn on_stop(&mut self) {
        self.drag = None;
        log::debug!("terminal host stopped");
    }
}

/// Parameter values, selected slider, matrix grid and viewport health
fn readout_lines(ctx: &FrameContext<'_>, controls: &ControlPanel) -> Vec<String> {
    let params = ctx.store.get();
    let mut lines = Vec::new();

    for group in AxisGroup::ALL {
        let values = match group {
            AxisGroup::Scale => params.scale,
            AxisGroup::Rotation => params.rotation,
            AxisGroup::Translation => params.translation,
        };
        let mut line = format!("{:<12}", group.name());
        for (axis, value) in Axis::ALL.iter().zip([values.x, values.y, values.z]) {
            let marker = if controls.group == group && controls.axis == *axis {
                '>'
            } else {
                ' '
            };
            line.push_str(&format!("{marker}{axis}:{value:>7.2} "));
        }
        lines.push(line);
    }

    lines.push(String::new());
    lines.push("Transform matrix".to_string());
    for row in ctx.sync.formatted_matrix() {
        lines.push(
            row.iter()
                .map(|cell| format!("{cell:>8}"))
                .collect::<String>(),
        );
    }

    let lost: Vec<String> = ctx
        .report
        .failed
        .iter()
        .map(|(role, _)| role.to_string())
        .collect();
    lines.push(String::new());
    if lost.is_empty() {
        lines.push(format!("frame {}", ctx.report.frame_index));
    } else {
        lines.push(format!("suspended: {}", lost.join(", ")));
    }
    lines
}

/// Pad or cut a line to exactly `width` characters
fn fit(text: &str, width: usize) -> String {
    let mut line: String = text.chars().take(width).collect();
    let len = line.chars().count();
    line.extend(std::iter::repeat(' ').take(width - len));
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 3), "abc");
        assert_eq!(fit("", 0), "");
    }
}
