/// ASCII line rasterizer for terminal rendering
use crossterm::style::Color;
use nalgebra::{Matrix4, Point3};
use projview_core::{Camera, RenderableObject, Transform};

/// Length of the axis helper drawn in every view
pub const AXIS_LENGTH: f32 = 5.0;

/// Upper bound on samples per line, for segments projected far off-screen
const MAX_LINE_STEPS: usize = 4096;

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f32 = 2.0;

/// One character cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        ch: ' ',
        color: Color::Reset,
    };
}

/// Character grid with a depth buffer
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![Cell::EMPTY; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocate when the size changed; contents are cleared either way
    pub fn resize(&mut self, width: usize, height: usize) {
        if (width, height) != (self.width, self.height) {
            *self = Self::new(width, height);
        } else {
            self.clear();
        }
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(Cell::EMPTY);
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    /// Cells of one row, left to right
    pub fn row(&self, y: usize) -> &[Cell] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    /// Characters only, one string per row
    pub fn rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| self.row(y).iter().map(|c| c.ch).collect())
            .collect()
    }

    pub fn filled_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.ch != ' ').count()
    }

    /// Write a cell if it is on screen and not behind what is already there
    pub fn plot(&mut self, x: f32, y: f32, depth: f32, cell: Cell) {
        if !(x.is_finite() && y.is_finite()) || x < 0.0 || y < 0.0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y * self.width + x;
        if depth <= self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.cells[idx] = cell;
        }
    }

    /// Draw a line between two screen-space points (x, y, depth)
    pub fn draw_line(&mut self, a: (f32, f32, f32), b: (f32, f32, f32), ch: char, color: Color) {
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let steps = dx.abs().max(dy.abs()).ceil();
        let steps = if steps.is_finite() {
            (steps as usize).clamp(1, MAX_LINE_STEPS)
        } else {
            return;
        };

        let cell = Cell { ch, color };
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.plot(
                a.0 + dx * t,
                a.1 + dy * t,
                a.2 + (b.2 - a.2) * t,
                cell,
            );
        }
    }

    /// Convert normalized device coordinates to cell coordinates
    pub fn ndc_to_screen(&self, ndc: &Point3<f32>) -> (f32, f32, f32) {
        let screen_x = (ndc.x + 1.0) * 0.5 * self.width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * self.height as f32;
        (screen_x, screen_y, ndc.z)
    }
}

/// Pick a glyph that follows the on-screen slope of a line
fn line_glyph(a: (f32, f32, f32), b: (f32, f32, f32)) -> char {
    let dx = b.0 - a.0;
    // Rows are taller than columns
    let dy = (b.1 - a.1) * CELL_ASPECT;
    if dy.abs() < dx.abs() * 0.5 {
        '-'
    } else if dx.abs() < dy.abs() * 0.5 {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

fn draw_world_line(
    fb: &mut Framebuffer,
    mvp: &Matrix4<f32>,
    start: &Point3<f32>,
    end: &Point3<f32>,
    glyph: Option<char>,
    color: Color,
) -> bool {
    let (Some(a), Some(b)) = (Camera::project(mvp, start), Camera::project(mvp, end)) else {
        return false;
    };
    let (a, b) = (fb.ndc_to_screen(&a), fb.ndc_to_screen(&b));
    let ch = glyph.unwrap_or_else(|| line_glyph(a, b));
    fb.draw_line(a, b, ch, color);
    true
}

/// Draw the axis helper and the object's segments; returns segments drawn
pub fn render_scene(fb: &mut Framebuffer, object: &RenderableObject, camera: &Camera) -> usize {
    let view = camera.view_matrix();
    let projection = camera.projection_matrix();
    let view_projection = Transform::mvp_matrix(&Matrix4::identity(), &view, &projection);

    let origin = Point3::origin();
    let axes = [
        (Point3::new(AXIS_LENGTH, 0.0, 0.0), Color::Red),
        (Point3::new(0.0, AXIS_LENGTH, 0.0), Color::Green),
        (Point3::new(0.0, 0.0, AXIS_LENGTH), Color::Blue),
    ];
    for (end, color) in axes.iter() {
        draw_world_line(fb, &view_projection, &origin, end, Some('.'), *color);
    }

    let mvp = Transform::mvp_matrix(&object.local_matrix(), &view, &projection);
    object
        .mesh()
        .segments()
        .iter()
        .filter(|s| draw_world_line(fb, &mvp, &s.start, &s.end, None, Color::White))
        .count()
}
