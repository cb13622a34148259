/// Render targets: opaque surfaces a viewport draws into
use std::cell::Cell as StdCell;
use std::io::Write;
use std::rc::Rc;

use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    QueueableCommand,
};

use crate::error::SurfaceError;
use crate::renderer::Framebuffer;

/// Cell rectangle on the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl PaneRect {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.x
            && row >= self.y
            && (col - self.x) < self.width
            && (row - self.y) < self.height
    }

    pub fn right(&self) -> u32 {
        self.x as u32 + self.width as u32
    }

    pub fn bottom(&self) -> u32 {
        self.y as u32 + self.height as u32
    }
}

/// A drawable target owned by exactly one viewport.
///
/// `present` may fail per frame (for example when the surface is lost); the
/// caller keeps going with its other targets. `release` is called exactly
/// once on teardown and must free whatever the target holds.
pub trait RenderTarget {
    /// Drawable size in cells as (columns, rows)
    fn size(&self) -> (usize, usize);

    fn present(&mut self, frame: &Framebuffer) -> Result<(), SurfaceError>;

    fn release(&mut self) -> Result<(), SurfaceError>;
}

/// Current terminal size, shared by every pane on that terminal
#[derive(Debug, Clone)]
pub struct HostArea(Rc<StdCell<(u16, u16)>>);

impl HostArea {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self(Rc::new(StdCell::new((cols, rows))))
    }

    pub fn set(&self, cols: u16, rows: u16) {
        self.0.set((cols, rows));
    }

    pub fn get(&self) -> (u16, u16) {
        self.0.get()
    }

    pub fn fits(&self, rect: &PaneRect) -> bool {
        let (cols, rows) = self.get();
        rect.right() <= cols as u32 && rect.bottom() <= rows as u32
    }
}

/// A titled rectangle of the terminal.
///
/// The first row holds the title; the framebuffer fills the rest.
pub struct TerminalPane<W: Write> {
    writer: W,
    rect: PaneRect,
    title: String,
    host: HostArea,
    released: bool,
}

impl<W: Write> TerminalPane<W> {
    pub fn new(writer: W, rect: PaneRect, title: impl Into<String>, host: HostArea) -> Self {
        Self {
            writer,
            rect,
            title: title.into(),
            host,
            released: false,
        }
    }

    pub fn rect(&self) -> PaneRect {
        self.rect
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    fn check_available(&self) -> Result<(), SurfaceError> {
        if self.released {
            return Err(SurfaceError::Released);
        }
        if !self.host.fits(&self.rect) {
            let (cols, rows) = self.host.get();
            return Err(SurfaceError::ContextLost(format!(
                "pane `{}` needs {}x{} cells, terminal is {}x{}",
                self.title,
                self.rect.right(),
                self.rect.bottom(),
                cols,
                rows
            )));
        }
        Ok(())
    }
}

impl<W: Write> RenderTarget for TerminalPane<W> {
    fn size(&self) -> (usize, usize) {
        (
            self.rect.width as usize,
            self.rect.height.saturating_sub(1) as usize,
        )
    }

    fn present(&mut self, frame: &Framebuffer) -> Result<(), SurfaceError> {
        self.check_available()?;

        let width = self.rect.width as usize;
        let title: String = self.title.chars().take(width).collect();
        self.writer
            .queue(cursor::MoveTo(self.rect.x, self.rect.y))?
            .queue(SetAttribute(Attribute::Bold))?
            .queue(Print(format!("{title:<width$}")))?
            .queue(SetAttribute(Attribute::Reset))?;

        let rows = frame.height().min(self.rect.height.saturating_sub(1) as usize);
        for y in 0..rows {
            self.writer
                .queue(cursor::MoveTo(self.rect.x, self.rect.y + 1 + y as u16))?;
            let mut current = None;
            for cell in frame.row(y).iter().take(width) {
                if current != Some(cell.color) {
                    self.writer.queue(SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                self.writer.queue(Print(cell.ch))?;
            }
        }
        self.writer.queue(ResetColor)?;
        self.writer.flush()?;
        Ok(())
    }

    fn release(&mut self) -> Result<(), SurfaceError> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        // Nothing to erase once the pane is off screen
        if !self.host.fits(&self.rect) {
            return Ok(());
        }
        let blank = " ".repeat(self.rect.width as usize);
        for y in 0..self.rect.height {
            self.writer
                .queue(cursor::MoveTo(self.rect.x, self.rect.y + y))?
                .queue(Print(&blank))?;
        }
        self.writer.queue(ResetColor)?;
        self.writer.flush()?;
        Ok(())
    }
}
