//! Backend de terminal via crossterm.
//!
//! Mantém um grid de células em memória; as primitivas de desenho
//! escrevem no grid e `flush` emite ao terminal só as células que
//! mudaram desde o último frame. Entra em tela alternativa com cursor
//! escondido na construção e restaura o terminal no Drop.

use crate::surface::{Color, DrawSurface};
use crossterm::style::Color as TermColor;
use crossterm::{cursor, execute, queue, style, terminal};
use std::io::{self, Write};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    fn blank(bg: Color) -> Self {
        Self {
            ch: ' ',
            fg: Color::new(255, 255, 255),
            bg,
        }
    }
}

fn to_term(c: Color) -> TermColor {
    TermColor::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

pub struct TerminalSurface {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    /// Frame já apresentado, para o diff do flush
    shown: Vec<Cell>,
    cursor_x: i32,
    cursor_y: i32,
    fg: Color,
    bg: Color,
    out: io::Stdout,
}

impl TerminalSurface {
    /// Entra em tela alternativa e esconde o cursor.
    pub fn new() -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        let width = cols.max(20) as i32;
        let height = rows.max(10) as i32;

        let mut out = io::stdout();
        execute!(out, terminal::EnterAlternateScreen, cursor::Hide)?;

        let blank = Cell::blank(Color::new(0, 0, 0));
        Ok(Self {
            width,
            height,
            cells: vec![blank; (width * height) as usize],
            shown: Vec::new(),
            cursor_x: 0,
            cursor_y: 0,
            fg: Color::new(255, 255, 255),
            bg: Color::new(0, 0, 0),
            out,
        })
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some((y * self.width + x) as usize)
    }

    fn put(&mut self, x: i32, y: i32, ch: char, fg: Color, bg: Color) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = Cell { ch, fg, bg };
        }
    }

    fn emit_diff(&mut self) -> io::Result<()> {
        let full = self.shown.len() != self.cells.len();
        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.height {
            let mut x = 0;
            while x < self.width {
                let i = (y * self.width + x) as usize;
                let cell = self.cells[i];
                if !full && self.shown[i] == cell {
                    x += 1;
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x as u16, y as u16))?;
                if last_fg != Some(cell.fg) {
                    queue!(self.out, style::SetForegroundColor(to_term(cell.fg)))?;
                    last_fg = Some(cell.fg);
                }
                if last_bg != Some(cell.bg) {
                    queue!(self.out, style::SetBackgroundColor(to_term(cell.bg)))?;
                    last_bg = Some(cell.bg);
                }
                queue!(self.out, style::Print(cell.ch))?;
                x += 1;
            }
        }

        self.out.flush()?;
        self.shown = self.cells.clone();
        Ok(())
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            style::ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
    }
}

impl DrawSurface for TerminalSurface {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn fill_screen(&mut self, color: Color) {
        self.cells.fill(Cell::blank(color));
        self.bg = color;
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        for yy in y..y + h {
            for xx in x..x + w {
                self.put(xx, yy, ' ', self.fg, color);
            }
        }
    }

    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        if w <= 0 || h <= 0 {
            return;
        }
        for xx in x..x + w {
            self.put(xx, y, '─', color, self.bg);
            self.put(xx, y + h - 1, '─', color, self.bg);
        }
        for yy in y..y + h {
            self.put(x, yy, '│', color, self.bg);
            self.put(x + w - 1, yy, '│', color, self.bg);
        }
        self.put(x, y, '┌', color, self.bg);
        self.put(x + w - 1, y, '┐', color, self.bg);
        self.put(x, y + h - 1, '└', color, self.bg);
        self.put(x + w - 1, y + h - 1, '┘', color, self.bg);
    }

    /// Bresenham sobre células.
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        let dx = (x2 - x1).abs();
        let dy = -(y2 - y1).abs();
        let sx = if x1 < x2 { 1 } else { -1 };
        let sy = if y1 < y2 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x1, y1);

        loop {
            self.put(x, y, '•', color, self.bg);
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    fn set_text_color(&mut self, fg: Color, bg: Color) {
        self.fg = fg;
        self.bg = bg;
    }

    fn set_text_size(&mut self, _size: u8) {
        // Células de terminal têm tamanho único
    }

    fn print(&mut self, text: &str) {
        for ch in text.chars() {
            if self.cursor_x >= self.width {
                break;
            }
            self.put(self.cursor_x, self.cursor_y, ch, self.fg, self.bg);
            self.cursor_x += 1;
        }
    }

    fn text_width(&self, text: &str) -> i32 {
        text.chars().count() as i32
    }

    fn flush(&mut self) {
        if let Err(e) = self.emit_diff() {
            warn!("Erro ao apresentar frame: {e}");
        }
    }
}
