/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// This eliminates flicker caused by full-screen redraws. The board is a
/// fixed 20×16, so there is no camera: game cell (gx, gy) maps straight
/// to terminal columns (gx*2, gx*2+1).

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::cell::Cell as BoardCell;
use crate::domain::grid::{Pos, GRID_H, GRID_W};
use crate::sim::world::{Phase, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells, used for
    /// both Clear and per-cell backgrounds so inter-row gap pixels match.
    const BASE_BG: Color = Color::Rgb { r: 18, g: 18, b: 28 };

    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: Cell::BASE_BG,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: '?',
        fg: Color::Magenta,
        bg: Color::Magenta,
    };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, Cell::new(ch, fg, bg));
            cx += 1;
        }
    }
}

// ── Renderer ──

/// Each game cell = 2 terminal columns.
const CELL_W: usize = 2;
const BOARD_COLS: usize = GRID_W as usize * CELL_W;

/// Vertical offsets
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 25, g: 25, b: 60 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Phase change → clear for a clean transition
        if self.last_phase != Some(world.phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(world.phase);
        }

        self.front.clear();

        match world.phase {
            Phase::Title => self.compose_title(),
            Phase::Playing => self.compose_game(world),
            Phase::Won | Phase::Lost => {
                self.compose_game(world);
                self.compose_outcome_banner(world);
            }
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(
            self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_game(&mut self, w: &WorldState) {
        // ── HUD row ──
        for x in 0..BOARD_COLS {
            self.front.set(x, HUD_ROW, Cell::new(' ', Color::White, HUD_BG));
        }
        let lives = format!(" Lives: {}", w.lives);
        self.front.put_str(0, HUD_ROW, &lives, Color::White, HUD_BG);
        let score = format!("Score: {} ", w.score);
        let score_col = BOARD_COLS.saturating_sub(score.chars().count());
        self.front.put_str(score_col, HUD_ROW, &score, Color::White, HUD_BG);

        // ── Board ──
        for y in 0..GRID_H {
            for x in 0..GRID_W {
                self.compose_cell(w, Pos::new(x, y));
            }
        }

        // ── Message bar ──
        let msg_row = MAP_ROW + GRID_H as usize + 1;
        if !w.message.is_empty() {
            for x in 0..BOARD_COLS {
                self.front.set(x, msg_row, Cell::new(' ', Color::Black, MSG_BG));
            }
            let msg = format!(" {} ", w.message);
            self.front.put_str(0, msg_row, &msg, Color::Black, MSG_BG);
        }

        // ── Help bar ──
        let help_row = msg_row + 2;
        let help = " Q/W/E A/D Z/X/C: Move   S: Wait   R: Restart   Esc: Quit";
        self.front.put_str(0, help_row, help, Color::DarkGrey, Cell::BASE_BG);
    }

    /// Write the visual for board cell `p` into the front buffer.
    /// Each board cell = 2 terminal columns.
    fn compose_cell(&mut self, w: &WorldState, p: Pos) {
        let col = p.x as usize * CELL_W;
        let row = MAP_ROW + p.y as usize;

        let (c0, c1, fg, bg) = match w.grid.get(p) {
            BoardCell::Empty => (' ', ' ', Color::Reset, Cell::BASE_BG),
            BoardCell::Player => ('@', ' ', Color::Green, Cell::BASE_BG),
            BoardCell::Robot => ('&', ' ', Color::Red, Cell::BASE_BG),
            BoardCell::Hole => ('░', '░', Color::Rgb { r: 70, g: 130, b: 220 }, Color::Rgb { r: 10, g: 25, b: 55 }),
            BoardCell::Bomb => ('*', ' ', Color::DarkYellow, Cell::BASE_BG),
        };
        self.front.set(col, row, Cell::new(c0, fg, bg));
        self.front.set(col + 1, row, Cell::new(c1, fg, bg));
    }

    // ── Static screens ──

    fn compose_title(&mut self) {
        let lines: &[&str] = &[
            "ROBOT CHASE",
            "",
            "Outrun the robots. Lure them into",
            "holes, bombs, and each other.",
            "",
            "Q/W/E A/D Z/X/C: Move (8 directions)",
            "S: Hold position",
            "",
            "Enter: Start    Esc: Quit",
        ];
        let top = MAP_ROW + 3;
        for (i, line) in lines.iter().enumerate() {
            let col = center_col(line);
            let fg = if i == 0 { Color::Yellow } else { Color::White };
            self.front.put_str(col, top + i, line, fg, Cell::BASE_BG);
        }
    }

    /// Win/lose banner over the final board, matching the original's text.
    fn compose_outcome_banner(&mut self, w: &WorldState) {
        let text = match w.phase {
            Phase::Won => "You Win!! Press 'R' to restart.",
            Phase::Lost => "You Lose!! Press 'R' to restart.",
            _ => return,
        };
        let fg = match w.phase {
            Phase::Won => Color::Green,
            _ => Color::Red,
        };
        let row = MAP_ROW + GRID_H as usize / 2;
        let col = center_col(text);
        // Pad one space each side so the banner reads over busy boards.
        let banner = format!(" {} ", text);
        self.front.put_str(col.saturating_sub(1), row, &banner, fg, Color::Black);
    }
}

fn center_col(s: &str) -> usize {
    (BOARD_COLS.saturating_sub(s.chars().count())) / 2
}
