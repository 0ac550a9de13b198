//! Display surface abstraction for fixed-width animated rows.
//!
//! The animation core never talks to the terminal directly. It writes styled
//! characters into rows through [`DisplaySurface`] and asks for one batched
//! flush per frame.
//!
//! # Implementations
//!
//! - [`TerminalSurface`]: Renders through `crossterm` commands queued on any
//!   [`Write`] sink, emitting only the cells of rows marked dirty
//! - `MemorySurface`: In-memory grid used by tests

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Print, SetAttribute},
};
use std::io::{self, Write};

/// Handle to a row created on a surface. Never reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId(usize);

/// Rendering intensity for one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Normal,
    Dim,
}

/// What the animation core needs from a display.
pub trait DisplaySurface {
    /// Viewport size as `(columns, rows)`.
    fn size(&self) -> (u16, u16);

    /// Create a row of `width` cells on screen line `line`.
    fn create_row(&mut self, line: u16, width: u16) -> RowId;

    /// Write `ch` at the row's write cursor and advance it.
    ///
    /// # Errors
    ///
    /// Fails if the row is full or the character cannot be written. The
    /// row's cursor does not move on failure.
    fn put_char(&mut self, row: RowId, ch: char, style: Style) -> io::Result<()>;

    /// Mark a row so its pending cells go out on the next [`flush`](Self::flush).
    fn mark_dirty(&mut self, row: RowId);

    /// Emit every dirty row in one batch.
    fn flush(&mut self) -> io::Result<()>;
}

#[derive(Debug)]
struct Row {
    line: u16,
    width: u16,
    cursor: u16,
    pending: Vec<(u16, char, Style)>,
    dirty: bool,
}

impl Row {
    fn new(line: u16, width: u16) -> Self {
        Self {
            line,
            width,
            cursor: 0,
            pending: Vec::new(),
            dirty: false,
        }
    }

    fn push(&mut self, ch: char) -> io::Result<u16> {
        if self.cursor >= self.width {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("row on line {} is full ({} cells)", self.line, self.width),
            ));
        }
        if ch.is_control() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("cannot render control character {ch:?}"),
            ));
        }
        let col = self.cursor;
        self.cursor += 1;
        Ok(col)
    }
}

/// A [`DisplaySurface`] that renders with `crossterm` onto a writer.
///
/// Writes are staged per row and only reach the writer in [`flush`](DisplaySurface::flush),
/// which queues every dirty row's cells and flushes the writer once.
pub struct TerminalSurface<W: Write> {
    out: W,
    size: (u16, u16),
    rows: Vec<Row>,
}

impl<W: Write> TerminalSurface<W> {
    /// Wrap `out`, assuming a viewport of `size` = `(columns, rows)`.
    pub fn new(out: W, size: (u16, u16)) -> Self {
        Self {
            out,
            size,
            rows: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn size(&self) -> (u16, u16) {
        self.size
    }

    fn create_row(&mut self, line: u16, width: u16) -> RowId {
        self.rows.push(Row::new(line, width));
        RowId(self.rows.len() - 1)
    }

    fn put_char(&mut self, row: RowId, ch: char, style: Style) -> io::Result<()> {
        let row = &mut self.rows[row.0];
        let col = row.push(ch)?;
        row.pending.push((col, ch, style));
        Ok(())
    }

    fn mark_dirty(&mut self, row: RowId) {
        self.rows[row.0].dirty = true;
    }

    fn flush(&mut self) -> io::Result<()> {
        for row in self.rows.iter_mut().filter(|r| r.dirty) {
            for (col, ch, style) in row.pending.drain(..) {
                queue!(self.out, MoveTo(col, row.line))?;
                match style {
                    Style::Normal => queue!(self.out, Print(ch))?,
                    Style::Dim => queue!(
                        self.out,
                        SetAttribute(Attribute::Dim),
                        Print(ch),
                        SetAttribute(Attribute::Reset)
                    )?,
                }
            }
            row.dirty = false;
        }
        self.out.flush()
    }
}

/// An in-memory [`DisplaySurface`] recording what reached each row.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySurface {
    size: (u16, u16),
    rows: Vec<Row>,
    flushed: Vec<Vec<(char, Style)>>,
    flushes: usize,
}

#[cfg(test)]
impl MemorySurface {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            size: (columns, rows),
            ..Self::default()
        }
    }

    /// Text flushed to `row` so far, styles ignored.
    pub fn text(&self, row: RowId) -> String {
        self.flushed[row.0].iter().map(|(c, _)| c).collect()
    }

    /// Flushed cells of `row` with their styles.
    pub fn cells(&self, row: RowId) -> &[(char, Style)] {
        &self.flushed[row.0]
    }

    /// Screen line a row was created on.
    pub fn line_of(&self, row: RowId) -> u16 {
        self.rows[row.0].line
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

#[cfg(test)]
impl DisplaySurface for MemorySurface {
    fn size(&self) -> (u16, u16) {
        self.size
    }

    fn create_row(&mut self, line: u16, width: u16) -> RowId {
        self.rows.push(Row::new(line, width));
        self.flushed.push(Vec::new());
        RowId(self.rows.len() - 1)
    }

    fn put_char(&mut self, row: RowId, ch: char, style: Style) -> io::Result<()> {
        let r = &mut self.rows[row.0];
        let col = r.push(ch)?;
        r.pending.push((col, ch, style));
        Ok(())
    }

    fn mark_dirty(&mut self, row: RowId) {
        self.rows[row.0].dirty = true;
    }

    fn flush(&mut self) -> io::Result<()> {
        for (row, flushed) in self.rows.iter_mut().zip(self.flushed.iter_mut()) {
            if row.dirty {
                flushed.extend(row.pending.drain(..).map(|(_, c, s)| (c, s)));
                row.dirty = false;
            }
        }
        self.flushes += 1;
        Ok(())
    }
}
