//! Per-headline typewriter state machine.
//!
//! A [`LineAnimator`] owns one display row and reveals its text one
//! character at a time: first the title in normal intensity, then the
//! description dimmed. Each instance ticks at its own randomly drawn speed,
//! so lines driven by the same frame clock type at visibly different rates.
//!
//! ```text
//! Title ──(title exhausted, description left)──▶ Description ──▶ Done
//!   └──────────(title exhausted, no description)───────────────▶ Done
//! ```

use crate::surface::{DisplaySurface, RowId, Style};
use crate::utils::clip_chars;
use rand::Rng;
use std::ops::RangeInclusive;
use tracing::warn;

/// Frames skipped between reveals are drawn uniformly from this range.
pub const SPEED_RANGE: RangeInclusive<u32> = 2..=10;

/// Separator typed between a title and its description.
const SEPARATOR: &str = ": ";

/// Which text a [`LineAnimator`] is currently revealing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Title,
    Description,
    Done,
}

/// Build the title and description a row of `width` cells can hold.
///
/// Ordinal `0` marks a source-failure placeholder and gets no `"N) "`
/// prefix. The separator is appended to the title whenever a non-empty
/// description was supplied, and the description then gets whatever width
/// the title left over, possibly none.
///
/// # Returns
///
/// `(title, description)` whose combined character count never exceeds `width`.
pub fn clip_line(index: usize, width: usize, title: &str, description: Option<&str>) -> (String, String) {
    let description = description.filter(|d| !d.is_empty());

    let mut head = if index == 0 {
        title.to_string()
    } else {
        format!("{index}) {title}")
    };
    if description.is_some() {
        head.push_str(SEPARATOR);
    }

    let head = clip_chars(&head, width);
    let remaining = width - head.chars().count();
    let tail = description
        .map(|d| clip_chars(d, remaining))
        .unwrap_or_default();
    (head, tail)
}

/// One animated headline bound to one display row.
#[derive(Debug)]
pub struct LineAnimator {
    index: usize,
    row: RowId,
    title: Vec<char>,
    description: Vec<char>,
    speed: u32,
    timer: u32,
    position: usize,
    phase: Phase,
}

impl LineAnimator {
    /// Create an animator for `row`, clipping its text to `width` and
    /// drawing its speed from `rng`.
    pub fn new<R: Rng>(
        index: usize,
        row: RowId,
        width: usize,
        title: &str,
        description: Option<&str>,
        rng: &mut R,
    ) -> Self {
        let speed = rng.random_range(SPEED_RANGE);
        Self::with_speed(index, row, width, title, description, speed)
    }

    /// Create an animator with a fixed speed.
    pub fn with_speed(
        index: usize,
        row: RowId,
        width: usize,
        title: &str,
        description: Option<&str>,
        speed: u32,
    ) -> Self {
        let (title, description) = clip_line(index, width, title, description);
        let title: Vec<char> = title.chars().collect();
        let description: Vec<char> = description.chars().collect();

        let phase = if !title.is_empty() {
            Phase::Title
        } else if !description.is_empty() {
            Phase::Description
        } else {
            Phase::Done
        };

        Self {
            index,
            row,
            title,
            description,
            speed,
            timer: 0,
            position: 0,
            phase,
        }
    }

    /// Advance one frame.
    ///
    /// Every `speed + 1` frames one more character is written to the row
    /// and the row is marked for the next flush. A rejected write is logged
    /// and the cursor still moves on, so one bad cell never holds up the
    /// shared frame clock. No-op once [`Phase::Done`] is reached.
    pub fn animate<S: DisplaySurface + ?Sized>(&mut self, surface: &mut S) {
        if self.phase == Phase::Done {
            return;
        }
        if self.timer < self.speed {
            self.timer += 1;
            return;
        }
        self.timer = 0;
        self.reveal_next(surface);
    }

    fn reveal_next<S: DisplaySurface + ?Sized>(&mut self, surface: &mut S) {
        let (text, style) = match self.phase {
            Phase::Title => (&self.title, Style::Normal),
            Phase::Description => (&self.description, Style::Dim),
            Phase::Done => return,
        };
        let ch = text[self.position];
        let len = text.len();

        if let Err(e) = surface.put_char(self.row, ch, style) {
            warn!(
                index = self.index,
                position = self.position,
                ?ch,
                error = %e,
                "Failed to write character; skipping it"
            );
        }
        self.position += 1;
        surface.mark_dirty(self.row);

        if self.position == len {
            self.phase = match self.phase {
                Phase::Title if !self.description.is_empty() => {
                    self.position = 0;
                    Phase::Description
                }
                Phase::Title => {
                    self.position = 0;
                    Phase::Done
                }
                _ => Phase::Done,
            };
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    #[cfg(test)]
    pub fn row(&self) -> RowId {
        self.row
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[cfg(test)]
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    pub fn title(&self) -> String {
        self.title.iter().collect()
    }

    pub fn description(&self) -> String {
        self.description.iter().collect()
    }

    /// Length of the text being revealed in the current phase.
    #[cfg(test)]
    pub fn phase_len(&self) -> usize {
        match self.phase {
            Phase::Title => self.title.len(),
            Phase::Description | Phase::Done => self.description.len(),
        }
    }

    /// Number of characters revealed over the whole lifetime.
    pub fn total_steps(&self) -> usize {
        self.title.len() + self.description.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn animator(surface: &mut MemorySurface, width: u16, index: usize, title: &str, description: Option<&str>, speed: u32) -> LineAnimator {
        let row = surface.create_row(0, width);
        LineAnimator::with_speed(index, row, width as usize, title, description, speed)
    }

    /// Drive `line` until done, flushing after every frame; returns reveal steps taken.
    fn run_to_done(line: &mut LineAnimator, surface: &mut MemorySurface) -> usize {
        let mut steps = 0;
        let mut frames = 0;
        while !line.is_done() {
            let before = (line.phase(), line.position());
            line.animate(surface);
            surface.flush().unwrap();
            if (line.phase(), line.position()) != before {
                steps += 1;
            }
            frames += 1;
            assert!(frames < 100_000, "animator never finished");
        }
        steps
    }

    #[test]
    fn test_clip_line_scenario() {
        let (title, description) = clip_line(1, 40, "Big News Today", Some("Full story here"));
        assert_eq!(title, "1) Big News Today: ");
        assert_eq!(description, "Full story here");
    }

    #[test]
    fn test_clip_line_truncates_description_to_remaining_width() {
        let (title, description) = clip_line(3, 20, "Headline", Some("A rather long description"));
        assert_eq!(title, "3) Headline: ");
        assert_eq!(description, "A rathe");
        assert_eq!(title.chars().count() + description.chars().count(), 20);
    }

    #[test]
    fn test_clip_line_no_room_for_description() {
        let (title, description) = clip_line(1, 10, "A very long headline", Some("desc"));
        assert_eq!(title, "1) A very ");
        assert!(description.is_empty());
    }

    #[test]
    fn test_clip_line_zero_width() {
        let (title, description) = clip_line(7, 0, "Title", Some("Description"));
        assert!(title.is_empty());
        assert!(description.is_empty());
    }

    #[test]
    fn test_clip_line_placeholder_has_no_prefix() {
        let (title, description) = clip_line(0, 80, "hacker-news", None);
        assert_eq!(title, "hacker-news");
        assert!(description.is_empty());
    }

    #[test]
    fn test_clip_line_empty_description_is_no_description() {
        let (title, description) = clip_line(2, 80, "Title", Some(""));
        assert_eq!(title, "2) Title");
        assert!(description.is_empty());
    }

    #[test]
    fn test_clip_line_never_exceeds_width() {
        let long = "x".repeat(300);
        for width in 0..120 {
            for index in [0, 1, 12, 345] {
                let (t, d) = clip_line(index, width, &long, Some(&long));
                assert!(t.chars().count() + d.chars().count() <= width);
                let (t, d) = clip_line(index, width, &long, None);
                assert!(t.chars().count() + d.chars().count() <= width);
            }
        }
    }

    #[test]
    fn test_speed_drawn_within_range_per_instance() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut surface = MemorySurface::new(80, 40);
        let speeds: Vec<u32> = (0..200)
            .map(|i| {
                let row = surface.create_row(0, 80);
                LineAnimator::new(i + 1, row, 80, "t", None, &mut rng).speed()
            })
            .collect();

        assert!(speeds.iter().all(|s| SPEED_RANGE.contains(s)));
        // 200 independent draws over 9 values are not all equal.
        assert!(speeds.iter().any(|s| *s != speeds[0]));
    }

    #[test]
    fn test_reveals_once_every_speed_plus_one_frames() {
        let mut surface = MemorySurface::new(40, 1);
        let mut line = animator(&mut surface, 40, 1, "abc", None, 2);

        line.animate(&mut surface);
        line.animate(&mut surface);
        assert_eq!(line.position(), 0);
        line.animate(&mut surface);
        assert_eq!(line.position(), 1);
        surface.flush().unwrap();
        assert_eq!(surface.text(line.row()), "1");
    }

    #[test]
    fn test_title_only_done_after_title_length_steps() {
        let mut surface = MemorySurface::new(40, 1);
        let mut line = animator(&mut surface, 40, 0, "associated-press", None, 3);
        let row = line.row();

        let steps = run_to_done(&mut line, &mut surface);

        assert_eq!(steps, "associated-press".len());
        assert_eq!(surface.text(row), "associated-press");
        assert!(surface.cells(row).iter().all(|(_, s)| *s == Style::Normal));
    }

    #[test]
    fn test_phase_switch_at_title_length() {
        let mut surface = MemorySurface::new(40, 1);
        let mut line = animator(&mut surface, 40, 1, "Big News Today", Some("Full story here"), 0);
        let title_len = line.title().chars().count();

        for _ in 0..title_len - 1 {
            line.animate(&mut surface);
            assert_eq!(line.phase(), Phase::Title);
        }
        line.animate(&mut surface);
        assert_eq!(line.phase(), Phase::Description);
        assert_eq!(line.position(), 0);
    }

    #[test]
    fn test_full_scenario_title_then_dim_description() {
        let mut surface = MemorySurface::new(40, 1);
        let mut line = animator(&mut surface, 40, 1, "Big News Today", Some("Full story here"), 4);
        let row = line.row();

        let steps = run_to_done(&mut line, &mut surface);

        assert_eq!(steps, "1) Big News Today: ".len() + "Full story here".len());
        assert_eq!(steps, line.total_steps());
        assert_eq!(surface.text(row), "1) Big News Today: Full story here");
        let (normal, dim): (Vec<&(char, Style)>, Vec<&(char, Style)>) = surface
            .cells(row)
            .iter()
            .partition(|(_, s)| *s == Style::Normal);
        assert_eq!(normal.len(), "1) Big News Today: ".len());
        assert_eq!(dim.len(), "Full story here".len());
    }

    #[test]
    fn test_description_clipped_away_skips_dim_phase() {
        let mut surface = MemorySurface::new(10, 1);
        let mut line = animator(&mut surface, 10, 1, "A very long headline", Some("desc"), 1);
        let row = line.row();
        assert!(line.description().is_empty());

        let mut phases = Vec::new();
        let mut steps = 0;
        while !line.is_done() {
            let before = line.position();
            line.animate(&mut surface);
            surface.flush().unwrap();
            phases.push(line.phase());
            if line.position() != before || line.is_done() {
                steps += 1;
            }
        }

        assert_eq!(steps, "1) A very ".len());
        assert!(!phases.contains(&Phase::Description));
        assert_eq!(surface.text(row), "1) A very ");
        assert!(surface.cells(row).iter().all(|(_, s)| *s == Style::Normal));
    }

    #[test]
    fn test_done_is_idempotent() {
        let mut surface = MemorySurface::new(20, 1);
        let mut line = animator(&mut surface, 20, 1, "hi", Some("there"), 1);
        let row = line.row();
        run_to_done(&mut line, &mut surface);
        let rendered = surface.text(row);

        for _ in 0..100 {
            line.animate(&mut surface);
            surface.flush().unwrap();
        }

        assert!(line.is_done());
        assert_eq!(surface.text(row), rendered);
    }

    #[test]
    fn test_position_stays_within_phase_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut surface = MemorySurface::new(30, 1);
        let row = surface.create_row(0, 30);
        let mut line = LineAnimator::new(9, row, 30, "Markets rally again", Some("Stocks up"), &mut rng);

        for _ in 0..2_000 {
            line.animate(&mut surface);
            assert!(line.position() <= line.phase_len());
        }
        assert!(line.is_done());
    }

    #[test]
    fn test_zero_width_row_starts_done() {
        let mut surface = MemorySurface::new(0, 1);
        let mut line = animator(&mut surface, 0, 1, "Title", Some("Desc"), 2);
        assert!(line.is_done());
        line.animate(&mut surface);
        surface.flush().unwrap();
        assert_eq!(surface.text(line.row()), "");
    }

    #[test]
    fn test_write_failure_does_not_stall() {
        let mut surface = MemorySurface::new(40, 1);
        // The row is narrower than the text the animator was clipped for.
        let row = surface.create_row(0, 4);
        let mut line = LineAnimator::with_speed(1, row, 40, "Overflowing", None, 0);

        let steps = run_to_done(&mut line, &mut surface);

        assert_eq!(steps, "1) Overflowing".len());
        assert_eq!(surface.text(row), "1) O");
    }
}
