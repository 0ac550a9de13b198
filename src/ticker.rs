//! Line composition and the frame loop that drives every animator in lockstep.
//!
//! # Composition
//!
//! [`compose_lines`] turns the fetch results into one [`LineAnimator`] per
//! headline, each bound to its own screen line, plus one placeholder line
//! carrying the source's name for every source that produced nothing.
//!
//! # Frame loop
//!
//! [`TickerLoop::run`] is the only code that mutates animators. Each frame it
//! advances every line in construction order, flushes the surface once,
//! then sleeps for the frame delay.

use crate::animator::LineAnimator;
use crate::models::{FetchOutcome, Source};
use crate::surface::DisplaySurface;
use rand::Rng;
use std::io;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, instrument};

/// Frames per viewport column in the default budget.
pub const DEFAULT_FRAME_MULTIPLIER: u32 = 15;

/// How long the frame loop runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameBudget {
    /// Exactly this many frames, whatever state the lines are in.
    Fixed(u64),
    /// Stop as soon as every line is done, but never run more than `cap` frames.
    UntilDone { cap: u64 },
}

impl FrameBudget {
    /// Budget of `columns × multiplier` frames.
    ///
    /// Text is clipped to the row width and a line reveals at worst one
    /// character every `max speed + 1` frames, so any multiplier above that
    /// lets every line finish.
    pub fn from_viewport(columns: u16, multiplier: u32, until_done: bool) -> Self {
        let frames = u64::from(columns) * u64::from(multiplier);
        if until_done {
            FrameBudget::UntilDone { cap: frames }
        } else {
            FrameBudget::Fixed(frames)
        }
    }

    fn max_frames(&self) -> u64 {
        match *self {
            FrameBudget::Fixed(n) | FrameBudget::UntilDone { cap: n } => n,
        }
    }
}

/// Summary of one ticker session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickerReport {
    pub frames: u64,
    pub lines: usize,
    pub finished: usize,
}

/// Build one animator per headline, in outcome order.
///
/// Failed sources become a single unnumbered line showing the source name.
/// Articles get 1-based ordinals within their source. Rows are created on
/// consecutive screen lines starting at the top; the bottom line stays free,
/// and lines that would not fit on screen are dropped.
#[instrument(level = "info", skip_all, fields(sources = outcomes.len()))]
pub fn compose_lines<S, R>(outcomes: &[(Source, FetchOutcome)], surface: &mut S, rng: &mut R) -> Vec<LineAnimator>
where
    S: DisplaySurface + ?Sized,
    R: Rng,
{
    let (columns, rows) = surface.size();
    let usable_lines = usize::from(rows.saturating_sub(1));

    let entries: Vec<(usize, &str, Option<&str>)> = outcomes
        .iter()
        .flat_map(|(source, outcome)| {
            if let FetchOutcome::Failed(e) = outcome {
                debug!(source = %source.name, error = %e, "Showing placeholder for failed source");
            }
            if outcome.is_empty() {
                vec![(0usize, source.name.as_str(), None::<&str>)]
            } else {
                outcome
                    .articles()
                    .iter()
                    .enumerate()
                    .map(|(i, a)| (i + 1, a.title.as_str(), a.description.as_deref()))
                    .collect()
            }
        })
        .collect();

    if entries.len() > usable_lines {
        debug!(
            total = entries.len(),
            usable_lines,
            "Dropping headlines that do not fit on screen"
        );
    }

    let mut lines = Vec::with_capacity(entries.len().min(usable_lines));
    for (line, (index, title, description)) in entries.into_iter().take(usable_lines).enumerate() {
        // `line` < usable_lines <= u16::MAX
        let row = surface.create_row(line as u16, columns);
        let animator = LineAnimator::new(index, row, usize::from(columns), title, description, rng);
        debug!(
            line,
            index = animator.index(),
            speed = animator.speed(),
            title = %animator.title(),
            description = %animator.description(),
            "Composed line"
        );
        lines.push(animator);
    }

    info!(lines = lines.len(), "Composed ticker lines");
    lines
}

/// Drives a fixed set of animators against one surface.
#[derive(Debug)]
pub struct TickerLoop {
    lines: Vec<LineAnimator>,
    budget: FrameBudget,
    frame_delay: Duration,
}

impl TickerLoop {
    pub fn new(lines: Vec<LineAnimator>, budget: FrameBudget, frame_delay: Duration) -> Self {
        Self {
            lines,
            budget,
            frame_delay,
        }
    }

    /// Run frames until the budget is spent.
    ///
    /// # Errors
    ///
    /// Returns the surface's error if a frame cannot be flushed. Individual
    /// character writes never fail the loop.
    #[instrument(level = "info", skip_all, fields(lines = self.lines.len(), budget = ?self.budget))]
    pub async fn run<S: DisplaySurface + ?Sized>(&mut self, surface: &mut S) -> io::Result<TickerReport> {
        let t0 = Instant::now();
        let max_frames = self.budget.max_frames();
        let mut frames = 0;

        while frames < max_frames {
            if matches!(self.budget, FrameBudget::UntilDone { .. }) && self.all_done() {
                break;
            }
            for line in &mut self.lines {
                line.animate(surface);
            }
            surface.flush()?;
            frames += 1;
            if !self.frame_delay.is_zero() {
                sleep(self.frame_delay).await;
            }
        }

        let report = TickerReport {
            frames,
            lines: self.lines.len(),
            finished: self.lines.iter().filter(|l| l.is_done()).count(),
        };
        info!(
            frames = report.frames,
            lines = report.lines,
            finished = report.finished,
            chars = self.lines.iter().map(LineAnimator::total_steps).sum::<usize>(),
            elapsed_ms = t0.elapsed().as_millis(),
            "Ticker finished"
        );
        Ok(report)
    }

    fn all_done(&self) -> bool {
        self.lines.iter().all(LineAnimator::is_done)
    }
}
