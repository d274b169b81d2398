//! Terminal output for a run: header lines, the self-overwriting progress
//! line, then the ranked report.
use dormant_common::UserIdentity;
use dormant_pipeline::{FollowList, Observer, Outcome, Progress, ReportStyle};
use std::io::{self, Write};

pub struct Console<'a, W: Write> {
    style: &'a ReportStyle,
    out: W,
    /// Width of the progress line currently on screen; 0 when none.
    progress_width: usize,
}

impl<'a, W: Write> Console<'a, W> {
    pub fn new(style: &'a ReportStyle, out: W) -> Self {
        Self {
            style,
            out,
            progress_width: 0,
        }
    }

    /// Close the progress line and print the report.
    pub fn finish(&mut self, outcome: &Outcome) -> io::Result<()> {
        if self.progress_width > 0 {
            writeln!(self.out)?;
        }
        writeln!(self.out, "Fetching complete.")?;
        if let Some(reason) = &outcome.interrupted {
            writeln!(
                self.out,
                "Warning: following list is incomplete ({reason}); showing {} accounts",
                outcome.followers.len()
            )?;
        }
        self.out
            .write_all(self.style.render(&outcome.followers).as_bytes())?;
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

// Observer callbacks cannot fail; a broken stdout only loses console text.
impl<W: Write> Observer for Console<'_, W> {
    fn resolved(&mut self, target: &UserIdentity) {
        let _ = writeln!(self.out, "{}", self.style.found_line(target));
        let _ = writeln!(self.out, "{}", self.style.following_line(target));
    }

    fn collected(&mut self, list: &FollowList) {
        if list.followers.is_empty() {
            let _ = writeln!(self.out, "Not following anyone");
        }
    }

    fn progress(&mut self, progress: Progress<'_>) {
        let line = self.style.progress_line(&progress);
        let width = line.chars().count();
        // pad over the tail of a longer previous line
        let pad = self.progress_width.saturating_sub(width);
        let _ = write!(self.out, "\r{line}{:pad$}", "");
        let _ = self.out.flush();
        self.progress_width = width;
    }
}
