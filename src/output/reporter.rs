use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::Path;

use super::{OutputFormat, OutputSink};
use crate::piece::PieceIndex;

/// Writes valid files to `out` while drawing a progress bar on stderr.
pub struct Reporter<W: Write> {
    out: W,
    format: OutputFormat,
    bar: ProgressBar,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, format: OutputFormat, num_pieces: u32, show_progress: bool) -> Self {
        let bar = if show_progress {
            let pb = ProgressBar::new(num_pieces as u64);
            if let Ok(style) =
                ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} pieces  {msg}")
            {
                pb.set_style(style.progress_chars("##-"));
            }
            pb
        } else {
            ProgressBar::hidden()
        };

        Self { out, format, bar }
    }

    /// Clears the bar and flushes the output.
    pub fn finish(mut self) -> io::Result<W> {
        self.bar.finish_and_clear();
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> OutputSink for Reporter<W> {
    fn valid_file(&mut self, file_index: usize, path: &Path) -> io::Result<()> {
        let Self { out, format, bar } = self;
        // Suspend so the line is not drawn over the bar.
        bar.suspend(|| {
            format.write_entry(out, file_index, path)?;
            out.flush()
        })
    }

    fn progress(&mut self, piece: PieceIndex, _num_pieces: u32, valid_files: usize) {
        self.bar.set_position(piece as u64);
        self.bar.set_message(format!("{} valid files", valid_files));
    }
}
