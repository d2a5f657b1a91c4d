use std::{
    fs::File,
    io::{self, BufWriter, Write},
};

use crate::{Error, Improvement, Result, SearchObserver, SolverOptions};

/// Writes one `distance=<d> elapsed=<duration> step=<n>` line per improvement.
///
/// Every line is flushed so a reader tailing the output sees progress while
/// the search keeps running.
pub struct ProgressWriter<W: Write> {
    out: W,
}

impl ProgressWriter<Box<dyn Write>> {
    /// Opens `--output`, or stdout when it is empty or `-`.
    pub fn from_options(options: &SolverOptions) -> Result<Self> {
        let out: Box<dyn Write> = match options.output_path() {
            Some(path) => {
                let file = File::create(path).map_err(|e| {
                    Error::other(format!(
                        "failed to create output file {}: {e}",
                        path.display()
                    ))
                })?;
                Box::new(BufWriter::new(file))
            }
            None => Box::new(io::stdout().lock()),
        };
        Ok(Self::new(out))
    }
}

impl<W: Write> ProgressWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SearchObserver for ProgressWriter<W> {
    fn observe(&mut self, improvement: &Improvement) -> Result<()> {
        writeln!(
            self.out,
            "distance={} elapsed={:?} step={}",
            improvement.distance, improvement.elapsed, improvement.step
        )?;
        self.out.flush()?;
        Ok(())
    }
}
