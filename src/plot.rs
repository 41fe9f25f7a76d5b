//! Destinations for the precision-recall curve produced by an evaluation.
//!
//! The evaluator hands its curve to a [`CurveSink`] once per call and ignores
//! what the sink does with it.

use crate::error::Result;
use crate::types::PrCurve;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Receives the recall/precision sequences of an evaluation.
pub trait CurveSink {
    fn emit(&mut self, curve: &PrCurve) -> Result<()>;
}

impl<F> CurveSink for F
where
    F: FnMut(&PrCurve),
{
    fn emit(&mut self, curve: &PrCurve) -> Result<()> {
        self(curve);
        Ok(())
    }
}

/// Discards every curve.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl CurveSink for NullSink {
    fn emit(&mut self, _curve: &PrCurve) -> Result<()> {
        Ok(())
    }
}

/// Keeps every emitted curve in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub curves: Vec<PrCurve>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently emitted curve.
    pub fn last(&self) -> Option<&PrCurve> {
        self.curves.last()
    }
}

impl CurveSink for RecordingSink {
    fn emit(&mut self, curve: &PrCurve) -> Result<()> {
        curve.check_lengths()?;
        self.curves.push(curve.clone());
        Ok(())
    }
}

/// Forwards each curve to several sinks.
///
/// Every sink receives the curve even if an earlier one fails. Failures are
/// logged and the first is returned.
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Box<dyn CurveSink>>,
}

impl MultiSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Box<dyn CurveSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl CurveSink for MultiSink {
    fn emit(&mut self, curve: &PrCurve) -> Result<()> {
        let mut first_error = None;
        for sink in &mut self.sinks {
            if let Err(e) = CurveSink::emit(sink.as_mut(), curve) {
                log::error!("curve output failed: {}", e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Writes the curve as pretty-printed JSON to a file.
#[derive(Debug, Clone)]
pub struct JsonCurveWriter {
    path: PathBuf,
}

impl JsonCurveWriter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CurveSink for JsonCurveWriter {
    fn emit(&mut self, curve: &PrCurve) -> Result<()> {
        curve.check_lengths()?;
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, curve)?;
        writer.flush()?;
        log::info!("wrote PR curve ({} points) to {}", curve.len(), self.path.display());
        Ok(())
    }
}

/// Renders the curve as a character chart.
///
/// Recall runs along the x axis and precision along the y axis, both over
/// `[0, 1]`. Consecutive points are joined so the step shape of the curve stays
/// visible.
#[derive(Debug)]
pub struct AsciiPlot<W: Write> {
    out: W,
    width: usize,
    height: usize,
}

impl<W: Write> AsciiPlot<W> {
    pub const DEFAULT_WIDTH: usize = 60;
    pub const DEFAULT_HEIGHT: usize = 20;

    pub fn new(out: W) -> Self {
        Self::with_size(out, Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT)
    }

    /// Chart with a custom plotting area; both sides are at least 2 cells.
    pub fn with_size(out: W, width: usize, height: usize) -> Self {
        Self {
            out,
            width: width.max(2),
            height: height.max(2),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn column(&self, recall: f64) -> usize {
        let col = (recall.clamp(0.0, 1.0) * (self.width - 1) as f64).round();
        col as usize
    }

    fn row(&self, precision: f64) -> usize {
        // Row 0 is the top of the chart (precision 1.0)
        let from_bottom = (precision.clamp(0.0, 1.0) * (self.height - 1) as f64).round();
        self.height - 1 - from_bottom as usize
    }

    fn render(&self, curve: &PrCurve) -> Vec<Vec<char>> {
        let mut grid = vec![vec![' '; self.width]; self.height];

        let cells: Vec<(usize, usize)> = curve
            .points()
            .map(|(r, p)| (self.column(r), self.row(p)))
            .collect();

        for pair in cells.windows(2) {
            let (c0, r0) = pair[0];
            let (c1, r1) = pair[1];
            for c in c0.min(c1)..=c0.max(c1) {
                grid[r0][c] = '-';
            }
            for r in r0.min(r1)..=r0.max(r1) {
                grid[r][c1] = '|';
            }
        }
        for &(c, r) in &cells {
            grid[r][c] = '*';
        }

        grid
    }
}

impl<W: Write> CurveSink for AsciiPlot<W> {
    fn emit(&mut self, curve: &PrCurve) -> Result<()> {
        curve.check_lengths()?;
        let grid = self.render(curve);

        writeln!(self.out, "PR-Curve")?;
        for (i, row) in grid.iter().enumerate() {
            let label = if i == 0 {
                "1.0"
            } else if i == self.height - 1 {
                "0.0"
            } else {
                "   "
            };
            let line: String = row.iter().collect();
            writeln!(self.out, "{} |{}", label, line.trim_end())?;
        }
        writeln!(self.out, "    +{}", "-".repeat(self.width))?;
        writeln!(
            self.out,
            "     0.0{:>width$}",
            "1.0",
            width = self.width.saturating_sub(3)
        )?;
        writeln!(self.out, "     Recall (x) / Precision (y)")?;
        self.out.flush()?;
        Ok(())
    }
}
