//! Label file loading utilities.
//!
//! A label file holds one box per line:
//!
//! ```text
//! <image_id> <class> <confidence> <c0> <c1> <c2> <c3>
//! ```
//!
//! Tokens are separated by whitespace. The image id is kept as a string, the
//! remaining six tokens must parse as numbers. Blank lines are ignored.

use crate::error::{MapEvalError, Result};
use crate::types::BoxRecord;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Number of numeric tokens after the image id.
pub const NUMERIC_FIELDS: usize = 6;

/// Parse a single label line into a box record.
///
/// # Errors
///
/// Returns `MalformedRecord` when the line does not have exactly seven tokens
/// or a numeric token fails to parse.
///
/// # Example
///
/// ```
/// use map_eval::loader::parse_record;
///
/// let record = parse_record("frame_01 0 0.87 10 20 110 220").unwrap();
/// assert_eq!(record.image_id(), "frame_01");
/// assert_eq!(record.confidence(), 0.87);
/// assert_eq!(record.bbox(), [10.0, 20.0, 110.0, 220.0]);
/// ```
pub fn parse_record(line: &str) -> Result<BoxRecord> {
    let mut tokens = line.split_whitespace();

    let image_id = tokens
        .next()
        .ok_or_else(|| MapEvalError::malformed("empty line"))?;

    let values: Vec<&str> = tokens.collect();
    if values.len() != NUMERIC_FIELDS {
        return Err(MapEvalError::malformed(format!(
            "expected {} fields, got {}",
            NUMERIC_FIELDS + 1,
            values.len() + 1
        )));
    }

    let mut numbers = [0.0f64; NUMERIC_FIELDS];
    for (slot, token) in numbers.iter_mut().zip(&values) {
        *slot = token.parse::<f64>().map_err(|_| {
            MapEvalError::malformed(format!("\"{}\" is not a number", token))
        })?;
    }

    BoxRecord::new(
        image_id,
        numbers[0],
        numbers[1],
        [numbers[2], numbers[3], numbers[4], numbers[5]],
    )
}

/// Parse every non-blank line of a label file's contents.
///
/// `source_name` is reported in errors together with the 1-based line number.
///
/// # Example
///
/// ```
/// use map_eval::loader::load_from_str;
///
/// let contents = "img 0 1 0 0 10 10\n\nimg 0 1 20 20 30 30\n";
/// let records = load_from_str(contents, "img.txt").unwrap();
/// assert_eq!(records.len(), 2);
/// ```
pub fn load_from_str(contents: &str, source_name: &str) -> Result<Vec<BoxRecord>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_record(line).map_err(|e| e.at(source_name, idx + 1)))
        .collect()
}

/// Load all records from one label file.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<BoxRecord>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let records = load_from_str(&contents, &path.display().to_string())?;
    debug!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Load all records from every file in a directory.
///
/// Files are read in file-name order and sub-directories are skipped. The
/// first malformed line aborts the whole load.
///
/// # Errors
///
/// Returns an error if the directory or any file cannot be read, or if any
/// line is malformed.
///
/// # Example
///
/// ```no_run
/// use map_eval::loader::load_from_dir;
///
/// let ground_truths = load_from_dir("gt_labels").unwrap();
/// println!("amount of ground truth: {}", ground_truths.len());
/// ```
pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<BoxRecord>> {
    let dir = dir.as_ref();

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    let mut records = Vec::new();
    for file in &files {
        records.extend(load_from_file(file)?);
    }

    info!(
        "loaded {} records from {} files in {}",
        records.len(),
        files.len(),
        dir.display()
    );
    Ok(records)
}
