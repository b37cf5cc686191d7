//! Line-oriented vector text format.
//!
//! One sample per line:
//!
//! ```text
//! <category>: [<v0>, <v1>, ..., <vk-1>]
//! ```
//!
//! Values are written in fixed-point notation with a configurable number of
//! decimals. Blank lines are skipped when reading.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use ndarray::{Array2, ArrayView2};

use crate::error::{ReduceError, Result};

pub const DELIMITER: &str = ": [";
const SEPARATOR: &str = ", ";

pub fn write_vectors<W: Write>(
    writer: &mut W,
    categories: &[String],
    vectors: ArrayView2<f64>,
    precision: usize,
) -> Result<()> {
    if categories.len() != vectors.nrows() {
        return Err(ReduceError::InvalidShape(format!(
            "{} categories for {} vectors",
            categories.len(),
            vectors.nrows()
        )));
    }
    if let Some(bad) = categories.iter().find(|c| !is_writable_category(c)) {
        return Err(ReduceError::InvalidCategory(bad.clone()));
    }

    for (category, row) in categories.iter().zip(vectors.rows()) {
        let values = row
            .iter()
            .map(|v| format!("{:.*}", precision, v))
            .collect::<Vec<_>>()
            .join(SEPARATOR);
        writeln!(writer, "{}{}{}]", category, DELIMITER, values)?;
    }
    Ok(())
}

/// Reads every record from `reader`. An input without records yields a 0×0
/// matrix.
pub fn read_vectors<R: BufRead>(reader: R) -> Result<(Array2<f64>, Vec<String>)> {
    let mut categories = Vec::new();
    let mut values = Vec::new();
    let mut width: Option<usize> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let (category, vector) = parse_line(&line, line_no)?;
        match width {
            None => width = Some(vector.len()),
            Some(w) if w != vector.len() => {
                return Err(ReduceError::parse(
                    line_no,
                    format!("expected {} values, found {}", w, vector.len()),
                ))
            }
            Some(_) => {}
        }

        categories.push(category.to_string());
        values.extend(vector);
    }

    let shape = (categories.len(), width.unwrap_or(0));
    let vectors = Array2::from_shape_vec(shape, values)
        .map_err(|e| ReduceError::InvalidShape(e.to_string()))?;
    Ok((vectors, categories))
}

/// Writes the vectors to `path`, creating missing parent directories.
pub fn save_vectors(
    path: impl AsRef<Path>,
    categories: &[String],
    vectors: ArrayView2<f64>,
    precision: usize,
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    write_vectors(&mut writer, categories, vectors, precision)?;
    writer.flush()?;
    Ok(())
}

pub fn load_vectors(path: impl AsRef<Path>) -> Result<(Array2<f64>, Vec<String>)> {
    let file = File::open(path.as_ref())?;
    read_vectors(BufReader::new(file))
}

/// Sorted distinct categories.
pub fn unique_categories(categories: &[String]) -> Vec<String> {
    categories
        .iter()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn is_writable_category(category: &str) -> bool {
    !category.contains(DELIMITER) && !category.contains(['\n', '\r'])
}

fn parse_line(line: &str, line_no: usize) -> Result<(&str, Vec<f64>)> {
    let (category, rest) = line
        .split_once(DELIMITER)
        .ok_or_else(|| ReduceError::parse(line_no, "missing \": [\" delimiter"))?;

    let body = rest
        .trim_end_matches(['\r', '\n'])
        .strip_suffix(']')
        .ok_or_else(|| ReduceError::parse(line_no, "missing closing \"]\""))?;

    if body.trim().is_empty() {
        return Ok((category, Vec::new()));
    }

    let vector = body
        .split(',')
        .map(|token| {
            let token = token.trim();
            token
                .parse::<f64>()
                .map_err(|e| ReduceError::parse(line_no, format!("invalid number {:?}: {}", token, e)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((category, vector))
}
