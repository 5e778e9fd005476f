//! Export helpers for CSV and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod porkchop {
    use std::io::Write;
    use std::path::Path;

    use orrery_transfer::PorkchopPoint;

    use super::{ExportError, writer_for_path};

    /// Column order of [`PorkchopPoint`] rows.
    pub const HEADER: [&str; 12] = [
        "departure",
        "arrival",
        "departure_utc",
        "arrival_utc",
        "time_of_flight_days",
        "c3",
        "vinf_departure",
        "vinf_arrival",
        "dv_departure",
        "dv_arrival",
        "dv_total",
        "feasible",
    ];

    /// Write the header and one row per point. The header is written even
    /// for an empty grid.
    pub fn write_points<W: Write>(writer: W, points: &[PorkchopPoint]) -> Result<(), ExportError> {
        let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
        csv.write_record(HEADER)?;
        for point in points {
            csv.serialize(point)?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Write a porkchop grid to `path` (`-` for stdout).
    pub fn write_csv(path: &Path, points: &[PorkchopPoint]) -> Result<(), ExportError> {
        write_points(writer_for_path(path)?, points)
    }
}

pub mod summary {
    use std::io::Write;
    use std::path::Path;

    use serde::Serialize;

    use super::{ExportError, writer_for_path};

    /// Pretty-printed JSON followed by a newline.
    pub fn write_json<T: Serialize, W: Write>(mut writer: W, value: &T) -> Result<(), ExportError> {
        serde_json::to_writer_pretty(&mut writer, value)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), ExportError> {
        write_json(writer_for_path(path)?, value)
    }
}
