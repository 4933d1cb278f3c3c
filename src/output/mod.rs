//! Module for handing finished reports over to their destination

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::domain::Report;
use crate::error::{Error, io_error};


/// Destination of the report produced for an input file. Implementations may block; they are run
/// off the async worker threads.
pub trait ReportWriter: Send + Sync {
    /// Stores `report` under the name of the input file it summarizes.
    fn write(&self, file_name: &str, report: &Report) -> Result<(), Error>;
}

/// Writes each report as a JSON document into a directory, named after its input file.
#[derive(Debug, Clone)]
pub struct JsonReportWriter {
    output_dir: PathBuf,
}

impl JsonReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path the report for `file_name` is written to.
    pub fn report_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

impl ReportWriter for JsonReportWriter {
    /// Writes next to the final path first and renames into place, so the report never appears
    /// half-written. Blocks on file I/O.
    fn write(&self, file_name: &str, report: &Report) -> Result<(), Error> {
        let path = self.report_path(file_name);
        let temp_path = self.output_dir.join(format!(".{file_name}.tmp"));

        if let Err(e) = write_json(&temp_path, report) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e);
        }
        std::fs::rename(&temp_path, &path).map_err(|e| {
            let _ = std::fs::remove_file(&temp_path);
            io_error(&path, e)
        })
    }
}

fn write_json(path: &Path, report: &Report) -> Result<(), Error> {
    let file = File::create(path).map_err(|e| io_error(path, e))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, report)?;
    writer.flush().map_err(|e| io_error(path, e))
}
