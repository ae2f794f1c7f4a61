// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// JSON export of assembled reports.
///
/// Reports are written with two-space indentation followed by a newline.
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{
    error::{Error, export_io_error, output_error},
    report::AnalysisReport,
};

/// Serializes `report` as indented JSON.
///
/// # Errors
///
/// Returns [`Error::Serialize`] when serialization fails.
pub fn to_json_string(report: &AnalysisReport,) -> Result<String, Error,>
{
    Ok(serde_json::to_string_pretty(report,)?,)
}

/// Writes `report` as indented JSON to `writer`.
///
/// # Errors
///
/// Returns [`Error::Serialize`] when serialization fails and
/// [`Error::Output`] when the write fails.
pub fn write_report<W: Write,>(writer: &mut W, report: &AnalysisReport,) -> Result<(), Error,>
{
    let text = to_json_string(report,)?;
    writeln!(writer, "{text}").map_err(output_error,)?;
    writer.flush().map_err(output_error,)
}

/// Saves `report` to `path`, creating missing parent directories.
///
/// # Returns
///
/// The path the report was written to.
///
/// # Errors
///
/// Returns [`Error::ExportIo`] when the file or its parents cannot be written
/// and [`Error::Serialize`] when serialization fails.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// # fn example(report: &gh_insight::AnalysisReport) -> Result<(), gh_insight::Error> {
/// let saved = gh_insight::save_report(Path::new("reports/octocat.json"), report)?;
/// println!("Saved to {}", saved.display());
/// # Ok(())
/// # }
/// ```
pub fn save_report(path: &Path, report: &AnalysisReport,) -> Result<PathBuf, Error,>
{
    let mut contents = to_json_string(report,)?;
    contents.push('\n',);

    if let Some(parent,) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent,).map_err(|source| export_io_error(parent, source,),)?;
    }

    fs::write(path, contents,).map_err(|source| export_io_error(path, source,),)?;
    info!("Saved report to {}", path.display());

    Ok(path.to_path_buf(),)
}
