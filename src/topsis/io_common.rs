// Primitives shared by the readers and the writers.

use std::fs;
use std::path::Path;

use crate::topsis::*;

/// The column names appended to the input columns.
pub const SCORE_COLUMN: &str = "Topsis Score";
pub const RANK_COLUMN: &str = "Rank";

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Csv,
    Xlsx,
}

impl InputType {
    pub fn from_name(name: &str) -> RunResult<InputType> {
        match name {
            "csv" => Ok(InputType::Csv),
            "xlsx" | "excel" => Ok(InputType::Xlsx),
            x => UnknownFileTypeSnafu {
                what: "input",
                name: x,
            }
            .fail(),
        }
    }

    /// Excel for `.xlsx` files, CSV for everything else.
    pub fn infer(path: &str) -> InputType {
        match file_extension(path).as_deref() {
            Some("xlsx") => InputType::Xlsx,
            _ => InputType::Csv,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum OutputType {
    Csv,
    Json,
}

impl OutputType {
    pub fn from_name(name: &str) -> RunResult<OutputType> {
        match name {
            "csv" => Ok(OutputType::Csv),
            "json" => Ok(OutputType::Json),
            x => UnknownFileTypeSnafu {
                what: "output",
                name: x,
            }
            .fail(),
        }
    }

    pub fn infer(path: &str) -> OutputType {
        match file_extension(path).as_deref() {
            Some("json") => OutputType::Json,
            _ => OutputType::Csv,
        }
    }
}

fn file_extension(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Checks that the input exists and is not empty, before handing it to a reader.
pub fn check_input_file(path: &str) -> RunResult<()> {
    let p = Path::new(path);
    ensure!(p.is_file(), NotFoundSnafu { path });
    let metadata = fs::metadata(p).context(InputMetadataSnafu { path })?;
    ensure!(metadata.len() > 0, EmptyInputSnafu { path });
    Ok(())
}

/// The reference output, to compare with the computed output.
pub fn read_reference(path: &str) -> RunResult<String> {
    let contents = fs::read_to_string(path).context(OpeningReferenceSnafu { path })?;
    debug!("read_reference: {} bytes", contents.len());
    Ok(contents)
}

pub fn format_score(score: f64) -> String {
    score.to_string()
}

pub fn format_rank(rank: Option<u32>) -> String {
    rank.map(|r| r.to_string()).unwrap_or_default()
}
