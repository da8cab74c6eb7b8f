use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::topsis::*;

/// The JSON description of a run. Every field is optional: the command line
/// provides whatever is missing.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(rename = "inputFile")]
    pub input_file: Option<String>,
    pub weights: Option<String>,
    pub impacts: Option<String>,
    #[serde(rename = "outputFile")]
    pub output_file: Option<String>,
    #[serde(rename = "inputType")]
    pub input_type: Option<String>,
    #[serde(rename = "outputType")]
    pub output_type: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    pub strict: Option<bool>,
}

/// Reads a configuration file. Relative file paths in the configuration are
/// resolved against the directory of the configuration file.
pub fn read_config(path: &str) -> RunResult<RunConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let mut config: RunConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    info!("config: {:?}", config);

    let root_p = Path::new(path).parent().unwrap_or_else(|| Path::new(""));
    config.input_file = config.input_file.map(|p| resolve_path(root_p, &p));
    config.output_file = config.output_file.map(|p| resolve_path(root_p, &p));
    Ok(config)
}

fn resolve_path(root_p: &Path, file_path: &str) -> String {
    if file_path == "stdout" || Path::new(file_path).is_absolute() {
        return file_path.to_string();
    }
    let p: PathBuf = root_p.join(file_path);
    p.display().to_string()
}
