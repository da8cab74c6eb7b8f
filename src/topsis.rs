use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use topsis_rank::*;

use std::fs;
use std::path::PathBuf;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::topsis::config_reader::*;
use crate::topsis::io_common::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TopsisError {
    #[snafu(display("File '{path}' not found."))]
    NotFound { path: String },
    #[snafu(display("The file '{path}' is empty."))]
    EmptyInput { path: String },
    #[snafu(display("Could not read the metadata of file '{path}': {source}"))]
    InputMetadata {
        source: std::io::Error,
        path: String,
    },

    #[snafu(display("Error opening CSV file '{path}': {source}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing line {lineno} of the CSV file: {source}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Line {lineno} has {found} fields, but the header has {expected}"))]
    CsvLineTooLong {
        lineno: usize,
        found: usize,
        expected: usize,
    },
    #[snafu(display("Error writing CSV output: {source}"))]
    CsvWrite { source: csv::Error },
    #[snafu(display("Error flushing CSV output: {source}"))]
    CsvFlush { source: std::io::Error },

    #[snafu(display("Error opening Excel file '{path}': {source}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The Excel file has no worksheet or no header row"))]
    EmptyExcel {},
    #[snafu(display("The Excel file has no worksheet named '{name}'"))]
    MissingWorksheet { name: String },

    #[snafu(display("Error opening JSON file '{path}': {source}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Missing parameter '{name}' (not given on the command line nor in the configuration)"))]
    MissingParameter { name: String },
    #[snafu(display("Unknown {what} type '{name}'"))]
    UnknownFileType { what: String, name: String },

    #[snafu(display("Error rendering the JSON output: {source}"))]
    RenderingJson { source: serde_json::Error },
    #[snafu(display("Error writing output file '{path}': {source}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading reference file '{path}': {source}"))]
    OpeningReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between the computed output and the reference '{path}'"))]
    ReferenceMismatch { path: String },

    #[snafu(display("{source}"))]
    Ranking { source: TopsisErrors },
}

impl TopsisError {
    /// True for the problems that come from the input data or the parameters.
    /// All the other errors are unexpected.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            TopsisError::NotFound { .. }
                | TopsisError::EmptyInput { .. }
                | TopsisError::Ranking { .. }
        )
    }
}

pub type RunResult<T> = Result<T, TopsisError>;

/// All the parameters of one run, after merging the command line and the configuration file.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RunParameters {
    pub input_file: String,
    pub weights: String,
    pub impacts: String,
    /// A file path or `stdout`.
    pub output_file: String,
    pub input_type: InputType,
    pub output_type: OutputType,
    pub excel_worksheet_name: Option<String>,
    pub strict: bool,
    pub reference: Option<String>,
}

fn pick(cli: Option<&String>, config: &Option<String>, name: &str) -> RunResult<String> {
    match (cli, config) {
        (Some(x), _) => Ok(x.clone()),
        (None, Some(x)) => Ok(x.clone()),
        (None, None) => MissingParameterSnafu { name }.fail(),
    }
}

/// Merges the command line arguments with the optional configuration file.
///
/// The positional arguments, when present, override the configuration.
pub fn resolve_parameters(args: &Args) -> RunResult<RunParameters> {
    let config = match &args.config {
        Some(path) => read_config(path)?,
        None => RunConfig::default(),
    };
    debug!("resolve_parameters: config: {:?}", config);

    let given = args.positional();
    let positional: Option<&[&String]> = if given.len() == 4 {
        Some(given.as_slice())
    } else {
        None
    };
    let positional_at = |idx: usize| positional.and_then(|p| p.get(idx).copied());

    let input_file = pick(positional_at(0), &config.input_file, "inputFile")?;
    let weights = pick(positional_at(1), &config.weights, "weights")?;
    let impacts = pick(positional_at(2), &config.impacts, "impacts")?;
    let output_file = pick(positional_at(3), &config.output_file, "outputFile")?;

    let input_type = match args.input_type.as_ref().or(config.input_type.as_ref()) {
        Some(name) => InputType::from_name(name)?,
        None => InputType::infer(&input_file),
    };
    let output_type = match args.output_type.as_ref().or(config.output_type.as_ref()) {
        Some(name) => OutputType::from_name(name)?,
        None => OutputType::infer(&output_file),
    };

    Ok(RunParameters {
        input_file,
        weights,
        impacts,
        output_file,
        input_type,
        output_type,
        excel_worksheet_name: args
            .excel_worksheet_name
            .clone()
            .or(config.excel_worksheet_name),
        strict: args.strict || config.strict.unwrap_or(false),
        reference: args.reference.clone(),
    })
}

fn read_table(params: &RunParameters) -> RunResult<RawTable> {
    check_input_file(&params.input_file)?;
    info!(
        "Attempting to read {:?} file {:?}",
        params.input_type, params.input_file
    );
    match params.input_type {
        InputType::Csv => io_csv::read_csv_table(&params.input_file),
        InputType::Xlsx => io_excel::read_excel_table(
            &params.input_file,
            params.excel_worksheet_name.as_deref(),
        ),
    }
}

fn build_summary_js(params: &RunParameters, result: &TopsisResult) -> JSValue {
    let results: Vec<JSValue> = result
        .alternatives
        .iter()
        .map(|ra| {
            json!({
                "name": ra.name,
                "values": ra.values,
                "distanceBest": ra.distance_best,
                "distanceWorst": ra.distance_worst,
                "score": ra.score,
                "rank": ra.rank,
            })
        })
        .collect();
    let impacts: Vec<&str> = result.impacts.iter().map(|i| i.symbol()).collect();
    json!({
        "config": {
            "inputFile": params.input_file,
            "weights": params.weights,
            "impacts": impacts.join(","),
        },
        "criteria": result.criteria,
        "weights": result.weights,
        "idealBest": result.ideal_best,
        "idealWorst": result.ideal_worst,
        "results": results,
    })
}

fn render_json(params: &RunParameters, result: &TopsisResult) -> RunResult<String> {
    let js = build_summary_js(params, result);
    serde_json::to_string_pretty(&js).context(RenderingJsonSnafu {})
}

/// Reads the input, ranks the alternatives and writes the output.
///
/// Nothing is written unless the whole computation succeeded (and matched the
/// reference, if one was given).
pub fn run_ranking(params: &RunParameters) -> RunResult<()> {
    info!("run_ranking: parameters: {:?}", params);
    let table = read_table(params)?;
    debug!(
        "run_ranking: headers: {:?}, {} rows",
        table.headers,
        table.rows.len()
    );

    let rules = if params.strict {
        TopsisRules::STRICT_RULES
    } else {
        TopsisRules::DEFAULT_RULES
    };
    let result = run_topsis(&table, &params.weights, &params.impacts, &rules)
        .context(RankingSnafu {})?;

    let rendered: String = match params.output_type {
        OutputType::Csv => io_csv::render_csv(&table, &result)?,
        OutputType::Json => render_json(params, &result)?,
    };

    if let Some(reference_p) = &params.reference {
        let reference = read_reference(reference_p)?;
        if reference.trim_end() != rendered.trim_end() {
            warn!("Found differences with the reference {:?}", reference_p);
            print_diff(reference.as_str(), rendered.as_str(), "\n");
            return ReferenceMismatchSnafu { path: reference_p }.fail();
        }
    }

    write_output(&params.output_file, &rendered)
}

fn write_output(path: &str, rendered: &str) -> RunResult<()> {
    if path == "stdout" {
        print!("{}", rendered);
        return Ok(());
    }
    let p: PathBuf = PathBuf::from(path);
    info!("Writing output to {:?}", p.display());
    fs::write(&p, rendered).context(WritingOutputSnafu { path })
}

/// Entry point from the command line.
pub fn run(args: &Args) -> RunResult<RunParameters> {
    let params = resolve_parameters(args)?;
    run_ranking(&params)?;
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn test_dir(test_name: &str) -> PathBuf {
        [env!("CARGO_MANIFEST_DIR"), "tests", "data", test_name]
            .iter()
            .collect()
    }

    fn temp_output(test_name: &str, ext: &str) -> String {
        let p = std::env::temp_dir().join(format!(
            "topsis-{}-{}.{}",
            test_name,
            std::process::id(),
            ext
        ));
        let _ = fs::remove_file(&p);
        p.display().to_string()
    }

    fn test_args(test_name: &str) -> Args {
        let config_p = test_dir(test_name).join(format!("{}_config.json", test_name));
        Args {
            input_file: None,
            weights: None,
            impacts: None,
            output_file: None,
            config: Some(config_p.display().to_string()),
            reference: None,
            input_type: None,
            output_type: None,
            excel_worksheet_name: None,
            strict: false,
            verbose: false,
        }
    }

    /// Runs the configuration of a test case, writing into a temporary file.
    fn run_test(test_name: &str, args: &Args) -> (RunResult<()>, String) {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut params = resolve_parameters(args).unwrap();
        let ext = match params.output_type {
            OutputType::Csv => "csv",
            OutputType::Json => "json",
        };
        params.output_file = temp_output(test_name, ext);
        (run_ranking(&params), params.output_file)
    }

    /// Checks the output of a test case against `<test_name>_expected.csv`.
    fn test_wrapper(test_name: &str) {
        let mut args = test_args(test_name);
        let expected_p = test_dir(test_name).join(format!("{}_expected.csv", test_name));
        args.reference = Some(expected_p.display().to_string());
        let (res, out) = run_test(test_name, &args);
        if let Err(e) = &res {
            panic!("test {} failed: {}", test_name, e);
        }
        let written = fs::read_to_string(&out).unwrap();
        let expected = fs::read_to_string(&expected_p).unwrap();
        assert_eq!(written.trim_end(), expected.trim_end());
        let _ = fs::remove_file(out);
    }

    /// Runs a failing test case and checks that no output was written.
    fn failing_test(test_name: &str) -> TopsisError {
        let (res, out) = run_test(test_name, &test_args(test_name));
        assert!(!Path::new(&out).exists(), "output written for {}", test_name);
        match res {
            Err(e) => e,
            Ok(_) => panic!("test {} should fail", test_name),
        }
    }

    fn ranking_error(e: TopsisError) -> TopsisErrors {
        match e {
            TopsisError::Ranking { source } => source,
            x => panic!("not a ranking error: {:?}", x),
        }
    }

    #[test]
    fn phones() {
        test_wrapper("phones");
    }

    #[test]
    fn ties() {
        test_wrapper("ties");
    }

    #[test]
    fn three_columns() {
        test_wrapper("three_columns");
    }

    #[test]
    fn zero_column() {
        test_wrapper("zero_column");
    }

    #[test]
    fn zero_column_strict() {
        let mut args = test_args("zero_column");
        args.strict = true;
        let (res, out) = run_test("zero_column_strict", &args);
        assert!(!Path::new(&out).exists());
        let e = ranking_error(res.unwrap_err());
        assert_eq!(e.kind(), "DegenerateColumnError");
    }

    #[test]
    fn count_mismatch() {
        let e = failing_test("count_mismatch");
        assert!(e.is_input_error());
        assert_eq!(ranking_error(e).kind(), "CountMismatchError");
    }

    #[test]
    fn non_numeric() {
        let e = ranking_error(failing_test("non_numeric"));
        assert_eq!(e.kind(), "TypeError");
        assert_eq!(
            e,
            TopsisErrors::NonNumericCriterion {
                row: 3,
                column: "Storage".to_string(),
                content: "large".to_string(),
            }
        );
    }

    #[test]
    fn two_columns() {
        let e = ranking_error(failing_test("two_columns"));
        assert_eq!(e, TopsisErrors::TooFewColumns { found: 2 });
    }

    #[test]
    fn missing_name() {
        let e = ranking_error(failing_test("missing_name"));
        assert_eq!(e, TopsisErrors::MissingIdentifier { row: 2 });
    }

    #[test]
    fn empty_input() {
        let e = failing_test("empty_input");
        assert!(matches!(e, TopsisError::EmptyInput { .. }), "{:?}", e);
        assert!(e.is_input_error());
    }

    #[test]
    fn not_found() {
        let e = failing_test("not_found");
        assert!(matches!(e, TopsisError::NotFound { .. }), "{:?}", e);
        assert_eq!(
            e.to_string(),
            format!(
                "File '{}' not found.",
                test_dir("not_found").join("missing.csv").display()
            )
        );
    }

    #[test]
    fn reference_mismatch() {
        let mut args = test_args("phones");
        args.reference = Some(
            test_dir("ties")
                .join("ties_expected.csv")
                .display()
                .to_string(),
        );
        let (res, out) = run_test("reference_mismatch", &args);
        assert!(matches!(res, Err(TopsisError::ReferenceMismatch { .. })));
        assert!(!Path::new(&out).exists());
    }

    #[test]
    fn json_output() {
        let mut args = test_args("phones");
        args.output_type = Some("json".to_string());
        let (res, out) = run_test("json_output", &args);
        res.unwrap();
        let js: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        let results = js["results"].as_array().unwrap();
        assert_eq!(results.len(), 5);
        assert_eq!(results[4]["name"], "E");
        assert_eq!(results[4]["rank"], 1);
        assert_eq!(results[0]["rank"], 5);
        assert_eq!(js["config"]["impacts"], "+,+,+,-");
        let _ = fs::remove_file(out);
    }

    #[test]
    fn json_output_with_undefined_scores() {
        let mut args = test_args("zero_column");
        args.output_type = Some("json".to_string());
        let params = resolve_parameters(&args).unwrap();
        let table = read_table(&params).unwrap();
        let result = run_topsis(
            &table,
            &params.weights,
            &params.impacts,
            &TopsisRules::DEFAULT_RULES,
        )
        .unwrap();
        let rendered = render_json(&params, &result).unwrap();
        let js: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert!(js["results"][0]["score"].is_null());
        assert!(js["results"][0]["rank"].is_null());
    }

    #[test]
    fn rendering_errors_are_not_parsing_errors() {
        let source = serde_json::from_str::<JSValue>("{").unwrap_err();
        let e = Err::<(), _>(source)
            .context(RenderingJsonSnafu {})
            .unwrap_err();
        assert!(e.to_string().starts_with("Error rendering the JSON output"));
        assert!(!e.is_input_error());
    }

    #[test]
    fn positional_arguments_override_config() {
        let mut args = test_args("count_mismatch");
        let input = test_dir("phones").join("input.csv").display().to_string();
        args.input_file = Some(input.clone());
        args.weights = Some("1,1,1,2".to_string());
        args.impacts = Some("+,+,+,-".to_string());
        args.output_file = Some("out.csv".to_string());
        let params = resolve_parameters(&args).unwrap();
        assert_eq!(params.input_file, input);
        assert_eq!(params.weights, "1,1,1,2");
        assert_eq!(params.output_file, "out.csv");
        assert_eq!(params.output_type, OutputType::Csv);
    }

    #[test]
    fn missing_parameter() {
        let args = Args {
            input_file: None,
            weights: None,
            impacts: None,
            output_file: None,
            config: None,
            reference: None,
            input_type: None,
            output_type: None,
            excel_worksheet_name: None,
            strict: false,
            verbose: false,
        };
        let e = resolve_parameters(&args).unwrap_err();
        assert!(matches!(e, TopsisError::MissingParameter { .. }));
        assert!(!e.is_input_error());
    }
}
