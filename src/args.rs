use clap::Parser;

/// This is a multi-criteria decision ranking program (TOPSIS).
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// The input file (first column: names, other columns: numeric criteria).
    #[clap(value_parser, value_name = "InputDataFile")]
    pub input_file: Option<String>,

    /// The comma-separated weights, one per criterion.
    #[clap(value_parser, value_name = "Weights", allow_hyphen_values = true)]
    pub weights: Option<String>,

    /// The comma-separated impacts ('+' or '-'), one per criterion.
    #[clap(value_parser, value_name = "Impacts", allow_hyphen_values = true)]
    pub impacts: Option<String>,

    /// The output file ('stdout' is accepted).
    #[clap(value_parser, value_name = "ResultFileName")]
    pub output_file: Option<String>,

    /// (file path, optional) A JSON file describing the run. The positional arguments, if given,
    /// override its content.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference file containing the expected output. If provided, the program
    /// checks that the computed output matches the reference and writes nothing otherwise.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (csv or xlsx) The type of the input. By default, inferred from the file extension.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (csv or json) The type of the output. By default, inferred from the file extension.
    #[clap(long, value_parser)]
    pub output_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use (default: the first one).
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// If passed as an argument, columns that only contain zeros and alternatives without a
    /// defined score are errors instead of being reported as NaN.
    #[clap(long, takes_value = false)]
    pub strict: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}

impl Args {
    /// The positional arguments that were given, in order.
    pub fn positional(&self) -> Vec<&String> {
        [
            &self.input_file,
            &self.weights,
            &self.impacts,
            &self.output_file,
        ]
        .iter()
        .copied()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_after_positional_arguments() {
        let args = Args::try_parse_from([
            "topsis",
            "data.csv",
            "1,1,1,2",
            "-,+,+,-",
            "result.csv",
            "--strict",
            "--reference",
            "expected.csv",
        ])
        .unwrap();
        assert_eq!(
            args.positional(),
            vec!["data.csv", "1,1,1,2", "-,+,+,-", "result.csv"]
        );
        assert!(args.strict);
        assert_eq!(args.reference.as_deref(), Some("expected.csv"));
    }

    #[test]
    fn options_before_positional_arguments() {
        let args = Args::try_parse_from([
            "topsis",
            "--verbose",
            "data.csv",
            "-1,2",
            "-,+",
            "stdout",
        ])
        .unwrap();
        assert!(args.verbose);
        assert_eq!(args.weights.as_deref(), Some("-1,2"));
        assert_eq!(args.impacts.as_deref(), Some("-,+"));
        assert_eq!(args.output_file.as_deref(), Some("stdout"));
    }

    #[test]
    fn partial_positional_arguments() {
        let args = Args::try_parse_from(["topsis", "data.csv", "1,1"]).unwrap();
        assert_eq!(args.positional(), vec!["data.csv", "1,1"]);
    }

    #[test]
    fn too_many_positional_arguments() {
        let res = Args::try_parse_from(["topsis", "a.csv", "1,1", "+,+", "out.csv", "extra"]);
        assert!(res.is_err());
    }
}
