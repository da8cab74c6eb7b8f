// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The content of one cell, as produced by the readers.
///
/// Readers do not interpret the cells: a CSV reader produces `Text` or `Empty`,
/// a spreadsheet reader may already produce `Number`. The validation decides
/// what is an identifier and what is a criterion value.
#[derive(PartialEq, Debug, Clone)]
pub enum RawCell {
    Text(String),
    Number(f64),
    Empty,
}

impl RawCell {
    /// True for empty cells and for text that only contains whitespace.
    pub fn is_missing(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            RawCell::Number(_) => false,
        }
    }

    /// The numeric value of the cell, if it has a finite one.
    ///
    /// `NaN`, `inf` and the other spellings that `f64` parses are not numbers here.
    pub fn as_number(&self) -> Option<f64> {
        let x = match self {
            RawCell::Number(x) => Some(*x),
            RawCell::Text(s) => s.trim().parse::<f64>().ok(),
            RawCell::Empty => None,
        };
        x.filter(|x| x.is_finite())
    }
}

impl Display for RawCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawCell::Text(s) => write!(f, "{}", s),
            RawCell::Number(x) => write!(f, "{}", x),
            RawCell::Empty => Ok(()),
        }
    }
}

/// A table as read from a source: the header row and the data rows.
///
/// The first column holds the names of the alternatives, all the other columns
/// are criteria. Rows are not required to have the width of the header; the
/// validation reports the problems.
#[derive(PartialEq, Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
}

/// The optimization direction of a criterion.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Impact {
    /// Higher values are preferred (`+`).
    Maximize,
    /// Lower values are preferred (`-`).
    Minimize,
}

impl Impact {
    pub fn symbol(&self) -> &'static str {
        match self {
            Impact::Maximize => "+",
            Impact::Minimize => "-",
        }
    }
}

/// A validated decision matrix.
///
/// Invariant: `values` has one row per entry in `alternatives`, and each row
/// has one value per entry in `criteria`.
#[derive(PartialEq, Debug, Clone)]
pub struct DecisionMatrix {
    pub criteria: Vec<String>,
    pub alternatives: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl DecisionMatrix {
    pub fn num_criteria(&self) -> usize {
        self.criteria.len()
    }

    pub fn num_alternatives(&self) -> usize {
        self.alternatives.len()
    }
}

// ******** Output data structures *********

#[derive(PartialEq, Debug, Clone)]
pub struct RankedAlternative {
    pub name: String,
    pub values: Vec<f64>,
    pub distance_best: f64,
    pub distance_worst: f64,
    /// The relative closeness. NaN when it cannot be defined.
    pub score: f64,
    /// The competition rank (1 is the best). None when the score is undefined.
    pub rank: Option<u32>,
}

/// The outcome of a ranking.
///
/// The alternatives are in the same order as in the input, not sorted by rank.
#[derive(PartialEq, Debug, Clone)]
pub struct TopsisResult {
    pub criteria: Vec<String>,
    pub weights: Vec<f64>,
    pub impacts: Vec<Impact>,
    pub ideal_best: Vec<f64>,
    pub ideal_worst: Vec<f64>,
    pub alternatives: Vec<RankedAlternative>,
}

/// The parameter specifications that are checked against the number of criteria.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Parameter {
    Weights,
    Impacts,
    /// The criterion values of one alternative.
    Values,
}

/// Errors that prevent the ranking from completing successfully.
#[derive(PartialEq, Debug, Clone)]
pub enum TopsisErrors {
    /// The table needs one column of names and at least two criteria.
    TooFewColumns { found: usize },
    /// The name of the alternative is missing. Rows are counted from 1, after the header.
    MissingIdentifier { row: usize },
    NonNumericCriterion {
        row: usize,
        column: String,
        content: String,
    },
    CountMismatch {
        parameter: Parameter,
        expected: usize,
        found: usize,
    },
    InvalidWeight { entry: String },
    InvalidImpact { entry: String },
    /// Only returned with `DegeneratePolicy::Reject`.
    DegenerateColumn { column: String },
    /// Only returned with `DegeneratePolicy::Reject`.
    DegenerateRow { name: String },
}

impl TopsisErrors {
    /// The family of the error, as reported to the users.
    pub fn kind(&self) -> &'static str {
        match self {
            TopsisErrors::TooFewColumns { .. } | TopsisErrors::MissingIdentifier { .. } => {
                "StructuralError"
            }
            TopsisErrors::NonNumericCriterion { .. } => "TypeError",
            TopsisErrors::CountMismatch { .. } => "CountMismatchError",
            TopsisErrors::InvalidWeight { .. } | TopsisErrors::InvalidImpact { .. } => {
                "FormatError"
            }
            TopsisErrors::DegenerateColumn { .. } => "DegenerateColumnError",
            TopsisErrors::DegenerateRow { .. } => "DegenerateRowError",
        }
    }
}

impl Error for TopsisErrors {}

impl Display for TopsisErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopsisErrors::TooFewColumns { found } => write!(
                f,
                "Input file must contain at least three columns (found {})",
                found
            ),
            TopsisErrors::MissingIdentifier { row } => write!(
                f,
                "The first column (object/variable names) contains empty values (row {})",
                row
            ),
            TopsisErrors::NonNumericCriterion {
                row,
                column,
                content,
            } => write!(
                f,
                "All columns from 2nd to last must contain numeric values (row {}, column {:?}: {:?})",
                row, column, content
            ),
            TopsisErrors::CountMismatch {
                parameter,
                expected,
                found,
            } => {
                let name = match parameter {
                    Parameter::Weights => "weights",
                    Parameter::Impacts => "impacts",
                    Parameter::Values => "values",
                };
                write!(
                    f,
                    "The number of {} must match the number of criteria columns (expected {}, found {})",
                    name, expected, found
                )
            }
            TopsisErrors::InvalidWeight { entry } => {
                write!(f, "All weights must be numeric (found {:?})", entry)
            }
            TopsisErrors::InvalidImpact { entry } => {
                write!(f, "Impacts must be either '+' or '-' (found {:?})", entry)
            }
            TopsisErrors::DegenerateColumn { column } => write!(
                f,
                "Column {:?} only contains zeros or undefined values and cannot be normalized",
                column
            ),
            TopsisErrors::DegenerateRow { name } => write!(
                f,
                "Alternative {:?} is at the same distance (zero) from the ideal best and worst solutions",
                name
            ),
        }
    }
}

// ********* Configuration **********

/// What to do with values that are not defined (division by zero).
///
/// This happens for a criterion column that only contains zeros, and for an
/// alternative that coincides with both the ideal best and the ideal worst
/// solutions.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum DegeneratePolicy {
    /// The NaN values flow into the scores. Alternatives with an undefined score
    /// receive no rank.
    Propagate,
    /// The ranking stops with an error.
    Reject,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TopsisRules {
    pub degenerate_policy: DegeneratePolicy,
}

impl TopsisRules {
    pub const DEFAULT_RULES: TopsisRules = TopsisRules {
        degenerate_policy: DegeneratePolicy::Propagate,
    };

    pub const STRICT_RULES: TopsisRules = TopsisRules {
        degenerate_policy: DegeneratePolicy::Reject,
    };
}
