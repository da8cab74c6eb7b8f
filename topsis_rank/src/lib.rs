mod config;
pub mod builder;
pub mod manual;

use log::{debug, info, warn};

pub use crate::config::*;

/// Runs the full ranking on a table, as read from a file.
///
/// Arguments:
/// * `table` the raw table. The first column names the alternatives, the other
/// columns are the criteria.
/// * `weights` the comma-separated weights, one per criterion (for example `1,1,1,2`)
/// * `impacts` the comma-separated impacts, one per criterion (for example `+,+,-,+`)
/// * `rules` the rules for the undefined values
///
/// The checks are done in order and the first failing one is returned: the table
/// structure, the names, the criterion values, then the weights and the impacts.
pub fn run_topsis(
    table: &RawTable,
    weights: &str,
    impacts: &str,
    rules: &TopsisRules,
) -> Result<TopsisResult, TopsisErrors> {
    let matrix = validate_table(table)?;
    let parsed_weights = parse_weights(weights, matrix.num_criteria())?;
    let parsed_impacts = parse_impacts(impacts, matrix.num_criteria())?;
    run_topsis_stats(&matrix, &parsed_weights, &parsed_impacts, rules)
}

/// Runs the ranking on a validated decision matrix.
pub fn run_topsis_stats(
    matrix: &DecisionMatrix,
    weights: &[f64],
    impacts: &[Impact],
    rules: &TopsisRules,
) -> Result<TopsisResult, TopsisErrors> {
    info!(
        "Processing {:?} alternatives, criteria: {:?}, rules: {:?}",
        matrix.num_alternatives(),
        matrix.criteria,
        rules
    );
    let num_criteria = matrix.num_criteria();
    check_count(
        Parameter::Values,
        matrix.num_alternatives(),
        matrix.values.len(),
    )?;
    for row in matrix.values.iter() {
        check_count(Parameter::Values, num_criteria, row.len())?;
    }
    check_count(Parameter::Weights, num_criteria, weights.len())?;
    check_count(Parameter::Impacts, num_criteria, impacts.len())?;

    let norms = column_norms(&matrix.values, num_criteria);
    debug!("run_topsis_stats: column norms: {:?}", norms);
    for (norm, name) in norms.iter().zip(matrix.criteria.iter()) {
        if *norm > 0.0 && norm.is_finite() {
            continue;
        }
        match rules.degenerate_policy {
            DegeneratePolicy::Reject => {
                return Err(TopsisErrors::DegenerateColumn {
                    column: name.clone(),
                })
            }
            DegeneratePolicy::Propagate => {
                warn!(
                    "run_topsis_stats: column {:?} has norm {:?}, its values are undefined",
                    name, norm
                );
            }
        }
    }

    let normalized = normalize(&matrix.values, &norms);
    let weighted = apply_weights(&normalized, weights);
    let (ideal_best, ideal_worst) = ideal_solutions(&weighted, impacts);
    info!("Ideal best: {:?} ideal worst: {:?}", ideal_best, ideal_worst);

    let mut distances: Vec<(f64, f64, f64)> = Vec::with_capacity(weighted.len());
    for (row, name) in weighted.iter().zip(matrix.alternatives.iter()) {
        let distance_best = euclidean_distance(row, &ideal_best);
        let distance_worst = euclidean_distance(row, &ideal_worst);
        let score = relative_closeness(distance_best, distance_worst);
        debug!(
            "run_topsis_stats: {:?}: distance_best: {:?} distance_worst: {:?} score: {:?}",
            name, distance_best, distance_worst, score
        );
        if score.is_nan() {
            match rules.degenerate_policy {
                DegeneratePolicy::Reject => {
                    return Err(TopsisErrors::DegenerateRow { name: name.clone() })
                }
                DegeneratePolicy::Propagate => {
                    warn!("run_topsis_stats: alternative {:?} has no defined score", name);
                }
            }
        }
        distances.push((distance_best, distance_worst, score));
    }

    let scores: Vec<f64> = distances.iter().map(|(_, _, s)| *s).collect();
    let ranks = competition_ranks(&scores);

    let alternatives: Vec<RankedAlternative> = matrix
        .alternatives
        .iter()
        .zip(matrix.values.iter())
        .zip(distances.iter().zip(ranks.iter()))
        .map(
            |((name, values), ((distance_best, distance_worst, score), rank))| RankedAlternative {
                name: name.clone(),
                values: values.clone(),
                distance_best: *distance_best,
                distance_worst: *distance_worst,
                score: *score,
                rank: *rank,
            },
        )
        .collect();

    for ra in alternatives.iter() {
        info!("{:>6} {:.6} {}", rank_label(ra.rank), ra.score, ra.name);
    }

    Ok(TopsisResult {
        criteria: matrix.criteria.clone(),
        weights: weights.to_vec(),
        impacts: impacts.to_vec(),
        ideal_best,
        ideal_worst,
        alternatives,
    })
}

fn rank_label(rank: Option<u32>) -> String {
    rank.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string())
}

fn check_count(parameter: Parameter, expected: usize, found: usize) -> Result<(), TopsisErrors> {
    if expected != found {
        return Err(TopsisErrors::CountMismatch {
            parameter,
            expected,
            found,
        });
    }
    Ok(())
}

// ******** Validation *********

/// Checks the structure of a raw table and extracts the decision matrix.
///
/// Rows are numbered from 1 in the errors (the header is not counted).
pub fn validate_table(table: &RawTable) -> Result<DecisionMatrix, TopsisErrors> {
    let num_columns = table.headers.len();
    if num_columns < 3 {
        return Err(TopsisErrors::TooFewColumns { found: num_columns });
    }

    // All the names are checked before looking at the values.
    let mut alternatives: Vec<String> = Vec::with_capacity(table.rows.len());
    for (idx, row) in table.rows.iter().enumerate() {
        match row.first() {
            Some(cell) if !cell.is_missing() => alternatives.push(cell.to_string()),
            _ => return Err(TopsisErrors::MissingIdentifier { row: idx + 1 }),
        }
    }

    let criteria: Vec<String> = table.headers[1..].to_vec();
    let empty = RawCell::Empty;
    let mut values: Vec<Vec<f64>> = Vec::with_capacity(table.rows.len());
    for (idx, row) in table.rows.iter().enumerate() {
        let mut parsed_row: Vec<f64> = Vec::with_capacity(criteria.len());
        for (col, column) in criteria.iter().enumerate() {
            let cell = row.get(col + 1).unwrap_or(&empty);
            match cell.as_number() {
                Some(x) => parsed_row.push(x),
                None => {
                    return Err(TopsisErrors::NonNumericCriterion {
                        row: idx + 1,
                        column: column.clone(),
                        content: cell.to_string(),
                    })
                }
            }
        }
        debug!("validate_table: row {:?}: {:?}", idx + 1, parsed_row);
        values.push(parsed_row);
    }

    Ok(DecisionMatrix {
        criteria,
        alternatives,
        values,
    })
}

/// Parses the comma-separated weights. The count is checked before the content.
pub fn parse_weights(spec: &str, num_criteria: usize) -> Result<Vec<f64>, TopsisErrors> {
    let entries: Vec<&str> = spec.split(',').collect();
    check_count(Parameter::Weights, num_criteria, entries.len())?;
    let mut res: Vec<f64> = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry.trim().parse::<f64>() {
            Ok(w) if w.is_finite() => res.push(w),
            _ => {
                return Err(TopsisErrors::InvalidWeight {
                    entry: entry.to_string(),
                })
            }
        }
    }
    Ok(res)
}

/// Parses the comma-separated impacts (`+` or `-`). The count is checked before the content.
pub fn parse_impacts(spec: &str, num_criteria: usize) -> Result<Vec<Impact>, TopsisErrors> {
    let entries: Vec<&str> = spec.split(',').collect();
    check_count(Parameter::Impacts, num_criteria, entries.len())?;
    entries
        .iter()
        .map(|entry| match entry.trim() {
            "+" => Ok(Impact::Maximize),
            "-" => Ok(Impact::Minimize),
            _ => Err(TopsisErrors::InvalidImpact {
                entry: entry.to_string(),
            }),
        })
        .collect()
}

// ******** Numeric stages *********

/// The square root of the sum of the squares.
///
/// When the plain sum overflows or underflows, the terms are divided by the
/// largest magnitude first.
fn root_sum_squares<I>(terms: I) -> f64
where
    I: Iterator<Item = f64> + Clone,
{
    let mut sum_sq = 0.0;
    for x in terms.clone() {
        sum_sq += x * x;
    }
    if sum_sq.is_normal() || (sum_sq == 0.0 && terms.clone().all(|x| x == 0.0)) {
        return sum_sq.sqrt();
    }
    let scale = terms.clone().map(f64::abs).fold(0.0, f64::max);
    if scale == 0.0 || !scale.is_finite() {
        return sum_sq.sqrt();
    }
    debug!("root_sum_squares: rescaling by {:?}", scale);
    let mut scaled_sq = 0.0;
    for x in terms {
        let y = x / scale;
        scaled_sq += y * y;
    }
    scale * scaled_sq.sqrt()
}

/// The Euclidean norm of each column.
pub fn column_norms(values: &[Vec<f64>], num_criteria: usize) -> Vec<f64> {
    (0..num_criteria)
        .map(|col| root_sum_squares(values.iter().map(move |row| row[col])))
        .collect()
}

/// Divides each value by the norm of its column.
///
/// A zero norm is not special-cased: the column becomes NaN.
pub fn normalize(values: &[Vec<f64>], norms: &[f64]) -> Vec<Vec<f64>> {
    values
        .iter()
        .map(|row| row.iter().zip(norms.iter()).map(|(x, n)| x / n).collect())
        .collect()
}

/// Multiplies each column by its weight. The weights are not rescaled.
pub fn apply_weights(normalized: &[Vec<f64>], weights: &[f64]) -> Vec<Vec<f64>> {
    normalized
        .iter()
        .map(|row| row.iter().zip(weights.iter()).map(|(x, w)| x * w).collect())
        .collect()
}

// NaN anywhere in the column makes both extremes NaN.
fn column_extremes(weighted: &[Vec<f64>], col: usize) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for row in weighted.iter() {
        let x = row[col];
        if x.is_nan() {
            return (f64::NAN, f64::NAN);
        }
        lo = lo.min(x);
        hi = hi.max(x);
    }
    (lo, hi)
}

/// Computes the ideal best and ideal worst solutions, in the order of the criteria.
pub fn ideal_solutions(weighted: &[Vec<f64>], impacts: &[Impact]) -> (Vec<f64>, Vec<f64>) {
    let mut ideal_best: Vec<f64> = Vec::with_capacity(impacts.len());
    let mut ideal_worst: Vec<f64> = Vec::with_capacity(impacts.len());
    for (col, impact) in impacts.iter().enumerate() {
        let (lo, hi) = column_extremes(weighted, col);
        match impact {
            Impact::Maximize => {
                ideal_best.push(hi);
                ideal_worst.push(lo);
            }
            Impact::Minimize => {
                ideal_best.push(lo);
                ideal_worst.push(hi);
            }
        }
    }
    (ideal_best, ideal_worst)
}

pub fn euclidean_distance(row: &[f64], point: &[f64]) -> f64 {
    root_sum_squares(row.iter().zip(point.iter()).map(|(x, p)| x - p))
}

/// The relative closeness to the ideal solution. NaN if both distances are zero.
pub fn relative_closeness(distance_best: f64, distance_worst: f64) -> f64 {
    distance_worst / (distance_best + distance_worst)
}

/// Standard competition ranking ("1224"), higher scores first.
///
/// The rank of a score is 1 + the number of strictly greater scores. NaN scores
/// receive no rank and are not counted for the others.
pub fn competition_ranks(scores: &[f64]) -> Vec<Option<u32>> {
    let mut order: Vec<usize> = (0..scores.len())
        .filter(|idx| !scores[*idx].is_nan())
        .collect();
    order.sort_by(|a, b| scores[*b].total_cmp(&scores[*a]));

    let mut ranks: Vec<Option<u32>> = vec![None; scores.len()];
    let mut previous: Option<(f64, u32)> = None;
    for (pos, idx) in order.iter().enumerate() {
        let score = scores[*idx];
        let rank = match previous {
            Some((prev_score, prev_rank)) if prev_score == score => prev_rank,
            _ => (pos + 1) as u32,
        };
        ranks[*idx] = Some(rank);
        previous = Some((score, rank));
    }
    ranks
}
