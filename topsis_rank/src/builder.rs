pub use crate::config::*;

/// A builder for adding alternatives directly, without going through a table.
///
/// ```
/// pub use topsis_rank::builder::Builder;
/// pub use topsis_rank::{Impact, TopsisRules};
/// # use topsis_rank::TopsisErrors;
///
/// let mut builder = Builder::new(&TopsisRules::DEFAULT_RULES)?
///     .criteria(&["Price".to_string(), "Storage".to_string()])?;
///
/// builder.add_alternative("phone-a", &[250.0, 16.0])?;
/// builder.add_alternative("phone-b", &[200.0, 32.0])?;
///
/// let result = builder.rank(&[1.0, 1.0], &[Impact::Minimize, Impact::Maximize])?;
/// assert_eq!(result.alternatives[1].rank, Some(1));
///
/// # Ok::<(), TopsisErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: TopsisRules,
    pub(crate) _criteria: Option<Vec<String>>,
    pub(crate) _alternatives: Vec<String>,
    pub(crate) _values: Vec<Vec<f64>>,
}

impl Builder {
    pub fn new(rules: &TopsisRules) -> Result<Builder, TopsisErrors> {
        Ok(Builder {
            _rules: rules.clone(),
            _criteria: None,
            _alternatives: Vec::new(),
            _values: Vec::new(),
        })
    }

    /// Sets the names of the criteria. At least two criteria are required.
    ///
    /// Alternatives added before are discarded.
    pub fn criteria(self, names: &[String]) -> Result<Builder, TopsisErrors> {
        if names.len() < 2 {
            return Err(TopsisErrors::TooFewColumns {
                found: names.len() + 1,
            });
        }
        Ok(Builder {
            _rules: self._rules,
            _criteria: Some(names.to_vec()),
            _alternatives: Vec::new(),
            _values: Vec::new(),
        })
    }

    /// Adds an alternative with one value per criterion.
    ///
    /// If the criteria were not named, the first alternative fixes their number
    /// and they are called `Criterion 1`, `Criterion 2`, ...
    pub fn add_alternative(&mut self, name: &str, values: &[f64]) -> Result<(), TopsisErrors> {
        if name.trim().is_empty() {
            return Err(TopsisErrors::MissingIdentifier {
                row: self._alternatives.len() + 1,
            });
        }
        let expected = match self._criteria.as_deref() {
            Some(criteria) => criteria.len(),
            None => {
                if values.len() < 2 {
                    return Err(TopsisErrors::TooFewColumns {
                        found: values.len() + 1,
                    });
                }
                let names: Vec<String> = (1..=values.len())
                    .map(|idx| format!("Criterion {}", idx))
                    .collect();
                self._criteria = Some(names);
                values.len()
            }
        };
        if values.len() != expected {
            return Err(TopsisErrors::CountMismatch {
                parameter: Parameter::Values,
                expected,
                found: values.len(),
            });
        }
        self._alternatives.push(name.to_string());
        self._values.push(values.to_vec());
        Ok(())
    }

    /// The decision matrix assembled so far.
    pub fn matrix(&self) -> DecisionMatrix {
        DecisionMatrix {
            criteria: self._criteria.clone().unwrap_or_default(),
            alternatives: self._alternatives.clone(),
            values: self._values.clone(),
        }
    }

    pub fn rank(&self, weights: &[f64], impacts: &[Impact]) -> Result<TopsisResult, TopsisErrors> {
        crate::run_topsis_stats(&self.matrix(), weights, impacts, &self._rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inferred_criteria() {
        let mut builder = Builder::new(&TopsisRules::DEFAULT_RULES).unwrap();
        builder.add_alternative("x", &[1.0, 2.0, 3.0]).unwrap();
        builder.add_alternative("y", &[3.0, 2.0, 1.0]).unwrap();
        let m = builder.matrix();
        assert_eq!(m.criteria, vec!["Criterion 1", "Criterion 2", "Criterion 3"]);
        assert_eq!(m.num_alternatives(), 2);
        assert_eq!(
            builder.add_alternative("z", &[1.0]).unwrap_err(),
            TopsisErrors::CountMismatch {
                parameter: Parameter::Values,
                expected: 3,
                found: 1
            }
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Builder::new(&TopsisRules::DEFAULT_RULES)
            .unwrap()
            .criteria(&["Price".to_string()])
            .is_err());
        let mut builder = Builder::new(&TopsisRules::DEFAULT_RULES).unwrap();
        assert_eq!(
            builder.add_alternative(" ", &[1.0, 2.0]).unwrap_err(),
            TopsisErrors::MissingIdentifier { row: 1 }
        );
    }

    #[test]
    fn rank_checks_parameters() {
        let mut builder = Builder::new(&TopsisRules::STRICT_RULES)
            .unwrap()
            .criteria(&["a".to_string(), "b".to_string()])
            .unwrap();
        builder.add_alternative("x", &[1.0, 2.0]).unwrap();
        builder.add_alternative("y", &[2.0, 1.0]).unwrap();
        assert_eq!(
            builder.rank(&[1.0], &[Impact::Maximize, Impact::Maximize]).unwrap_err().kind(),
            "CountMismatchError"
        );
        let res = builder
            .rank(&[1.0, 1.0], &[Impact::Maximize, Impact::Minimize])
            .unwrap();
        assert_eq!(res.alternatives[0].rank, Some(2));
        assert_eq!(res.alternatives[1].rank, Some(1));
    }
}
