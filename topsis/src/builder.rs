pub use crate::config::*;

/// A builder for adding alternatives one at a time.
///
/// ```
/// use topsis::builder::Builder;
/// use topsis::Impact;
/// # use topsis::TopsisErrors;
///
/// let mut builder = Builder::new()
///     .criteria(&[1.0, 2.0], &[Impact::Benefit, Impact::Cost])?;
///
/// builder.add_alternative(&[250.0, 5.0])?;
/// builder.add_alternative(&[200.0, 3.0])?;
///
/// let res = builder.run()?;
/// assert_eq!(res.ranks.len(), 2);
///
/// # Ok::<(), TopsisErrors>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    pub(crate) _criteria: Option<Vec<Criterion>>,
    pub(crate) _rows: Vec<Vec<f64>>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Declares the criteria with default names (`C1`, `C2`, ...).
    ///
    /// Alternatives added before this call are dropped.
    pub fn criteria(self, weights: &[f64], impacts: &[Impact]) -> Result<Builder, TopsisErrors> {
        if weights.len() != impacts.len() {
            return Err(TopsisErrors::ImpactCountMismatch {
                impacts: impacts.len(),
                criteria: weights.len(),
            });
        }
        let criteria: Vec<Criterion> = weights
            .iter()
            .zip(impacts.iter())
            .enumerate()
            .map(|(idx, (w, i))| Criterion {
                name: format!("C{}", idx + 1),
                weight: *w,
                impact: *i,
            })
            .collect();
        self.named_criteria(&criteria)
    }

    pub fn named_criteria(self, criteria: &[Criterion]) -> Result<Builder, TopsisErrors> {
        if criteria.len() < 2 {
            return Err(TopsisErrors::TooFewCriteria {
                found: criteria.len(),
            });
        }
        Ok(Builder {
            _criteria: Some(criteria.to_vec()),
            _rows: Vec::new(),
        })
    }

    /// Adds an alternative, with one value per declared criterion.
    pub fn add_alternative(&mut self, values: &[f64]) -> Result<(), TopsisErrors> {
        if let Some(criteria) = self._criteria.as_deref() {
            if values.len() != criteria.len() {
                return Err(TopsisErrors::RaggedRow {
                    row: self._rows.len(),
                    expected: criteria.len(),
                    found: values.len(),
                });
            }
        }
        self._rows.push(values.to_vec());
        Ok(())
    }

    pub fn criteria_list(&self) -> &[Criterion] {
        self._criteria.as_deref().unwrap_or(&[])
    }

    /// Runs the method on all the alternatives added so far.
    pub fn run(&self) -> Result<TopsisResult, TopsisErrors> {
        let matrix = DecisionMatrix::new(self._rows.clone())?;
        let criteria = self.criteria_list();
        let weights: Vec<f64> = criteria.iter().map(|c| c.weight).collect();
        let impacts: Vec<Impact> = criteria.iter().map(|c| c.impact).collect();
        crate::run_topsis(&matrix, &weights, &impacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_matches_direct_call() {
        let mut builder = Builder::new()
            .criteria(&[1.0, 1.0, 1.0], &[Impact::Benefit, Impact::Benefit, Impact::Cost])
            .unwrap();
        let rows = vec![
            vec![250.0, 16.0, 5.0],
            vec![200.0, 16.0, 3.0],
            vec![300.0, 32.0, 4.0],
        ];
        for r in rows.iter() {
            builder.add_alternative(r).unwrap();
        }
        let direct = crate::run_topsis(
            &DecisionMatrix::new(rows).unwrap(),
            &[1.0, 1.0, 1.0],
            &[Impact::Benefit, Impact::Benefit, Impact::Cost],
        )
        .unwrap();
        assert_eq!(builder.run().unwrap(), direct);
        assert_eq!(builder.criteria_list()[2].name, "C3");
    }

    #[test]
    fn builder_rejects_wrong_row_length() {
        let mut builder = Builder::new()
            .criteria(&[1.0, 1.0], &[Impact::Benefit, Impact::Cost])
            .unwrap();
        assert_eq!(
            builder.add_alternative(&[1.0, 2.0, 3.0]),
            Err(TopsisErrors::RaggedRow {
                row: 0,
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn builder_without_criteria_fails() {
        let mut builder = Builder::new();
        builder.add_alternative(&[1.0, 2.0]).unwrap();
        assert_eq!(
            builder.run(),
            Err(TopsisErrors::WeightCountMismatch {
                weights: 0,
                criteria: 2
            })
        );
        assert_eq!(
            Builder::new().criteria(&[1.0], &[Impact::Benefit]).err(),
            Some(TopsisErrors::TooFewCriteria { found: 1 })
        );
    }
}
