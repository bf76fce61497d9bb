// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

/// The direction of a criterion.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Impact {
    /// `+`: a larger raw value is better.
    Benefit,
    /// `-`: a smaller raw value is better.
    Cost,
}

impl Impact {
    pub fn symbol(&self) -> &'static str {
        match self {
            Impact::Benefit => "+",
            Impact::Cost => "-",
        }
    }
}

impl FromStr for Impact {
    type Err = TopsisErrors;

    /// Only the exact symbols `+` and `-` are accepted.
    fn from_str(s: &str) -> Result<Impact, TopsisErrors> {
        match s {
            "+" => Ok(Impact::Benefit),
            "-" => Ok(Impact::Cost),
            x => Err(TopsisErrors::InvalidImpact {
                symbol: x.to_string(),
            }),
        }
    }
}

impl Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A scored dimension of the alternatives.
#[derive(PartialEq, Debug, Clone)]
pub struct Criterion {
    pub name: String,
    pub weight: f64,
    pub impact: Impact,
}

/// The table of alternatives (rows) scored on criteria (columns).
///
/// The constructor checks the shape: at least one row, at least two criteria
/// and the same number of entries in every row. Finiteness of the entries is
/// checked by [crate::run_topsis] so that every input error is reported in the
/// same place.
#[derive(PartialEq, Debug, Clone)]
pub struct DecisionMatrix {
    rows: Vec<Vec<f64>>,
    num_criteria: usize,
}

impl DecisionMatrix {
    pub fn new(rows: Vec<Vec<f64>>) -> Result<DecisionMatrix, TopsisErrors> {
        let num_criteria = rows.first().ok_or(TopsisErrors::EmptyMatrix)?.len();
        if num_criteria < 2 {
            return Err(TopsisErrors::TooFewCriteria {
                found: num_criteria,
            });
        }
        if let Some((row, r)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != num_criteria)
        {
            return Err(TopsisErrors::RaggedRow {
                row,
                expected: num_criteria,
                found: r.len(),
            });
        }
        Ok(DecisionMatrix { rows, num_criteria })
    }

    // Stages derive new matrices with the same shape as their input.
    pub(crate) fn derived(rows: Vec<Vec<f64>>, num_criteria: usize) -> DecisionMatrix {
        DecisionMatrix { rows, num_criteria }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_criteria(&self) -> usize {
        self.num_criteria
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// The values of one criterion, in row order.
    ///
    /// Panics if `j` is not smaller than [DecisionMatrix::num_criteria].
    pub fn column(&self, j: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(move |r| r[j])
    }
}

// ******** Output data structures *********

/// The outcome of a TOPSIS run. All the vectors indexed by row follow the
/// order of the rows in the decision matrix.
#[derive(PartialEq, Debug, Clone)]
pub struct TopsisResult {
    /// Relative closeness to the ideal solution, in [0, 1].
    pub scores: Vec<f64>,
    /// 1 for the highest score. Tied scores share the smallest rank of the group.
    pub ranks: Vec<u32>,
    pub ideal_best: Vec<f64>,
    pub ideal_worst: Vec<f64>,
    pub dist_best: Vec<f64>,
    pub dist_worst: Vec<f64>,
}

/// Errors that prevent the algorithm from running.
#[derive(PartialEq, Debug, Clone)]
pub enum TopsisErrors {
    EmptyMatrix,
    TooFewCriteria {
        found: usize,
    },
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    NonFiniteValue {
        row: usize,
        column: usize,
    },
    WeightCountMismatch {
        weights: usize,
        criteria: usize,
    },
    ImpactCountMismatch {
        impacts: usize,
        criteria: usize,
    },
    InvalidWeight {
        column: usize,
        value: f64,
    },
    InvalidImpact {
        symbol: String,
    },
    IdealPointMismatch {
        found: usize,
        criteria: usize,
    },
}

impl Error for TopsisErrors {}

impl Display for TopsisErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopsisErrors::EmptyMatrix => write!(f, "The decision matrix has no rows."),
            TopsisErrors::TooFewCriteria { found } => write!(
                f,
                "At least 2 criteria are required, but {} were provided.",
                found
            ),
            TopsisErrors::RaggedRow {
                row,
                expected,
                found,
            } => write!(
                f,
                "Row {} has {} values, expected {} (one per criterion).",
                row, found, expected
            ),
            TopsisErrors::NonFiniteValue { row, column } => write!(
                f,
                "The value at row {} and criterion {} is not a finite number.",
                row, column
            ),
            TopsisErrors::WeightCountMismatch { weights, criteria } => write!(
                f,
                "Number of weights ({}) does not match number of criteria ({}).",
                weights, criteria
            ),
            TopsisErrors::ImpactCountMismatch { impacts, criteria } => write!(
                f,
                "Number of impacts ({}) does not match number of criteria ({}).",
                impacts, criteria
            ),
            TopsisErrors::InvalidWeight { column, value } => write!(
                f,
                "The weight {} for criterion {} must be a finite, non-negative number.",
                value, column
            ),
            TopsisErrors::InvalidImpact { symbol } => {
                write!(f, "Impacts must be either '+' or '-', found {:?}.", symbol)
            }
            TopsisErrors::IdealPointMismatch { found, criteria } => write!(
                f,
                "An ideal point has {} coordinates, expected {} (one per criterion).",
                found, criteria
            ),
        }
    }
}
