mod config;

pub mod builder;
pub mod manual;

pub use crate::config::*;

/// Runs the TOPSIS method over a decision matrix.
///
/// Arguments:
/// * `matrix` the alternatives (rows) scored on each criterion (columns)
/// * `weights` one non-negative weight per criterion. They do not need to sum to 1.
/// * `impacts` one impact per criterion
///
/// All the preconditions are checked before any computation: the first violated
/// one is returned as an error.
///
/// ```
/// use topsis::{run_topsis, DecisionMatrix, Impact};
///
/// let matrix = DecisionMatrix::new(vec![
///     vec![250.0, 16.0, 12.0, 5.0],
///     vec![200.0, 16.0, 8.0, 3.0],
///     vec![300.0, 32.0, 16.0, 4.0],
/// ])?;
/// let impacts = [Impact::Benefit, Impact::Benefit, Impact::Benefit, Impact::Cost];
/// let res = run_topsis(&matrix, &[1.0, 1.0, 1.0, 1.0], &impacts)?;
/// assert_eq!(res.ranks[2], 1);
/// # Ok::<(), topsis::TopsisErrors>(())
/// ```
pub fn run_topsis(
    matrix: &DecisionMatrix,
    weights: &[f64],
    impacts: &[Impact],
) -> Result<TopsisResult, TopsisErrors> {
    check_inputs(matrix, weights, impacts)?;

    let normalized = normalize(matrix);
    let weighted = weight(&normalized, weights)?;
    let (ideal_best, ideal_worst) = ideal_points(&weighted, impacts)?;
    let (dist_best, dist_worst) = distances(&weighted, &ideal_best, &ideal_worst)?;
    let scores = score(&dist_best, &dist_worst);
    let ranks = rank(&scores);

    Ok(TopsisResult {
        scores,
        ranks,
        ideal_best,
        ideal_worst,
        dist_best,
        dist_worst,
    })
}

fn check_inputs(
    matrix: &DecisionMatrix,
    weights: &[f64],
    impacts: &[Impact],
) -> Result<(), TopsisErrors> {
    check_weight_count(matrix, weights)?;
    check_impact_count(matrix, impacts)?;
    if let Some((column, &value)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(TopsisErrors::InvalidWeight { column, value });
    }
    for (row, values) in matrix.rows().iter().enumerate() {
        if let Some(column) = values.iter().position(|x| !x.is_finite()) {
            return Err(TopsisErrors::NonFiniteValue { row, column });
        }
    }
    Ok(())
}

fn check_weight_count(matrix: &DecisionMatrix, weights: &[f64]) -> Result<(), TopsisErrors> {
    if weights.len() != matrix.num_criteria() {
        return Err(TopsisErrors::WeightCountMismatch {
            weights: weights.len(),
            criteria: matrix.num_criteria(),
        });
    }
    Ok(())
}

fn check_impact_count(matrix: &DecisionMatrix, impacts: &[Impact]) -> Result<(), TopsisErrors> {
    if impacts.len() != matrix.num_criteria() {
        return Err(TopsisErrors::ImpactCountMismatch {
            impacts: impacts.len(),
            criteria: matrix.num_criteria(),
        });
    }
    Ok(())
}

// Euclidean norm through `hypot`, so that large finite values do not
// overflow in the sum of squares.
fn norm(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, f64::hypot)
}

/// Vector normalization: every column is divided by its Euclidean norm.
///
/// A column of zeros has a norm of 0. The divisor 1 is used instead, which
/// leaves the column unchanged.
pub fn normalize(matrix: &DecisionMatrix) -> DecisionMatrix {
    let rss: Vec<f64> = (0..matrix.num_criteria())
        .map(|j| {
            let n = norm(matrix.column(j));
            if n == 0.0 {
                1.0
            } else {
                n
            }
        })
        .collect();
    let rows = matrix
        .rows()
        .iter()
        .map(|r| r.iter().zip(rss.iter()).map(|(x, n)| x / n).collect())
        .collect();
    DecisionMatrix::derived(rows, matrix.num_criteria())
}

/// Multiplies every column by the weight of its criterion.
///
/// Fails if there is not exactly one weight per criterion.
pub fn weight(
    normalized: &DecisionMatrix,
    weights: &[f64],
) -> Result<DecisionMatrix, TopsisErrors> {
    check_weight_count(normalized, weights)?;
    let rows = normalized
        .rows()
        .iter()
        .map(|r| r.iter().zip(weights.iter()).map(|(x, w)| x * w).collect())
        .collect();
    Ok(DecisionMatrix::derived(rows, normalized.num_criteria()))
}

/// Returns the (ideal best, ideal worst) vectors.
///
/// Fails if there is not exactly one impact per criterion.
pub fn ideal_points(
    weighted: &DecisionMatrix,
    impacts: &[Impact],
) -> Result<(Vec<f64>, Vec<f64>), TopsisErrors> {
    check_impact_count(weighted, impacts)?;
    let mut ideal_best: Vec<f64> = Vec::with_capacity(impacts.len());
    let mut ideal_worst: Vec<f64> = Vec::with_capacity(impacts.len());
    for (j, impact) in impacts.iter().enumerate() {
        let max = weighted.column(j).fold(f64::NEG_INFINITY, f64::max);
        let min = weighted.column(j).fold(f64::INFINITY, f64::min);
        match impact {
            Impact::Benefit => {
                ideal_best.push(max);
                ideal_worst.push(min);
            }
            Impact::Cost => {
                ideal_best.push(min);
                ideal_worst.push(max);
            }
        }
    }
    Ok((ideal_best, ideal_worst))
}

/// Returns the Euclidean distances of every row to the ideal best and to the
/// ideal worst points.
///
/// Both points must have one coordinate per criterion.
pub fn distances(
    weighted: &DecisionMatrix,
    ideal_best: &[f64],
    ideal_worst: &[f64],
) -> Result<(Vec<f64>, Vec<f64>), TopsisErrors> {
    let criteria = weighted.num_criteria();
    if let Some(found) = [ideal_best.len(), ideal_worst.len()]
        .into_iter()
        .find(|&l| l != criteria)
    {
        return Err(TopsisErrors::IdealPointMismatch { found, criteria });
    }
    Ok(weighted
        .rows()
        .iter()
        .map(|r| (euclidean(r, ideal_best), euclidean(r, ideal_worst)))
        .unzip())
}

fn euclidean(row: &[f64], point: &[f64]) -> f64 {
    norm(row.iter().zip(point.iter()).map(|(x, p)| x - p))
}

/// Relative closeness to the ideal solution.
///
/// A row that sits on both ideal points (all the rows are identical) has a
/// total distance of 0. The denominator 1 is used instead and the score is 0.
/// Pairs are taken in order, up to the shorter of the two slices.
pub fn score(dist_best: &[f64], dist_worst: &[f64]) -> Vec<f64> {
    dist_best
        .iter()
        .zip(dist_worst.iter())
        .map(|(&b, &w)| {
            // Both distances are scaled by the larger one before summing.
            let m = b.max(w);
            if m == 0.0 {
                0.0
            } else {
                (w / m) / (b / m + w / m)
            }
        })
        .collect()
}

/// Ranks the scores in descending order, starting at 1.
///
/// Equal scores get the smallest rank of their group, and the following rank
/// skips the tied positions: `[0.9, 0.9, 0.5]` gives `[1, 1, 3]`.
pub fn rank(scores: &[f64]) -> Vec<u32> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut ranks: Vec<u32> = vec![0; scores.len()];
    let mut previous: Option<(f64, u32)> = None;
    for (pos, &idx) in order.iter().enumerate() {
        let r = match previous {
            Some((s, r)) if s == scores[idx] => r,
            _ => (pos + 1) as u32,
        };
        ranks[idx] = r;
        previous = Some((scores[idx], r));
    }
    ranks
}
