// Ordinary least squares with an intercept.
//
// Columns and target are centered, then the coefficients are the
// minimum-norm least-squares solution, computed through the pseudo-inverse
// of whichever Gram matrix is smaller:
//
//   n > p:  beta = (Xc' Xc)^+ Xc' yc
//   n <= p: beta = Xc' (Xc Xc')^+ yc
//
// The pseudo-inverse comes from a cyclic Jacobi eigen-decomposition, which is
// exact enough for the few-hundred-term matrices this crate fits. Eigenvalues
// below RELATIVE_TOLERANCE * largest are treated as zero, so collinear
// columns (terms that always co-occur) share weight instead of blowing up.
//
// The tolerance applies to Gram eigenvalues, i.e. squared singular values:
// 1e-10 drops singular values under 1e-5 of the largest. An SVD-based
// solver like LAPACK's gelsd cuts near machine epsilon instead, so on
// full-rank designs with singular values spread wider than 1e5 this fit has
// lower rank and different coefficients. A tighter cutoff would keep the
// rounding noise the Gram product leaves on exactly collinear columns.
//
// Cost is O(m^3) per Jacobi sweep for the m x m Gram matrix: roughly 10 s
// for 500 documents and over a minute for 800 terms in a release build.

/// Eigenvalues at or below this fraction of the largest are dropped.
const RELATIVE_TOLERANCE: f64 = 1e-10;

/// Upper bound on Jacobi sweeps; convergence is quadratic so this is rarely hit.
const MAX_SWEEPS: usize = 100;

/// Result of an OLS fit.
#[derive(Debug, Clone, PartialEq)]
pub struct OlsFit {
    /// One coefficient per design-matrix column
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Numerical rank of the centered design matrix
    pub rank: usize,
    /// Coefficient of determination on the training rows
    pub r_squared: f64,
}

/// Fit `y ~ intercept + x * beta`.
///
/// Callers validate shape: `x` must have `y.len()` rows, all of equal
/// length, and at least one row.
pub fn least_squares(x: &[Vec<f64>], y: &[f64]) -> OlsFit {
    let n = x.len();
    let p = x.first().map(Vec::len).unwrap_or(0);

    let x_mean: Vec<f64> = (0..p)
        .map(|j| x.iter().map(|row| row[j]).sum::<f64>() / n as f64)
        .collect();
    let y_mean = y.iter().sum::<f64>() / n as f64;

    let xc: Vec<Vec<f64>> = x
        .iter()
        .map(|row| row.iter().zip(&x_mean).map(|(v, m)| v - m).collect())
        .collect();
    let yc: Vec<f64> = y.iter().map(|v| v - y_mean).collect();

    let (coefficients, rank) = if n > p {
        // p x p normal equations
        let gram: Vec<Vec<f64>> = (0..p)
            .map(|a| {
                (0..p)
                    .map(|b| xc.iter().map(|row| row[a] * row[b]).sum())
                    .collect()
            })
            .collect();
        let xty: Vec<f64> = (0..p)
            .map(|j| xc.iter().zip(&yc).map(|(row, v)| row[j] * v).sum())
            .collect();
        pseudo_inverse_apply(gram, &xty)
    } else {
        // n x n dual form
        let gram: Vec<Vec<f64>> = xc
            .iter()
            .map(|ra| xc.iter().map(|rb| dot(ra, rb)).collect())
            .collect();
        let (alpha, rank) = pseudo_inverse_apply(gram, &yc);
        let beta = (0..p)
            .map(|j| xc.iter().zip(&alpha).map(|(row, a)| row[j] * a).sum())
            .collect();
        (beta, rank)
    };

    let intercept = y_mean - dot(&coefficients, &x_mean);

    let ss_tot: f64 = yc.iter().map(|v| v * v).sum();
    let ss_res: f64 = x
        .iter()
        .zip(y)
        .map(|(row, &target)| {
            let residual = target - intercept - dot(row, &coefficients);
            residual * residual
        })
        .sum();
    let r_squared = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else {
        0.0
    };

    OlsFit {
        coefficients,
        intercept,
        rank,
        r_squared,
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Compute `A^+ b` for a symmetric positive semi-definite `A`.
/// Returns the product and the number of eigenvalues kept.
fn pseudo_inverse_apply(a: Vec<Vec<f64>>, b: &[f64]) -> (Vec<f64>, usize) {
    let m = b.len();
    let (eigenvalues, eigenvectors) = symmetric_eigen(a);

    let largest = eigenvalues.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let cutoff = largest * RELATIVE_TOLERANCE;

    let mut out = vec![0.0; m];
    let mut rank = 0;
    for (k, &lambda) in eigenvalues.iter().enumerate() {
        if lambda <= cutoff || lambda <= 0.0 {
            continue;
        }
        rank += 1;
        // projection of b onto eigenvector k, scaled by 1/lambda
        let coef = (0..m).map(|i| eigenvectors[i][k] * b[i]).sum::<f64>() / lambda;
        for (i, slot) in out.iter_mut().enumerate() {
            *slot += coef * eigenvectors[i][k];
        }
    }
    (out, rank)
}

/// Cyclic Jacobi eigen-decomposition of a symmetric matrix.
///
/// Returns `(eigenvalues, V)` where column `k` of `V` is the eigenvector for
/// `eigenvalues[k]`.
pub(crate) fn symmetric_eigen(mut a: Vec<Vec<f64>>) -> (Vec<f64>, Vec<Vec<f64>>) {
    let m = a.len();
    let mut v: Vec<Vec<f64>> = (0..m)
        .map(|i| (0..m).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    let scale: f64 = a.iter().flatten().map(|x| x * x).sum();
    if scale == 0.0 {
        return (vec![0.0; m], v);
    }

    for _ in 0..MAX_SWEEPS {
        let off: f64 = (0..m)
            .flat_map(|i| (0..m).filter(move |&j| j != i).map(move |j| (i, j)))
            .map(|(i, j)| a[i][j] * a[i][j])
            .sum();
        if off <= scale * 1e-30 {
            break;
        }

        for p in 0..m {
            for q in (p + 1)..m {
                let apq = a[p][q];
                if apq == 0.0 {
                    continue;
                }
                let theta = (a[q][q] - a[p][p]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for row in a.iter_mut() {
                    let (akp, akq) = (row[p], row[q]);
                    row[p] = c * akp - s * akq;
                    row[q] = s * akp + c * akq;
                }
                for k in 0..m {
                    let (apk, aqk) = (a[p][k], a[q][k]);
                    a[p][k] = c * apk - s * aqk;
                    a[q][k] = s * apk + c * aqk;
                }
                for row in v.iter_mut() {
                    let (vkp, vkq) = (row[p], row[q]);
                    row[p] = c * vkp - s * vkq;
                    row[q] = s * vkp + c * vkq;
                }
            }
        }
    }

    let eigenvalues = (0..m).map(|i| a[i][i]).collect();
    (eigenvalues, v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_line() {
        // y = 3 + 2x
        let x = vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0]];
        let y = vec![3.0, 5.0, 7.0, 9.0];
        let fit = least_squares(&x, &y);
        assert!((fit.coefficients[0] - 2.0).abs() < 1e-9);
        assert!((fit.intercept - 3.0).abs() < 1e-9);
        assert!((fit.r_squared - 1.0).abs() < 1e-9);
        assert_eq!(fit.rank, 1);
    }

    #[test]
    fn test_two_features() {
        // y = 1 + x1 - 2 x2
        let x = vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
            vec![2.0, 1.0],
        ];
        let y: Vec<f64> = x.iter().map(|r| 1.0 + r[0] - 2.0 * r[1]).collect();
        let fit = least_squares(&x, &y);
        assert!((fit.coefficients[0] - 1.0).abs() < 1e-9);
        assert!((fit.coefficients[1] + 2.0).abs() < 1e-9);
        assert!((fit.intercept - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_columns_split_weight() {
        // Identical columns: the minimum-norm solution splits the slope evenly
        let x = vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![2.0, 2.0]];
        let y = vec![0.0, 2.0, 4.0];
        let fit = least_squares(&x, &y);
        assert_eq!(fit.rank, 1);
        assert!((fit.coefficients[0] - 1.0).abs() < 1e-9);
        assert!((fit.coefficients[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ill_conditioned_full_rank_is_kept() {
        // Columns differ by ~1e-3: singular value ratio well above the cutoff
        let x = vec![
            vec![1.0, 1.0],
            vec![2.0, 2.001],
            vec![3.0, 2.999],
            vec![4.0, 4.002],
            vec![5.0, 5.0],
        ];
        let y: Vec<f64> = x.iter().map(|r| 1.0 + 2.0 * r[0] + 3.0 * r[1]).collect();
        let fit = least_squares(&x, &y);
        assert_eq!(fit.rank, 2);
        assert!((fit.coefficients[0] - 2.0).abs() < 1e-6);
        assert!((fit.coefficients[1] - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_near_collinear_below_cutoff_is_dropped() {
        // Columns differ by ~1e-7: treated as one direction, slope split evenly
        let x = vec![
            vec![1.0, 1.0],
            vec![2.0, 2.0 + 1e-7],
            vec![3.0, 3.0 - 1e-7],
            vec![4.0, 4.0 + 2e-7],
            vec![5.0, 5.0],
        ];
        let y: Vec<f64> = x.iter().map(|r| 1.0 + 2.0 * r[0] + 3.0 * r[1]).collect();
        let fit = least_squares(&x, &y);
        assert_eq!(fit.rank, 1);
        assert!((fit.coefficients[0] - 2.5).abs() < 1e-4);
        assert!((fit.coefficients[1] - 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_underdetermined_interpolates() {
        let x = vec![vec![1.0, 0.0, 0.5], vec![0.0, 1.0, 0.5]];
        let y = vec![10.0, 4.0];
        let fit = least_squares(&x, &y);
        for (row, target) in x.iter().zip(&y) {
            let predicted = fit.intercept + dot(row, &fit.coefficients);
            assert!((predicted - target).abs() < 1e-9);
        }
    }

    #[test]
    fn test_eigen_diagonalizes() {
        let a = vec![
            vec![4.0, 1.0, 0.5],
            vec![1.0, 3.0, 0.2],
            vec![0.5, 0.2, 1.0],
        ];
        let (values, vectors) = symmetric_eigen(a.clone());
        // A v_k = lambda_k v_k
        for k in 0..3 {
            for i in 0..3 {
                let av: f64 = (0..3).map(|j| a[i][j] * vectors[j][k]).sum();
                assert!((av - values[k] * vectors[i][k]).abs() < 1e-9);
            }
        }
    }
}
