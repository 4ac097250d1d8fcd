//! Singular value decomposition of 3x3 matrices.
//!
//! Wraps the dense f64 decomposition from [`faer`] behind a small array-typed
//! interface, so registration code stays decoupled from the backend and the
//! health of the decomposition is surfaced as a [`Result`] instead of being
//! read off a status code.

use thiserror::Error;

/// Error type for the 3x3 decomposition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SvdError {
    /// The input matrix contains NaN or infinite entries.
    #[error("input matrix contains non-finite values")]
    NonFiniteInput,
    /// The decomposition produced NaN or infinite entries.
    #[error("decomposition produced non-finite values")]
    NonFiniteResult,
}

/// Decomposition of a 3x3 matrix, `A = U * S * V^T`.
#[derive(Debug, Clone, PartialEq)]
pub struct Svd3 {
    /// Left singular vectors, row major.
    u: [[f64; 3]; 3],

    /// Singular values, descending.
    s: [f64; 3],

    /// Right singular vectors, row major.
    v: [[f64; 3]; 3],
}

impl Svd3 {
    /// Get the left singular vectors matrix.
    #[inline]
    pub fn u(&self) -> &[[f64; 3]; 3] {
        &self.u
    }

    /// Get the singular values in descending order.
    #[inline]
    pub fn s(&self) -> &[f64; 3] {
        &self.s
    }

    /// Get the right singular vectors matrix.
    #[inline]
    pub fn v(&self) -> &[[f64; 3]; 3] {
        &self.v
    }
}

/// Compute the singular value decomposition of a 3x3 matrix.
///
/// # Arguments
///
/// * `a` - The matrix to decompose, row major.
///
/// # Returns
///
/// The [`Svd3`] factors with singular values sorted in descending order, or
/// an error if the input or the computed factors contain non-finite values.
pub fn svd3(a: &[[f64; 3]; 3]) -> Result<Svd3, SvdError> {
    if !a.iter().flatten().all(|x| x.is_finite()) {
        return Err(SvdError::NonFiniteInput);
    }

    let mat = faer::Mat::<f64>::from_fn(3, 3, |i, j| a[i][j]);
    let svd = mat.svd();
    let (u_view, s_view, v_view) = (svd.u(), svd.s_diagonal(), svd.v());

    let mut u = [[0.0; 3]; 3];
    let mut s = [0.0; 3];
    let mut v = [[0.0; 3]; 3];
    for i in 0..3 {
        s[i] = s_view.read(i);
        for j in 0..3 {
            u[i][j] = u_view.read(i, j);
            v[i][j] = v_view.read(i, j);
        }
    }

    let finite = s.iter().all(|x| x.is_finite())
        && u.iter().flatten().all(|x| x.is_finite())
        && v.iter().flatten().all(|x| x.is_finite());
    if !finite {
        return Err(SvdError::NonFiniteResult);
    }

    Ok(Svd3 { u, s, v })
}
