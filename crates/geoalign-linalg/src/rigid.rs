//! Rigid registration of paired 3D point sets (Kabsch / orthogonal Procrustes).
//!
//! Estimates the proper rotation and translation that best map a reference
//! point set onto a source point set in the least-squares sense, via singular
//! value decomposition of the cross-covariance matrix.

use thiserror::Error;

use crate::linalg::{det_mat33, mat33_mul_vec3, matmul33, transpose_mat33};
use crate::svd::{svd3, SvdError};

/// Relative threshold under which the second singular value of the
/// cross-covariance is treated as zero, i.e. rank(H) < 2.
const RANK_EPSILON: f64 = 1e-12;

/// Error type for rigid registration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    /// Reference and source slices must have the same length.
    #[error("reference ({reference_points}) and source ({source_points}) lengths differ")]
    MismatchedLengths {
        /// Number of reference points.
        reference_points: usize,
        /// Number of source points.
        source_points: usize,
    },
    /// At least three correspondences are required.
    #[error("need at least 3 correspondences, got {0}")]
    TooFewCorrespondences(usize),
    /// The correspondences are coincident or collinear, the rotation is
    /// not determined by them.
    #[error("correspondences are degenerate (coincident or collinear)")]
    DegenerateCorrespondences,
    /// The decomposition of the cross-covariance matrix failed.
    #[error("singular value decomposition failed: {0}")]
    Svd(#[from] SvdError),
}

/// A rigid transform: proper rotation plus translation.
///
/// The forward map is `p -> R * p + t`. Frames are fixed by the estimator:
/// [`fit_transformation`] returns the transform taking reference-frame points
/// onto their source-frame mates, so [`RigidTransform::apply_inverse`] takes
/// a source-frame point back into the reference frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    /// Rotation matrix, row major, determinant +1.
    pub rotation: [[f64; 3]; 3],
    /// Translation vector.
    pub translation: [f64; 3],
}

impl RigidTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        translation: [0.0, 0.0, 0.0],
    };

    /// Apply the forward map `R * p + t`.
    pub fn apply(&self, point: &[f64; 3]) -> [f64; 3] {
        let rp = mat33_mul_vec3(&self.rotation, point);
        [
            rp[0] + self.translation[0],
            rp[1] + self.translation[1],
            rp[2] + self.translation[2],
        ]
    }

    /// Apply the inverse map `R^T * (p - t)`.
    pub fn apply_inverse(&self, point: &[f64; 3]) -> [f64; 3] {
        let r = &self.rotation;
        let c = [
            point[0] - self.translation[0],
            point[1] - self.translation[1],
            point[2] - self.translation[2],
        ];
        [
            r[0][0] * c[0] + r[1][0] * c[1] + r[2][0] * c[2],
            r[0][1] * c[0] + r[1][1] * c[1] + r[2][1] * c[2],
            r[0][2] * c[0] + r[1][2] * c[1] + r[2][2] * c[2],
        ]
    }
}

/// Estimate the rigid transform between two paired point sets.
///
/// # Arguments
///
/// * `points_in_ref` - Reference-frame points.
/// * `points_in_src` - Source-frame points, paired by index with the reference.
///
/// # Returns
///
/// The [`RigidTransform`] `(R, t)` minimizing the sum of squared residuals of
/// `R * ref[i] + t - src[i]`, with `det(R) = +1` guaranteed.
///
/// # Errors
///
/// Fails if the slices differ in length, hold fewer than 3 points, or span a
/// degenerate (coincident or collinear) configuration that leaves the
/// rotation undetermined.
pub fn fit_transformation(
    points_in_ref: &[[f64; 3]],
    points_in_src: &[[f64; 3]],
) -> Result<RigidTransform, RegistrationError> {
    if points_in_ref.len() != points_in_src.len() {
        return Err(RegistrationError::MismatchedLengths {
            reference_points: points_in_ref.len(),
            source_points: points_in_src.len(),
        });
    }
    if points_in_ref.len() < 3 {
        return Err(RegistrationError::TooFewCorrespondences(points_in_ref.len()));
    }

    let (ref_centroid, src_centroid) = compute_centroids(points_in_ref, points_in_src);

    // cross-covariance H[i][j] = sum_k (ref_k - ref_mean)_i * (src_k - src_mean)_j
    let mut h = [[0.0f64; 3]; 3];
    for (p_ref, p_src) in points_in_ref.iter().zip(points_in_src.iter()) {
        let rc = [
            p_ref[0] - ref_centroid[0],
            p_ref[1] - ref_centroid[1],
            p_ref[2] - ref_centroid[2],
        ];
        let sc = [
            p_src[0] - src_centroid[0],
            p_src[1] - src_centroid[1],
            p_src[2] - src_centroid[2],
        ];
        for (i, &rc_i) in rc.iter().enumerate() {
            for (j, &sc_j) in sc.iter().enumerate() {
                h[i][j] += rc_i * sc_j;
            }
        }
    }

    let svd = svd3(&h)?;
    let s = svd.s();
    if s[1] <= RANK_EPSILON * s[0] {
        return Err(RegistrationError::DegenerateCorrespondences);
    }

    // R = V * U^T
    let u_t = transpose_mat33(svd.u());
    let mut v = *svd.v();
    let mut rotation = [[0.0; 3]; 3];
    matmul33(&v, &u_t, &mut rotation);

    // reflection case: negate the last column of V to force a proper rotation
    if det_mat33(&rotation) < 0.0 {
        for row in &mut v {
            row[2] = -row[2];
        }
        matmul33(&v, &u_t, &mut rotation);
    }

    let r_ref = mat33_mul_vec3(&rotation, &ref_centroid);
    let translation = [
        src_centroid[0] - r_ref[0],
        src_centroid[1] - r_ref[1],
        src_centroid[2] - r_ref[2],
    ];

    Ok(RigidTransform {
        rotation,
        translation,
    })
}

fn compute_centroids(points1: &[[f64; 3]], points2: &[[f64; 3]]) -> ([f64; 3], [f64; 3]) {
    let mut centroid1 = [0.0f64; 3];
    let mut centroid2 = [0.0f64; 3];

    for (p1, p2) in points1.iter().zip(points2.iter()) {
        for i in 0..3 {
            centroid1[i] += p1[i];
            centroid2[i] += p2[i];
        }
    }

    let n = points1.len() as f64;
    for i in 0..3 {
        centroid1[i] /= n;
        centroid2[i] /= n;
    }

    (centroid1, centroid2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::transform_points3d;
    use crate::transforms::axis_angle_to_rotation_matrix;
    use approx::assert_relative_eq;

    fn create_random_points(num_points: usize) -> Vec<[f64; 3]> {
        (0..num_points)
            .map(|_| {
                [
                    rand::random::<f64>(),
                    rand::random::<f64>(),
                    rand::random::<f64>(),
                ]
            })
            .collect()
    }

    fn create_random_rotation(factor: f64) -> Result<[[f64; 3]; 3], &'static str> {
        let (axis, angle) = (
            [
                rand::random::<f64>(),
                rand::random::<f64>(),
                rand::random::<f64>(),
            ],
            rand::random::<f64>() * factor,
        );
        axis_angle_to_rotation_matrix(&axis, angle)
    }

    fn create_random_translation(factor: f64) -> [f64; 3] {
        [
            rand::random::<f64>() * factor,
            rand::random::<f64>() * factor,
            rand::random::<f64>() * factor,
        ]
    }

    #[test]
    fn test_fit_transformation_identity() -> Result<(), RegistrationError> {
        let points_ref = create_random_points(30);
        let points_src = points_ref.clone();

        let result = fit_transformation(&points_ref, &points_src)?;

        for (res, exp) in result.rotation.iter().zip(RigidTransform::IDENTITY.rotation.iter()) {
            for (r, e) in res.iter().zip(exp.iter()) {
                assert_relative_eq!(r, e, epsilon = 1e-9);
            }
        }
        for t in result.translation.iter() {
            assert_relative_eq!(*t, 0.0, epsilon = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_fit_transformation_rotation() -> Result<(), Box<dyn std::error::Error>> {
        let points_ref = create_random_points(30);

        let expected_rotation =
            axis_angle_to_rotation_matrix(&[1.0, 0.0, 0.0], std::f64::consts::PI / 2.0)?;
        let expected_translation = [0.0, 0.0, 0.0];

        let mut points_src = vec![[0.0; 3]; points_ref.len()];
        transform_points3d(
            &points_ref,
            &expected_rotation,
            &expected_translation,
            &mut points_src,
        )?;

        let result = fit_transformation(&points_ref, &points_src)?;

        for (res, exp) in result.rotation.iter().zip(expected_rotation.iter()) {
            for (r, e) in res.iter().zip(exp.iter()) {
                assert_relative_eq!(r, e, epsilon = 1e-9);
            }
        }
        for (res, exp) in result.translation.iter().zip(expected_translation.iter()) {
            assert_relative_eq!(res, exp, epsilon = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_fit_transformation_random() -> Result<(), Box<dyn std::error::Error>> {
        let num_test = 10;
        let num_points = 30;

        let points_ref = create_random_points(num_points);

        for _ in 0..num_test {
            let expected_rotation = create_random_rotation(1.0)?;
            let expected_translation = create_random_translation(10.0);

            let mut points_src = vec![[0.0; 3]; num_points];
            transform_points3d(
                &points_ref,
                &expected_rotation,
                &expected_translation,
                &mut points_src,
            )?;

            let result = fit_transformation(&points_ref, &points_src)?;

            for (res, exp) in result.rotation.iter().zip(expected_rotation.iter()) {
                for (r, e) in res.iter().zip(exp.iter()) {
                    assert_relative_eq!(r, e, epsilon = 1e-9);
                }
            }
            for (res, exp) in result.translation.iter().zip(expected_translation.iter()) {
                assert_relative_eq!(res, exp, epsilon = 1e-9);
            }

            // residuals vanish on exact synthetic data
            for (p_ref, p_src) in points_ref.iter().zip(points_src.iter()) {
                let mapped = result.apply(p_ref);
                for (m, s) in mapped.iter().zip(p_src.iter()) {
                    assert_relative_eq!(m, s, epsilon = 1e-9);
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_fit_transformation_proper_rotation_on_mirrored_points() -> Result<(), RegistrationError>
    {
        // a mirrored source admits no exact rotation, the estimate must
        // still come back proper
        let points_ref = create_random_points(30);
        let points_src = points_ref
            .iter()
            .map(|p| [p[0], p[1], -p[2]])
            .collect::<Vec<_>>();

        let result = fit_transformation(&points_ref, &points_src)?;

        assert_relative_eq!(det_mat33(&result.rotation), 1.0, epsilon = 1e-9);

        let mut rtr = [[0.0; 3]; 3];
        matmul33(
            &transpose_mat33(&result.rotation),
            &result.rotation,
            &mut rtr,
        );
        for (i, row) in rtr.iter().enumerate() {
            for (j, val) in row.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(*val, expected, epsilon = 1e-9);
            }
        }
        Ok(())
    }

    #[test]
    fn test_apply_inverse_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
        let transform = RigidTransform {
            rotation: axis_angle_to_rotation_matrix(&[0.3, -1.0, 0.5], 1.2)?,
            translation: [4.0, -2.0, 7.5],
        };

        for point in create_random_points(20) {
            let roundtrip = transform.apply_inverse(&transform.apply(&point));
            for (r, p) in roundtrip.iter().zip(point.iter()) {
                assert_relative_eq!(r, p, epsilon = 1e-12);
            }
        }
        Ok(())
    }

    #[test]
    fn test_fit_transformation_inverse_maps_source_onto_reference(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let points_ref = create_random_points(30);

        // quarter turn about z plus an offset, reference frame onto source frame
        let expected_rotation =
            axis_angle_to_rotation_matrix(&[0.0, 0.0, 1.0], std::f64::consts::PI / 2.0)?;
        let expected_translation = [10.0, 20.0, 30.0];

        let mut points_src = vec![[0.0; 3]; points_ref.len()];
        transform_points3d(
            &points_ref,
            &expected_rotation,
            &expected_translation,
            &mut points_src,
        )?;

        let result = fit_transformation(&points_ref, &points_src)?;

        for (res, exp) in result.rotation.iter().zip(expected_rotation.iter()) {
            for (r, e) in res.iter().zip(exp.iter()) {
                assert_relative_eq!(r, e, epsilon = 1e-9);
            }
        }
        for (res, exp) in result.translation.iter().zip(expected_translation.iter()) {
            assert_relative_eq!(res, exp, epsilon = 1e-9);
        }

        // the fitted inverse takes every source-frame point back onto its mate
        for (p_ref, p_src) in points_ref.iter().zip(points_src.iter()) {
            let recovered = result.apply_inverse(p_src);
            for (rec, exp) in recovered.iter().zip(p_ref.iter()) {
                assert_relative_eq!(rec, exp, epsilon = 1e-9);
            }
        }
        Ok(())
    }

    #[test]
    fn test_fit_transformation_mismatched_lengths() {
        let points_ref = create_random_points(4);
        let points_src = create_random_points(5);
        assert_eq!(
            fit_transformation(&points_ref, &points_src),
            Err(RegistrationError::MismatchedLengths {
                reference_points: 4,
                source_points: 5
            })
        );
    }

    #[test]
    fn test_fit_transformation_too_few_points() {
        let points_ref = create_random_points(2);
        let points_src = create_random_points(2);
        assert_eq!(
            fit_transformation(&points_ref, &points_src),
            Err(RegistrationError::TooFewCorrespondences(2))
        );
    }

    #[test]
    fn test_fit_transformation_collinear_points() {
        let points_ref = (0..10)
            .map(|i| {
                let t = i as f64;
                [t, 2.0 * t, -t]
            })
            .collect::<Vec<_>>();
        // a shifted copy of the same line
        let points_src = points_ref
            .iter()
            .map(|p| [p[0] + 1.0, p[1] - 2.0, p[2]])
            .collect::<Vec<_>>();

        assert_eq!(
            fit_transformation(&points_ref, &points_src),
            Err(RegistrationError::DegenerateCorrespondences)
        );
    }

    #[test]
    fn test_fit_transformation_coincident_points() {
        let points_ref = vec![[1.0, 2.0, 3.0]; 5];
        let points_src = vec![[4.0, 5.0, 6.0]; 5];
        assert_eq!(
            fit_transformation(&points_ref, &points_src),
            Err(RegistrationError::DegenerateCorrespondences)
        );
    }
}
