//! Local tangent-plane frames for geodetic tracks.
//!
//! A [`GeodeticFrame`] converts absolute longitude/latitude/altitude samples
//! into local, approximately metric offsets around the track centroid. The
//! conversion is a first-order flat-Earth approximation: one degree of arc
//! spans `(EARTH_RADIUS_M + mean_altitude) * pi / 180` meters. It is only
//! valid over short baselines, which is exactly the regime of a single
//! capture session.

use thiserror::Error;

/// Equatorial Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6378137.0;

/// Error type for frame estimation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeodesyError {
    /// A frame cannot be fitted to an empty track.
    #[error("cannot fit a tangent-plane frame to an empty track")]
    EmptyTrack,
}

/// A local tangent-plane frame centered on a track centroid.
///
/// Created once per track with [`GeodeticFrame::fit`] and immutable
/// afterward. Points are `[longitude, latitude, altitude]` with the angles
/// in degrees and the altitude in meters; localized points keep the
/// altitude untouched, only the two angular components are re-expressed
/// as metric offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticFrame {
    // Track centroid: mean longitude, latitude (degrees) and altitude (meters).
    mean: [f64; 3],
    // Meters per degree of arc at the centroid altitude.
    factor: f64,
}

impl GeodeticFrame {
    /// Create a frame from an explicit centroid and metric factor.
    pub fn new(mean: [f64; 3], factor: f64) -> Self {
        Self { mean, factor }
    }

    /// Fit a frame to a geodetic track.
    ///
    /// # Arguments
    ///
    /// * `points` - Track samples as `[longitude, latitude, altitude]`.
    ///
    /// # Returns
    ///
    /// The frame centered on the arithmetic mean of the samples, with the
    /// metric factor evaluated at the mean altitude.
    pub fn fit(points: &[[f64; 3]]) -> Result<Self, GeodesyError> {
        if points.is_empty() {
            return Err(GeodesyError::EmptyTrack);
        }

        let mut mean = [0.0f64; 3];
        for point in points {
            for (m, p) in mean.iter_mut().zip(point.iter()) {
                *m += p;
            }
        }
        let n = points.len() as f64;
        for m in &mut mean {
            *m /= n;
        }

        let factor = (EARTH_RADIUS_M + mean[2]) * (std::f64::consts::PI / 180.0);
        Ok(Self { mean, factor })
    }

    /// Get the track centroid, `[mean longitude, mean latitude, mean altitude]`.
    #[inline]
    pub fn mean(&self) -> &[f64; 3] {
        &self.mean
    }

    /// Get the metric factor, in meters per degree.
    #[inline]
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Map a geodetic point into the local frame.
    ///
    /// Longitude and latitude become metric offsets from the centroid, the
    /// altitude passes through unchanged.
    pub fn localize(&self, point: &[f64; 3]) -> [f64; 3] {
        [
            (point[0] - self.mean[0]) * self.factor,
            (point[1] - self.mean[1]) * self.factor,
            point[2],
        ]
    }

    /// Map every point of a track into the local frame, in place.
    pub fn localize_in_place(&self, points: &mut [[f64; 3]]) {
        for point in points {
            *point = self.localize(point);
        }
    }

    /// Map a local-frame point back to geodetic coordinates.
    ///
    /// Inverse of [`GeodeticFrame::localize`].
    pub fn delocalize(&self, point: &[f64; 3]) -> [f64; 3] {
        [
            point[0] / self.factor + self.mean[0],
            point[1] / self.factor + self.mean[1],
            point[2],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fit_centroid_and_factor() -> Result<(), GeodesyError> {
        let track = vec![
            [7.0405, 46.2010, 430.0],
            [7.0407, 46.2012, 432.0],
            [7.0409, 46.2014, 434.0],
        ];
        let frame = GeodeticFrame::fit(&track)?;

        assert_relative_eq!(frame.mean()[0], 7.0407, epsilon = 1e-12);
        assert_relative_eq!(frame.mean()[1], 46.2012, epsilon = 1e-12);
        assert_relative_eq!(frame.mean()[2], 432.0, epsilon = 1e-12);
        assert_relative_eq!(
            frame.factor(),
            (EARTH_RADIUS_M + 432.0) * std::f64::consts::PI / 180.0,
            epsilon = 1e-9
        );
        Ok(())
    }

    #[test]
    fn test_fit_empty_track() {
        assert_eq!(GeodeticFrame::fit(&[]), Err(GeodesyError::EmptyTrack));
    }

    #[test]
    fn test_localize_centers_track() -> Result<(), GeodesyError> {
        let mut track = vec![
            [7.0405, 46.2010, 430.0],
            [7.0407, 46.2012, 432.0],
            [7.0409, 46.2014, 434.0],
        ];
        let frame = GeodeticFrame::fit(&track)?;
        frame.localize_in_place(&mut track);

        // the centroid maps to the origin of the local plane
        assert_relative_eq!(track[1][0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(track[1][1], 0.0, epsilon = 1e-6);
        // altitudes pass through untouched
        assert_relative_eq!(track[0][2], 430.0, epsilon = 1e-12);
        assert_relative_eq!(track[2][2], 434.0, epsilon = 1e-12);
        // two ten-thousandths of a degree span roughly twenty-two meters
        assert!(track[0][0] < -20.0 && track[0][0] > -25.0);
        Ok(())
    }

    #[test]
    fn test_localize_delocalize_roundtrip() -> Result<(), GeodesyError> {
        let track = vec![
            [2.3522, 48.8566, 35.0],
            [2.3530, 48.8570, 36.5],
            [2.3541, 48.8575, 38.0],
        ];
        let frame = GeodeticFrame::fit(&track)?;

        for point in &track {
            let roundtrip = frame.delocalize(&frame.localize(point));
            for (r, p) in roundtrip.iter().zip(point.iter()) {
                assert_relative_eq!(r, p, epsilon = 1e-9);
            }
        }
        Ok(())
    }

    #[test]
    fn test_unit_frame_is_identity() {
        let frame = GeodeticFrame::new([0.0, 0.0, 0.0], 1.0);
        let point = [1.5, -2.5, 3.5];
        assert_eq!(frame.localize(&point), point);
        assert_eq!(frame.delocalize(&point), point);
    }
}
