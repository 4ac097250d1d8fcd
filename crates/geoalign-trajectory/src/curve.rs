//! Growable containers for 3D trajectory curves.

/// Number of points reserved per allocation block.
const CURVE_BLOCK: usize = 1024;

/// An ordered sequence of 3D points.
///
/// Storage grows in fixed blocks of 1024 points, so long accumulation runs
/// reallocate rarely. Each point is a whole `[f64; 3]` triple; the container
/// can never hold a partial point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Curve {
    points: Vec<[f64; 3]>,
}

impl Curve {
    /// Create an empty curve.
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Append a point, growing storage by one block when full.
    pub fn push(&mut self, point: [f64; 3]) {
        if self.points.len() == self.points.capacity() {
            self.points.reserve_exact(CURVE_BLOCK);
        }
        self.points.push(point);
    }

    /// Get the number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the curve is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get the allocated capacity, in points.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.points.capacity()
    }

    /// Drop all points, keeping the allocated storage.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Get the points as a slice.
    #[inline]
    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    /// Get the points as a mutable slice, for in-place rewrites.
    #[inline]
    pub fn points_mut(&mut self) -> &mut [[f64; 3]] {
        &mut self.points
    }

    /// Consume the curve, returning the underlying points.
    pub fn into_points(self) -> Vec<[f64; 3]> {
        self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_read_back() {
        let mut curve = Curve::new();
        assert!(curve.is_empty());

        curve.push([1.0, 2.0, 3.0]);
        curve.push([4.0, 5.0, 6.0]);

        assert_eq!(curve.len(), 2);
        assert_eq!(curve.points(), &[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    }

    #[test]
    fn test_block_growth() {
        let mut curve = Curve::new();
        curve.push([0.0; 3]);
        assert!(curve.capacity() >= CURVE_BLOCK);

        for i in 1..(CURVE_BLOCK + 1) {
            curve.push([i as f64; 3]);
        }
        assert_eq!(curve.len(), CURVE_BLOCK + 1);
        assert!(curve.capacity() >= 2 * CURVE_BLOCK);
    }

    #[test]
    fn test_clear_keeps_storage() {
        let mut curve = Curve::new();
        for i in 0..10 {
            curve.push([i as f64; 3]);
        }
        let capacity = curve.capacity();

        curve.clear();
        assert!(curve.is_empty());
        assert_eq!(curve.capacity(), capacity);
    }

    #[test]
    fn test_points_mut_rewrite() {
        let mut curve = Curve::new();
        curve.push([1.0, 2.0, 3.0]);

        for point in curve.points_mut() {
            point[0] *= 10.0;
        }
        assert_eq!(curve.points(), &[[10.0, 2.0, 3.0]]);
    }
}
