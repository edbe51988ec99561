use glam::Vec3;

use crate::core::GridSpec;

/// Inclusive block of candidate voxels covering one triangle's bounding box,
/// already clamped to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateRange {
    pub min: [u32; 3],
    pub max: [u32; 3],
    /// Set when the snapped box reached past the grid on some axis.
    pub clamped: bool,
}

impl CandidateRange {
    /// Number of candidate voxels.
    pub fn len(&self) -> u64 {
        (0..3)
            .map(|a| (self.max[a] - self.min[a]) as u64 + 1)
            .product()
    }

    pub fn contains(&self, ix: u32, iy: u32, iz: u32) -> bool {
        let p = [ix, iy, iz];
        (0..3).all(|a| self.min[a] <= p[a] && p[a] <= self.max[a])
    }
}

/// Exact axis-aligned bounds of a triangle.
pub fn triangle_aabb(tri: &[Vec3; 3]) -> (Vec3, Vec3) {
    (
        tri[0].min(tri[1]).min(tri[2]),
        tri[0].max(tri[1]).max(tri[2]),
    )
}

/// Snapped lattice indices of the triangle's bounding box corners, before
/// clamping. Either corner may lie outside the grid.
pub fn unclamped_range(grid: &GridSpec, tri: &[Vec3; 3]) -> ([i64; 3], [i64; 3]) {
    let (min_v, max_v) = triangle_aabb(tri);
    (
        [grid.snap(min_v.x), grid.snap(min_v.y), grid.snap(min_v.z)],
        [grid.snap(max_v.x), grid.snap(max_v.y), grid.snap(max_v.z)],
    )
}

/// Candidate voxels for `tri`, clamped to `[0, resolution - 1]`.
///
/// Returns `None` when the snapped box misses the grid on any axis; no voxel
/// of the grid can overlap such a triangle through the candidate scan.
pub fn candidate_range(grid: &GridSpec, tri: &[Vec3; 3]) -> Option<CandidateRange> {
    let (lo, hi) = unclamped_range(grid, tri);
    let last = grid.resolution as i64 - 1;

    let mut min = [0u32; 3];
    let mut max = [0u32; 3];
    let mut clamped = false;
    for a in 0..3 {
        if hi[a] < 0 || lo[a] > last {
            return None;
        }
        clamped |= lo[a] < 0 || hi[a] > last;
        min[a] = lo[a].clamp(0, last) as u32;
        max[a] = hi[a].clamp(0, last) as u32;
    }
    Some(CandidateRange { min, max, clamped })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridSpec {
        GridSpec::new(1.0, 4).expect("grid")
    }

    #[test]
    fn aabb_is_componentwise() {
        let tri = [
            Vec3::new(0.5, -1.0, 2.0),
            Vec3::new(-0.5, 3.0, 1.0),
            Vec3::new(0.0, 0.0, -4.0),
        ];
        let (min, max) = triangle_aabb(&tri);
        assert_eq!(min, Vec3::new(-0.5, -1.0, -4.0));
        assert_eq!(max, Vec3::new(0.5, 3.0, 2.0));
    }

    #[test]
    fn inside_triangle_is_not_clamped() {
        let tri = [
            Vec3::new(-0.9, -0.1, 0.1),
            Vec3::new(0.1, -0.1, 0.1),
            Vec3::new(-0.9, 0.4, 0.2),
        ];
        let range = candidate_range(&grid(), &tri).expect("range");
        assert_eq!(range.min, [0, 1, 2]);
        assert_eq!(range.max, [2, 2, 2]);
        assert!(!range.clamped);
        assert_eq!(range.len(), 3 * 2);
        assert!(range.contains(1, 2, 2));
        assert!(!range.contains(3, 2, 2));
    }

    #[test]
    fn partially_outside_triangle_is_clamped() {
        let tri = [
            Vec3::new(-3.0, 0.1, 0.1),
            Vec3::new(3.0, 0.1, 0.1),
            Vec3::new(0.0, 0.3, 0.1),
        ];
        let (lo, hi) = unclamped_range(&grid(), &tri);
        assert_eq!(lo[0], -4);
        assert_eq!(hi[0], 8);

        let range = candidate_range(&grid(), &tri).expect("range");
        assert_eq!(range.min, [0, 2, 2]);
        assert_eq!(range.max, [3, 2, 2]);
        assert!(range.clamped);
    }

    #[test]
    fn triangle_beyond_grid_has_no_candidates() {
        let tri = [
            Vec3::new(1.5, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(1.5, 0.5, 0.0),
        ];
        assert_eq!(candidate_range(&grid(), &tri), None);

        let below = [
            Vec3::new(0.0, -2.0, 0.0),
            Vec3::new(0.5, -2.0, 0.0),
            Vec3::new(0.0, -1.5, 0.0),
        ];
        assert_eq!(candidate_range(&grid(), &below), None);
    }
}
