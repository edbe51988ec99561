use glam::Vec3;

use crate::core::MeshInput;

/// Axis-aligned cube centered on the origin: 8 vertices, 12 outward-wound
/// triangles.
pub fn cube(half_extent: f32) -> MeshInput {
    // Corner `i` takes +h on x, y, z for bits 0, 1, 2 of `i`.
    let positions = (0..8u32)
        .map(|i| {
            let pick = |bit: u32| if i & bit != 0 { half_extent } else { -half_extent };
            Vec3::new(pick(1), pick(2), pick(4))
        })
        .collect();
    let cells = vec![
        [0, 4, 6], [0, 6, 2], // -X
        [1, 3, 7], [1, 7, 5], // +X
        [0, 1, 5], [0, 5, 4], // -Y
        [2, 6, 7], [2, 7, 3], // +Y
        [0, 2, 3], [0, 3, 1], // -Z
        [4, 5, 7], [4, 7, 6], // +Z
    ];
    MeshInput::new(cells, positions)
}
