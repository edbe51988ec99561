use thiserror::Error;

/// Errors raised before or during voxelization.
///
/// All of these are caller contract violations; the voxelizer never produces
/// a partially filled grid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoxelizeError {
    #[error("grid size must be finite and > 0 (got {0})")]
    InvalidSize(f32),

    #[error("grid resolution must be in 1..={max} (got {got})")]
    InvalidResolution { got: u32, max: u32 },

    #[error("{name} buffer length must be a multiple of 3 (got {len})")]
    MalformedBuffer { name: &'static str, len: usize },

    #[error("vertex {index} has a non-finite coordinate")]
    NonFiniteVertex { index: usize },

    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    VertexIndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("face {face} extends outside the voxel grid")]
    TriangleOutsideGrid { face: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = VoxelizeError::VertexIndexOutOfRange {
            face: 2,
            index: 9,
            vertex_count: 4,
        };
        assert_eq!(
            err.to_string(),
            "face 2 references vertex 9, but the mesh has 4 vertices"
        );
        assert_eq!(
            VoxelizeError::InvalidResolution { got: 0, max: 1024 }.to_string(),
            "grid resolution must be in 1..=1024 (got 0)"
        );
    }
}
