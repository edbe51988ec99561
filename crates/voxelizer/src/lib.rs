//! Surface voxelization of indexed triangle meshes.
//!
//! Every face is tested against the voxels of its snapped bounding box with a
//! separating-axis triangle/box test; overlapping voxels are marked occupied.
//!
//! ```
//! use glam::Vec3;
//! use mesh_voxelizer::voxelize;
//!
//! let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
//! let grid = voxelize(&[[0, 1, 2]], &positions, 1.0, 4).unwrap();
//! assert_eq!(grid.shape(), [4, 4, 4]);
//! assert_eq!(grid.get(2, 2, 2), Some(1.0));
//! ```

pub mod bounds;
pub mod core;
pub mod error;
pub mod primitives;
pub mod tribox;
pub mod voxelize;

pub use crate::core::{
    GridSpec, GridUniform, MeshInput, OutOfBounds, VoxelGrid, VoxelizationOutput, VoxelizeOpts,
    VoxelizeStats, MAX_RESOLUTION,
};
pub use crate::error::VoxelizeError;
pub use crate::tribox::triangle_box_overlap;
pub use crate::voxelize::{voxelize, voxelize_indexed, voxelize_mesh};
