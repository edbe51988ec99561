use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::error::VoxelizeError;

/// Largest accepted grid resolution per axis.
pub const MAX_RESOLUTION: u32 = 1024;

/// Cubic voxel lattice of `resolution³` cells spanning `[-size, size]` on
/// every axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub size: f32,
    pub resolution: u32,
}

impl GridSpec {
    pub fn new(size: f32, resolution: u32) -> Result<Self, VoxelizeError> {
        let spec = Self { size, resolution };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), VoxelizeError> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(VoxelizeError::InvalidSize(self.size));
        }
        if self.resolution == 0 || self.resolution > MAX_RESOLUTION {
            return Err(VoxelizeError::InvalidResolution {
                got: self.resolution,
                max: MAX_RESOLUTION,
            });
        }
        Ok(())
    }

    /// Side length of a single voxel.
    pub fn cell_size(&self) -> f32 {
        2.0 * self.size / self.resolution as f32
    }

    pub fn voxel_half(&self) -> Vec3 {
        Vec3::splat(self.cell_size() * 0.5)
    }

    /// Maps a world coordinate to a lattice index on one axis. The result may
    /// fall outside `[0, resolution - 1]`.
    pub fn snap(&self, p: f32) -> i64 {
        let n = self.resolution as i64;
        let t = p / self.cell_size();
        if n % 2 == 0 {
            t.floor() as i64 + n / 2
        } else {
            // Odd lattices straddle the origin with a cell centered on it.
            (t + 0.5).floor() as i64 + n / 2
        }
    }

    /// World-space center of voxel `(ix, iy, iz)`.
    pub fn voxel_center(&self, ix: u32, iy: u32, iz: u32) -> Vec3 {
        let half_n = self.resolution as f32 * 0.5;
        let vs = self.cell_size();
        Vec3::new(
            ((ix as f32 - half_n) + 0.5) * vs,
            ((iy as f32 - half_n) + 0.5) * vs,
            ((iz as f32 - half_n) + 0.5) * vs,
        )
    }

    pub fn shape(&self) -> [u32; 3] {
        [self.resolution; 3]
    }

    pub fn num_voxels(&self) -> usize {
        let n = self.resolution as usize;
        n * n * n
    }

    /// Buffer offset of voxel `(ix, iy, iz)`: y-major, then z, x-minor.
    pub fn linear_index(&self, ix: u32, iy: u32, iz: u32) -> Option<usize> {
        let n = self.resolution;
        if ix >= n || iy >= n || iz >= n {
            return None;
        }
        let n = n as usize;
        Some(iy as usize * n * n + iz as usize * n + ix as usize)
    }

    /// Inverse of [`GridSpec::linear_index`].
    pub fn coords_of(&self, linear: usize) -> [u32; 3] {
        let n = self.resolution as usize;
        let iy = linear / (n * n);
        let rem = linear % (n * n);
        [(rem % n) as u32, iy as u32, (rem / n) as u32]
    }

    pub fn uniform(&self) -> GridUniform {
        GridUniform {
            size: self.size,
            resolution: self.resolution,
            cell_size: self.cell_size(),
            _pad0: 0,
        }
    }
}

/// Grid parameters laid out for a uniform buffer upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GridUniform {
    pub size: f32,
    pub resolution: u32,
    pub cell_size: f32,
    pub _pad0: u32,
}

/// Indexed triangle mesh.
#[derive(Debug, Clone, Default)]
pub struct MeshInput {
    pub cells: Vec<[u32; 3]>,
    pub positions: Vec<Vec3>,
}

impl MeshInput {
    pub fn new(cells: Vec<[u32; 3]>, positions: Vec<Vec3>) -> Self {
        Self { cells, positions }
    }

    /// Builds a mesh from flat `xyz` positions and flat triangle indices.
    pub fn from_flat(positions: &[f32], cells: &[u32]) -> Result<Self, VoxelizeError> {
        if positions.len() % 3 != 0 {
            return Err(VoxelizeError::MalformedBuffer {
                name: "positions",
                len: positions.len(),
            });
        }
        if cells.len() % 3 != 0 {
            return Err(VoxelizeError::MalformedBuffer {
                name: "cells",
                len: cells.len(),
            });
        }
        let positions = positions
            .chunks_exact(3)
            .map(|p| Vec3::new(p[0], p[1], p[2]))
            .collect();
        let cells = cells.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
        Ok(Self { cells, positions })
    }

    pub fn validate(&self) -> Result<(), VoxelizeError> {
        validate_indexed(&self.cells, &self.positions)
    }

    pub fn triangle_count(&self) -> usize {
        self.cells.len()
    }

    /// Vertices of face `face`. Indices must already be validated.
    pub fn triangle(&self, face: usize) -> [Vec3; 3] {
        let cell = self.cells[face];
        [
            self.positions[cell[0] as usize],
            self.positions[cell[1] as usize],
            self.positions[cell[2] as usize],
        ]
    }

    /// Component-wise min and max over all positions.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
        )
    }

    /// Moves the bounding box center to the origin and scales uniformly so the
    /// mesh fits in `[-1, 1]³` with its largest extent touching the bounds.
    pub fn center_and_normalize(&mut self) {
        let Some((min, max)) = self.bounds() else {
            return;
        };
        let center = (min + max) * 0.5;
        let half_extent = ((max - min) * 0.5).max_element();
        let scale = if half_extent > 0.0 { 1.0 / half_extent } else { 1.0 };
        for p in &mut self.positions {
            *p = (*p - center) * scale;
        }
    }
}

/// Checks that every position is finite and every face index resolves.
pub fn validate_indexed(cells: &[[u32; 3]], positions: &[Vec3]) -> Result<(), VoxelizeError> {
    if let Some(index) = positions.iter().position(|p| !p.is_finite()) {
        return Err(VoxelizeError::NonFiniteVertex { index });
    }
    let vertex_count = positions.len();
    for (face, cell) in cells.iter().enumerate() {
        if let Some(&index) = cell.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(VoxelizeError::VertexIndexOutOfRange {
                face,
                index,
                vertex_count,
            });
        }
    }
    Ok(())
}

/// What to do with faces whose candidate voxels leave the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutOfBounds {
    /// Clamp candidate ranges to the grid; faces fully outside are skipped.
    #[default]
    Clamp,
    /// Fail with [`VoxelizeError::TriangleOutsideGrid`].
    Reject,
}

#[derive(Debug, Clone, Default)]
pub struct VoxelizeOpts {
    pub out_of_bounds: OutOfBounds,
    /// Scan faces on the rayon pool. Needs the `parallel` feature.
    pub parallel: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoxelizeStats {
    pub triangles: u32,
    /// Faces with no candidate voxel inside the grid.
    pub skipped_triangles: u32,
    /// Faces whose candidate range had to be clamped.
    pub clamped_triangles: u32,
    pub candidates_tested: u64,
    pub voxels_occupied: u32,
}

impl VoxelizeStats {
    pub(crate) fn merge(mut self, other: Self) -> Self {
        self.triangles += other.triangles;
        self.skipped_triangles += other.skipped_triangles;
        self.clamped_triangles += other.clamped_triangles;
        self.candidates_tested += other.candidates_tested;
        self
    }
}

/// Dense occupancy grid. Every value is `0.0` (empty) or `1.0` (occupied).
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    spec: GridSpec,
    voxels: Vec<f32>,
}

impl VoxelGrid {
    pub(crate) fn empty(spec: GridSpec) -> Self {
        Self {
            voxels: vec![0.0; spec.num_voxels()],
            spec,
        }
    }

    pub(crate) fn mark(&mut self, linear: usize) {
        self.voxels[linear] = 1.0;
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    pub fn shape(&self) -> [u32; 3] {
        self.spec.shape()
    }

    pub fn resolution(&self) -> u32 {
        self.spec.resolution
    }

    pub fn size(&self) -> f32 {
        self.spec.size
    }

    pub fn cell_size(&self) -> f32 {
        self.spec.cell_size()
    }

    pub fn voxels(&self) -> &[f32] {
        &self.voxels
    }

    pub fn into_voxels(self) -> Vec<f32> {
        self.voxels
    }

    /// Raw bytes of the occupancy buffer, ready for a storage buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.voxels)
    }

    pub fn get(&self, ix: u32, iy: u32, iz: u32) -> Option<f32> {
        self.spec.linear_index(ix, iy, iz).map(|i| self.voxels[i])
    }

    pub fn is_occupied(&self, ix: u32, iy: u32, iz: u32) -> bool {
        self.get(ix, iy, iz).is_some_and(|v| v != 0.0)
    }

    pub fn occupied_count(&self) -> usize {
        self.voxels.iter().filter(|&&v| v != 0.0).count()
    }

    /// Coordinates of occupied voxels in buffer order.
    pub fn iter_occupied(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.voxels
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != 0.0)
            .map(|(linear, _)| self.spec.coords_of(linear))
    }

    /// World-space centers of occupied voxels in buffer order.
    pub fn occupied_centers(&self) -> Vec<Vec3> {
        self.iter_occupied()
            .map(|[ix, iy, iz]| self.spec.voxel_center(ix, iy, iz))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct VoxelizationOutput {
    pub grid: VoxelGrid,
    pub stats: VoxelizeStats,
}
