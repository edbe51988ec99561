use glam::Vec3;

use crate::bounds::candidate_range;
use crate::core::{
    validate_indexed, GridSpec, MeshInput, OutOfBounds, VoxelGrid, VoxelizationOutput,
    VoxelizeOpts, VoxelizeStats,
};
use crate::error::VoxelizeError;
use crate::tribox::triangle_box_overlap;

/// Surface-voxelizes `cells`/`positions` into a `resolution³` grid spanning
/// `[-size, size]`, clamping faces that leave the grid.
pub fn voxelize(
    cells: &[[u32; 3]],
    positions: &[Vec3],
    size: f32,
    resolution: u32,
) -> Result<VoxelGrid, VoxelizeError> {
    let grid = GridSpec::new(size, resolution)?;
    voxelize_indexed(cells, positions, &grid, &VoxelizeOpts::default()).map(|out| out.grid)
}

pub fn voxelize_mesh(
    mesh: &MeshInput,
    grid: &GridSpec,
    opts: &VoxelizeOpts,
) -> Result<VoxelizationOutput, VoxelizeError> {
    voxelize_indexed(&mesh.cells, &mesh.positions, grid, opts)
}

/// Marks every voxel that any face overlaps. Occupancy is only ever set, so
/// the result does not depend on face order.
pub fn voxelize_indexed(
    cells: &[[u32; 3]],
    positions: &[Vec3],
    grid: &GridSpec,
    opts: &VoxelizeOpts,
) -> Result<VoxelizationOutput, VoxelizeError> {
    grid.validate()?;
    validate_indexed(cells, positions)?;

    let output = if opts.parallel {
        scan_parallel(cells, positions, grid, opts)?
    } else {
        scan_sequential(cells, positions, grid, opts)?
    };

    let stats = &output.stats;
    log::debug!(
        "voxelized {} faces into {}^3 grid: {} candidates, {} occupied, {} clamped, {} skipped",
        stats.triangles,
        grid.resolution,
        stats.candidates_tested,
        stats.voxels_occupied,
        stats.clamped_triangles,
        stats.skipped_triangles
    );
    Ok(output)
}

fn gather(positions: &[Vec3], cell: &[u32; 3]) -> [Vec3; 3] {
    [
        positions[cell[0] as usize],
        positions[cell[1] as usize],
        positions[cell[2] as usize],
    ]
}

/// Tests every candidate voxel of one face and hands overlapping buffer
/// offsets to `mark`.
fn scan_face(
    face: usize,
    tri: &[Vec3; 3],
    grid: &GridSpec,
    opts: &VoxelizeOpts,
    mut mark: impl FnMut(usize),
) -> Result<VoxelizeStats, VoxelizeError> {
    let mut stats = VoxelizeStats {
        triangles: 1,
        ..Default::default()
    };

    let Some(range) = candidate_range(grid, tri) else {
        if opts.out_of_bounds == OutOfBounds::Reject {
            return Err(VoxelizeError::TriangleOutsideGrid { face });
        }
        log::trace!("face {face} lies outside the grid");
        stats.skipped_triangles = 1;
        return Ok(stats);
    };
    if range.clamped {
        if opts.out_of_bounds == OutOfBounds::Reject {
            return Err(VoxelizeError::TriangleOutsideGrid { face });
        }
        log::trace!("face {face} clamped to {:?}..={:?}", range.min, range.max);
        stats.clamped_triangles = 1;
    }

    let half = grid.voxel_half();
    for ix in range.min[0]..=range.max[0] {
        for iy in range.min[1]..=range.max[1] {
            for iz in range.min[2]..=range.max[2] {
                let center = grid.voxel_center(ix, iy, iz);
                if triangle_box_overlap(center, half, tri) {
                    if let Some(linear) = grid.linear_index(ix, iy, iz) {
                        mark(linear);
                    }
                }
            }
        }
    }
    stats.candidates_tested = range.len();
    Ok(stats)
}

fn scan_sequential(
    cells: &[[u32; 3]],
    positions: &[Vec3],
    grid: &GridSpec,
    opts: &VoxelizeOpts,
) -> Result<VoxelizationOutput, VoxelizeError> {
    let mut out = VoxelGrid::empty(*grid);
    let mut stats = VoxelizeStats::default();
    for (face, cell) in cells.iter().enumerate() {
        let tri = gather(positions, cell);
        let face_stats = scan_face(face, &tri, grid, opts, |linear| out.mark(linear))?;
        stats = stats.merge(face_stats);
    }
    stats.voxels_occupied = out.occupied_count() as u32;
    Ok(VoxelizationOutput { grid: out, stats })
}

/// Faces are split across the rayon pool; hits are OR-ed into a shared
/// atomic bitset, which makes the result independent of scheduling.
#[cfg(feature = "parallel")]
fn scan_parallel(
    cells: &[[u32; 3]],
    positions: &[Vec3],
    grid: &GridSpec,
    opts: &VoxelizeOpts,
) -> Result<VoxelizationOutput, VoxelizeError> {
    use rayon::prelude::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    let word_count = (grid.num_voxels() + 31) / 32;
    let words: Vec<AtomicU32> = (0..word_count).map(|_| AtomicU32::new(0)).collect();

    let mut stats = cells
        .par_iter()
        .enumerate()
        .map(|(face, cell)| {
            let tri = gather(positions, cell);
            scan_face(face, &tri, grid, opts, |linear| {
                words[linear >> 5].fetch_or(1u32 << (linear & 31), Ordering::Relaxed);
            })
        })
        .try_reduce(VoxelizeStats::default, |a, b| Ok(a.merge(b)))?;

    let mut out = VoxelGrid::empty(*grid);
    for (word_index, word) in words.iter().enumerate() {
        let mut bits = word.load(Ordering::Relaxed);
        while bits != 0 {
            out.mark(word_index * 32 + bits.trailing_zeros() as usize);
            bits &= bits - 1;
        }
    }
    stats.voxels_occupied = out.occupied_count() as u32;
    Ok(VoxelizationOutput { grid: out, stats })
}

#[cfg(not(feature = "parallel"))]
fn scan_parallel(
    cells: &[[u32; 3]],
    positions: &[Vec3],
    grid: &GridSpec,
    opts: &VoxelizeOpts,
) -> Result<VoxelizationOutput, VoxelizeError> {
    log::debug!("parallel scan requested without the `parallel` feature, scanning sequentially");
    scan_sequential(cells, positions, grid, opts)
}
