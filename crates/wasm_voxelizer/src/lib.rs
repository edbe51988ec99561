//! WASM bindings for mesh surface voxelization.
//!
//! Takes the flat `positions`/`cells` buffers a browser mesh already holds and
//! returns a dense occupancy grid ready for upload into GPU storage.

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

use mesh_voxelizer::{
    GridSpec, MeshInput, VoxelGrid, VoxelizationOutput, VoxelizeError, VoxelizeOpts,
};

thread_local! {
    static LOG_ENABLED: std::cell::Cell<bool> = std::cell::Cell::new(false);
}

fn console_log(message: &str) {
    if LOG_ENABLED.with(|enabled| enabled.get()) {
        web_sys::console::log_1(&message.into());
    }
}

/// Forwards `log` records from the voxelizer to the browser console while
/// logging is enabled.
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        LOG_ENABLED.with(|enabled| enabled.get())
    }

    fn log(&self, record: &log::Record) {
        if log::Log::enabled(self, record.metadata()) {
            console_log(&format!("[{}] {}", record.target(), record.args()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Enable or disable console logging.
#[wasm_bindgen]
pub fn set_log_enabled(enabled: bool) {
    LOG_ENABLED.with(|flag| flag.set(enabled));
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Debug);
    }
    console_log(&format!(
        "[wasm_voxelizer] logging {}",
        if enabled { "on" } else { "off" }
    ));
}

/// Route Rust panics to `console.error`.
#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Voxelization result returned to JavaScript.
#[wasm_bindgen]
pub struct VoxelGridResult {
    grid: VoxelGrid,
    triangles: u32,
    candidates_tested: f64,
}

#[wasm_bindgen]
impl VoxelGridResult {
    /// Occupancy values (0 or 1), indexed `iy * N * N + iz * N + ix`.
    #[wasm_bindgen(getter)]
    pub fn voxels(&self) -> Float32Array {
        Float32Array::from(self.grid.voxels())
    }

    /// `[N, N, N]`.
    #[wasm_bindgen(getter)]
    pub fn shape(&self) -> Vec<u32> {
        self.grid.shape().to_vec()
    }

    #[wasm_bindgen(getter)]
    pub fn resolution(&self) -> u32 {
        self.grid.resolution()
    }

    #[wasm_bindgen(getter)]
    pub fn size(&self) -> f32 {
        self.grid.size()
    }

    #[wasm_bindgen(getter)]
    pub fn cell_size(&self) -> f32 {
        self.grid.cell_size()
    }

    #[wasm_bindgen(getter)]
    pub fn occupied_count(&self) -> usize {
        self.grid.occupied_count()
    }

    #[wasm_bindgen(getter)]
    pub fn triangles(&self) -> u32 {
        self.triangles
    }

    #[wasm_bindgen(getter)]
    pub fn candidates_tested(&self) -> f64 {
        self.candidates_tested
    }

    /// World-space centers of occupied voxels (x, y, z triples), for
    /// instanced rendering.
    #[wasm_bindgen(getter)]
    pub fn occupied_centers(&self) -> Vec<f32> {
        flatten(&self.grid.occupied_centers())
    }

    /// Occupancy of voxel `(ix, iy, iz)`; `undefined` outside the grid.
    pub fn get(&self, ix: u32, iy: u32, iz: u32) -> Option<f32> {
        self.grid.get(ix, iy, iz)
    }
}

impl From<VoxelizationOutput> for VoxelGridResult {
    fn from(output: VoxelizationOutput) -> Self {
        Self {
            triangles: output.stats.triangles,
            candidates_tested: output.stats.candidates_tested as f64,
            grid: output.grid,
        }
    }
}

/// Voxelize a triangle mesh into an `N³` occupancy grid spanning
/// `[-size, size]` on every axis.
///
/// # Arguments
/// * `positions` - Flat vertex positions (x, y, z triples)
/// * `cells` - Flat triangle indices (3 per face)
/// * `size` - Half extent of the grid
/// * `resolution` - Voxels per axis
///
/// # Example (JavaScript)
/// ```javascript
/// const result = voxelize_mesh(positions, cells, 1.0, 64);
/// const voxels = result.voxels; // Float32Array of 64^3 values
/// ```
#[wasm_bindgen]
pub fn voxelize_mesh(
    positions: &[f32],
    cells: &[u32],
    size: f32,
    resolution: u32,
) -> Result<VoxelGridResult, JsValue> {
    console_log(&format!(
        "[wasm_voxelizer] voxelize_mesh vertices={} faces={} size={} resolution={}",
        positions.len() / 3,
        cells.len() / 3,
        size,
        resolution
    ));
    voxelize_flat(positions, cells, size, resolution)
        .map(VoxelGridResult::from)
        .map_err(to_js_error)
}

/// Center a flat position buffer on the origin and scale it into `[-1, 1]³`.
#[wasm_bindgen]
pub fn center_and_normalize(positions: &[f32]) -> Result<Vec<f32>, JsValue> {
    normalize_flat(positions).map_err(to_js_error)
}

/// Get the version of the voxelizer library.
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js_error(err: VoxelizeError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn voxelize_flat(
    positions: &[f32],
    cells: &[u32],
    size: f32,
    resolution: u32,
) -> Result<VoxelizationOutput, VoxelizeError> {
    let mesh = MeshInput::from_flat(positions, cells)?;
    let grid = GridSpec::new(size, resolution)?;
    mesh_voxelizer::voxelize_mesh(&mesh, &grid, &VoxelizeOpts::default())
}

fn normalize_flat(positions: &[f32]) -> Result<Vec<f32>, VoxelizeError> {
    let mut mesh = MeshInput::from_flat(positions, &[])?;
    mesh.center_and_normalize();
    Ok(flatten(&mesh.positions))
}

fn flatten(points: &[glam::Vec3]) -> Vec<f32> {
    points.iter().flat_map(|p| p.to_array()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];

    #[test]
    fn flat_buffers_voxelize() {
        let output = voxelize_flat(&TRIANGLE, &[0, 1, 2], 1.0, 4).expect("voxelize");
        assert_eq!(output.grid.voxels().len(), 64);
        assert_eq!(output.grid.occupied_count(), 4);
        assert_eq!(output.stats.triangles, 1);
    }

    #[test]
    fn malformed_buffers_are_rejected() {
        assert_eq!(
            voxelize_flat(&TRIANGLE[..8], &[0, 1, 2], 1.0, 4).unwrap_err(),
            VoxelizeError::MalformedBuffer { name: "positions", len: 8 }
        );
        assert_eq!(
            voxelize_flat(&TRIANGLE, &[0, 1, 5], 1.0, 4).unwrap_err(),
            VoxelizeError::VertexIndexOutOfRange { face: 0, index: 5, vertex_count: 3 }
        );
    }

    #[test]
    fn normalize_flat_fits_unit_cube() {
        let positions = [2.0, 2.0, 2.0, 6.0, 4.0, 2.0];
        let normalized = normalize_flat(&positions).expect("normalize");
        assert_eq!(normalized, vec![-1.0, -0.5, 0.0, 1.0, 0.5, 0.0]);
    }

    #[test]
    fn flatten_keeps_xyz_order() {
        let points = [glam::Vec3::new(1.0, 2.0, 3.0), glam::Vec3::new(4.0, 5.0, 6.0)];
        assert_eq!(flatten(&points), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }
}
