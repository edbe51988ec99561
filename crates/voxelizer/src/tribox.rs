//! Triangle / axis-aligned box overlap test.
//!
//! Separating-axis test after Akenine-Möller's `tribox3`: three box face
//! normals, the triangle plane, then the nine `box axis × triangle edge`
//! cross products. Touching counts as overlap.

use glam::Vec3;

/// Returns `true` if the triangle `tri` intersects (or touches) the box
/// centered at `box_center` with half extents `box_half`.
///
/// Results for non-finite input are unspecified.
pub fn triangle_box_overlap(box_center: Vec3, box_half: Vec3, tri: &[Vec3; 3]) -> bool {
    let v0 = tri[0] - box_center;
    let v1 = tri[1] - box_center;
    let v2 = tri[2] - box_center;

    if !face_axes_overlap(v0, v1, v2, box_half) {
        return false;
    }

    let e0 = v1 - v0;
    let e1 = v2 - v1;
    let e2 = v0 - v2;

    let normal = e0.cross(e1);
    if !plane_box_overlap(normal, v0, box_half) {
        return false;
    }

    !edge_axes_separate(v0, v1, v2, e0, e1, e2, box_half)
}

/// Box face normals: per-axis interval test of the translated vertices.
pub(crate) fn face_axes_overlap(v0: Vec3, v1: Vec3, v2: Vec3, half: Vec3) -> bool {
    for axis in 0..3 {
        let (min, max) = min_max3(v0[axis], v1[axis], v2[axis]);
        if min > half[axis] || max < -half[axis] {
            return false;
        }
    }
    true
}

/// Plane through `vert` with `normal` against a box at the origin with half
/// extents `max_box`.
pub(crate) fn plane_box_overlap(normal: Vec3, vert: Vec3, max_box: Vec3) -> bool {
    let mut vmin = Vec3::ZERO;
    let mut vmax = Vec3::ZERO;
    for q in 0..3 {
        let v = vert[q];
        if normal[q] > 0.0 {
            vmin[q] = -max_box[q] - v;
            vmax[q] = max_box[q] - v;
        } else {
            vmin[q] = max_box[q] - v;
            vmax[q] = -max_box[q] - v;
        }
    }
    if normal.dot(vmin) > 0.0 {
        return false;
    }
    normal.dot(vmax) >= 0.0
}

/// The nine cross-product axes. Each axis only needs the two vertices whose
/// projections can differ; the third projects onto one of them.
fn edge_axes_separate(
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    e0: Vec3,
    e1: Vec3,
    e2: Vec3,
    half: Vec3,
) -> bool {
    let f = e0.abs();
    if axis_x_separates(e0, f, v0, v2, half)
        || axis_y_separates(e0, f, v0, v2, half)
        || axis_z_separates(e0, f, v1, v2, half)
    {
        return true;
    }

    let f = e1.abs();
    if axis_x_separates(e1, f, v0, v2, half)
        || axis_y_separates(e1, f, v0, v2, half)
        || axis_z_separates(e1, f, v0, v1, half)
    {
        return true;
    }

    let f = e2.abs();
    axis_x_separates(e2, f, v0, v1, half)
        || axis_y_separates(e2, f, v0, v1, half)
        || axis_z_separates(e2, f, v1, v2, half)
}

// X × edge
#[inline]
fn axis_x_separates(e: Vec3, f: Vec3, a: Vec3, b: Vec3, half: Vec3) -> bool {
    let pa = e.z * a.y - e.y * a.z;
    let pb = e.z * b.y - e.y * b.z;
    let rad = f.z * half.y + f.y * half.z;
    interval_separates(pa, pb, rad)
}

// Y × edge
#[inline]
fn axis_y_separates(e: Vec3, f: Vec3, a: Vec3, b: Vec3, half: Vec3) -> bool {
    let pa = -e.z * a.x + e.x * a.z;
    let pb = -e.z * b.x + e.x * b.z;
    let rad = f.z * half.x + f.x * half.z;
    interval_separates(pa, pb, rad)
}

// Z × edge
#[inline]
fn axis_z_separates(e: Vec3, f: Vec3, a: Vec3, b: Vec3, half: Vec3) -> bool {
    let pa = e.y * a.x - e.x * a.y;
    let pb = e.y * b.x - e.x * b.y;
    let rad = f.y * half.x + f.x * half.y;
    interval_separates(pa, pb, rad)
}

#[inline]
fn interval_separates(pa: f32, pb: f32, rad: f32) -> bool {
    let (min, max) = if pa < pb { (pa, pb) } else { (pb, pa) };
    min > rad || max < -rad
}

#[inline]
fn min_max3(a: f32, b: f32, c: f32) -> (f32, f32) {
    let mut min = a;
    let mut max = a;
    if b < min {
        min = b;
    }
    if b > max {
        max = b;
    }
    if c < min {
        min = c;
    }
    if c > max {
        max = c;
    }
    (min, max)
}
