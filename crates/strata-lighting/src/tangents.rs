use hashbrown::HashMap;
use strata_geom::{Tangent, Vec3};

#[derive(Clone, Copy, Default)]
struct Accum {
    normal: Vec3,
    tangent: Vec3,
}

/// Front faces wind clockwise when seen from outside, so the outward normal
/// is `(p1 - p2) x (p0 - p2)`. Its length is twice the triangle area.
#[inline]
fn face_normal(p0: Vec3, p1: Vec3, p2: Vec3) -> Vec3 {
    (p1 - p2).cross(p0 - p2)
}

#[inline]
fn perpendicular(n: Vec3) -> Vec3 {
    let axis = if n.x.abs() < 0.9 { Vec3::X } else { Vec3::new(0.0, 1.0, 0.0) };
    (axis - n * n.dot(axis)).normalized()
}

/// Smooth per-vertex normals and tangents.
///
/// Face normals are accumulated area-weighted at every vertex that shares a
/// position. With no UVs, the tangent comes from each face's first edge,
/// orthogonalised against the vertex normal. Vertices touched by no triangle
/// get `+Z` and a perpendicular tangent.
pub fn compute_tangents_for_mesh(vertices: &[Vec3], triangles: &[u32]) -> (Vec<Vec3>, Vec<Tangent>) {
    let mut shared: HashMap<[u32; 3], Accum> = HashMap::with_capacity(vertices.len());
    for tri in triangles.chunks_exact(3) {
        let (Some(&p0), Some(&p1), Some(&p2)) = (
            vertices.get(tri[0] as usize),
            vertices.get(tri[1] as usize),
            vertices.get(tri[2] as usize),
        ) else {
            continue;
        };
        let n = face_normal(p0, p1, p2);
        let t = (p1 - p0).normalized() * n.length();
        for p in [p0, p1, p2] {
            let acc = shared.entry(p.bits()).or_default();
            acc.normal += n;
            acc.tangent += t;
        }
    }

    let mut normals = Vec::with_capacity(vertices.len());
    let mut tangents = Vec::with_capacity(vertices.len());
    for v in vertices {
        let acc = shared.get(&v.bits()).copied().unwrap_or_default();
        let mut n = acc.normal.normalized();
        if n.length() == 0.0 {
            n = Vec3::UP;
        }
        let residual = acc.tangent - n * n.dot(acc.tangent);
        let t = if residual.length() > 1e-4 * acc.tangent.length().max(1.0) {
            residual.normalized()
        } else {
            perpendicular(n)
        };
        normals.push(n);
        tangents.push(Tangent::new(t, false));
    }
    (normals, tangents)
}
