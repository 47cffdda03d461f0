use std::time::Instant;

use hashbrown::HashSet;
use strata_chunk::{Column, TerrainLayer};
use strata_geom::Vec3;

use crate::constants::{OCCLUSION_SCAN_DEPTH, TYPICAL_INDICES_PER_CUBE, VERTS_PER_CUBE};
use crate::face::Face;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeshStats {
    pub cubes: usize,
    pub faces_emitted: usize,
    pub faces_culled: usize,
}

/// Cube corners in emission order: the four top corners, then the four
/// bottom ones.
#[inline]
pub fn cube_corners(c: Column, scale: f32) -> [Vec3; 8] {
    let x = c.x as f32 * scale;
    let y = c.y as f32 * scale;
    let z = c.z as f32 * scale;
    let (x1, y1, z1) = (x + scale, y + scale, z + scale);
    [
        Vec3::new(x, y, z1),
        Vec3::new(x, y1, z1),
        Vec3::new(x1, y, z1),
        Vec3::new(x1, y1, z1),
        Vec3::new(x, y, z),
        Vec3::new(x1, y, z),
        Vec3::new(x, y1, z),
        Vec3::new(x1, y1, z),
    ]
}

/// Appends one cube's corners to the layer and bumps its cube count.
#[inline]
pub fn add_cube(layer: &mut TerrainLayer, c: Column, scale: f32) {
    layer.vertices.extend_from_slice(&cube_corners(c, scale));
    layer.cube_count += 1;
}

/// Occupied columns of a single layer, alive only while its faces are culled.
pub struct Occupancy {
    cells: HashSet<Column>,
}

impl Occupancy {
    pub fn from_columns(columns: &[Column]) -> Self {
        Self {
            cells: columns.iter().copied().collect(),
        }
    }

    #[inline]
    pub fn contains(&self, c: Column) -> bool {
        self.cells.contains(&c)
    }

    /// A face is hidden when its neighbor cell is filled, or, for side faces,
    /// when anything sits up to [`OCCLUSION_SCAN_DEPTH`] cubes above that
    /// neighbor.
    pub fn hides(&self, c: Column, face: Face) -> bool {
        let n = face.neighbor(c);
        if self.contains(n) {
            return true;
        }
        face.is_lateral() && (1..=OCCLUSION_SCAN_DEPTH).any(|dz| self.contains(n.offset(0, 0, dz)))
    }
}

/// Emits the visible faces of every cube in the layer. Expects the layer's
/// vertices to have been produced by [`add_cube`] in column order.
pub fn build_layer_triangles(layer: &mut TerrainLayer, include_underside: bool) -> MeshStats {
    debug_assert_eq!(layer.vertices.len(), layer.cube_count * VERTS_PER_CUBE);
    let occupancy = Occupancy::from_columns(&layer.columns);
    let faces: &[Face] = if include_underside {
        &Face::ORDER
    } else {
        &Face::ORDER[..5]
    };

    let mut stats = MeshStats {
        cubes: layer.cube_count,
        ..MeshStats::default()
    };
    layer
        .triangles
        .reserve(layer.columns.len() * TYPICAL_INDICES_PER_CUBE);
    for (cube, &c) in layer.columns.iter().enumerate() {
        let base = (cube * VERTS_PER_CUBE) as u32;
        for &face in faces {
            if occupancy.hides(c, face) {
                stats.faces_culled += 1;
                continue;
            }
            for tri in face.triangles() {
                layer
                    .triangles
                    .extend_from_slice(&[base + tri[0], base + tri[1], base + tri[2]]);
            }
            stats.faces_emitted += 1;
        }
    }
    stats
}

/// Builds the layer's cube geometry: corners for every column, then culled
/// face triangles.
pub fn build_layer_mesh(layer: &mut TerrainLayer, scale: f32, include_underside: bool) -> MeshStats {
    let t0 = Instant::now();
    layer.vertices.reserve(layer.columns.len() * VERTS_PER_CUBE);
    for i in 0..layer.columns.len() {
        let c = layer.columns[i];
        add_cube(layer, c, scale);
    }
    let stats = build_layer_triangles(layer, include_underside);
    log::debug!(
        "cube mesh: cubes={} faces={} culled={} tris={} in {:.1?}",
        stats.cubes,
        stats.faces_emitted,
        stats.faces_culled,
        layer.triangles.len() / 3,
        t0.elapsed()
    );
    stats
}
