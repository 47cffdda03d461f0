//! Per-layer normals and tangents for cube meshes.
#![forbid(unsafe_code)]

mod tangents;

use strata_chunk::TerrainLayer;

pub use tangents::compute_tangents_for_mesh;

/// Cube corners; every cube in a layer is a translated copy of the first.
const CUBE_VERTS: usize = 8;
/// Index prefix of the first cube used to derive the uniform template.
pub const UNIFORM_TEMPLATE_INDICES: usize = 16;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum LightingMode {
    /// One cube's lighting data replicated across the layer.
    #[default]
    Uniform,
    /// Per-vertex data smoothed across the whole layer.
    Detailed,
}

impl LightingMode {
    #[inline]
    pub fn from_detailed(detailed: bool) -> Self {
        if detailed {
            LightingMode::Detailed
        } else {
            LightingMode::Uniform
        }
    }
}

/// Fills `layer.normals` and `layer.tangents` (one entry per vertex).
/// Layers without cubes are left untouched.
pub fn light_layer(layer: &mut TerrainLayer, mode: LightingMode) {
    if layer.cube_count == 0 {
        return;
    }
    match mode {
        LightingMode::Detailed => {
            let (normals, tangents) = compute_tangents_for_mesh(&layer.vertices, &layer.triangles);
            layer.normals = normals;
            layer.tangents = tangents;
        }
        LightingMode::Uniform => light_layer_uniform(layer),
    }
}

fn light_layer_uniform(layer: &mut TerrainLayer) {
    let Some(first_cube) = layer.vertices.get(..CUBE_VERTS) else {
        log::warn!(
            "uniform lighting skipped: {} vertices for {} cubes",
            layer.vertices.len(),
            layer.cube_count
        );
        return;
    };
    let take = layer.triangles.len().min(UNIFORM_TEMPLATE_INDICES);
    let whole = take - take % 3;
    // Rebase into the first cube so later cubes' triangles still describe it.
    let template: Vec<u32> = layer.triangles[..whole]
        .iter()
        .map(|&i| i % CUBE_VERTS as u32)
        .collect();
    let (normals, tangents) = compute_tangents_for_mesh(first_cube, &template);
    layer.universal_normals = normals;
    layer.universal_tangents = tangents;

    layer.normals.clear();
    layer.tangents.clear();
    layer.normals.reserve(layer.cube_count * CUBE_VERTS);
    layer.tangents.reserve(layer.cube_count * CUBE_VERTS);
    for _ in 0..layer.cube_count {
        layer.normals.extend_from_slice(&layer.universal_normals);
        layer.tangents.extend_from_slice(&layer.universal_tangents);
    }
    log::trace!(
        "uniform lighting: template of {} tris replicated over {} cubes",
        template.len() / 3,
        layer.cube_count
    );
}
