//! Column layers and per-chunk terrain columnization.
#![forbid(unsafe_code)]

pub mod gaps;
pub mod sampler;

use strata_geom::{Tangent, Vec3};

pub use gaps::fill_gaps;
pub use sampler::ColumnSampler;

/// One terrain column: grid position `(x, y)` and integer cube height `z`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Column {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Column {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32) -> Self {
        Self { cx, cy }
    }

    /// World-grid position of this chunk's first column.
    #[inline]
    pub const fn origin(self, chunk_size: i32) -> (i32, i32) {
        (self.cx * chunk_size, self.cy * chunk_size)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Water,
    Ground,
}

impl LayerKind {
    pub const ALL: [LayerKind; 2] = [LayerKind::Water, LayerKind::Ground];

    pub fn name(self) -> &'static str {
        match self {
            LayerKind::Water => "water",
            LayerKind::Ground => "ground",
        }
    }
}

/// Columns and mesh buffers of one material layer for the chunk being built.
#[derive(Clone, Debug, Default)]
pub struct TerrainLayer {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<u32>,
    pub normals: Vec<Vec3>,
    pub tangents: Vec<Tangent>,
    pub columns: Vec<Column>,
    pub cube_count: usize,
    /// One cube's lighting data, reused for every cube in uniform mode.
    pub universal_normals: Vec<Vec3>,
    pub universal_tangents: Vec<Tangent>,
}

impl TerrainLayer {
    /// Clears all arrays but retains capacity for reuse across chunks.
    pub fn clear_keep_capacity(&mut self) {
        self.vertices.clear();
        self.triangles.clear();
        self.normals.clear();
        self.tangents.clear();
        self.columns.clear();
        self.universal_normals.clear();
        self.universal_tangents.clear();
        self.cube_count = 0;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cube_count == 0
    }

    /// True when the index buffer forms whole triangles over existing vertices.
    pub fn mesh_is_valid(&self) -> bool {
        self.triangles.len() % 3 == 0
            && self.vertices.len() % 8 == 0
            && self.vertices.len() == self.cube_count * 8
            && self
                .triangles
                .iter()
                .all(|&i| (i as usize) < self.vertices.len())
    }
}

/// The water and ground layers of a chunk.
#[derive(Clone, Debug, Default)]
pub struct LayerSet {
    pub water: TerrainLayer,
    pub ground: TerrainLayer,
}

impl LayerSet {
    #[inline]
    pub fn get(&self, kind: LayerKind) -> &TerrainLayer {
        match kind {
            LayerKind::Water => &self.water,
            LayerKind::Ground => &self.ground,
        }
    }

    #[inline]
    pub fn get_mut(&mut self, kind: LayerKind) -> &mut TerrainLayer {
        match kind {
            LayerKind::Water => &mut self.water,
            LayerKind::Ground => &mut self.ground,
        }
    }

    pub fn clear_keep_capacity(&mut self) {
        self.water.clear_keep_capacity();
        self.ground.clear_keep_capacity();
    }

    pub fn cube_count(&self) -> usize {
        self.water.cube_count + self.ground.cube_count
    }
}
