use std::time::Instant;

use strata_chunk::{ChunkCoord, Column, ColumnSampler, LayerKind, LayerSet, fill_gaps};
use strata_lighting::{LightingMode, light_layer};
use strata_mesh_cpu::build_layer_mesh;

use crate::GenPhase;

/// Counters for one chunk pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkStats {
    pub coord: ChunkCoord,
    pub water_cubes: usize,
    pub ground_cubes: usize,
    pub fillers: usize,
    pub faces_emitted: usize,
    pub faces_culled: usize,
}

impl ChunkStats {
    fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            water_cubes: 0,
            ground_cubes: 0,
            fillers: 0,
            faces_emitted: 0,
            faces_culled: 0,
        }
    }
}

/// Read-only state shared by every chunk of one run.
pub(crate) struct ChunkPipeline<'f> {
    pub sampler: ColumnSampler<'f>,
    pub min_depth: i32,
    pub world_scale: f32,
    pub include_underside: bool,
    pub lighting: LightingMode,
}

impl ChunkPipeline<'_> {
    /// Runs voxelize, stitch, gap fill, mesh and light for one chunk. The
    /// buffers must arrive empty; on return `layers` holds the finished
    /// meshes and `border` the ring used for gap filling.
    pub fn build(
        &self,
        coord: ChunkCoord,
        layers: &mut LayerSet,
        border: &mut Vec<Column>,
        phase: &mut GenPhase,
    ) -> ChunkStats {
        let t0 = Instant::now();
        let mut stats = ChunkStats::new(coord);

        *phase = GenPhase::Voxelize;
        self.sampler.voxelize(coord, layers);

        *phase = GenPhase::Stitch;
        self.sampler.stitch_border(coord, border);

        *phase = GenPhase::FillGaps;
        stats.fillers = fill_gaps(layers, border, self.min_depth);

        *phase = GenPhase::BuildMesh;
        for kind in LayerKind::ALL {
            let layer = layers.get_mut(kind);
            if layer.columns.is_empty() {
                continue;
            }
            let mesh = build_layer_mesh(layer, self.world_scale, self.include_underside);
            stats.faces_emitted += mesh.faces_emitted;
            stats.faces_culled += mesh.faces_culled;
        }

        *phase = GenPhase::Light;
        light_layer(&mut layers.water, self.lighting);
        light_layer(&mut layers.ground, self.lighting);

        stats.water_cubes = layers.water.cube_count;
        stats.ground_cubes = layers.ground.cube_count;
        log::trace!(
            "chunk ({}, {}): water={} ground={} fillers={} in {:.1?}",
            coord.cx,
            coord.cy,
            stats.water_cubes,
            stats.ground_cubes,
            stats.fillers,
            t0.elapsed()
        );
        stats
    }
}

/// Chunk processing order: `cx` outer, `cy` inner.
pub(crate) fn chunk_order(chunks: u32) -> Vec<ChunkCoord> {
    let n = chunks as i32;
    (0..n)
        .flat_map(|cx| (0..n).map(move |cy| ChunkCoord::new(cx, cy)))
        .collect()
}
