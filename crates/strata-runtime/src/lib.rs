//! Terrain generation orchestration: calibration, per-chunk pipeline and emission.
#![forbid(unsafe_code)]

mod pipeline;
mod sink;

use std::time::{Duration, Instant};

use rayon::prelude::*;
use strata_chunk::{Column, ColumnSampler, LayerKind, LayerSet};
use strata_lighting::LightingMode;
use strata_world::{
    ConfigError, HeightField, MountainBand, TerrainConfig, TerrainParams, calibrate,
};

use crate::pipeline::{ChunkPipeline, chunk_order};

pub use pipeline::ChunkStats;
pub use sink::{MaterialHandle, MeshSink, SectionData};

/// Where the generator currently is in a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum GenPhase {
    #[default]
    Idle,
    Calibrating,
    Voxelize,
    Stitch,
    FillGaps,
    BuildMesh,
    Light,
    Emit,
    Done,
}

/// Host-side toggles observed by [`TerrainGenerator::apply`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TriggerFlags {
    /// One-shot: cleared as soon as it is observed.
    pub generate: bool,
    /// With `generate`, wipe the sink and skip generation.
    pub clear: bool,
}

/// Totals for one full generation run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunReport {
    pub chunks: usize,
    pub sections: u32,
    pub water_cubes: usize,
    pub ground_cubes: usize,
    pub fillers: usize,
    pub faces_emitted: usize,
    pub faces_culled: usize,
    pub band: Option<MountainBand>,
    pub t_calibrate: Duration,
    pub t_total: Duration,
}

impl RunReport {
    fn absorb(&mut self, stats: &ChunkStats) {
        self.chunks += 1;
        self.water_cubes += stats.water_cubes;
        self.ground_cubes += stats.ground_cubes;
        self.fillers += stats.fillers;
        self.faces_emitted += stats.faces_emitted;
        self.faces_culled += stats.faces_culled;
    }
}

/// Owns the configuration, calibrated thresholds and scratch buffers of a
/// terrain and drives generation into a [`MeshSink`].
pub struct TerrainGenerator {
    config: TerrainConfig,
    params: TerrainParams,
    field: HeightField,
    band: Option<MountainBand>,
    layers: LayerSet,
    border: Vec<Column>,
    next_section: u32,
    phase: GenPhase,
    parallel: bool,
    pub triggers: TriggerFlags,
}

impl TerrainGenerator {
    pub fn new(config: TerrainConfig) -> Self {
        let params = TerrainParams::from_config(&config);
        let field = HeightField::from_params(&params);
        Self {
            config,
            params,
            field,
            band: None,
            layers: LayerSet::default(),
            border: Vec::new(),
            next_section: 0,
            phase: GenPhase::Idle,
            parallel: false,
            triggers: TriggerFlags::default(),
        }
    }

    /// Replaces the configuration. Takes effect on the next run.
    pub fn set_config(&mut self, config: TerrainConfig) {
        self.params = TerrainParams::from_config(&config);
        self.field = HeightField::from_params(&self.params);
        self.config = config;
        self.band = None;
    }

    /// Selects the rayon chunk path for [`apply`](Self::apply).
    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    pub fn request_generate(&mut self) {
        self.triggers.generate = true;
    }

    pub fn request_clear(&mut self) {
        self.triggers.generate = true;
        self.triggers.clear = true;
    }

    #[inline]
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    #[inline]
    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    #[inline]
    pub fn phase(&self) -> GenPhase {
        self.phase
    }

    /// Thresholds from the last calibration, `None` if mountains are off or
    /// nothing has run yet.
    #[inline]
    pub fn band(&self) -> Option<MountainBand> {
        self.band
    }

    /// Sections emitted since the last reset.
    #[inline]
    pub fn sections_emitted(&self) -> u32 {
        self.next_section
    }

    /// Acts on the pending triggers. Returns `Ok(None)` when nothing was
    /// generated.
    pub fn apply<S: MeshSink + ?Sized>(
        &mut self,
        sink: &mut S,
    ) -> Result<Option<RunReport>, ConfigError> {
        if !self.triggers.generate {
            return Ok(None);
        }
        self.triggers.generate = false;
        if self.triggers.clear {
            self.triggers.clear = false;
            self.reset(sink);
            log::info!("terrain cleared");
            return Ok(None);
        }
        let report = if self.parallel {
            self.generate_parallel(sink)?
        } else {
            self.generate(sink)?
        };
        Ok(Some(report))
    }

    /// Drops all emitted geometry and generator state.
    pub fn reset<S: MeshSink + ?Sized>(&mut self, sink: &mut S) {
        sink.clear_all_sections();
        self.next_section = 0;
        self.band = None;
        self.layers.clear_keep_capacity();
        self.border.clear();
        self.phase = GenPhase::Idle;
    }

    fn begin_run<S: MeshSink + ?Sized>(&mut self, sink: &mut S) -> Result<Duration, ConfigError> {
        self.config.validate()?;
        self.reset(sink);
        self.phase = GenPhase::Calibrating;
        let t0 = Instant::now();
        self.band = calibrate(
            &self.field,
            self.params.chunk_size,
            self.params.chunks,
            self.params.mountain_density,
        );
        Ok(t0.elapsed())
    }

    /// Full sequential run. Layer and border buffers are reused between
    /// chunks; each chunk is emitted before the next one starts.
    pub fn generate<S: MeshSink + ?Sized>(&mut self, sink: &mut S) -> Result<RunReport, ConfigError> {
        let t0 = Instant::now();
        let t_calibrate = self.begin_run(sink)?;
        let materials = Materials::from_params(&self.params);
        let mut report = RunReport {
            band: self.band,
            t_calibrate,
            ..RunReport::default()
        };

        let pipeline = chunk_pipeline(&self.field, self.band, &self.params);
        for coord in chunk_order(self.params.chunks) {
            let stats = pipeline.build(coord, &mut self.layers, &mut self.border, &mut self.phase);
            self.phase = GenPhase::Emit;
            emit_layers(sink, &self.layers, &materials, &mut self.next_section);
            report.absorb(&stats);
            self.layers.clear_keep_capacity();
            self.border.clear();
        }

        self.phase = GenPhase::Done;
        report.sections = self.next_section;
        report.t_total = t0.elapsed();
        log_report(&report, "sequential");
        Ok(report)
    }

    /// Builds chunks concurrently on the rayon pool, each with its own
    /// buffers, then emits them in the sequential order so section numbering
    /// matches [`generate`](Self::generate).
    pub fn generate_parallel<S: MeshSink + ?Sized>(
        &mut self,
        sink: &mut S,
    ) -> Result<RunReport, ConfigError> {
        let t0 = Instant::now();
        let t_calibrate = self.begin_run(sink)?;
        let materials = Materials::from_params(&self.params);
        let mut report = RunReport {
            band: self.band,
            t_calibrate,
            ..RunReport::default()
        };

        let built: Vec<(LayerSet, ChunkStats)> = {
            let pipeline = chunk_pipeline(&self.field, self.band, &self.params);
            chunk_order(self.params.chunks)
                .into_par_iter()
                .map(|coord| {
                    let mut layers = LayerSet::default();
                    let mut border = Vec::new();
                    let mut phase = GenPhase::Voxelize;
                    let stats = pipeline.build(coord, &mut layers, &mut border, &mut phase);
                    (layers, stats)
                })
                .collect()
        };

        self.phase = GenPhase::Emit;
        for (layers, stats) in &built {
            emit_layers(sink, layers, &materials, &mut self.next_section);
            report.absorb(stats);
        }

        self.phase = GenPhase::Done;
        report.sections = self.next_section;
        report.t_total = t0.elapsed();
        log_report(&report, "parallel");
        Ok(report)
    }
}

fn chunk_pipeline<'f>(
    field: &'f HeightField,
    band: Option<MountainBand>,
    params: &TerrainParams,
) -> ChunkPipeline<'f> {
    ChunkPipeline {
        sampler: ColumnSampler::new(field, band, params),
        min_depth: params.min_depth(),
        world_scale: params.world_scale,
        include_underside: params.draw_underneath,
        lighting: LightingMode::from_detailed(params.detailed_lighting),
    }
}

struct Materials {
    water: MaterialHandle,
    ground: MaterialHandle,
}

impl Materials {
    fn from_params(params: &TerrainParams) -> Self {
        Self {
            water: MaterialHandle::new(params.water_material.clone()),
            ground: MaterialHandle::new(params.ground_material.clone()),
        }
    }

    fn get(&self, kind: LayerKind) -> &MaterialHandle {
        match kind {
            LayerKind::Water => &self.water,
            LayerKind::Ground => &self.ground,
        }
    }
}

/// Hands each non-empty layer to the sink as the next section, water first.
fn emit_layers<S: MeshSink + ?Sized>(
    sink: &mut S,
    layers: &LayerSet,
    materials: &Materials,
    next_section: &mut u32,
) {
    for kind in LayerKind::ALL {
        let layer = layers.get(kind);
        if layer.is_empty() {
            continue;
        }
        let index = *next_section;
        sink.create_section(index, SectionData::from_layer(layer));
        sink.set_material(index, materials.get(kind));
        *next_section += 1;
    }
}

fn log_report(report: &RunReport, mode: &str) {
    log::info!(
        "terrain ({}): chunks={} sections={} water={} ground={} fillers={} faces={} culled={} calib={:.1?} total={:.1?}",
        mode,
        report.chunks,
        report.sections,
        report.water_cubes,
        report.ground_cubes,
        report.fillers,
        report.faces_emitted,
        report.faces_culled,
        report.t_calibrate,
        report.t_total
    );
}
