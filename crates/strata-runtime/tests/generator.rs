use strata_geom::{Tangent, Vec3};
use strata_runtime::{GenPhase, MaterialHandle, MeshSink, SectionData, TerrainGenerator};
use strata_world::TerrainConfig;

#[derive(Clone, Debug, PartialEq)]
struct Section {
    index: u32,
    vertices: Vec<Vec3>,
    triangles: Vec<u32>,
    normals: Vec<Vec3>,
    tangents: Vec<Tangent>,
    uvs: usize,
    colors: usize,
    material: Option<String>,
}

#[derive(Default)]
struct RecordingSink {
    sections: Vec<Section>,
    clears: usize,
}

impl MeshSink for RecordingSink {
    fn clear_all_sections(&mut self) {
        self.sections.clear();
        self.clears += 1;
    }

    fn create_section(&mut self, index: u32, data: SectionData<'_>) {
        self.sections.push(Section {
            index,
            vertices: data.vertices.to_vec(),
            triangles: data.triangles.to_vec(),
            normals: data.normals.to_vec(),
            tangents: data.tangents.to_vec(),
            uvs: data.uvs.len(),
            colors: data.colors.len(),
            material: None,
        });
    }

    fn set_material(&mut self, index: u32, material: &MaterialHandle) {
        let section = self
            .sections
            .iter_mut()
            .find(|s| s.index == index)
            .expect("material for unknown section");
        section.material = Some(material.name().to_string());
    }
}

fn small_config() -> TerrainConfig {
    let mut cfg = TerrainConfig::default();
    cfg.world.chunks = 2;
    cfg.world.chunk_size = 6;
    cfg
}

fn assert_sections_well_formed(sink: &RecordingSink) {
    for (i, s) in sink.sections.iter().enumerate() {
        assert_eq!(s.index, i as u32);
        assert!(!s.vertices.is_empty());
        assert_eq!(s.vertices.len() % 8, 0);
        assert_eq!(s.triangles.len() % 3, 0);
        assert!(s.triangles.iter().all(|&t| (t as usize) < s.vertices.len()));
        assert_eq!(s.normals.len(), s.vertices.len());
        assert_eq!(s.tangents.len(), s.vertices.len());
        assert_eq!((s.uvs, s.colors), (0, 0));
        assert!(s.material.is_some());
    }
}

#[test]
fn sequential_run_emits_numbered_sections() {
    let mut generator = TerrainGenerator::new(small_config());
    let mut sink = RecordingSink::default();
    let report = generator.generate(&mut sink).unwrap();

    assert_eq!(report.chunks, 4);
    assert_eq!(report.sections as usize, sink.sections.len());
    assert_eq!(generator.sections_emitted(), report.sections);
    assert!(report.sections >= 4 && report.sections <= 8);
    assert_eq!(generator.phase(), GenPhase::Done);
    assert!(report.band.is_some());
    assert_sections_well_formed(&sink);

    let cubes: usize = sink.sections.iter().map(|s| s.vertices.len() / 8).sum();
    assert_eq!(cubes, report.water_cubes + report.ground_cubes);
}

#[test]
fn all_water_terrain_uses_water_material() {
    let mut cfg = small_config();
    cfg.water.height = 1.0;
    cfg.mountains.density = 0;
    let mut generator = TerrainGenerator::new(cfg);
    let mut sink = RecordingSink::default();
    let report = generator.generate(&mut sink).unwrap();
    assert_eq!(report.sections, 4);
    assert_eq!(report.ground_cubes, 0);
    assert_eq!(report.fillers, 0);
    assert!(sink.sections.iter().all(|s| s.material.as_deref() == Some("water")));
    // Flat water: every cube sits at the same height.
    let z = sink.sections[0].vertices[0].z;
    assert!(sink.sections.iter().all(|s| s.vertices.iter().all(|v| v.z == z || v.z == z - 100.0)));
}

#[test]
fn all_ground_terrain_uses_ground_material() {
    let mut cfg = small_config();
    cfg.water.height = -1.0;
    cfg.mountains.density = 0;
    cfg.materials.ground = "rock".into();
    let mut generator = TerrainGenerator::new(cfg);
    let mut sink = RecordingSink::default();
    let report = generator.generate(&mut sink).unwrap();
    assert_eq!(report.sections, 4);
    assert_eq!(report.water_cubes, 0);
    assert_eq!(report.band, None);
    assert!(sink.sections.iter().all(|s| s.material.as_deref() == Some("rock")));
}

#[test]
fn parallel_run_matches_sequential() {
    let mut cfg = small_config();
    cfg.world.chunks = 3;
    cfg.water.height = 0.0;
    cfg.mesh.draw_underneath = true;

    let mut seq = RecordingSink::default();
    let seq_report = TerrainGenerator::new(cfg.clone()).generate(&mut seq).unwrap();
    let mut par = RecordingSink::default();
    let par_report = TerrainGenerator::new(cfg).generate_parallel(&mut par).unwrap();

    assert_eq!(seq.sections, par.sections);
    assert_eq!(seq_report.sections, par_report.sections);
    assert_eq!(seq_report.fillers, par_report.fillers);
    assert_eq!(seq_report.faces_emitted, par_report.faces_emitted);
    assert_eq!(seq_report.band, par_report.band);
}

#[test]
fn detailed_lighting_keeps_sections_well_formed() {
    let mut cfg = small_config();
    cfg.mesh.detailed_lighting = true;
    let mut generator = TerrainGenerator::new(cfg);
    let mut sink = RecordingSink::default();
    generator.generate(&mut sink).unwrap();
    assert_sections_well_formed(&sink);
    for s in &sink.sections {
        assert!(s.normals.iter().all(|n| (n.length() - 1.0).abs() < 1e-4));
    }
}

#[test]
fn regenerating_restarts_section_numbering() {
    let mut generator = TerrainGenerator::new(small_config());
    let mut sink = RecordingSink::default();
    generator.generate(&mut sink).unwrap();
    let first = sink.sections.clone();
    generator.generate(&mut sink).unwrap();
    assert_eq!(sink.sections, first);
    assert_eq!(sink.clears, 2);
}

#[test]
fn invalid_config_emits_nothing() {
    let mut cfg = small_config();
    cfg.world.chunks = 40;
    let mut generator = TerrainGenerator::new(cfg);
    let mut sink = RecordingSink::default();
    assert!(generator.generate(&mut sink).is_err());
    assert!(generator.generate_parallel(&mut sink).is_err());
    assert!(sink.sections.is_empty());
    assert_eq!(sink.clears, 0);
    assert_eq!(generator.phase(), GenPhase::Idle);
}

#[test]
fn oversized_chunk_size_fails_before_sampling() {
    let mut cfg = small_config();
    cfg.world.chunks = 1;
    cfg.world.chunk_size = 2_147_483_648;
    let mut generator = TerrainGenerator::new(cfg);
    let mut sink = RecordingSink::default();
    assert!(generator.generate(&mut sink).is_err());
    assert!(generator.generate_parallel(&mut sink).is_err());
    generator.request_generate();
    assert!(generator.apply(&mut sink).is_err());
    assert!(sink.sections.is_empty());
    assert_eq!(generator.band(), None);
}

#[test]
fn apply_without_trigger_does_nothing() {
    let mut generator = TerrainGenerator::new(small_config());
    let mut sink = RecordingSink::default();
    assert_eq!(generator.apply(&mut sink).unwrap(), None);
    assert_eq!(sink.clears, 0);
    assert!(sink.sections.is_empty());
}

#[test]
fn generate_trigger_is_one_shot() {
    let mut generator = TerrainGenerator::new(small_config());
    let mut sink = RecordingSink::default();
    generator.request_generate();
    let report = generator.apply(&mut sink).unwrap();
    assert!(report.is_some());
    assert!(!generator.triggers.generate);
    let count = sink.sections.len();
    assert!(count > 0);

    assert_eq!(generator.apply(&mut sink).unwrap(), None);
    assert_eq!(sink.sections.len(), count);
}

#[test]
fn clear_trigger_wipes_without_generating() {
    let mut generator = TerrainGenerator::new(small_config());
    let mut sink = RecordingSink::default();
    generator.request_generate();
    generator.apply(&mut sink).unwrap();
    assert!(!sink.sections.is_empty());

    generator.request_clear();
    assert_eq!(generator.apply(&mut sink).unwrap(), None);
    assert!(sink.sections.is_empty());
    assert_eq!(generator.triggers, Default::default());
    assert_eq!(generator.sections_emitted(), 0);
    assert_eq!(generator.phase(), GenPhase::Idle);
}

#[test]
fn clear_flag_alone_waits_for_trigger() {
    let mut generator = TerrainGenerator::new(small_config());
    let mut sink = RecordingSink::default();
    generator.triggers.clear = true;
    assert_eq!(generator.apply(&mut sink).unwrap(), None);
    assert_eq!(sink.clears, 0);
    assert!(generator.triggers.clear);
}

#[test]
fn parallel_apply_uses_rayon_path() {
    let mut generator = TerrainGenerator::new(small_config());
    generator.set_parallel(true);
    generator.request_generate();
    let mut par = RecordingSink::default();
    let report = generator.apply(&mut par).unwrap().unwrap();
    assert_eq!(report.sections as usize, par.sections.len());

    let mut seq = RecordingSink::default();
    TerrainGenerator::new(small_config()).generate(&mut seq).unwrap();
    assert_eq!(seq.sections, par.sections);
}

#[test]
fn set_config_drops_stale_calibration() {
    let mut generator = TerrainGenerator::new(small_config());
    let mut sink = RecordingSink::default();
    generator.generate(&mut sink).unwrap();
    assert!(generator.band().is_some());

    let mut cfg = small_config();
    cfg.world.seed = 99;
    generator.set_config(cfg);
    assert_eq!(generator.band(), None);
    assert_eq!(generator.config().world.seed, 99);
    generator.generate(&mut sink).unwrap();
    assert!(generator.band().is_some());
}

#[test]
fn sink_can_be_a_trait_object() {
    let mut generator = TerrainGenerator::new(small_config());
    let mut sink = RecordingSink::default();
    let dyn_sink: &mut dyn MeshSink = &mut sink;
    generator.generate(dyn_sink).unwrap();
    assert!(!sink.sections.is_empty());
}
