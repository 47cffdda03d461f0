use hashbrown::HashSet;
use proptest::prelude::*;
use strata_chunk::{ChunkCoord, Column, ColumnSampler, LayerSet, fill_gaps};
use strata_world::{
    HeightField, MountainBand, TerrainConfig, TerrainParams, calibrate, round_to_cube,
};

fn params(seed: i32, chunk_size: u32, density: u32, water: f32) -> TerrainParams {
    let mut cfg = TerrainConfig::default();
    cfg.world.seed = seed;
    cfg.world.chunk_size = chunk_size;
    cfg.world.chunks = 2;
    cfg.mountains.density = density;
    cfg.water.height = water;
    TerrainParams::from_config(&cfg)
}

fn build_chunk(
    p: &TerrainParams,
    field: &HeightField,
    band: Option<MountainBand>,
    coord: ChunkCoord,
) -> (LayerSet, Vec<Column>) {
    let sampler = ColumnSampler::new(field, band, p);
    let mut layers = LayerSet::default();
    let mut border = Vec::new();
    sampler.voxelize(coord, &mut layers);
    sampler.stitch_border(coord, &mut border);
    (layers, border)
}

#[test]
fn flat_noise_scenario_matches_base_channel() {
    let p = params(512, 2, 0, -0.1);
    let field = HeightField::from_params(&p);
    let band = calibrate(&field, p.chunk_size, 1, p.mountain_density);
    assert!(band.is_none());
    let (layers, _) = build_chunk(&p, &field, band, ChunkCoord::new(0, 0));
    assert_eq!(layers.water.columns.len() + layers.ground.columns.len(), 9);
    for c in &layers.ground.columns {
        let expect = round_to_cube(field.base_noise(c.x, c.y) * 0.2, 100.0);
        assert_eq!(c.z, expect);
    }
    for c in &layers.water.columns {
        assert!(field.base_noise(c.x, c.y) * 0.2 < -0.1);
        assert_eq!(c.z, -10);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    // Water and ground never share an (x, y) inside one chunk
    #[test]
    fn layers_are_disjoint(
        seed in 1i32..=10_000,
        cx in -3i32..3,
        cy in -3i32..3,
        water in -0.2f32..0.2,
        density in 0u32..=100,
    ) {
        let p = params(seed, 6, density, water);
        let field = HeightField::from_params(&p);
        let band = calibrate(&field, p.chunk_size, p.chunks, p.mountain_density);
        let (layers, _) = build_chunk(&p, &field, band, ChunkCoord::new(cx, cy));
        let water_xy: HashSet<(i32, i32)> = layers.water.columns.iter().map(|c| (c.x, c.y)).collect();
        for c in &layers.ground.columns {
            prop_assert!(!water_xy.contains(&(c.x, c.y)));
        }
        prop_assert_eq!(water_xy.len() + layers.ground.columns.len(), 49);
    }

    // After filling, a second pass adds nothing
    #[test]
    fn gap_filling_is_idempotent(
        seed in 1i32..=10_000,
        cx in -3i32..3,
        cy in -3i32..3,
        density in 0u32..=100,
    ) {
        let p = params(seed, 8, density, -0.1);
        let field = HeightField::from_params(&p);
        let band = calibrate(&field, p.chunk_size, p.chunks, p.mountain_density);
        let (mut layers, border) = build_chunk(&p, &field, band, ChunkCoord::new(cx, cy));
        fill_gaps(&mut layers, &border, p.min_depth());
        let snapshot = layers.ground.columns.clone();
        prop_assert_eq!(fill_gaps(&mut layers, &border, p.min_depth()), 0);
        prop_assert_eq!(&layers.ground.columns, &snapshot);
    }

    // Filling never touches water and only adds below existing ground tops
    #[test]
    fn fillers_stay_under_their_column(
        seed in 1i32..=10_000,
        cx in -3i32..3,
        cy in -3i32..3,
    ) {
        let p = params(seed, 8, 30, -0.1);
        let field = HeightField::from_params(&p);
        let band = calibrate(&field, p.chunk_size, p.chunks, p.mountain_density);
        let (mut layers, border) = build_chunk(&p, &field, band, ChunkCoord::new(cx, cy));
        let originals = layers.ground.columns.len();
        let water = layers.water.columns.clone();
        let added = fill_gaps(&mut layers, &border, p.min_depth());
        prop_assert_eq!(layers.ground.columns.len(), originals + added);
        prop_assert_eq!(&layers.water.columns, &water);
        let tops: hashbrown::HashMap<(i32, i32), i32> = layers.ground.columns[..originals]
            .iter()
            .map(|c| ((c.x, c.y), c.z))
            .collect();
        for f in &layers.ground.columns[originals..] {
            let top = tops[&(f.x, f.y)];
            prop_assert!(f.z < top && f.z > p.min_depth());
        }
    }
}
