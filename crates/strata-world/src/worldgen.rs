use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::height::{NoiseSeeds, round_to_cube};

pub const CHUNKS_RANGE: (u32, u32) = (1, 18);
pub const SEED_RANGE: (i32, i32) = (1, 10_000);
pub const CHUNK_SIZE_RANGE: (u32, u32) = (1, 256);
pub const MOUNTAIN_DENSITY_RANGE: (u32, u32) = (0, 100);
pub const MOUNTAIN_SCALE_RANGE: (f32, f32) = (1.0, 100.0);
pub const WATER_HEIGHT_RANGE: (f32, f32) = (-1.0, 1.0);

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct TerrainConfig {
    #[serde(default)]
    pub world: World,
    #[serde(default)]
    pub mountains: Mountains,
    #[serde(default)]
    pub water: Water,
    #[serde(default)]
    pub mesh: Mesh,
    #[serde(default)]
    pub materials: Materials,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct World {
    #[serde(default = "default_chunks")]
    pub chunks: u32,
    #[serde(default = "default_seed")]
    pub seed: i32,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u32,
    #[serde(default = "default_noise_scale")]
    pub noise_scale: f32,
    #[serde(default = "default_base_multiplier")]
    pub base_noise_multiplier: f32,
    #[serde(default = "default_world_scale")]
    pub world_scale: f32,
}
fn default_chunks() -> u32 {
    6
}
fn default_seed() -> i32 {
    512
}
fn default_chunk_size() -> u32 {
    32
}
fn default_noise_scale() -> f32 {
    0.008
}
fn default_base_multiplier() -> f32 {
    0.2
}
fn default_world_scale() -> f32 {
    100.0
}
impl Default for World {
    fn default() -> Self {
        Self {
            chunks: default_chunks(),
            seed: default_seed(),
            chunk_size: default_chunk_size(),
            noise_scale: default_noise_scale(),
            base_noise_multiplier: default_base_multiplier(),
            world_scale: default_world_scale(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Mountains {
    /// Percentage of the terrain extent raised into mountains.
    #[serde(default = "default_density")]
    pub density: u32,
    #[serde(default = "default_mountain_scale")]
    pub scale: f32,
}
fn default_density() -> u32 {
    20
}
fn default_mountain_scale() -> f32 {
    3.0
}
impl Default for Mountains {
    fn default() -> Self {
        Self {
            density: default_density(),
            scale: default_mountain_scale(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Water {
    #[serde(default = "default_water_height")]
    pub height: f32,
}
fn default_water_height() -> f32 {
    -0.1
}
impl Default for Water {
    fn default() -> Self {
        Self {
            height: default_water_height(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Mesh {
    #[serde(default)]
    pub draw_underneath: bool,
    #[serde(default)]
    pub detailed_lighting: bool,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Materials {
    #[serde(default = "default_water_material")]
    pub water: String,
    #[serde(default = "default_ground_material")]
    pub ground: String,
}
fn default_water_material() -> String {
    "water".into()
}
fn default_ground_material() -> String {
    "earth".into()
}
impl Default for Materials {
    fn default() -> Self {
        Self {
            water: default_water_material(),
            ground: default_ground_material(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    InvalidScale(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{field} = {value} is outside [{min}, {max}]"),
            ConfigError::InvalidScale(field) => {
                write!(f, "{field} must be a finite value greater than zero")
            }
        }
    }
}

impl Error for ConfigError {}

fn check_range<T: Into<f64> + PartialOrd + Copy>(
    field: &'static str,
    value: T,
    (min, max): (T, T),
) -> Result<(), ConfigError> {
    // NaN fails both comparisons and lands here too.
    let inside = value >= min && value <= max;
    if !inside {
        return Err(ConfigError::OutOfRange {
            field,
            value: value.into(),
            min: min.into(),
            max: max.into(),
        });
    }
    Ok(())
}

fn check_scale(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidScale(field))
    }
}

impl TerrainConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: TerrainConfig = toml::from_str(s)?;
        Ok(cfg)
    }

    /// Rejects any value outside the ranges the editor would allow.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("world.chunks", self.world.chunks, CHUNKS_RANGE)?;
        check_range("world.seed", self.world.seed, SEED_RANGE)?;
        check_range("world.chunk_size", self.world.chunk_size, CHUNK_SIZE_RANGE)?;
        check_range(
            "mountains.density",
            self.mountains.density,
            MOUNTAIN_DENSITY_RANGE,
        )?;
        check_range("mountains.scale", self.mountains.scale, MOUNTAIN_SCALE_RANGE)?;
        check_range("water.height", self.water.height, WATER_HEIGHT_RANGE)?;
        check_scale("world.noise_scale", self.world.noise_scale)?;
        check_scale("world.world_scale", self.world.world_scale)?;
        if !self.world.base_noise_multiplier.is_finite() {
            return Err(ConfigError::InvalidScale("world.base_noise_multiplier"));
        }
        Ok(())
    }

    /// Copy with every ranged field clamped into its allowed interval.
    pub fn clamped(&self) -> Self {
        let mut c = self.clone();
        c.world.chunks = c.world.chunks.clamp(CHUNKS_RANGE.0, CHUNKS_RANGE.1);
        c.world.seed = c.world.seed.clamp(SEED_RANGE.0, SEED_RANGE.1);
        c.world.chunk_size = c
            .world
            .chunk_size
            .clamp(CHUNK_SIZE_RANGE.0, CHUNK_SIZE_RANGE.1);
        c.mountains.density = c
            .mountains
            .density
            .clamp(MOUNTAIN_DENSITY_RANGE.0, MOUNTAIN_DENSITY_RANGE.1);
        c.mountains.scale = clamp_f32(c.mountains.scale, MOUNTAIN_SCALE_RANGE);
        c.water.height = clamp_f32(c.water.height, WATER_HEIGHT_RANGE);
        c
    }
}

fn clamp_f32(v: f32, (min, max): (f32, f32)) -> f32 {
    if v.is_nan() { min } else { v.clamp(min, max) }
}

pub fn load_config_from_path(path: &Path) -> Result<TerrainConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    TerrainConfig::from_toml_str(&s)
}

// Flattened params used in tight loops (snapshot of config)
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainParams {
    pub chunks: u32,
    pub chunk_size: u32,
    pub seeds: NoiseSeeds,
    pub noise_scale: f32,
    pub base_noise_multiplier: f32,
    pub world_scale: f32,
    pub mountain_density: u32,
    pub mountain_scale: f32,
    pub water_height: f32,
    /// Canonical cube height of every water column.
    pub water_level: i32,
    pub draw_underneath: bool,
    pub detailed_lighting: bool,
    pub water_material: String,
    pub ground_material: String,
}

impl TerrainParams {
    pub fn from_config(cfg: &TerrainConfig) -> Self {
        Self {
            chunks: cfg.world.chunks,
            chunk_size: cfg.world.chunk_size,
            seeds: NoiseSeeds::from_seed(cfg.world.seed),
            noise_scale: cfg.world.noise_scale,
            base_noise_multiplier: cfg.world.base_noise_multiplier,
            world_scale: cfg.world.world_scale,
            mountain_density: cfg.mountains.density,
            mountain_scale: cfg.mountains.scale,
            water_height: cfg.water.height,
            water_level: round_to_cube(cfg.water.height, cfg.world.world_scale),
            draw_underneath: cfg.mesh.draw_underneath,
            detailed_lighting: cfg.mesh.detailed_lighting,
            water_material: cfg.materials.water.clone(),
            ground_material: cfg.materials.ground.clone(),
        }
    }

    /// Lowest height gap filling may reach; matches the water level.
    #[inline]
    pub fn min_depth(&self) -> i32 {
        self.water_level
    }
}
