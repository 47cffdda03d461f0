//! Terrain configuration, height sampling, and mountain calibration.
#![forbid(unsafe_code)]

pub mod calibrate;
pub mod height;
pub mod worldgen;

pub use calibrate::calibrate;
pub use height::{HeightField, MountainBand, NoiseSeeds, round_to_cube};
pub use worldgen::{ConfigError, TerrainConfig, TerrainParams, load_config_from_path};
