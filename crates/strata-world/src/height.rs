use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::worldgen::TerrainParams;

/// Internal seed of the shared Perlin source. Variation between worlds comes
/// from the per-world coordinate offsets in [`NoiseSeeds`].
const PERLIN_SEED: i32 = 1337;

/// Offsets applied to the mountain channel, relative to the base channel.
const MOUNTAIN_OFFSET_FACTOR: i64 = 3;

/// Noise-space offsets derived from the user-facing generation seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoiseSeeds {
    pub x: i32,
    pub y: i32,
}

impl NoiseSeeds {
    pub fn from_seed(seed: i32) -> Self {
        let seed = seed as i64;
        Self {
            x: ((seed * 6607 + 619_823).rem_euclid(1_000_000)) as i32,
            y: ((seed * 2297 + 893_153).rem_euclid(1_000_000)) as i32,
        }
    }
}

/// Calibrated mountain-noise thresholds. Mountains start above `low` and
/// reach their plateau at `high`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MountainBand {
    pub low: f32,
    pub high: f32,
}

impl MountainBand {
    /// Height multiplier for a mountain-noise sample; `1.0` outside the band.
    #[inline]
    pub fn factor(&self, mountain: f32, mountain_scale: f32) -> f32 {
        if mountain <= self.low {
            return 1.0;
        }
        let span = self.high - self.low;
        // A collapsed band counts as fully inside the mountain.
        let t = if mountain < self.high && span > 0.0 {
            smoothstep((mountain - self.low) / span)
        } else {
            1.0
        };
        1.0 + t * mountain_scale * 2.0
    }
}

#[inline]
pub fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Rounds a noise height into whole cube units (round half up).
#[inline]
pub fn round_to_cube(value: f32, world_scale: f32) -> i32 {
    (value * world_scale + 0.5).floor() as i32
}

/// Pure height sampler shared by interior, border, and calibration passes.
pub struct HeightField {
    noise: FastNoiseLite,
    seeds: NoiseSeeds,
    noise_scale: f32,
    base_noise_multiplier: f32,
    mountain_scale: f32,
}

impl HeightField {
    pub fn new(
        seeds: NoiseSeeds,
        noise_scale: f32,
        base_noise_multiplier: f32,
        mountain_scale: f32,
    ) -> Self {
        let mut noise = FastNoiseLite::with_seed(PERLIN_SEED);
        noise.set_noise_type(Some(NoiseType::Perlin));
        // Coordinates arrive pre-scaled by noise_scale.
        noise.set_frequency(Some(1.0));
        Self {
            noise,
            seeds,
            noise_scale,
            base_noise_multiplier,
            mountain_scale,
        }
    }

    pub fn from_params(params: &TerrainParams) -> Self {
        Self::new(
            params.seeds,
            params.noise_scale,
            params.base_noise_multiplier,
            params.mountain_scale,
        )
    }

    #[inline]
    fn sample(&self, x: i32, y: i32, ox: i64, oy: i64) -> f32 {
        let scale = self.noise_scale as f64;
        let nx = ((x as i64 + ox) as f64 * scale) as f32;
        let ny = ((y as i64 + oy) as f64 * scale) as f32;
        self.noise.get_noise_2d(nx, ny)
    }

    /// Raw base channel in roughly `[-1, 1]`.
    #[inline]
    pub fn base_noise(&self, x: i32, y: i32) -> f32 {
        self.sample(x, y, self.seeds.x as i64, self.seeds.y as i64)
    }

    /// Raw mountain channel, offset three seed-lengths from the base channel.
    #[inline]
    pub fn mountain_noise(&self, x: i32, y: i32) -> f32 {
        self.sample(
            x,
            y,
            self.seeds.x as i64 * MOUNTAIN_OFFSET_FACTOR,
            self.seeds.y as i64 * MOUNTAIN_OFFSET_FACTOR,
        )
    }

    /// Terrain height at `(x, y)` before cube rounding. `band` is `None` when
    /// mountains are disabled.
    pub fn height(&self, x: i32, y: i32, band: Option<MountainBand>) -> f32 {
        let base = self.base_noise(x, y) * self.base_noise_multiplier;
        match band {
            Some(band) => {
                base * band.factor(self.mountain_noise(x, y), self.mountain_scale)
            }
            None => base,
        }
    }
}
