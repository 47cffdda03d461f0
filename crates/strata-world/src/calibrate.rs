use std::time::Instant;

use crate::height::{HeightField, MountainBand};

/// Rank of the `percent`-th percentile in an ascending list of `n` samples.
#[inline]
fn percentile_rank(percent: u32, n: usize) -> usize {
    let ratio = percent.min(100) as f64 / 100.0;
    (ratio * (n - 1) as f64).floor() as usize
}

/// Converts a mountain density percentage into absolute mountain-noise
/// thresholds by sampling the mountain channel over the whole terrain extent
/// (`chunks * chunk_size` columns per axis, starting at the origin).
///
/// Returns `None` when mountains are disabled (`density == 0`) or the extent
/// is empty; height queries then skip biasing entirely.
pub fn calibrate(
    field: &HeightField,
    chunk_size: u32,
    chunks: u32,
    density: u32,
) -> Option<MountainBand> {
    if density == 0 {
        return None;
    }
    let t0 = Instant::now();
    let extent = (chunks as usize) * (chunk_size as usize);
    if extent == 0 {
        return None;
    }
    let mut values = Vec::with_capacity(extent * extent);
    for x in 0..extent as i32 {
        for y in 0..extent as i32 {
            values.push(field.mountain_noise(x, y));
        }
    }
    values.sort_unstable_by(f32::total_cmp);

    let density = density.min(100);
    let n = values.len();
    let low = values[percentile_rank(100 - density, n)];
    // Plateau starts at a fifth of the density, counted in whole percent.
    let high = values[percentile_rank(100 - density / 5, n)];
    log::info!(
        "mountain calibration: {} samples, density {}% -> band [{:.4}, {:.4}] in {:.1?}",
        n,
        density,
        low,
        high,
        t0.elapsed()
    );
    Some(MountainBand { low, high })
}
