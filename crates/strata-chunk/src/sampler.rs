use strata_world::{HeightField, MountainBand, TerrainParams, round_to_cube};

use crate::{ChunkCoord, Column, LayerSet};

/// Samples the height field for one chunk: its interior columns and the ring
/// of border columns just outside it.
pub struct ColumnSampler<'f> {
    field: &'f HeightField,
    band: Option<MountainBand>,
    chunk_size: i32,
    world_scale: f32,
    water_height: f32,
    water_level: i32,
}

impl<'f> ColumnSampler<'f> {
    pub fn new(field: &'f HeightField, band: Option<MountainBand>, params: &TerrainParams) -> Self {
        Self {
            field,
            band,
            chunk_size: params.chunk_size as i32,
            world_scale: params.world_scale,
            water_height: params.water_height,
            water_level: params.water_level,
        }
    }

    /// Raw (unclassified) height at a grid position, in cube units.
    #[inline]
    pub fn cube_height(&self, x: i32, y: i32) -> i32 {
        round_to_cube(self.field.height(x, y, self.band), self.world_scale)
    }

    /// Appends every column of the chunk to the water or ground layer.
    ///
    /// Covers `[0, chunk_size]` inclusive on both axes, so the last row and
    /// column overlap the next chunk's first.
    pub fn voxelize(&self, coord: ChunkCoord, layers: &mut LayerSet) {
        let (x0, y0) = coord.origin(self.chunk_size);
        for x in 0..=self.chunk_size {
            for y in 0..=self.chunk_size {
                let wx = x0 + x;
                let wy = y0 + y;
                let h = self.field.height(wx, wy, self.band);
                if h < self.water_height {
                    layers.water.columns.push(Column::new(wx, wy, self.water_level));
                } else {
                    let z = round_to_cube(h, self.world_scale);
                    layers.ground.columns.push(Column::new(wx, wy, z));
                }
            }
        }
    }

    /// Fills `border` with the columns one step outside each chunk edge.
    ///
    /// Border columns keep their raw height (no water flattening); they only
    /// inform gap filling and are never meshed.
    pub fn stitch_border(&self, coord: ChunkCoord, border: &mut Vec<Column>) {
        let (x0, y0) = coord.origin(self.chunk_size);
        let x1 = x0 + self.chunk_size;
        let y1 = y0 + self.chunk_size;
        let (x_min, x_max) = (x0 - 1, x1 + 1);
        let (y_min, y_max) = (y0 - 1, y1 + 1);

        for x in x0..=x1 {
            border.push(Column::new(x, y_min, self.cube_height(x, y_min)));
            border.push(Column::new(x, y_max, self.cube_height(x, y_max)));
        }
        for y in y0..=y1 {
            border.push(Column::new(x_min, y, self.cube_height(x_min, y)));
            border.push(Column::new(x_max, y, self.cube_height(x_max, y)));
        }
    }
}
