use hashbrown::{HashMap, HashSet};

use crate::{Column, LayerSet};

const NEIGHBORS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Top height per `(x, y)` across ground, water and border columns.
fn surface_map(layers: &LayerSet, border: &[Column]) -> HashMap<(i32, i32), i32> {
    let mut map = HashMap::with_capacity(
        layers.ground.columns.len() + layers.water.columns.len() + border.len(),
    );
    for c in layers
        .ground
        .columns
        .iter()
        .chain(&layers.water.columns)
        .chain(border)
    {
        map.entry((c.x, c.y))
            .and_modify(|z: &mut i32| *z = (*z).max(c.z))
            .or_insert(c.z);
    }
    map
}

/// Lowest of the four lateral neighbors, never below `min_depth`. Missing
/// neighbors are ignored; with none present the floor is `min_depth`.
#[inline]
fn lowest_neighbor(map: &HashMap<(i32, i32), i32>, c: Column, min_depth: i32) -> i32 {
    NEIGHBORS
        .iter()
        .filter_map(|&(dx, dy)| map.get(&(c.x + dx, c.y + dy)).copied())
        .min()
        .unwrap_or(min_depth)
        .max(min_depth)
}

/// Stacks filler columns under every ground column that stands more than one
/// cube above its lowest neighbor, so terrain steps read as solid walls.
///
/// Fillers go at `(x, y, lowest + 1) ..= (x, y, z - 1)`. The neighbor map is
/// built before any filler is added, and fillers already present in the
/// ground layer are not duplicated. Returns the number of columns added.
pub fn fill_gaps(layers: &mut LayerSet, border: &[Column], min_depth: i32) -> usize {
    let map = surface_map(layers, border);
    let mut present: HashSet<Column> = layers.ground.columns.iter().copied().collect();
    let mut fillers = Vec::new();

    for &c in &layers.ground.columns {
        let lowest = lowest_neighbor(&map, c, min_depth);
        for z in (lowest + 1)..c.z {
            let filler = Column::new(c.x, c.y, z);
            if present.insert(filler) {
                fillers.push(filler);
            }
        }
    }

    let added = fillers.len();
    log::trace!(
        "gap fill: {} fillers under {} ground columns (border {})",
        added,
        layers.ground.columns.len(),
        border.len()
    );
    layers.ground.columns.append(&mut fillers);
    added
}
