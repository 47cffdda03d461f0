use serde::Serialize;
use strata_geom::{Aabb, Vec3};
use strata_runtime::{MaterialHandle, MeshSink, RunReport, SectionData};

/// Per-section digest kept by [`SummarySink`].
#[derive(Clone, Debug, Serialize)]
pub struct SectionSummary {
    pub index: u32,
    pub material: String,
    pub vertices: usize,
    pub triangles: usize,
    pub min: [f32; 3],
    pub max: [f32; 3],
}

#[derive(Debug, Default, Serialize)]
pub struct TerrainSummary {
    pub chunks: usize,
    pub water_cubes: usize,
    pub ground_cubes: usize,
    pub fillers: usize,
    pub faces_emitted: usize,
    pub faces_culled: usize,
    pub mountain_low: Option<f32>,
    pub mountain_high: Option<f32>,
    pub total_ms: u64,
    pub sections: Vec<SectionSummary>,
}

fn arr(v: Vec3) -> [f32; 3] {
    [v.x, v.y, v.z]
}

/// Mesh sink that keeps only sizes and bounds and logs each section.
#[derive(Default)]
pub struct SummarySink {
    sections: Vec<SectionSummary>,
    bounds: Option<Aabb>,
}

impl SummarySink {
    pub fn sections(&self) -> &[SectionSummary] {
        &self.sections
    }

    /// World bounds across every section received so far.
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    pub fn into_summary(self, report: &RunReport) -> TerrainSummary {
        TerrainSummary {
            chunks: report.chunks,
            water_cubes: report.water_cubes,
            ground_cubes: report.ground_cubes,
            fillers: report.fillers,
            faces_emitted: report.faces_emitted,
            faces_culled: report.faces_culled,
            mountain_low: report.band.map(|b| b.low),
            mountain_high: report.band.map(|b| b.high),
            total_ms: report.t_total.as_millis().min(u128::from(u64::MAX)) as u64,
            sections: self.sections,
        }
    }
}

impl MeshSink for SummarySink {
    fn clear_all_sections(&mut self) {
        self.sections.clear();
        self.bounds = None;
    }

    fn create_section(&mut self, index: u32, data: SectionData<'_>) {
        let Some(bb) = Aabb::from_points(data.vertices) else {
            log::warn!("section {} has no vertices", index);
            return;
        };
        match self.bounds.as_mut() {
            Some(all) => {
                all.include(bb.min);
                all.include(bb.max);
            }
            None => self.bounds = Some(bb),
        }
        log::debug!(
            "section {}: verts={} tris={} extent={:?}",
            index,
            data.vertices.len(),
            data.triangles.len() / 3,
            bb.extent()
        );
        self.sections.push(SectionSummary {
            index,
            material: String::new(),
            vertices: data.vertices.len(),
            triangles: data.triangles.len() / 3,
            min: arr(bb.min),
            max: arr(bb.max),
        });
    }

    fn set_material(&mut self, index: u32, material: &MaterialHandle) {
        if let Some(s) = self.sections.iter_mut().rev().find(|s| s.index == index) {
            s.material = material.name().to_string();
        }
    }
}
