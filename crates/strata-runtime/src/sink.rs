use strata_chunk::TerrainLayer;
use strata_geom::{Tangent, Vec3};

/// Opaque material reference handed through to the sink untouched.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub String);

impl MaterialHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Borrowed arrays of one finished mesh section. UVs and colors are always
/// empty.
#[derive(Clone, Copy, Debug)]
pub struct SectionData<'a> {
    pub vertices: &'a [Vec3],
    pub triangles: &'a [u32],
    pub normals: &'a [Vec3],
    pub uvs: &'a [[f32; 2]],
    pub colors: &'a [[u8; 4]],
    pub tangents: &'a [Tangent],
}

impl<'a> SectionData<'a> {
    pub fn from_layer(layer: &'a TerrainLayer) -> Self {
        Self {
            vertices: &layer.vertices,
            triangles: &layer.triangles,
            normals: &layer.normals,
            uvs: &[],
            colors: &[],
            tangents: &layer.tangents,
        }
    }
}

/// Receives generated geometry, one numbered section per non-empty layer.
pub trait MeshSink {
    fn clear_all_sections(&mut self);
    fn create_section(&mut self, index: u32, data: SectionData<'_>);
    fn set_material(&mut self, index: u32, material: &MaterialHandle);
}
