//! CPU cube mesher: per-column cube emission with face culling.
#![forbid(unsafe_code)]

mod build;
pub mod constants;
pub mod face;

pub use build::{
    MeshStats, Occupancy, add_cube, build_layer_mesh, build_layer_triangles, cube_corners,
};
pub use constants::{OCCLUSION_SCAN_DEPTH, VERTS_PER_CUBE};
pub use face::Face;
