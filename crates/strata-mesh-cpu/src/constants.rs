//! Shared constants for strata-mesh-cpu.

/// Corners emitted per cube.
pub const VERTS_PER_CUBE: usize = 8;

/// How many cubes above a lateral neighbor are probed before a side face is
/// considered visible from above. Taller stacks past this depth do not cull.
pub const OCCLUSION_SCAN_DEPTH: i32 = 10;

/// Reserve hint: a surface cube typically keeps its top plus one side face.
pub(crate) const TYPICAL_INDICES_PER_CUBE: usize = 12;
