use strata_chunk::Column;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    PosZ = 0,
    NegY = 1,
    NegX = 2,
    PosY = 3,
    PosX = 4,
    NegZ = 5,
}

impl Face {
    /// Emission order; the underside comes last so it can be skipped.
    pub const ORDER: [Face; 6] = [
        Face::PosZ,
        Face::NegY,
        Face::NegX,
        Face::PosY,
        Face::PosX,
        Face::NegZ,
    ];

    /// Returns the integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosZ => (0, 0, 1),
            Face::NegY => (0, -1, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosY => (0, 1, 0),
            Face::PosX => (1, 0, 0),
            Face::NegZ => (0, 0, -1),
        }
    }

    /// Side faces are the four with no vertical component.
    #[inline]
    pub fn is_lateral(self) -> bool {
        self.delta().2 == 0
    }

    /// The column that would cover this face.
    #[inline]
    pub fn neighbor(self, c: Column) -> Column {
        let (dx, dy, dz) = self.delta();
        c.offset(dx, dy, dz)
    }

    /// Two triangles as corner indices into the cube's 8 vertices
    /// (see [`crate::cube_corners`] for the corner order).
    #[inline]
    pub fn triangles(self) -> [[u32; 3]; 2] {
        match self {
            Face::PosZ => [[0, 1, 2], [1, 3, 2]],
            Face::NegY => [[4, 0, 5], [0, 2, 5]],
            Face::NegX => [[6, 1, 4], [1, 0, 4]],
            Face::PosY => [[7, 3, 6], [3, 1, 6]],
            Face::PosX => [[5, 2, 7], [2, 3, 7]],
            Face::NegZ => [[5, 6, 4], [6, 5, 7]],
        }
    }
}
