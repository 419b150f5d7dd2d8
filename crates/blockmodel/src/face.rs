use glam::Vec3;

/// Face direction for cube faces.
///
/// `ALL` fixes the canonical slot order shared by [`crate::FaceMaterials`]
/// and the unit-cube geometry template; both sides index faces through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    East,  // +X
    West,  // -X
    Up,    // +Y
    Down,  // -Y
    North, // -Z
    South, // +Z
}

impl Face {
    /// All six faces in canonical slot order
    pub const ALL: [Face; 6] = [
        Face::East,
        Face::West,
        Face::Up,
        Face::Down,
        Face::North,
        Face::South,
    ];

    /// Slot index of this face in `ALL`
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Face::East => 0,
            Face::West => 1,
            Face::Up => 2,
            Face::Down => 3,
            Face::North => 4,
            Face::South => 5,
        }
    }

    /// Face name as used by model-definition face maps
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            Face::East => "east",
            Face::West => "west",
            Face::Up => "up",
            Face::Down => "down",
            Face::North => "north",
            Face::South => "south",
        }
    }

    /// Get the normal vector for this face
    #[inline]
    pub fn normal(self) -> Vec3 {
        match self {
            Face::East => Vec3::new(1.0, 0.0, 0.0),
            Face::West => Vec3::new(-1.0, 0.0, 0.0),
            Face::Up => Vec3::new(0.0, 1.0, 0.0),
            Face::Down => Vec3::new(0.0, -1.0, 0.0),
            Face::North => Vec3::new(0.0, 0.0, -1.0),
            Face::South => Vec3::new(0.0, 0.0, 1.0),
        }
    }

    /// Get the four unit-cube vertices for this face in counter-clockwise
    /// order when viewed from outside
    #[inline]
    pub fn vertices(self) -> [[f32; 3]; 4] {
        match self {
            Face::East => [
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [1.0, 1.0, 1.0],
                [1.0, 0.0, 1.0],
            ],
            Face::West => [
                [0.0, 0.0, 1.0],
                [0.0, 1.0, 1.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0],
            ],
            Face::Up => [
                [0.0, 1.0, 0.0],
                [0.0, 1.0, 1.0],
                [1.0, 1.0, 1.0],
                [1.0, 1.0, 0.0],
            ],
            Face::Down => [
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 0.0, 1.0],
                [0.0, 0.0, 1.0],
            ],
            Face::North => [
                [0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [1.0, 1.0, 0.0],
                [1.0, 0.0, 0.0],
            ],
            Face::South => [
                [1.0, 0.0, 1.0],
                [1.0, 1.0, 1.0],
                [0.0, 1.0, 1.0],
                [0.0, 0.0, 1.0],
            ],
        }
    }

    /// Get UV coordinates matching the vertex order
    #[inline]
    pub fn uvs(self) -> [[f32; 2]; 4] {
        match self {
            Face::Down => [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            _ => [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]],
        }
    }

    /// Iterator over all faces in slot order
    #[inline]
    pub fn iter() -> impl Iterator<Item = Face> {
        Self::ALL.iter().copied()
    }
}
