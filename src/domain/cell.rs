/// Cell content tags and their properties.
/// Properties are queried via methods, not stored as flags,
/// so cell semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cell {
    Empty,
    Player,
    Robot,
    Hole,
    Bomb,
}

impl Cell {
    /// Is this a hazard tile placed at board generation?
    #[allow(dead_code)]
    pub fn is_hazard(self) -> bool {
        matches!(self, Cell::Hole | Cell::Bomb)
    }

    /// Is this cell occupied by a game entity (player or robot)?
    #[allow(dead_code)]
    pub fn is_entity(self) -> bool {
        matches!(self, Cell::Player | Cell::Robot)
    }

    /// Can the player move into this cell?
    pub fn is_open(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Empty
    }
}
