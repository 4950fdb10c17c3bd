/// Entities: the robot roster slot and the player's move intent.

use super::grid::Pos;

/// One slot in the fixed-capacity robot roster.
///
/// A destroyed robot becomes `Inactive` and never respawns for the rest of
/// the round. (The original encoded this as a (-1,-1) sentinel position;
/// the tagged variant removes the magic value.)
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Robot {
    Active(Pos),
    Inactive,
}

impl Robot {
    pub fn is_active(self) -> bool {
        matches!(self, Robot::Active(_))
    }

    pub fn pos(self) -> Option<Pos> {
        match self {
            Robot::Active(p) => Some(p),
            Robot::Inactive => None,
        }
    }
}

/// A decoded player move for one turn: eight compass directions plus Stay.
///
/// Stay relocates nothing but still costs a turn (the robots move).
/// Decoding raw key events into an intent is the UI's job.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveIntent {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    Stay,
}

impl MoveIntent {
    /// Per-axis deltas, evaluated independently (diagonals are just
    /// both axes at once).
    pub fn delta(self) -> (i32, i32) {
        let dx = match self {
            MoveIntent::Left | MoveIntent::UpLeft | MoveIntent::DownLeft => -1,
            MoveIntent::Right | MoveIntent::UpRight | MoveIntent::DownRight => 1,
            _ => 0,
        };
        let dy = match self {
            MoveIntent::Up | MoveIntent::UpLeft | MoveIntent::UpRight => -1,
            MoveIntent::Down | MoveIntent::DownLeft | MoveIntent::DownRight => 1,
            _ => 0,
        };
        (dx, dy)
    }
}
