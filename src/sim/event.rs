/// Events emitted during turn resolution.
/// The presentation layer consumes these for status messages.

use crate::domain::grid::Pos;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(dead_code)]
pub enum TurnEvent {
    /// A robot stepped on a bomb; both are gone.
    RobotBombed { at: Pos },
    /// A robot fell into a hole; the hole remains.
    RobotFell { at: Pos },
    /// A robot walked into another robot and was destroyed.
    RobotsCollided { at: Pos },
    /// A robot caught the player.
    PlayerHit { lives_left: u32 },
    GameWon,
    GameLost,
}
