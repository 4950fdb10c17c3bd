/// Turn resolution: one player move plus one full robot sweep, atomically.
///
/// Turn order contract (inherited from the original game, preserved
/// exactly): the robot sweep resolves against the player's grid cell
/// BEFORE the player's relocation is written back. A robot stepping onto
/// the cell the player is about to leave therefore still collides with
/// the player.

use crate::domain::cell::Cell;
use crate::domain::entity::{MoveIntent, Robot};
use crate::domain::grid::Pos;
use super::event::TurnEvent;
use super::world::{Phase, WorldState};

/// Score reward for completing a legal move.
const MOVE_REWARD: i32 = 1;
/// Score reward when a robot destroys itself on a hazard or another robot.
const ROBOT_DESTROYED_REWARD: i32 = 10;
/// Score penalty when a robot catches the player.
const PLAYER_HIT_PENALTY: i32 = 10;

// ══════════════════════════════════════════════════════════════
// Player move
// ══════════════════════════════════════════════════════════════

/// Resolve one turn. Returns the events of the turn; the outcome is
/// readable from `world.phase`.
pub fn apply_player_move(world: &mut WorldState, intent: MoveIntent) -> Vec<TurnEvent> {
    if world.phase != Phase::Playing {
        return vec![];
    }

    let (dx, dy) = intent.delta();
    let dest = Pos::new(world.player.x + dx, world.player.y + dy);

    // Stay is always legal; any other intent needs an in-bounds empty
    // destination. An illegal move costs nothing: no score, no sweep.
    let legal = intent == MoveIntent::Stay
        || (world.grid.in_bounds(dest) && world.grid.get(dest).is_open());
    if !legal {
        return vec![];
    }

    world.turn += 1;
    world.score += MOVE_REWARD;

    let mut events = Vec::new();
    robot_sweep(world, &mut events);

    // Relocate the player only now (see turn order contract above).
    // Runs even when the sweep ended the round, as in the original.
    world.grid.set(world.player, Cell::Empty);
    world.grid.set(dest, Cell::Player);
    world.player = dest;

    events
}

// ══════════════════════════════════════════════════════════════
// Robot sweep
// ══════════════════════════════════════════════════════════════

/// Advance every active robot one step toward the player and resolve the
/// destination collision, in roster order. A hit that exhausts the
/// player's lives short-circuits the sweep; the win condition is not
/// evaluated that turn.
fn robot_sweep(world: &mut WorldState, events: &mut Vec<TurnEvent>) {
    // The player has not vacated this cell yet.
    let target = world.player;
    let mut survivors = 0;

    for i in 0..world.robots.len() {
        let pos = match world.robots[i].pos() {
            Some(p) => p,
            None => continue,
        };

        // One cell toward the player, each axis independent. The player is
        // in bounds and the step is clamped to ±1, so the destination is
        // always in bounds too.
        let dest = pos.step_toward(target);

        // Vacate unconditionally; the destination decides whether the
        // robot survives to occupy a new cell.
        world.grid.set(pos, Cell::Empty);

        match world.grid.get(dest) {
            Cell::Bomb => {
                world.grid.set(dest, Cell::Empty);
                world.robots[i] = Robot::Inactive;
                world.score += ROBOT_DESTROYED_REWARD;
                events.push(TurnEvent::RobotBombed { at: dest });
            }
            Cell::Hole => {
                // The hole stays; only the robot is gone.
                world.robots[i] = Robot::Inactive;
                world.score += ROBOT_DESTROYED_REWARD;
                events.push(TurnEvent::RobotFell { at: dest });
            }
            Cell::Robot => {
                // The moving robot is destroyed; the one already standing
                // at the destination is untouched.
                world.robots[i] = Robot::Inactive;
                world.score += ROBOT_DESTROYED_REWARD;
                events.push(TurnEvent::RobotsCollided { at: dest });
            }
            Cell::Player => {
                world.robots[i] = Robot::Inactive;
                world.score -= PLAYER_HIT_PENALTY;
                world.lives -= 1;
                events.push(TurnEvent::PlayerHit { lives_left: world.lives });
                if world.lives == 0 {
                    world.phase = Phase::Lost;
                    events.push(TurnEvent::GameLost);
                    return;
                }
            }
            Cell::Empty => {
                world.grid.set(dest, Cell::Robot);
                world.robots[i] = Robot::Active(dest);
                survivors += 1;
            }
        }
    }

    if survivors == 0 {
        world.phase = Phase::Won;
        events.push(TurnEvent::GameWon);
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;

    fn rules() -> RulesConfig {
        RulesConfig {
            lives: 5,
            hole_percent: 3,
            bomb_percent: 4,
            seed: None,
        }
    }

    /// Hand-built board: all empty except the given entities.
    fn world_with(player: Pos, robots: &[Pos]) -> WorldState {
        let mut w = WorldState::new(rules());
        w.phase = Phase::Playing;
        w.grid.set(player, Cell::Player);
        w.player = player;
        for (i, &p) in robots.iter().enumerate() {
            w.grid.set(p, Cell::Robot);
            w.robots[i] = Robot::Active(p);
        }
        w
    }

    // ── Legality ──

    #[test]
    fn out_of_bounds_move_is_a_complete_noop() {
        let mut w = world_with(Pos::new(0, 0), &[Pos::new(10, 10)]);
        let events = apply_player_move(&mut w, MoveIntent::UpLeft);

        assert!(events.is_empty());
        assert_eq!(w.score, 0);
        assert_eq!(w.turn, 0);
        assert_eq!(w.player, Pos::new(0, 0));
        // Not even the robot sweep ran.
        assert_eq!(w.robots[0], Robot::Active(Pos::new(10, 10)));
        assert_eq!(w.grid.get(Pos::new(10, 10)), Cell::Robot);
    }

    #[test]
    fn move_onto_hazard_is_illegal() {
        let mut w = world_with(Pos::new(5, 5), &[Pos::new(15, 12)]);
        w.grid.set(Pos::new(6, 5), Cell::Bomb);
        w.grid.set(Pos::new(4, 5), Cell::Hole);

        assert!(apply_player_move(&mut w, MoveIntent::Right).is_empty());
        assert!(apply_player_move(&mut w, MoveIntent::Left).is_empty());
        assert_eq!(w.player, Pos::new(5, 5));
        assert_eq!(w.score, 0);
        assert_eq!(w.robots[0], Robot::Active(Pos::new(15, 12)));
    }

    #[test]
    fn stay_is_legal_and_triggers_the_sweep() {
        let mut w = world_with(Pos::new(10, 8), &[Pos::new(2, 2)]);
        let events = apply_player_move(&mut w, MoveIntent::Stay);

        assert!(events.is_empty()); // nothing notable happened
        assert_eq!(w.score, 1);
        assert_eq!(w.player, Pos::new(10, 8));
        assert_eq!(w.grid.get(Pos::new(10, 8)), Cell::Player);
        // The robot advanced one diagonal step.
        assert_eq!(w.robots[0], Robot::Active(Pos::new(3, 3)));
        assert_eq!(w.grid.get(Pos::new(2, 2)), Cell::Empty);
        assert_eq!(w.grid.get(Pos::new(3, 3)), Cell::Robot);
    }

    #[test]
    fn terminal_phase_ignores_moves() {
        let mut w = world_with(Pos::new(5, 5), &[Pos::new(1, 1)]);
        w.phase = Phase::Lost;
        assert!(apply_player_move(&mut w, MoveIntent::Right).is_empty());
        assert_eq!(w.player, Pos::new(5, 5));
        assert_eq!(w.robots[0], Robot::Active(Pos::new(1, 1)));
    }

    // ── Hazard collisions ──

    #[test]
    fn robot_steps_on_bomb() {
        // Robot at (2,2) heading to (3,3); bomb there. Second robot keeps
        // the round alive.
        let mut w = world_with(Pos::new(10, 8), &[Pos::new(2, 2), Pos::new(18, 14)]);
        w.grid.set(Pos::new(3, 3), Cell::Bomb);

        let events = apply_player_move(&mut w, MoveIntent::Stay);

        assert_eq!(events, vec![TurnEvent::RobotBombed { at: Pos::new(3, 3) }]);
        assert_eq!(w.robots[0], Robot::Inactive);
        assert_eq!(w.grid.get(Pos::new(3, 3)), Cell::Empty); // bomb consumed
        assert_eq!(w.score, 1 + 10);
        assert_eq!(w.phase, Phase::Playing);
    }

    #[test]
    fn robot_falls_into_hole_which_remains() {
        let mut w = world_with(Pos::new(10, 8), &[Pos::new(2, 2), Pos::new(18, 14)]);
        w.grid.set(Pos::new(3, 3), Cell::Hole);

        let events = apply_player_move(&mut w, MoveIntent::Stay);

        assert_eq!(events, vec![TurnEvent::RobotFell { at: Pos::new(3, 3) }]);
        assert_eq!(w.robots[0], Robot::Inactive);
        assert_eq!(w.grid.get(Pos::new(3, 3)), Cell::Hole);
        assert_eq!(w.score, 1 + 10);
    }

    #[test]
    fn robot_on_robot_collision_destroys_the_mover() {
        // Both robots on row 0, player far right: slot 0 walks into slot 1.
        let mut w = world_with(Pos::new(9, 0), &[Pos::new(3, 0), Pos::new(4, 0)]);

        let events = apply_player_move(&mut w, MoveIntent::Stay);

        assert_eq!(events, vec![TurnEvent::RobotsCollided { at: Pos::new(4, 0) }]);
        assert_eq!(w.robots[0], Robot::Inactive);
        // The survivor then took its own step toward the player.
        assert_eq!(w.robots[1], Robot::Active(Pos::new(5, 0)));
        assert_eq!(w.grid.get(Pos::new(5, 0)), Cell::Robot);
        assert_eq!(w.score, 1 + 10);
    }

    // ── Player collisions ──

    #[test]
    fn robot_catches_player() {
        let mut w = world_with(Pos::new(5, 5), &[Pos::new(4, 4), Pos::new(18, 14)]);

        let events = apply_player_move(&mut w, MoveIntent::Stay);

        assert_eq!(events, vec![TurnEvent::PlayerHit { lives_left: 4 }]);
        assert_eq!(w.lives, 4);
        assert_eq!(w.score, 1 - 10);
        assert_eq!(w.robots[0], Robot::Inactive);
        assert_eq!(w.phase, Phase::Playing);
    }

    #[test]
    fn last_life_short_circuits_the_sweep() {
        // Two robots adjacent; the first hit is lethal, so the second
        // robot must not be processed at all.
        let mut w = world_with(Pos::new(5, 5), &[Pos::new(4, 4), Pos::new(6, 6)]);
        w.lives = 1;

        let events = apply_player_move(&mut w, MoveIntent::Stay);

        assert_eq!(
            events,
            vec![TurnEvent::PlayerHit { lives_left: 0 }, TurnEvent::GameLost]
        );
        assert_eq!(w.phase, Phase::Lost);
        // Second robot untouched, still on its original cell.
        assert_eq!(w.robots[1], Robot::Active(Pos::new(6, 6)));
        assert_eq!(w.grid.get(Pos::new(6, 6)), Cell::Robot);
    }

    #[test]
    fn sweep_resolves_against_the_cell_the_player_is_leaving() {
        // The player moves right, but the robot was adjacent to the OLD
        // cell; it still lands the hit, then the player departs.
        let mut w = world_with(Pos::new(5, 5), &[Pos::new(4, 4), Pos::new(18, 14)]);

        let events = apply_player_move(&mut w, MoveIntent::Right);

        assert_eq!(events, vec![TurnEvent::PlayerHit { lives_left: 4 }]);
        assert_eq!(w.lives, 4);
        assert_eq!(w.score, 1 - 10);
        assert_eq!(w.player, Pos::new(6, 5));
        assert_eq!(w.grid.get(Pos::new(6, 5)), Cell::Player);
        assert_eq!(w.grid.get(Pos::new(5, 5)), Cell::Empty);
    }

    // ── Win condition ──

    #[test]
    fn last_robot_on_hazard_wins_with_lives_intact() {
        let mut w = world_with(Pos::new(10, 8), &[Pos::new(2, 2)]);
        w.grid.set(Pos::new(3, 3), Cell::Bomb);

        let events = apply_player_move(&mut w, MoveIntent::Stay);

        assert_eq!(
            events,
            vec![
                TurnEvent::RobotBombed { at: Pos::new(3, 3) },
                TurnEvent::GameWon,
            ]
        );
        assert_eq!(w.phase, Phase::Won);
        assert_eq!(w.lives, 5);
    }

    #[test]
    fn lethal_hit_beats_win_evaluation() {
        // Sole robot dies on the player while lives run out: the round is
        // Lost, not Won, because the sweep short-circuits.
        let mut w = world_with(Pos::new(5, 5), &[Pos::new(4, 4)]);
        w.lives = 1;

        let events = apply_player_move(&mut w, MoveIntent::Stay);

        assert_eq!(w.phase, Phase::Lost);
        assert_eq!(events.last(), Some(&TurnEvent::GameLost));
    }

    // ── Chase behavior ──

    #[test]
    fn chase_distance_is_monotonically_decreasing() {
        let mut w = world_with(Pos::new(5, 5), &[Pos::new(0, 0)]);

        let mut dist = w.robots[0].pos().unwrap().chebyshev(w.player);
        for _ in 0..3 {
            apply_player_move(&mut w, MoveIntent::Stay);
            let next = w.robots[0].pos().unwrap().chebyshev(w.player);
            assert!(next < dist, "robot failed to close in: {next} >= {dist}");
            dist = next;
        }
        // (0,0) → (1,1) → (2,2) → (3,3)
        assert_eq!(w.robots[0], Robot::Active(Pos::new(3, 3)));
    }

    #[test]
    fn robot_on_shared_row_moves_straight() {
        let mut w = world_with(Pos::new(9, 4), &[Pos::new(2, 4)]);
        apply_player_move(&mut w, MoveIntent::Stay);
        assert_eq!(w.robots[0], Robot::Active(Pos::new(3, 4)));
    }

    #[test]
    fn score_accumulates_one_per_legal_move() {
        let mut w = world_with(Pos::new(5, 5), &[Pos::new(18, 14)]);
        for _ in 0..4 {
            apply_player_move(&mut w, MoveIntent::Stay);
        }
        assert_eq!(w.score, 4);
        assert_eq!(w.turn, 4);
    }
}
