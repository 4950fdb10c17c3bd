/// WorldState: the complete snapshot of a running round.
///
/// Owns the grid, the player record, and the robot roster. The grid is the
/// authoritative occupancy map; `player` and `robots` are cached coordinates
/// into it, and every mutation in `initialize` / `sim::turn` keeps the two
/// representations consistent.

use crate::config::RulesConfig;
use crate::domain::cell::Cell;
use crate::domain::entity::Robot;
use crate::domain::grid::{Grid, Pos, GRID_H, GRID_W, MAX_ROBOTS};
use super::rng::GameRng;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Title,
    Playing,
    /// All robots destroyed, lives remaining. Terminal until restart.
    Won,
    /// Lives exhausted. Terminal until restart.
    Lost,
}

pub struct WorldState {
    // ── Board ──
    pub grid: Grid,

    // ── Entities ──
    pub player: Pos,
    pub robots: [Robot; MAX_ROBOTS],

    // ── Round tracking ──
    pub score: i32,
    pub lives: u32,
    pub phase: Phase,
    pub turn: u64,

    // ── Rules config ──
    pub rules: RulesConfig,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,
}

impl WorldState {
    pub fn new(rules: RulesConfig) -> Self {
        WorldState {
            grid: Grid::new(),
            player: Pos::new(0, 0),
            robots: [Robot::Inactive; MAX_ROBOTS],
            score: 0,
            lives: rules.lives,
            phase: Phase::Title,
            turn: 0,
            rules,
            message: String::new(),
            message_timer: 0,
        }
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }

    /// Number of robots still in play.
    pub fn active_robots(&self) -> usize {
        self.robots.iter().filter(|r| r.is_active()).count()
    }

    // ── Board setup ──

    /// (Re)create the board from scratch: scatter hazards, then place the
    /// robots and finally the player on random empty cells.
    ///
    /// Always produces a fresh round regardless of prior state; the only
    /// way back from a terminal phase.
    pub fn initialize(&mut self, rng: &mut GameRng) {
        self.score = 0;
        self.lives = self.rules.lives;
        self.phase = Phase::Playing;
        self.turn = 0;
        self.message.clear();
        self.message_timer = 0;

        // Hazard scatter: independent percentage roll per cell, hole
        // checked before bomb so the two never overlap. Column-major
        // order keeps seeded boards reproducible.
        let hole_below = self.rules.hole_percent;
        let bomb_below = self.rules.hole_percent + self.rules.bomb_percent;
        for p in Grid::coords() {
            let roll = rng.percent();
            let cell = if roll < hole_below {
                Cell::Hole
            } else if roll < bomb_below {
                Cell::Bomb
            } else {
                Cell::Empty
            };
            self.grid.set(p, cell);
        }

        // Placement precondition: rejection sampling below must be able to
        // find an empty cell for every robot plus the player.
        assert!(
            self.grid.count(Cell::Empty) > MAX_ROBOTS,
            "board saturated by hazards; not enough empty cells for placement"
        );

        for slot in self.robots.iter_mut() {
            let p = sample_empty(&self.grid, rng);
            self.grid.set(p, Cell::Robot);
            *slot = Robot::Active(p);
        }

        let p = sample_empty(&self.grid, rng);
        self.grid.set(p, Cell::Player);
        self.player = p;
    }
}

/// Uniform random coordinate, redrawn until it lands on an empty cell.
fn sample_empty(grid: &Grid, rng: &mut GameRng) -> Pos {
    loop {
        let p = Pos::new(rng.coord(GRID_W), rng.coord(GRID_H));
        if grid.get(p) == Cell::Empty {
            return p;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> RulesConfig {
        RulesConfig {
            lives: 5,
            hole_percent: 3,
            bomb_percent: 4,
            seed: None,
        }
    }

    /// Grid contents and position records must agree exactly.
    fn assert_consistent(w: &WorldState) {
        assert_eq!(w.grid.count(Cell::Player), 1);
        assert_eq!(w.grid.get(w.player), Cell::Player);

        assert_eq!(w.grid.count(Cell::Robot), w.active_robots());
        for robot in &w.robots {
            if let Some(p) = robot.pos() {
                assert_eq!(w.grid.get(p), Cell::Robot);
            }
        }
    }

    #[test]
    fn initialize_produces_consistent_board() {
        for seed in 0..20 {
            let mut w = WorldState::new(rules());
            let mut rng = GameRng::new(seed);
            w.initialize(&mut rng);

            assert_consistent(&w);
            assert_eq!(w.active_robots(), MAX_ROBOTS);
            assert_eq!(w.score, 0);
            assert_eq!(w.lives, 5);
            assert_eq!(w.phase, Phase::Playing);
        }
    }

    #[test]
    fn entities_never_share_a_cell() {
        let mut w = WorldState::new(rules());
        let mut rng = GameRng::new(9);
        w.initialize(&mut rng);

        let mut seen = vec![w.player];
        for robot in &w.robots {
            let p = robot.pos().unwrap();
            assert!(!seen.contains(&p));
            seen.push(p);
        }
    }

    #[test]
    fn same_seed_same_board() {
        let mut a = WorldState::new(rules());
        let mut b = WorldState::new(rules());
        a.initialize(&mut GameRng::new(123));
        b.initialize(&mut GameRng::new(123));

        assert_eq!(a.player, b.player);
        assert_eq!(a.robots, b.robots);
        for p in Grid::coords() {
            assert_eq!(a.grid.get(p), b.grid.get(p));
        }
    }

    #[test]
    fn reinitialize_discards_previous_round() {
        let mut w = WorldState::new(rules());
        let mut rng = GameRng::new(5);
        w.initialize(&mut rng);

        // Scar the round, then rebuild.
        w.score = -40;
        w.lives = 1;
        w.phase = Phase::Lost;
        w.robots[0] = Robot::Inactive;

        w.initialize(&mut rng);
        assert_consistent(&w);
        assert_eq!(w.active_robots(), MAX_ROBOTS);
        assert_eq!(w.score, 0);
        assert_eq!(w.lives, 5);
        assert_eq!(w.phase, Phase::Playing);
    }

    #[test]
    fn hazard_scatter_respects_percentages() {
        // With 3% + 4% over 320 cells, hazards are plentiful across seeds
        // but never crowd out placement.
        let mut total_hazards = 0;
        for seed in 0..50 {
            let mut w = WorldState::new(rules());
            w.initialize(&mut GameRng::new(seed));
            total_hazards += w.grid.count(Cell::Hole) + w.grid.count(Cell::Bomb);
        }
        let avg = total_hazards as f64 / 50.0;
        // Expectation is 7% of 320 = 22.4.
        assert!(avg > 10.0 && avg < 40.0, "avg hazards per board: {avg}");
    }
}
