/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::entity::MoveIntent;
use sim::event::TurnEvent;
use sim::rng::GameRng;
use sim::turn;
use sim::world::{Phase, WorldState};
use ui::input::InputState;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();

    let mut world = WorldState::new(config.rules.clone());
    let mut rng = match config.rules.seed {
        Some(seed) => GameRng::new(seed),
        None => GameRng::from_entropy(),
    };

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut world, &mut rng, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Robot Chase!");
    println!("Final Score: {}", world.score);
}

fn game_loop(
    world: &mut WorldState,
    rng: &mut GameRng,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();

    // One grid move per tick at most: the original sampled input on a
    // fixed 100 ms cadence, which is what keeps the chase playable.
    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);
    let mut last_turn = Instant::now() - tick_rate;
    let mut last_tick = Instant::now();

    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() {
            break;
        }
        if handle_meta(world, rng, &kb) {
            break;
        }

        if world.phase == Phase::Playing {
            if let Some(intent) = detect_intent(&kb) {
                if last_turn.elapsed() >= tick_rate {
                    let events = turn::apply_player_move(world, intent);
                    show_messages(world, &events);
                    last_turn = Instant::now();
                }
            }
        }

        // Message timer runs on the same cadence in all phases.
        if last_tick.elapsed() >= tick_rate {
            if world.message_timer > 0 {
                world.message_timer -= 1;
                if world.message_timer == 0 {
                    world.message.clear();
                }
            }
            last_tick = Instant::now();
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

// ── Key Constants ──
//
// Movement is the original's 3×3 layout around S:
//   Q W E
//   A S D      plus arrow keys for the four cardinals.
//   Z X C

const KEYS_UP_LEFT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Char('w'), KeyCode::Char('W'), KeyCode::Up];
const KEYS_UP_RIGHT: &[KeyCode] = &[KeyCode::Char('e'), KeyCode::Char('E')];
const KEYS_LEFT: &[KeyCode] = &[KeyCode::Char('a'), KeyCode::Char('A'), KeyCode::Left];
const KEYS_STAY: &[KeyCode] = &[KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Char('d'), KeyCode::Char('D'), KeyCode::Right];
const KEYS_DOWN_LEFT: &[KeyCode] = &[KeyCode::Char('z'), KeyCode::Char('Z')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Char('x'), KeyCode::Char('X'), KeyCode::Down];
const KEYS_DOWN_RIGHT: &[KeyCode] = &[KeyCode::Char('c'), KeyCode::Char('C')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];

fn detect_intent(kb: &InputState) -> Option<MoveIntent> {
    if kb.any_pressed(KEYS_UP_LEFT) {
        Some(MoveIntent::UpLeft)
    } else if kb.any_pressed(KEYS_UP) {
        Some(MoveIntent::Up)
    } else if kb.any_pressed(KEYS_UP_RIGHT) {
        Some(MoveIntent::UpRight)
    } else if kb.any_pressed(KEYS_LEFT) {
        Some(MoveIntent::Left)
    } else if kb.any_pressed(KEYS_RIGHT) {
        Some(MoveIntent::Right)
    } else if kb.any_pressed(KEYS_DOWN_LEFT) {
        Some(MoveIntent::DownLeft)
    } else if kb.any_pressed(KEYS_DOWN) {
        Some(MoveIntent::Down)
    } else if kb.any_pressed(KEYS_DOWN_RIGHT) {
        Some(MoveIntent::DownRight)
    } else if kb.any_pressed(KEYS_STAY) {
        Some(MoveIntent::Stay)
    } else {
        None
    }
}

/// Phase transitions and quit handling. Returns true to exit the game.
fn handle_meta(world: &mut WorldState, rng: &mut GameRng, kb: &InputState) -> bool {
    let esc = kb.any_pressed(&[KeyCode::Esc]);

    match world.phase {
        // ── Title Screen ──
        Phase::Title => {
            if kb.any_pressed(KEYS_CONFIRM) {
                world.initialize(rng);
            } else if esc {
                return true;
            }
        }

        // ── Playing ──
        Phase::Playing => {
            if esc {
                return true;
            }
            if kb.any_pressed(KEYS_RESTART) {
                world.initialize(rng);
                world.set_message("Restarted", 15);
            }
        }

        // ── Won / Lost ──
        Phase::Won | Phase::Lost => {
            if kb.any_pressed(KEYS_RESTART) {
                world.initialize(rng);
            } else if esc {
                return true;
            }
        }
    }

    false
}

/// Turn events → message bar. Later events win the bar for this turn.
fn show_messages(world: &mut WorldState, events: &[TurnEvent]) {
    for event in events {
        match *event {
            TurnEvent::RobotBombed { .. } => world.set_message("A robot hit a bomb! +10", 15),
            TurnEvent::RobotFell { .. } => world.set_message("A robot fell into a hole! +10", 15),
            TurnEvent::RobotsCollided { .. } => world.set_message("Two robots collided! +10", 15),
            TurnEvent::PlayerHit { lives_left } => {
                world.set_message(&format!("Caught by a robot! -10  ({lives_left} lives left)"), 15)
            }
            // The outcome banner covers these.
            TurnEvent::GameWon | TurnEvent::GameLost => {}
        }
    }
}
