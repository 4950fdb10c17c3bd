/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub rules: RulesConfig,
    pub speed: SpeedConfig,
}

#[derive(Clone, Debug)]
pub struct RulesConfig {
    pub lives: u32,
    pub hole_percent: u32,
    pub bomb_percent: u32,
    /// Fixed board seed for reproducible runs; fresh entropy when absent.
    pub seed: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    rules: TomlRules,
    #[serde(default)]
    speed: TomlSpeed,
}

#[derive(Deserialize, Debug)]
struct TomlRules {
    #[serde(default = "default_lives")]
    lives: u32,
    #[serde(default = "default_hole_percent")]
    hole_percent: u32,
    #[serde(default = "default_bomb_percent")]
    bomb_percent: u32,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

// ── Defaults ──

fn default_lives() -> u32 { 5 }
fn default_hole_percent() -> u32 { 3 }
fn default_bomb_percent() -> u32 { 4 }
fn default_tick_rate() -> u64 { 100 }  // matches the original's input delay

impl Default for TomlRules {
    fn default() -> Self {
        TomlRules {
            lives: default_lives(),
            hole_percent: default_hole_percent(),
            bomb_percent: default_bomb_percent(),
            seed: None,
        }
    }
}

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            tick_rate_ms: default_tick_rate(),
        }
    }
}

// ── Loading ──

/// Combined hazard density cap. Board placement rejection-samples empty
/// cells, so the scatter must leave most of the board empty.
const MAX_HAZARD_PERCENT: u32 = 50;

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());

        let mut rules = RulesConfig {
            lives: toml_cfg.rules.lives.max(1),
            hole_percent: toml_cfg.rules.hole_percent,
            bomb_percent: toml_cfg.rules.bomb_percent,
            seed: toml_cfg.rules.seed,
        };

        // Keep the hazard scatter sparse enough that robot/player placement
        // always terminates.
        if rules.hole_percent + rules.bomb_percent > MAX_HAZARD_PERCENT {
            eprintln!(
                "Warning: hole_percent + bomb_percent exceeds {}%; using defaults.",
                MAX_HAZARD_PERCENT
            );
            rules.hole_percent = default_hole_percent();
            rules.bomb_percent = default_bomb_percent();
        }

        GameConfig {
            rules,
            speed: SpeedConfig {
                tick_rate_ms: toml_cfg.speed.tick_rate_ms.max(1),
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
