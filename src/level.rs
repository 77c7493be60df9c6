//! CSV level loader
//!
//! A level is a rectangular grid of single-character cell codes, one row
//! per line, cells separated by commas. Each cell is 64x64 pixels.
//!
//! | code | meaning                                  |
//! |------|------------------------------------------|
//! | `.`  | empty                                    |
//! | `G`  | grass block (solid)                      |
//! | `D`  | dirt block (solid)                       |
//! | `S`  | stone block (solid)                      |
//! | `R`  | plank block (solid until boss defeated)  |
//! | `P`  | one-way platform (top slice of the cell) |
//! | `C`  | collectible                              |
//! | `E`  | exit door                                |
//! | `X`  | player spawn                             |
//! | `B`  | basic enemy spawn                        |
//! | `J`  | jumping enemy spawn                      |
//! | `A`  | ambush enemy spawn                       |
//! | `Z`  | boss spawn                               |

use std::fmt;
use std::fs;
use std::path::Path;

use glam::Vec2;

use crate::consts::{PLATFORM_THICKNESS, TILE_SIZE};
use crate::sim::{Rect, TileMap};

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Empty,
    /// Row `line` has a different cell count than the first row
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    UnknownCell {
        line: usize,
        col: usize,
        cell: String,
    },
    MissingPlayerSpawn,
    DuplicatePlayerSpawn {
        line: usize,
        col: usize,
    },
    DuplicateBossSpawn {
        line: usize,
        col: usize,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "failed to read level file: {e}"),
            LoadError::Empty => write!(f, "level file contains no rows"),
            LoadError::RaggedRow {
                line,
                expected,
                found,
            } => write!(
                f,
                "row {line} has {found} cells, expected {expected}"
            ),
            LoadError::UnknownCell { line, col, cell } => {
                write!(f, "unknown cell {cell:?} at row {line}, column {col}")
            }
            LoadError::MissingPlayerSpawn => write!(f, "level has no player spawn (X)"),
            LoadError::DuplicatePlayerSpawn { line, col } => {
                write!(f, "second player spawn at row {line}, column {col}")
            }
            LoadError::DuplicateBossSpawn { line, col } => {
                write!(f, "second boss spawn at row {line}, column {col}")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Basic,
    Jumping,
    Ambush,
    Boss,
}

/// Everything the simulation needs to start a run
#[derive(Debug)]
pub struct Level {
    map: TileMap,
    player_spawn: Vec2,
    enemy_spawns: Vec<(EnemyKind, Vec2)>,
    collectibles: Vec<Rect>,
    exit: Option<Rect>,
}

impl Level {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path)?;
        let level = Self::parse(&text)?;
        log::info!(
            "loaded level {} ({}x{} px, {} enemies, {} collectibles)",
            path.display(),
            level.map.width,
            level.map.height,
            level.enemy_spawns.len(),
            level.collectibles.len()
        );
        Ok(level)
    }

    pub fn parse(text: &str) -> Result<Self, LoadError> {
        let rows: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        if rows.is_empty() {
            return Err(LoadError::Empty);
        }
        let cols = rows[0].split(',').count();

        let mut map = TileMap::new(
            cols as f32 * TILE_SIZE,
            rows.len() as f32 * TILE_SIZE,
        );
        let mut player_spawn = None;
        let mut enemy_spawns = Vec::new();
        let mut collectibles = Vec::new();
        let mut exit = None;

        for (row, line) in rows.iter().enumerate() {
            let cells: Vec<&str> = line.split(',').map(str::trim).collect();
            if cells.len() != cols {
                return Err(LoadError::RaggedRow {
                    line: row + 1,
                    expected: cols,
                    found: cells.len(),
                });
            }
            for (col, cell) in cells.iter().enumerate() {
                let x = col as f32 * TILE_SIZE;
                let y = row as f32 * TILE_SIZE;
                let tile = Rect::new(x, y, TILE_SIZE, TILE_SIZE);
                let center = tile.center();
                match *cell {
                    "." | "" => {}
                    "G" | "D" | "S" => map.push_solid(tile),
                    "R" => map.push_plank(tile),
                    "P" => map.push_one_way(Rect::new(x, y, TILE_SIZE, PLATFORM_THICKNESS)),
                    "C" => collectibles.push(Rect::new(
                        center.x - TILE_SIZE / 4.0,
                        center.y - TILE_SIZE / 4.0,
                        TILE_SIZE / 2.0,
                        TILE_SIZE / 2.0,
                    )),
                    "E" => exit = exit.or(Some(tile)),
                    "X" => {
                        if player_spawn.is_some() {
                            return Err(LoadError::DuplicatePlayerSpawn {
                                line: row + 1,
                                col: col + 1,
                            });
                        }
                        player_spawn = Some(center);
                    }
                    "B" => enemy_spawns.push((EnemyKind::Basic, center)),
                    "J" => enemy_spawns.push((EnemyKind::Jumping, center)),
                    "A" => enemy_spawns.push((EnemyKind::Ambush, center)),
                    "Z" => {
                        if enemy_spawns.iter().any(|(k, _)| *k == EnemyKind::Boss) {
                            return Err(LoadError::DuplicateBossSpawn {
                                line: row + 1,
                                col: col + 1,
                            });
                        }
                        enemy_spawns.push((EnemyKind::Boss, center));
                    }
                    other => {
                        return Err(LoadError::UnknownCell {
                            line: row + 1,
                            col: col + 1,
                            cell: other.to_string(),
                        });
                    }
                }
            }
        }

        let player_spawn = player_spawn.ok_or(LoadError::MissingPlayerSpawn)?;
        Ok(Self {
            map,
            player_spawn,
            enemy_spawns,
            collectibles,
            exit,
        })
    }

    /// Minimal runnable level used when no level file is available:
    /// a flat floor, the player on the left, the exit on the right.
    pub fn default_flat() -> Self {
        let text = "\
X,.,.,.,.,.,.,.,.,E\n\
G,G,G,G,G,G,G,G,G,G\n";
        Self::parse(text).unwrap_or_else(|e| unreachable!("builtin level is valid: {e}"))
    }

    pub fn tile_map(&self) -> &TileMap {
        &self.map
    }

    pub fn into_tile_map(self) -> TileMap {
        self.map
    }

    /// Tile-center player spawn position
    pub fn player_spawn(&self) -> Vec2 {
        self.player_spawn
    }

    pub fn enemy_spawns(&self) -> &[(EnemyKind, Vec2)] {
        &self.enemy_spawns
    }

    pub fn collectibles(&self) -> &[Rect] {
        &self.collectibles
    }

    pub fn collectible_count(&self) -> usize {
        self.collectibles.len()
    }

    pub fn exit(&self) -> Option<Rect> {
        self.exit
    }

    pub fn has_boss(&self) -> bool {
        self.enemy_spawns
            .iter()
            .any(|(kind, _)| *kind == EnemyKind::Boss)
    }
}
