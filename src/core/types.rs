//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for agent sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Grid coordinate. `(0, 0)` is the entry cell, `y` grows northward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance on the grid
    pub fn manhattan(&self, other: &Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The adjacent coordinate in `direction` (may be out of bounds)
    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// The 4 adjacent coordinates in North, East, South, West order
    pub fn adjacent(&self) -> [Coord; 4] {
        Direction::ALL.map(|d| self.step(d))
    }

    /// Direction from `self` toward `other` when both share a row or column
    pub fn direction_to(&self, other: &Self) -> Option<Direction> {
        if self == other {
            return None;
        }
        match (other.x - self.x, other.y - self.y) {
            (0, dy) if dy > 0 => Some(Direction::North),
            (0, _) => Some(Direction::South),
            (dx, 0) if dx > 0 => Some(Direction::East),
            (_, 0) => Some(Direction::West),
            _ => None,
        }
    }

    /// Coordinates strictly between `self` and `other` along a shared row or column
    pub fn cells_between(&self, other: &Self) -> Vec<Coord> {
        let Some(direction) = self.direction_to(other) else {
            return Vec::new();
        };
        let mut cells = Vec::new();
        let mut current = self.step(direction);
        while current != *other {
            cells.push(current);
            current = current.step(direction);
        }
        cells
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal facing. Turning left from North yields West.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Direction {
    North,
    #[default]
    East,
    South,
    West,
}

impl Direction {
    /// Clockwise order, starting North
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    pub fn left(&self) -> Self {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }

    pub fn right(&self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    pub fn opposite(&self) -> Self {
        self.right().right()
    }

    /// Number of 90 degree turns needed to face `target` (0, 1 or 2)
    pub fn turns_to(&self, target: Direction) -> u32 {
        if *self == target {
            0
        } else if self.opposite() == target {
            2
        } else {
            1
        }
    }

    /// Turn actions that rotate this facing into `target`.
    ///
    /// A reversal is two right turns.
    pub fn turn_actions(&self, target: Direction) -> Vec<Action> {
        if *self == target {
            Vec::new()
        } else if self.left() == target {
            vec![Action::TurnLeft]
        } else if self.right() == target {
            vec![Action::TurnRight]
        } else {
            vec![Action::TurnRight, Action::TurnRight]
        }
    }
}

/// Position plus facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Pose {
    pub position: Coord,
    pub facing: Direction,
}

impl Pose {
    pub const fn new(position: Coord, facing: Direction) -> Self {
        Self { position, facing }
    }
}

/// Actions the agent can emit, exactly one per turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveForward,
    TurnLeft,
    TurnRight,
    Grab,
    Shoot,
    Climb,
}

/// Percepts delivered by the simulator once per turn.
///
/// `position` and `facing` are the simulator's authoritative pose. The agent
/// only uses them to detect desync, never as a reasoning input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Percept {
    /// A pit is adjacent
    pub breeze: bool,
    /// A live wumpus is adjacent
    pub stench: bool,
    /// Gold lies in the current cell
    pub glitter: bool,
    /// The previous forward move hit the outer wall
    pub bump: bool,
    /// The previous arrow killed a wumpus
    pub scream: bool,
    #[serde(default)]
    pub position: Option<Coord>,
    #[serde(default)]
    pub facing: Option<Direction>,
}

impl Percept {
    /// A percept with no signals and no authoritative pose
    pub fn quiet() -> Self {
        Self::default()
    }
}

/// Final outcome of an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Climbed out carrying the gold
    Won,
    /// Entered a pit or met a live wumpus
    Died,
    /// Climbed out without the gold, or ran out of turns
    GaveUp,
}
