//! Game constants - scoring and defaults in one place

// Scoring
pub const SCORE_MOVE: i64 = -1;
pub const SCORE_TURN: i64 = -1;
pub const SCORE_SHOOT: i64 = -10;
pub const SCORE_GRAB_GOLD: i64 = 10;
pub const SCORE_CLIMB_WITH_GOLD: i64 = 1000;
pub const SCORE_CLIMB_WITHOUT_GOLD: i64 = 0;
pub const SCORE_DEATH: i64 = -1000;

// Defaults
pub const DEFAULT_GRID_SIZE: u32 = 8;
pub const DEFAULT_WUMPUS_COUNT: u32 = 2;
pub const DEFAULT_PIT_PROBABILITY: f32 = 0.2;
pub const DEFAULT_ARROWS: u32 = 1;
pub const DEFAULT_MAX_TURNS: u32 = 500;

// Largest supported grid side
pub const MAX_GRID_SIZE: u32 = 1024;

// Wumpus movement (moving mode): one step every N agent actions
pub const DEFAULT_WUMPUS_MOVE_INTERVAL: u32 = 5;

// Planner penalties for entering non-safe cells
pub const RISK_PENALTY_UNKNOWN: u32 = 6;
pub const RISK_PENALTY_STALE: u32 = 2;

// Highest route risk the agent accepts when exploring blind
pub const DEFAULT_MAX_ACCEPTABLE_RISK: f32 = 0.6;

// Moving mode: extra route cost per cell around the epoch-end position that
// could still hold a wumpus
pub const EPOCH_EXPOSURE_PENALTY: u32 = 4;

// Moving mode: hold on a sheltered cell when the wumpuses move within this
// many actions
pub const EPOCH_HOLD_WINDOW: u32 = 2;
