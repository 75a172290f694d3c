//! Wumpus Agent - knowledge-based play in a partially observable grid
//!
//! The cognition core is `knowledge` -> `inference` -> `navigation` ->
//! `policy`, driven turn by turn by `agent`. `world` and `trial` are a
//! reference simulator and harness around it.

pub mod agent;
pub mod core;
pub mod inference;
pub mod knowledge;
pub mod navigation;
pub mod policy;
pub mod trial;
pub mod world;
