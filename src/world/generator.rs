//! Seeded random map generation

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::constants::MAX_GRID_SIZE;
use crate::core::error::{AgentError, Result};
use crate::core::types::Coord;
use crate::world::map::WorldMap;

/// Generate a random map.
///
/// The entry and its two neighbors never hold a threat. Wumpuses are placed
/// first, then every remaining cell becomes a pit with `pit_probability`,
/// then the gold goes to a random empty cell (possibly the entry).
pub fn generate_map(size: u32, wumpus_count: u32, pit_probability: f32, seed: u64) -> Result<WorldMap> {
    if size == 0 || size > MAX_GRID_SIZE {
        return Err(AgentError::InvalidConfig(format!(
            "map size ({}) must be within 1..={}",
            size, MAX_GRID_SIZE
        )));
    }
    if !(0.0..=1.0).contains(&pit_probability) {
        return Err(AgentError::InvalidConfig(format!(
            "pit_probability ({}) must be within [0, 1]",
            pit_probability
        )));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let side = size as i32;
    let safe_start = [Coord::new(0, 0), Coord::new(1, 0), Coord::new(0, 1)];

    let mut candidates: Vec<Coord> = (0..side)
        .flat_map(|x| (0..side).map(move |y| Coord::new(x, y)))
        .filter(|c| !safe_start.contains(c))
        .collect();

    let count = (wumpus_count as usize).min(candidates.len());
    let wumpuses: Vec<Coord> = candidates
        .choose_multiple(&mut rng, count)
        .copied()
        .collect();
    candidates.retain(|c| !wumpuses.contains(c));

    let pits: Vec<Coord> = candidates
        .into_iter()
        .filter(|_| rng.gen::<f32>() < pit_probability)
        .collect();

    let empty: Vec<Coord> = (0..side)
        .flat_map(|x| (0..side).map(move |y| Coord::new(x, y)))
        .filter(|c| !wumpuses.contains(c) && !pits.contains(c))
        .collect();
    let gold = empty.choose(&mut rng).copied().unwrap_or(Coord::new(0, 0));

    Ok(WorldMap::new(size, wumpuses, pits, gold))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_map() {
        let a = generate_map(8, 2, 0.2, 42).unwrap();
        let b = generate_map(8, 2, 0.2, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generated_maps_are_valid() {
        for seed in 0..50 {
            let map = generate_map(6, 2, 0.25, seed).unwrap();
            map.validate().unwrap();
            assert_eq!(map.wumpuses.len(), 2);
            for c in [Coord::new(1, 0), Coord::new(0, 1)] {
                assert!(!map.has_pit(c) && !map.has_wumpus(c));
            }
        }
    }

    #[test]
    fn test_tiny_map_caps_wumpuses() {
        let map = generate_map(2, 5, 0.0, 7).unwrap();
        assert_eq!(map.wumpuses, vec![Coord::new(1, 1)]);
        assert!(map.pits.is_empty());
    }

    #[test]
    fn test_rejects_bad_probability() {
        assert!(generate_map(4, 1, 1.5, 0).is_err());
    }

    #[test]
    fn test_rejects_oversized_grid() {
        assert!(generate_map(MAX_GRID_SIZE + 1, 1, 0.1, 0).is_err());
    }
}
