//! Mines grid reveal.
//!
//! The tile order comes from a chained shuffle: every step hashes the running
//! seed with the step index, swaps, then folds that digest back into the
//! running seed with XOR. The first [`MinesLayout::gems_for`] tiles of the
//! order are gems, the rest are mines, and tiles flip over in that order.

use crate::deck::reduce_mod;
use crate::error::{Result, RevealError};
use crate::seed::{HashAlgorithm, Seed};
use crate::types::U256;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_GRID_SIZE: usize = 25;
pub const MAX_GRID_SIZE: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinesLayout {
    pub grid_size: usize,
    /// Gems shown for bin 0. Each higher bin shows one fewer, never below one.
    pub max_gems: usize,
    /// Delay between two tiles flipping.
    pub reveal_interval: Duration,
}

impl Default for MinesLayout {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            max_gems: 12,
            reveal_interval: Duration::from_millis(40),
        }
    }
}

impl MinesLayout {
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 || self.grid_size > MAX_GRID_SIZE {
            return Err(RevealError::config(format!(
                "Mines grid must have between 1 and {} tiles, got {}",
                MAX_GRID_SIZE, self.grid_size
            )));
        }
        Ok(())
    }

    pub fn gems_for(&self, bin: u8) -> usize {
        self.max_gems
            .saturating_sub(usize::from(bin))
            .max(1)
            .min(self.grid_size)
    }

    /// Time until the last tile has flipped.
    pub fn reveal_duration(&self) -> Duration {
        let tiles = u32::try_from(self.grid_size).unwrap_or(u32::MAX);
        self.reveal_interval.saturating_mul(tiles)
    }
}

/// Chained shuffle of `0..n`.
///
/// Step `i` swaps position `i` with `i + H(state || i) mod (n - i)` and then
/// sets `state ^= H(state || i)`. Unlike the deck shuffle the final identity
/// step still runs, since it advances the chain.
pub fn chained_shuffle(seed: &Seed, n: usize, hash: HashAlgorithm) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    let mut state = U256::from_be_bytes(*seed.as_bytes());
    for i in 0..n {
        let step = U256::from(i).to_be_bytes::<32>();
        let digest = hash.digest(&[&state.to_be_bytes::<32>(), &step]);
        let j = i + reduce_mod(&digest, (n - i) as u64) as usize;
        order.swap(i, j);
        state ^= U256::from_be_bytes(digest);
    }
    order
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinesBoard {
    /// Tile indices in flip order.
    pub order: Vec<usize>,
    /// Number of leading tiles in `order` that are gems.
    pub gem_count: usize,
}

impl MinesBoard {
    pub fn new(seed: &Seed, layout: &MinesLayout, bin: u8, hash: HashAlgorithm) -> Self {
        Self {
            order: chained_shuffle(seed, layout.grid_size, hash),
            gem_count: layout.gems_for(bin),
        }
    }

    pub fn grid_size(&self) -> usize {
        self.order.len()
    }

    pub fn gems(&self) -> Vec<usize> {
        let mut gems = self.order[..self.gem_count].to_vec();
        gems.sort_unstable();
        gems
    }

    pub fn mines(&self) -> Vec<usize> {
        let mut mines = self.order[self.gem_count..].to_vec();
        mines.sort_unstable();
        mines
    }

    pub fn is_gem(&self, tile: usize) -> bool {
        self.order[..self.gem_count].contains(&tile)
    }

    /// Tiles flipped once `elapsed` has passed, in flip order.
    pub fn revealed_at(&self, elapsed: Duration, interval: Duration) -> &[usize] {
        if interval.is_zero() {
            return &self.order;
        }
        let flipped = elapsed.as_nanos() / interval.as_nanos();
        let flipped = usize::try_from(flipped).unwrap_or(usize::MAX);
        &self.order[..flipped.min(self.order.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn golden_seed() -> Seed {
        "0xcf1c8930c9bb72b969392a3f721188742fe0655fc9e6baf32bfa303a5c6554cd"
            .parse()
            .unwrap()
    }

    #[test]
    fn test_chained_shuffle_small() {
        let order = chained_shuffle(&golden_seed(), 5, HashAlgorithm::Keccak256);
        assert_eq!(order, vec![1, 3, 0, 2, 4]);
        assert!(chained_shuffle(&golden_seed(), 0, HashAlgorithm::Keccak256).is_empty());
    }

    #[test]
    fn test_board_split() {
        let layout = MinesLayout::default();
        let board = MinesBoard::new(&golden_seed(), &layout, 3, HashAlgorithm::Keccak256);
        assert_eq!(board.gem_count, 9);
        assert_eq!(board.gems(), vec![0, 1, 2, 9, 10, 11, 13, 14, 24]);
        assert_eq!(
            board.mines(),
            vec![3, 4, 5, 6, 7, 8, 12, 15, 16, 17, 18, 19, 20, 21, 22, 23]
        );
        assert!(board.is_gem(11));
        assert!(!board.is_gem(3));
    }

    #[test]
    fn test_gems_for_bins() {
        let layout = MinesLayout::default();
        assert_eq!(layout.gems_for(0), 12);
        assert_eq!(layout.gems_for(3), 9);
        assert_eq!(layout.gems_for(11), 1);
        assert_eq!(layout.gems_for(12), 1);
        assert_eq!(layout.gems_for(255), 1);

        let tiny = MinesLayout {
            grid_size: 4,
            ..MinesLayout::default()
        };
        assert_eq!(tiny.gems_for(0), 4);
    }

    #[test]
    fn test_revealed_at() {
        let layout = MinesLayout::default();
        let board = MinesBoard::new(&golden_seed(), &layout, 3, HashAlgorithm::Keccak256);
        let interval = layout.reveal_interval;

        assert!(board.revealed_at(Duration::from_millis(39), interval).is_empty());
        assert_eq!(board.revealed_at(Duration::from_millis(40), interval), &[11]);
        assert_eq!(board.revealed_at(Duration::from_millis(125), interval), &[11, 0, 9]);
        assert_eq!(board.revealed_at(Duration::from_secs(5), interval).len(), 25);
        assert_eq!(board.revealed_at(Duration::ZERO, Duration::ZERO).len(), 25);
        assert_eq!(layout.reveal_duration(), Duration::from_millis(1000));
    }

    #[test]
    fn test_layout_validation() {
        MinesLayout::default().validate().unwrap();
        let empty = MinesLayout {
            grid_size: 0,
            ..MinesLayout::default()
        };
        assert!(empty.validate().is_err());
    }
}
