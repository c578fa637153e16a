//! Fixed-width player bitmask.
//!
//! Assignment, round occupancy and unavailability are all sets of player
//! indices. They are stored in a single `u32`, which caps the roster at
//! [`MAX_PLAYERS`]. [`Problem::new`](super::Problem::new) rejects larger
//! rosters, so every index reaching a mask is already in range.

use rand::Rng;

/// Largest roster a [`PlayerMask`] can represent.
pub const MAX_PLAYERS: usize = 32;

/// A set of player indices in `0..MAX_PLAYERS`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerMask(u32);

impl PlayerMask {
    /// The empty set.
    pub const EMPTY: PlayerMask = PlayerMask(0);

    /// Wraps raw bits.
    pub fn from_bits(bits: u32) -> Self {
        PlayerMask(bits)
    }

    /// Raw bits.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Whether `player` is in the set.
    pub fn contains(self, player: usize) -> bool {
        player < MAX_PLAYERS && self.0 & (1u32 << player) != 0
    }

    /// Adds `player` to the set.
    pub fn insert(&mut self, player: usize) {
        debug_assert!(player < MAX_PLAYERS, "player index {player} exceeds mask width");
        self.0 |= 1u32 << player;
    }

    /// Removes `player` from the set.
    pub fn remove(&mut self, player: usize) {
        debug_assert!(player < MAX_PLAYERS, "player index {player} exceeds mask width");
        self.0 &= !(1u32 << player);
    }

    /// Number of members.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set has no members.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members of either set.
    pub fn union(self, other: PlayerMask) -> PlayerMask {
        PlayerMask(self.0 | other.0)
    }

    /// Members of both sets.
    pub fn intersection(self, other: PlayerMask) -> PlayerMask {
        PlayerMask(self.0 & other.0)
    }

    /// Members of `self` that are not in `other`.
    pub fn difference(self, other: PlayerMask) -> PlayerMask {
        PlayerMask(self.0 & !other.0)
    }

    /// Members in ascending index order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        let bits = self.0;
        (0..MAX_PLAYERS).filter(move |&i| bits & (1u32 << i) != 0)
    }

    /// Picks one member uniformly at random, or `None` if empty.
    pub fn random_member<R: Rng>(self, rng: &mut R) -> Option<usize> {
        let count = self.len();
        if count == 0 {
            return None;
        }
        let nth = rng.random_range(0..count);
        self.iter().nth(nth)
    }
}

impl FromIterator<usize> for PlayerMask {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut mask = PlayerMask::EMPTY;
        for player in iter {
            mask.insert(player);
        }
        mask
    }
}
