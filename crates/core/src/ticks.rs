use serde::{Deserialize, Serialize};

/// Number of face positions (one per hour).
pub const TICK_COUNT: u8 = 12;
/// Angular distance between neighbouring face positions.
pub const TICK_SPACING_DEG: f64 = 30.0;

/// Set of revealed face positions, 0–11. Positions are only ever added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedTicks(u16);

impl RevealedTicks {
    const FULL: u16 = (1 << TICK_COUNT) - 1;

    pub fn new() -> Self {
        Self(0)
    }

    /// Add a position. Out-of-range indices are ignored; returns whether the
    /// set grew.
    pub fn insert(&mut self, index: u8) -> bool {
        if index >= TICK_COUNT {
            return false;
        }
        let bit = 1 << index;
        let added = self.0 & bit == 0;
        self.0 |= bit;
        added
    }

    pub fn contains(&self, index: u8) -> bool {
        index < TICK_COUNT && self.0 & (1 << index) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn is_full(&self) -> bool {
        self.0 == Self::FULL
    }

    /// Revealed positions in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + use<> {
        let set = *self;
        (0..TICK_COUNT).filter(move |&i| set.contains(i))
    }

    /// Reveal every position the sweeping hand has reached, lighting each
    /// one up `anticipation_deg` before the hand is exactly on it.
    ///
    /// Returns how many positions were newly revealed.
    pub fn reveal_through(&mut self, sweep_deg: f64, anticipation_deg: f64) -> usize {
        (0..TICK_COUNT)
            .filter(|&i| sweep_deg >= f64::from(i) * TICK_SPACING_DEG - anticipation_deg)
            .filter(|&i| self.insert(i))
            .count()
    }
}
