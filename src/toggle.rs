#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use std::ops::Deref;

/// A bitmask of wall colors that have been toggled an odd number of times.
///
/// Bit `c` set means every wall of color `c` has its active state flipped
/// relative to the initial configuration. Only bits below
/// [crate::MAX_COLORS] are ever set by the solver.
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToggleState(u64);

impl ToggleState {
    /// No colors toggled.
    pub const CLEAR: ToggleState = ToggleState(0);

    /// Returns a state with the given color toggled.
    #[inline]
    #[must_use]
    pub fn flip(&self, color: u8) -> ToggleState {
        debug_assert!(color < 64);
        ToggleState(self.0 ^ (1 << color))
    }

    /// Returns true if the given color has been toggled an odd number of times.
    #[inline]
    #[must_use]
    pub fn is_toggled(&self, color: u8) -> bool {
        debug_assert!(color < 64);
        self.0 & (1 << color) != 0
    }

    /// Iterate the toggled colors in ascending order.
    #[inline]
    pub fn colors(&self) -> impl Iterator<Item = u8> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let color = bits.trailing_zeros() as u8;
            bits &= bits - 1;
            Some(color)
        })
    }
}

impl Deref for ToggleState {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_flip() {
        let state = ToggleState::CLEAR;
        assert!(!state.is_toggled(3));

        let state = state.flip(3);
        assert!(state.is_toggled(3));
        assert!(!state.is_toggled(0));

        let state = state.flip(3);
        assert_eq!(state, ToggleState::CLEAR);
    }

    #[test]
    fn test_colors() {
        let state = ToggleState::CLEAR.flip(0).flip(5).flip(7);
        let colors: Vec<u8> = state.colors().collect();
        assert_eq!(colors, vec![0, 5, 7]);

        assert_eq!(ToggleState::CLEAR.colors().count(), 0);
    }
}
