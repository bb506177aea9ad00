// ============================================================
// Layer 3 - FeatureVector Domain Type
// ============================================================
// An 11-slot lexical summary of a location or country string.
// The slot order is part of the contract: the price heuristic
// only ever sums the slots, but callers that log or inspect a
// vector rely on each index meaning the same thing forever.
//
//   index  0      character length
//   index  1      whitespace-separated word count
//   index  2..=8  indicator flags, one per INDICATOR_WORDS entry
//   index  9      ASCII vowel count
//   index 10      everything that is not a vowel
//
// Reference: Rust Book §5 (Structs), §8 (Arrays)

use serde::{Deserialize, Serialize};

/// Words whose presence (as a substring) sets an indicator flag
pub const INDICATOR_WORDS: [&str; 7] =
    ["city", "town", "village", "beach", "mountain", "valley", "resort"];

/// Total number of slots in every FeatureVector
pub const FEATURE_LEN: usize = 11;

pub const SLOT_LENGTH:     usize = 0;
pub const SLOT_WORDS:      usize = 1;
pub const SLOT_FIRST_FLAG: usize = 2;
pub const SLOT_VOWELS:     usize = 9;
pub const SLOT_CONSONANTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_LEN]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_LEN]) -> Self {
        Self(values)
    }

    pub fn zeros() -> Self {
        Self([0.0; FEATURE_LEN])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Sum of every slot. This is the only aggregate the
    /// price heuristic consumes.
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Value of the indicator flag for `word`, or None if the
    /// word is not part of the fixed vocabulary.
    pub fn flag(&self, word: &str) -> Option<f64> {
        INDICATOR_WORDS
            .iter()
            .position(|w| *w == word)
            .map(|i| self.0[SLOT_FIRST_FLAG + i])
    }
}

impl std::ops::Index<usize> for FeatureVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_slots_line_up_with_vowel_slot() {
        // 7 flags starting at slot 2 end right before the vowel slot
        assert_eq!(SLOT_FIRST_FLAG + INDICATOR_WORDS.len(), SLOT_VOWELS);
        assert_eq!(SLOT_CONSONANTS + 1, FEATURE_LEN);
    }

    #[test]
    fn test_flag_lookup() {
        let mut raw = [0.0; FEATURE_LEN];
        raw[SLOT_FIRST_FLAG + 3] = 1.0;
        let v = FeatureVector::new(raw);
        assert_eq!(v.flag("beach"), Some(1.0));
        assert_eq!(v.flag("city"),  Some(0.0));
        assert_eq!(v.flag("lake"),  None);
    }

    #[test]
    fn test_sum() {
        let v = FeatureVector::new([1.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 3.0, 4.0]);
        assert_eq!(v.sum(), 11.0);
        assert_eq!(FeatureVector::zeros().sum(), 0.0);
    }
}
