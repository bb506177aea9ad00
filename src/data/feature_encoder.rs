// ============================================================
// Layer 4 - Feature Encoder
// ============================================================
// Turns a location or country string into the 11-slot
// FeatureVector the price heuristic consumes.
//
// Encoding steps (applied to the lowercased text):
//   1. character count
//   2. word count (split on any whitespace)
//   3. one 0/1 flag per indicator word, substring match, so
//      "Seaside Townhouse" sets the "town" flag
//   4. ASCII vowel count (a, e, i, o, u)
//   5. character count minus vowel count
//
// Counting is done in chars rather than bytes, so a name with
// accents or non-Latin script is measured the way a reader
// would count it. Digits, punctuation and spaces all land in
// the "not a vowel" slot.
//
// Reference: Rust Book §8 (Strings in Rust)
//            Rust Book §13 (Iterators)

use crate::domain::features::{
    FeatureVector, FEATURE_LEN, INDICATOR_WORDS,
    SLOT_CONSONANTS, SLOT_FIRST_FLAG, SLOT_LENGTH, SLOT_VOWELS, SLOT_WORDS,
};
use crate::domain::traits::TextEncoder;

const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

#[derive(Debug, Clone, Copy)]
pub struct FeatureEncoder;

impl FeatureEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode `text`. Total: every input, including "", yields
    /// exactly FEATURE_LEN values.
    pub fn encode(&self, text: &str) -> FeatureVector {
        let text = text.to_lowercase();
        let mut out = [0.0f64; FEATURE_LEN];

        let length = text.chars().count();
        let vowels = text.chars().filter(|c| VOWELS.contains(c)).count();

        out[SLOT_LENGTH] = length as f64;
        out[SLOT_WORDS]  = text.split_whitespace().count() as f64;

        for (i, word) in INDICATOR_WORDS.iter().enumerate() {
            if text.contains(word) {
                out[SLOT_FIRST_FLAG + i] = 1.0;
            }
        }

        out[SLOT_VOWELS]     = vowels as f64;
        out[SLOT_CONSONANTS] = (length - vowels) as f64;

        FeatureVector::new(out)
    }
}

impl Default for FeatureEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEncoder for FeatureEncoder {
    fn encode(&self, text: &str) -> FeatureVector {
        FeatureEncoder::encode(self, text)
    }
}
