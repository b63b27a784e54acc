//! Locale-aware ordering for ingredient names.
//!
//! A small multi-level comparison in the spirit of the Unicode collation
//! algorithm. Names are lower-cased and canonically decomposed (NFD), then
//! compared by base letters first, by combining marks second and by case
//! last, lowercase first. Ukrainian and Russian letters keep their alphabet
//! position instead of being folded onto their base letter.

use std::cmp::Ordering;
use unicode_normalization::char::{decompose_canonical, is_combining_mark};

/// Accent slot of a base letter; combining marks follow it
const BASE: char = '\0';
/// Pseudo marks for letters with no canonical decomposition
const STROKE: char = '\u{0338}';
const LIGATURE: char = '\u{035C}';

/// Compare two names for display ordering
pub fn compare(a: &str, b: &str) -> Ordering {
    let (key_a, key_b) = (SortKey::new(a), SortKey::new(b));
    key_a
        .primary
        .cmp(&key_b.primary)
        .then_with(|| key_a.accents.cmp(&key_b.accents))
        .then_with(|| case_weights(a).cmp(case_weights(b)))
        .then_with(|| a.cmp(b))
}

/// Primary weights of the base letters and the marks attached to each of them
#[derive(Debug, Default)]
struct SortKey {
    primary: Vec<u32>,
    accents: Vec<char>,
}

impl SortKey {
    fn new(s: &str) -> Self {
        let mut key = SortKey::default();
        for c in s.chars().flat_map(char::to_lowercase) {
            if let Some(weight) = alphabet_weight(c) {
                key.push_base(weight);
            } else if let Some((letters, mark)) = expansion(c) {
                letters.chars().for_each(|letter| key.push_base(primary(letter)));
                key.accents.push(mark);
            } else {
                decompose_canonical(c, |part| {
                    if is_combining_mark(part) {
                        key.accents.push(part);
                    } else {
                        key.push_base(primary(part));
                    }
                });
            }
        }
        key
    }

    fn push_base(&mut self, weight: u32) {
        self.primary.push(weight);
        self.accents.push(BASE);
    }
}

fn case_weights(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.chars().map(char::is_uppercase)
}

fn primary(c: char) -> u32 {
    c as u32 * 4
}

/// Cyrillic letters that are letters of their own rather than accented
/// variants, moved next to their alphabet neighbours
fn alphabet_weight(c: char) -> Option<u32> {
    let weight = match c {
        'ё' => after('е', 1),
        'є' => after('е', 2),
        'ґ' => after('г', 1),
        'і' => after('и', 1),
        'ї' => after('и', 2),
        'й' => after('и', 3),
        _ => return None,
    };
    Some(weight)
}

fn after(base: char, offset: u32) -> u32 {
    primary(base) + offset
}

/// Letters that do not decompose canonically
fn expansion(c: char) -> Option<(&'static str, char)> {
    let expanded = match c {
        'ø' => ("o", STROKE),
        'ł' => ("l", STROKE),
        'đ' => ("d", STROKE),
        'ħ' => ("h", STROKE),
        'ŧ' => ("t", STROKE),
        'ı' => ("i", STROKE),
        'œ' => ("oe", LIGATURE),
        'æ' => ("ae", LIGATURE),
        'ß' => ("ss", LIGATURE),
        _ => return None,
    };
    Some(expanded)
}
