//! Variation-range grammar: which lettered variations a drill covers.
//!
//! The user writes entries like `A`, `A-C`, `B D`, separated by commas
//! or whitespace. Letters map to sibling slots: `A` is a node's first
//! child, `B` the second, and so on.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariationRange {
    /// Every variation is in scope.
    All,
    /// Only the listed slot intervals (inclusive, zero-based).
    Selected(Vec<(usize, usize)>),
}

impl Default for VariationRange {
    fn default() -> VariationRange {
        VariationRange::All
    }
}

impl VariationRange {
    /// Parse the textual form. A blank string, or one with no entry
    /// that can be understood, covers every variation.
    pub fn parse(text: &str) -> VariationRange {
        let mut intervals = Vec::new();
        for entry in text.split(|c: char| c == ',' || c.is_whitespace()) {
            if entry.is_empty() {
                continue;
            }
            if let Some(interval) = parse_entry(entry) {
                intervals.push(interval);
            }
        }
        if intervals.is_empty() {
            VariationRange::All
        } else {
            VariationRange::Selected(intervals)
        }
    }

    /// Whether the variation at the given sibling slot is in scope.
    pub fn allows(&self, slot: usize) -> bool {
        match self {
            VariationRange::All => true,
            VariationRange::Selected(intervals) => intervals
                .iter()
                .any(|&(lo, hi)| (lo..=hi).contains(&slot)),
        }
    }
}

fn parse_entry(entry: &str) -> Option<(usize, usize)> {
    let mut parts = entry.splitn(2, '-');
    let lo = letter_slot(parts.next()?)?;
    let hi = match parts.next() {
        Some(part) => letter_slot(part)?,
        None => lo,
    };
    Some((lo.min(hi), lo.max(hi)))
}

fn letter_slot(part: &str) -> Option<usize> {
    let mut chars = part.chars();
    let letter = chars.next()?;
    if chars.next().is_some() || !letter.is_ascii_alphabetic() {
        return None;
    }
    Some(letter.to_ascii_uppercase() as usize - 'A' as usize)
}
