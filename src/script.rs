use serde::{Deserialize, Serialize};

/// Table of inclusive code point ranges that make up a "label" script.
///
/// Formulas are written with human labels (usually CJK) next to ASCII
/// operators and numerals. A token containing any character from this table
/// is looked up as a label; everything else passes through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptTable {
    ranges: Vec<(char, char)>,
}

impl Default for ScriptTable {
    fn default() -> Self {
        Self::cjk()
    }
}

impl ScriptTable {
    /// Empty table: nothing is label script.
    pub fn empty() -> Self {
        Self { ranges: Vec::new() }
    }

    /// CJK ideographs plus the full-width punctuation business labels carry.
    pub fn cjk() -> Self {
        Self::empty()
            .with_range('\u{3400}', '\u{4DBF}') // Extension A
            .with_range('\u{4E00}', '\u{9FFF}') // Unified Ideographs
            .with_range('\u{F900}', '\u{FAFF}') // Compatibility Ideographs
            .with_range('\u{3000}', '\u{303F}') // symbols and punctuation: 《》【】。
            .with_range('\u{FF01}', '\u{FF60}') // full-width forms: ！，（）：；？
            .with_range('\u{201C}', '\u{201D}') // “”
    }

    pub fn hangul() -> Self {
        Self::empty()
            .with_range('\u{1100}', '\u{11FF}')
            .with_range('\u{3130}', '\u{318F}')
            .with_range('\u{AC00}', '\u{D7AF}')
    }

    pub fn kana() -> Self {
        Self::empty()
            .with_range('\u{3040}', '\u{309F}')
            .with_range('\u{30A0}', '\u{30FF}')
    }

    /// Add one inclusive range. Reversed bounds are swapped.
    pub fn with_range(mut self, lo: char, hi: char) -> Self {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        self.ranges.push((lo, hi));
        self
    }

    /// Union with another table.
    pub fn extend(mut self, other: &ScriptTable) -> Self {
        self.ranges.extend(other.ranges.iter().copied());
        self
    }

    pub fn is_label_script(&self, ch: char) -> bool {
        self.ranges.iter().any(|&(lo, hi)| lo <= ch && ch <= hi)
    }

    /// A token is label content when any of its characters is label script.
    pub fn contains_label_script(&self, token: &str) -> bool {
        token.chars().any(|c| self.is_label_script(c))
    }
}
