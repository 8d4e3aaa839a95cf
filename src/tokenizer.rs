use crate::errors::{EvalError, Result};
use crate::script::ScriptTable;

/// Arithmetic, comparison, logical and grouping symbols.
pub const DEFAULT_DELIMITERS: &str = "+-*/%^()><=!&|";

/// A validated set of single-character delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    chars: Vec<char>,
}

impl Delimiters {
    /// Build a delimiter set, rejecting characters of the label script:
    /// such a delimiter would silently split labels apart.
    pub fn new(chars: &str, script: &ScriptTable) -> Result<Self> {
        let mut set: Vec<char> = Vec::with_capacity(chars.len());
        for c in chars.chars() {
            if script.is_label_script(c) {
                return Err(EvalError::DelimiterConflict(c));
            }
            if !set.contains(&c) {
                set.push(c);
            }
        }
        Ok(Self { chars: set })
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    pub fn as_string(&self) -> String {
        self.chars.iter().collect()
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            chars: DEFAULT_DELIMITERS.chars().collect(),
        }
    }
}

/// Split `content` into tokens: each delimiter is a token of its own and each
/// maximal run of other characters is one token.
pub fn tokenize(content: &str, delimiters: &Delimiters) -> Vec<String> {
    let mut out = Vec::new();
    let mut run = String::new();
    for c in content.chars() {
        if delimiters.contains(c) {
            if !run.is_empty() {
                out.push(std::mem::take(&mut run));
            }
            out.push(c.to_string());
        } else {
            run.push(c);
        }
    }
    if !run.is_empty() {
        out.push(run);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_labels_and_operators() {
        let toks = tokenize("(本月利息支出-上月利息支出)/上月利息支出*100", &Delimiters::default());
        assert_eq!(
            toks,
            vec!["(", "本月利息支出", "-", "上月利息支出", ")", "/", "上月利息支出", "*", "100"]
        );
    }

    #[test]
    fn keeps_multi_char_runs_and_repeated_delimiters() {
        let toks = tokenize("a1>=1.08||b", &Delimiters::default());
        assert_eq!(toks, vec!["a1", ">", "=", "1.08", "|", "|", "b"]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(tokenize("", &Delimiters::default()).is_empty());
    }

    #[test]
    fn rejects_label_script_delimiter() {
        let err = Delimiters::new("+-（", &ScriptTable::cjk()).unwrap_err();
        assert_eq!(err, EvalError::DelimiterConflict('（'));
    }

    #[test]
    fn custom_delimiters_dedupe() {
        let d = Delimiters::new("++-", &ScriptTable::cjk()).unwrap();
        assert_eq!(d.as_string(), "+-");
        assert_eq!(tokenize("甲*乙+丙", &d), vec!["甲*乙", "+", "丙"]);
    }
}
