use std::collections::HashMap;

use itertools::Itertools;
use tracing::debug;

use crate::errors::{EvalError, Result};
use crate::script::ScriptTable;

/// Zip titles with names positionally: `titles[i]` resolves to `names[i]`.
pub fn build_title_map<T, N>(titles: &[T], names: &[N]) -> Result<HashMap<String, String>>
where
    T: AsRef<str>,
    N: AsRef<str>,
{
    if titles.len() != names.len() {
        return Err(EvalError::ArityMismatch {
            titles: titles.len(),
            names: names.len(),
        });
    }
    Ok(titles
        .iter()
        .zip(names)
        .map(|(t, n)| (canonical_label(t.as_ref()), n.as_ref().to_string()))
        .collect())
}

/// Output of [`substitute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub expression: String,
    /// Field names that replaced a label, first occurrence order, no repeats.
    pub referenced: Vec<String>,
}

/// Replace every label token found in `title_map` with its field name.
///
/// Only whole tokens are matched, so a short label never hits inside a longer
/// one. Unknown labels are kept verbatim.
pub fn substitute<S: AsRef<str>>(
    tokens: &[S],
    title_map: &HashMap<String, String>,
    script: &ScriptTable,
) -> Substitution {
    let mut expression = String::new();
    let mut referenced = Vec::new();
    for tok in tokens {
        let tok = tok.as_ref();
        if !script.contains_label_script(tok) {
            expression.push_str(tok);
            continue;
        }
        match title_map.get(tok) {
            Some(name) if !name.trim().is_empty() => {
                expression.push_str(name);
                referenced.push(name.clone());
            }
            _ => {
                debug!(label = tok, "label has no field name, kept as written");
                expression.push_str(tok);
            }
        }
    }
    Substitution {
        expression,
        referenced: referenced.into_iter().unique().collect(),
    }
}

/// Drop colons and full-width parentheses, which authors use freely inside
/// labels (`利息支出（元）：`), so formula text and titles compare equal.
pub fn canonical_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !matches!(c, ':' | '：' | '（' | '）'))
        .collect()
}

/// Split a comma-delimited list, trimming entries and dropping empty ones.
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{tokenize, Delimiters};
    use pretty_assertions::assert_eq;

    fn map() -> HashMap<String, String> {
        build_title_map(&["利息支出", "利息支出合计", "劳务费"], &["interest", "interestTotal", "labor"]).unwrap()
    }

    #[test]
    fn arity_mismatch_is_rejected() {
        let err = build_title_map(&["a", "b"], &["x"]).unwrap_err();
        assert_eq!(err, EvalError::ArityMismatch { titles: 2, names: 1 });
    }

    #[test]
    fn replaces_whole_tokens_only() {
        let toks = tokenize("利息支出合计-利息支出+劳务费", &Delimiters::default());
        let sub = substitute(&toks, &map(), &ScriptTable::cjk());
        assert_eq!(sub.expression, "interestTotal-interest+labor");
        assert_eq!(sub.referenced, vec!["interestTotal", "interest", "labor"]);
    }

    #[test]
    fn unknown_labels_and_ascii_pass_through() {
        let toks = tokenize("未知费用+labor*2", &Delimiters::default());
        let sub = substitute(&toks, &map(), &ScriptTable::cjk());
        assert_eq!(sub.expression, "未知费用+labor*2");
        assert!(sub.referenced.is_empty());
    }

    #[test]
    fn repeated_labels_are_recorded_once() {
        let toks = tokenize("劳务费/劳务费", &Delimiters::default());
        let sub = substitute(&toks, &map(), &ScriptTable::cjk());
        assert_eq!(sub.referenced, vec!["labor"]);
    }

    #[test]
    fn titles_are_canonicalized() {
        let m = build_title_map(&["工资（元）："], &["salary"]).unwrap();
        assert_eq!(m.get("工资元").map(String::as_str), Some("salary"));
    }

    #[test]
    fn split_list_drops_blanks() {
        assert_eq!(split_list(" a, b,,c ,"), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }
}
