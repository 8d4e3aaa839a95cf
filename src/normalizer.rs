use crate::resolver::canonical_label;

/// Appended so comparison-only formulas still yield a number.
pub const NUMERIC_SUFFIX: &str = "*1";

/// Full normalization: [`prepare`] followed by [`coerce_numeric`].
pub fn normalize(expr: &str) -> String {
    coerce_numeric(&prepare(expr))
}

/// Authoring cleanup that runs before tokenizing:
/// drop a leading `=`, rewrite `and`/`or`/`<>`, strip whitespace and the
/// colon/full-width parenthesis noise labels carry.
pub fn prepare(expr: &str) -> String {
    let expr = expr.strip_prefix('=').unwrap_or(expr);
    let rewritten = rewrite_operators(expr);
    let compact: String = rewritten.chars().filter(|c| !c.is_whitespace()).collect();
    canonical_label(&compact)
}

/// Wrap and append [`NUMERIC_SUFFIX`]. The parentheses keep the suffix from
/// binding to the last operand only (`a||b*1`).
pub fn coerce_numeric(expr: &str) -> String {
    format!("({expr}){NUMERIC_SUFFIX}")
}

fn is_word_char(c: char) -> bool {
    c == '_' || c == '.' || c.is_alphanumeric()
}

/// Replace whole-word `and`/`or` and the `<>` pair with the engine's
/// `&&`, `||` and `!=`. Case-sensitive; words inside identifiers are left
/// alone (`brand`, `order`). Keywords are ASCII, so a switch between ASCII and
/// non-ASCII text also ends a word (`甲and乙`).
fn rewrite_operators(expr: &str) -> String {
    let chars: Vec<char> = expr.chars().collect();
    let mut out = String::with_capacity(expr.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if is_word_char(c) {
            let start = i;
            while i < chars.len() && is_word_char(chars[i]) && chars[i].is_ascii() == c.is_ascii() {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            match word.as_str() {
                "and" => out.push_str("&&"),
                "or" => out.push_str("||"),
                _ => out.push_str(&word),
            }
            continue;
        }
        if c == '<' && chars.get(i + 1) == Some(&'>') {
            out.push_str("!=");
            i += 2;
            continue;
        }
        out.push(c);
        i += 1;
    }
    out
}
