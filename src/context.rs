use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::script::ScriptTable;
use crate::tokenizer::{Delimiters, DEFAULT_DELIMITERS};

/// Default number of fractional digits field values are fixed to.
pub const DEFAULT_SCALE: u32 = 2;

/// Evaluation knobs. Loadable from JSON; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Context {
    /// Single-character symbols that split a formula into tokens.
    pub delimiters: String,
    /// Which characters make a token a human label.
    pub script: ScriptTable,
    /// Fractional digits kept when binding field values (half-up).
    pub scale: u32,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            delimiters: DEFAULT_DELIMITERS.to_string(),
            script: ScriptTable::default(),
            scale: DEFAULT_SCALE,
        }
    }
}

impl Context {
    pub fn with_delimiters(mut self, delimiters: &str) -> Self {
        self.delimiters = delimiters.to_string();
        self
    }

    pub fn with_script(mut self, script: ScriptTable) -> Self {
        self.script = script;
        self
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    /// Validated delimiter set for this context's script.
    pub fn delimiter_set(&self) -> Result<Delimiters> {
        Delimiters::new(&self.delimiters, &self.script)
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_keeps_defaults() {
        let ctx = Context::from_json(r#"{"scale": 4}"#).unwrap();
        assert_eq!(ctx.scale, 4);
        assert_eq!(ctx.delimiters, DEFAULT_DELIMITERS);
        assert_eq!(ctx.script, ScriptTable::cjk());
    }

    #[test]
    fn script_ranges_load_from_json() {
        let ctx = Context::from_json(r#"{"script": {"ranges": [["가", "힣"]]}}"#).unwrap();
        assert!(ctx.script.is_label_script('급'));
        assert!(!ctx.script.is_label_script('利'));
    }

    #[test]
    fn conflicting_delimiters_are_rejected() {
        let ctx = Context::default().with_delimiters("+-：");
        assert!(ctx.delimiter_set().is_err());
    }
}
