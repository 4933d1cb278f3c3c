//! The line grammar of the input files, compiled once per process.

use std::sync::LazyLock;

use regex::Regex;

pub(crate) const FIELD_SEPARATOR: char = 'ç';
pub(crate) const ITEM_SEPARATOR: char = ',';
pub(crate) const ITEM_FIELD_SEPARATOR: char = '-';
pub(crate) const ITEM_LIST_START: char = '[';
pub(crate) const ITEM_LIST_END: char = ']';

/// Number of fields every known record kind consists of, the code included.
pub(crate) const RECORD_FIELDS: usize = 4;

// one or more words separated by whitespace; `\w` is unicode-aware
const WORDS: &str = r"\w+(?:\s+\w+)*";
const INTEGER: &str = "[0-9]+";
const DECIMAL: &str = r"[0-9]+(?:\.[0-9]+)?";

pub(crate) struct Grammar {
    pub(crate) line: Regex,
    pub(crate) salesperson: Regex,
    pub(crate) client: Regex,
    pub(crate) sale: Regex,
    pub(crate) integer: Regex,
    pub(crate) decimal: Regex,
}

pub(crate) static GRAMMAR: LazyLock<Grammar> = LazyLock::new(Grammar::compile);

impl Grammar {
    fn compile() -> Self {
        let s = FIELD_SEPARATOR;
        let field = format!("[^{s}]+");
        Self {
            line: pattern(&format!("^([0-9]{{3}})(?:{s}{field}){{3,}}$")),
            salesperson: pattern(&format!(
                "^[0-9]{{3}}{s}({field}){s}({WORDS}){s}({DECIMAL})$"
            )),
            client: pattern(&format!("^[0-9]{{3}}{s}({field}){s}({WORDS}){s}({WORDS})$")),
            sale: pattern(&format!("^[0-9]{{3}}{s}({INTEGER}){s}({field}){s}({WORDS})$")),
            integer: pattern(&format!("^{INTEGER}$")),
            decimal: pattern(&format!("^{DECIMAL}$")),
        }
    }
}

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("grammar patterns are valid regular expressions")
}
