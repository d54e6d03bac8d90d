//! Markdown emphasis stripping for generated answers
//!
//! Display cleanup only: `**x**`, `__x__`, `*x*` and `_x_` collapse to `x`.
//! Double delimiters go first so `**x**` never degrades into `*x*`.

use regex::Regex;
use std::sync::OnceLock;

struct EmphasisPatterns {
    bold_asterisk: Regex,
    bold_underscore: Regex,
    italic_asterisk: Regex,
    italic_underscore: Regex,
}

fn patterns() -> &'static EmphasisPatterns {
    static PATTERNS: OnceLock<EmphasisPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| EmphasisPatterns {
        bold_asterisk: Regex::new(r"\*\*([^*]+)\*\*").expect("Invalid regex"),
        bold_underscore: Regex::new(r"__([^_]+)__").expect("Invalid regex"),
        italic_asterisk: Regex::new(r"\*([^*]+)\*").expect("Invalid regex"),
        italic_underscore: Regex::new(r"_([^_]+)_").expect("Invalid regex"),
    })
}

/// Remove single and double emphasis markers, keeping the inner text
pub fn strip_emphasis(text: &str) -> String {
    let p = patterns();
    let text = p.bold_asterisk.replace_all(text, "$1");
    let text = p.bold_underscore.replace_all(&text, "$1");
    let text = p.italic_asterisk.replace_all(&text, "$1");
    p.italic_underscore.replace_all(&text, "$1").into_owned()
}
