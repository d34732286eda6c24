use regex::Regex;
use std::sync::LazyLock;

// CSI sequences (ESC [ ... final byte): colors, cursor movement, clears.
static ANSI_CSI: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;?]*[ -/]*[@-~]").ok());

/// Make provider text safe to print: strip escape sequences and control
/// characters, fold line breaks and tabs into single spaces.
pub fn sanitize_for_terminal(s: &str) -> String {
    let no_ansi = match ANSI_CSI.as_ref() {
        Some(re) => re.replace_all(s, ""),
        None => s.into(),
    };

    let mut out = String::with_capacity(no_ansi.len());
    let mut pending_space = false;
    for ch in no_ansi.chars() {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if ch.is_control() {
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
    }
    out
}

/// Escape text for interpolation into HTML content or a quoted attribute.
pub fn escape_markup(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
