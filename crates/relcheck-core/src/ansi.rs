//! ANSI escape rendering for HTML log artifacts.
//!
//! Test runners color their output with SGR escape sequences. The HTML log
//! keeps those colors as inline-styled `<span>`s so a browser shows what
//! the console showed. Other CSI sequences (cursor movement, line erase)
//! are stripped, and newlines become `<br>` line breaks.

use regex::Regex;

/// Standard foreground palette for SGR 30-37.
const FG: [&str; 8] = [
    "#073642", "#dc322f", "#859900", "#b58900", "#268bd2", "#d33682", "#2aa198", "#eee8d5",
];

/// Bright foreground palette for SGR 90-97.
const FG_BRIGHT: [&str; 8] = [
    "#002b36", "#cb4b16", "#586e75", "#657b83", "#839496", "#6c71c4", "#93a1a1", "#fdf6e3",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Style {
    fg: Option<&'static str>,
    bold: bool,
}

impl Style {
    fn is_default(&self) -> bool {
        *self == Style::default()
    }

    fn attr(&self) -> String {
        let mut parts = Vec::new();
        if let Some(color) = self.fg {
            parts.push(format!("color:{color}"));
        }
        if self.bold {
            parts.push("font-weight:bold".to_string());
        }
        parts.join(";")
    }

    /// Apply one SGR parameter list (the text between `ESC[` and `m`).
    fn apply(&mut self, params: &str) {
        for param in params.split(';') {
            let code: u8 = param.trim().parse().unwrap_or(0);
            match code {
                0 => *self = Style::default(),
                1 => self.bold = true,
                22 => self.bold = false,
                30..=37 => self.fg = Some(FG[(code - 30) as usize]),
                39 => self.fg = None,
                90..=97 => self.fg = Some(FG_BRIGHT[(code - 90) as usize]),
                _ => {}
            }
        }
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn render_text(text: &str, out: &mut String) {
    out.push_str(&escape_html(text).replace('\n', "<br>\n"));
}

/// Convert captured console output to an HTML fragment.
pub fn ansi_to_html(input: &str) -> String {
    // First alternative captures SGR parameters; the second swallows any
    // other CSI sequence so it is dropped from the output.
    let csi = match Regex::new(r"\x1b\[([0-9;]*)m|\x1b\[[0-9;?]*[A-Za-z]") {
        Ok(re) => re,
        Err(_) => {
            let mut out = String::new();
            render_text(input, &mut out);
            return out;
        }
    };

    let mut out = String::new();
    let mut style = Style::default();
    let mut span_open = false;
    let mut cursor = 0;

    for capture in csi.captures_iter(input) {
        let m = match capture.get(0) {
            Some(m) => m,
            None => continue,
        };
        render_text(&input[cursor..m.start()], &mut out);
        cursor = m.end();

        let Some(params) = capture.get(1) else {
            // Non-SGR control sequence; stripped.
            continue;
        };

        let mut next = style;
        next.apply(params.as_str());
        if next == style {
            continue;
        }
        if span_open {
            out.push_str("</span>");
            span_open = false;
        }
        if !next.is_default() {
            out.push_str(&format!("<span style=\"{}\">", next.attr()));
            span_open = true;
        }
        style = next;
    }

    render_text(&input[cursor..], &mut out);
    if span_open {
        out.push_str("</span>");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_escaped() {
        assert_eq!(ansi_to_html("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
    }

    #[test]
    fn test_newlines_become_breaks() {
        assert_eq!(ansi_to_html("one\ntwo\n"), "one<br>\ntwo<br>\n");
    }

    #[test]
    fn test_colored_span() {
        assert_eq!(
            ansi_to_html("\x1b[31mFAIL\x1b[0m ok"),
            "<span style=\"color:#dc322f\">FAIL</span> ok"
        );
    }

    #[test]
    fn test_bold_span() {
        assert_eq!(
            ansi_to_html("\x1b[1mloud\x1b[0m"),
            "<span style=\"font-weight:bold\">loud</span>"
        );
    }

    #[test]
    fn test_combined_parameters() {
        assert_eq!(
            ansi_to_html("\x1b[0;32mPASS\x1b[0m"),
            "<span style=\"color:#859900\">PASS</span>"
        );
    }

    #[test]
    fn test_unclosed_span_closed_at_end() {
        assert_eq!(
            ansi_to_html("\x1b[33mwarning"),
            "<span style=\"color:#b58900\">warning</span>"
        );
    }

    #[test]
    fn test_bright_palette() {
        assert_eq!(
            ansi_to_html("\x1b[91mhot\x1b[39m"),
            "<span style=\"color:#cb4b16\">hot</span>"
        );
    }

    #[test]
    fn test_cursor_sequences_stripped() {
        assert_eq!(ansi_to_html("a\x1b[2Kb\x1b[1Ac"), "abc");
    }

    #[test]
    fn test_style_spans_lines() {
        assert_eq!(
            ansi_to_html("\x1b[31mone\ntwo\x1b[0m"),
            "<span style=\"color:#dc322f\">one<br>\ntwo</span>"
        );
    }

    #[test]
    fn test_redundant_sgr_does_not_split_span() {
        assert_eq!(
            ansi_to_html("\x1b[31mred\x1b[31mstill\x1b[0m"),
            "<span style=\"color:#dc322f\">redstill</span>"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(ansi_to_html(""), "");
    }
}
