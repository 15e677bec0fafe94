// ============================================================
// Layer 4: Review Preprocessor
// ============================================================
// Cleans raw IMDB review text before tokenisation.
//
// IMDB reviews are scraped HTML fragments, so they contain:
//   - Line-break markup ("<br />", "<br/>", "<br>")
//   - Non-breaking spaces (U+00A0)
//   - Tabs, carriage returns and stray control characters
//   - Runs of spaces left behind by the markup
//
// Without cleaning, "br" ends up as one of the most frequent
// tokens and takes a slot in the capped vocabulary.
//
// Cleaning steps (applied in order):
//   1. Replace <br> variants with a space
//   2. Map whitespace/control characters to a plain space
//   3. Collapse runs of spaces and trim the ends

const LINE_BREAKS: [&str; 3] = ["<br />", "<br/>", "<br>"];

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean one review. Output is a single line.
    pub fn clean(&self, text: &str) -> String {
        // ── Step 1: Strip line-break markup ──────────────────────────────────
        let mut step1 = text.to_string();
        for tag in LINE_BREAKS {
            if step1.contains(tag) {
                step1 = step1.replace(tag, " ");
            }
        }

        // ── Step 2 + 3: Normalise characters, collapse spaces ─────────────────
        let mut out        = String::with_capacity(step1.len());
        let mut last_space = true; // drops leading spaces

        for c in step1.chars() {
            let c = match c {
                '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => ' ',
                c if c.is_whitespace() || c.is_control() => ' ',
                c => c,
            };
            if c == ' ' {
                if !last_space {
                    out.push(' ');
                }
                last_space = true;
            } else {
                out.push(c);
                last_space = false;
            }
        }

        out.trim_end().to_string()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_line_break_markup() {
        let p = Preprocessor::new();
        assert_eq!(
            p.clean("Great acting.<br /><br />Weak plot.<br>End"),
            "Great acting. Weak plot. End"
        );
    }

    #[test]
    fn test_collapses_whitespace_and_trims() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("  hello \t\r\n  world\u{00A0} "), "hello world");
    }

    #[test]
    fn test_removes_control_chars() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("hello\x01world"), "hello world");
    }

    #[test]
    fn test_empty_string() {
        let p = Preprocessor::new();
        assert_eq!(p.clean(""), "");
        assert_eq!(p.clean("<br />"), "");
    }
}
