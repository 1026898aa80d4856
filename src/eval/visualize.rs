//! Side-by-side HTML view of an evaluation.

use html_escape::encode_text;

use crate::render::PageText;

use super::{Evaluation, Token, MAX_MISSING};

/// Background shades by miss count: `(full, softened)`.
pub const RAMP: [(&str, &str); MAX_MISSING as usize + 1] = [
    ("white", "white"),
    ("rgba(255, 255, 0, 0.6)", "rgba(255, 255, 0, 0.2)"),
    ("rgba(255, 166, 0, 0.6)", "rgba(255, 166, 0, 0.2)"),
    ("rgba(255, 0, 0, 0.6)", "rgba(255, 0, 0, 0.2)"),
    ("rgba(139, 0, 0, 0.6)", "rgba(139, 0, 0, 0.2)"),
];

const STYLE: &str = r#"
      html {
        font-family: "Helvetica", sans-serif;
      }
      .columns {
        display: grid;
        grid-template-columns: 50% 50%;
      }
      .columns > div {
        padding: 1rem;
        border-left: 1.5px solid rgba(0, 0, 0, 0.2);
        border-right: 1.5px solid rgba(0, 0, 0, 0.2);
      }
"#;

/// Renders reference tokens coloured by miss count next to the generated text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Visualizer;

impl Visualizer {
    /// Create a visualizer.
    pub fn new() -> Self {
        Self
    }

    /// Background shade for a token.
    ///
    /// Tokens near a paragraph gap get the softened shade since their
    /// misses are expected.
    pub fn shade(token: &Token) -> &'static str {
        let level = token.missing_count.min(MAX_MISSING) as usize;
        let (full, soft) = RAMP[level];
        if token.border.is_border() {
            soft
        } else {
            full
        }
    }

    /// Render the view for one page.
    pub fn render(&self, evaluation: &Evaluation, text: &PageText, source: &str, page: u32) -> String {
        let mut out = String::new();
        let title = format!("Evaluation of page {} of {}", page, source);

        out.push_str("<!DOCTYPE html>\n<html>\n  <head>\n");
        out.push_str("    <meta charset=\"UTF-8\" />\n");
        out.push_str(&format!("    <title>{}</title>\n", encode_text(&title)));
        out.push_str(&format!("    <style type=\"text/css\">{}    </style>\n", STYLE));
        out.push_str("  </head>\n  <body>\n    <div class=\"columns\">\n");

        out.push_str("      <div>\n        <p>");
        out.push_str(&Self::reference_column(&evaluation.reference));
        out.push_str("</p>\n      </div>\n");

        out.push_str("      <div>\n");
        out.push_str(&format!("        <p>{}</p>\n", lines_to_html(&text.body)));
        out.push_str("        <h1>HEADER</h1>\n");
        out.push_str(&format!("        <p>{}</p>\n", lines_to_html(&text.header)));
        out.push_str("      </div>\n");

        out.push_str("    </div>\n  </body>\n</html>\n");
        out
    }

    fn reference_column(tokens: &[Token]) -> String {
        let mut out = String::new();
        let mut line = 0;
        for token in tokens {
            if let Some(token_line) = token.line {
                if token_line > line {
                    out.push_str(&"<br/>".repeat(token_line - line));
                    line = token_line;
                }
            }
            out.push_str(&format!(
                "<span style=\"background-color: {}\">{}</span> ",
                Self::shade(token),
                encode_text(&token.text)
            ));
        }
        out
    }
}

fn lines_to_html(text: &str) -> String {
    text.lines()
        .map(|l| encode_text(l).into_owned())
        .collect::<Vec<_>>()
        .join("<br/>\n")
}
