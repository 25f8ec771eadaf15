//! # Text Layout
//!
//! Word wrapping and text measurement. This is the measurement pass the
//! layout engine runs before committing a paragraph to a page: the number
//! of wrapped lines decides how tall the section is.
//!
//! Break opportunities come from UAX#14, so explicit newlines in a
//! description become mandatory breaks and long unbroken tokens (plate
//! numbers, URLs) are force-split at the column edge.

use crate::font::{FontContext, StandardFont};
use unicode_linebreak::{linebreaks, BreakOpportunity};

/// A line of text after line-breaking.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenLine {
    /// The text as a string, without trailing whitespace.
    pub text: String,
    /// Width of the visible text in points.
    pub width: f64,
}

/// Compute UAX#14 break opportunities indexed by char position.
///
/// Returns a vec of length `text.chars().count()`. Each entry is the break
/// opportunity *before* that character position (i.e. "can we break before
/// char[i]?"). Index 0 is always `None` (no break before the first char).
fn compute_break_opportunities(text: &str) -> Vec<Option<BreakOpportunity>> {
    let char_count = text.chars().count();
    let mut result = vec![None; char_count];

    // linebreaks() yields (byte_offset, opportunity) where byte_offset is the
    // start of the next segment. Convert to char indices.
    let byte_to_char: Vec<usize> = {
        let mut map = vec![0usize; text.len() + 1];
        let mut char_idx = 0;
        for (byte_idx, _) in text.char_indices() {
            map[byte_idx] = char_idx;
            char_idx += 1;
        }
        map[text.len()] = char_idx;
        map
    };

    for (byte_offset, opp) in linebreaks(text) {
        let char_idx = byte_to_char[byte_offset];
        if char_idx < char_count {
            result[char_idx] = Some(opp);
        }
    }

    result
}

fn is_newline(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[derive(Debug, Default)]
pub struct TextLayout;

impl TextLayout {
    pub fn new() -> Self {
        Self
    }

    /// Break a string into lines that fit within `max_width`.
    ///
    /// Greedy: each line takes as many words as fit. An empty string yields
    /// a single empty line, so an empty paragraph still occupies one line.
    pub fn break_into_lines(
        &self,
        font_context: &FontContext,
        text: &str,
        max_width: f64,
        font: StandardFont,
        font_size: f64,
    ) -> Vec<BrokenLine> {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return vec![BrokenLine {
                text: String::new(),
                width: 0.0,
            }];
        }

        let char_widths: Vec<f64> = chars
            .iter()
            .map(|&ch| {
                if is_newline(ch) {
                    0.0
                } else {
                    font_context.char_width(ch, font, font_size)
                }
            })
            .collect();
        let break_opps = compute_break_opportunities(text);

        let mut lines = Vec::new();
        let mut line_start = 0;
        let mut line_width = 0.0;
        let mut last_break_point: Option<usize> = None;

        for (i, &ch) in chars.iter().enumerate() {
            if i > 0 {
                match break_opps[i] {
                    Some(BreakOpportunity::Mandatory) => {
                        lines.push(self.make_line(&chars[line_start..i], &char_widths[line_start..i]));
                        line_start = i;
                        line_width = 0.0;
                        last_break_point = None;
                    }
                    // A break before char[i] ends the line at char[i-1].
                    Some(BreakOpportunity::Allowed) => last_break_point = Some(i),
                    None => {}
                }
            }

            if is_newline(ch) {
                continue;
            }

            let char_width = char_widths[i];
            if line_width + char_width > max_width && line_start < i && !ch.is_whitespace() {
                let break_at = match last_break_point {
                    Some(bp) if bp > line_start => bp,
                    // No break point: force break at current position
                    _ => i,
                };
                lines.push(self.make_line(
                    &chars[line_start..break_at],
                    &char_widths[line_start..break_at],
                ));
                line_start = break_at;
                line_width = char_widths[line_start..=i].iter().sum();
                last_break_point = None;
                continue;
            }

            line_width += char_width;
        }

        lines.push(self.make_line(&chars[line_start..], &char_widths[line_start..]));
        lines
    }

    fn make_line(&self, chars: &[char], widths: &[f64]) -> BrokenLine {
        let mut end = chars.len();
        while end > 0 && chars[end - 1].is_whitespace() {
            end -= 1;
        }
        BrokenLine {
            text: chars[..end].iter().collect(),
            width: widths[..end].iter().sum(),
        }
    }

    /// Measure the width of a string on a single line.
    pub fn measure_width(
        &self,
        font_context: &FontContext,
        text: &str,
        font: StandardFont,
        font_size: f64,
    ) -> f64 {
        font_context.measure_string(text, font, font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str, max_width: f64) -> Vec<String> {
        TextLayout::new()
            .break_into_lines(&FontContext::new(), text, max_width, StandardFont::Helvetica, 10.0)
            .into_iter()
            .map(|l| l.text)
            .collect()
    }

    #[test]
    fn empty_text_is_one_line() {
        assert_eq!(lines("", 100.0), vec![String::new()]);
    }

    #[test]
    fn short_text_fits_on_one_line() {
        assert_eq!(lines("Telhas deslocadas", 500.0), vec!["Telhas deslocadas"]);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let wrapped = lines("aaa bbb ccc ddd", 40.0);
        assert!(wrapped.len() > 1);
        for line in &wrapped {
            assert!(!line.ends_with(' '));
            assert!(!line.starts_with(' '));
        }
        assert_eq!(wrapped.join(" "), "aaa bbb ccc ddd");
    }

    #[test]
    fn lines_respect_max_width() {
        let ctx = FontContext::new();
        let text = "Fissuras diagonais nas alvenarias de vedação com abertura superior a um milímetro próximas às aberturas";
        let broken = TextLayout::new().break_into_lines(&ctx, text, 120.0, StandardFont::Helvetica, 10.0);
        assert!(broken.len() >= 3);
        for line in &broken {
            assert!(line.width <= 120.0 + 0.001, "line too wide: {:?}", line);
        }
    }

    #[test]
    fn newline_forces_break() {
        assert_eq!(lines("primeira\nsegunda", 500.0), vec!["primeira", "segunda"]);
    }

    #[test]
    fn long_word_is_force_split() {
        let wrapped = lines("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAA", 50.0);
        assert!(wrapped.len() > 1);
        assert_eq!(wrapped.concat(), "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");
    }

    #[test]
    fn measure_width_matches_font_context() {
        let ctx = FontContext::new();
        let w = TextLayout::new().measure_width(&ctx, "abc", StandardFont::HelveticaBold, 10.0);
        assert!((w - ctx.measure_string("abc", StandardFont::HelveticaBold, 10.0)).abs() < 1e-9);
    }
}
