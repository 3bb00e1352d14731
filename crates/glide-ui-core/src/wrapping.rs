use crate::render::ELLIPSIS;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Largest line count a clamp may request.
pub const MAX_CLAMP_LINES: u8 = 6;

/// Line clamping for a block of text.
///
/// `Default` defers to the component's own default line count. `Lines(n)` outside
/// `1..=MAX_CLAMP_LINES` disables clamping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Clamp {
    #[default]
    Off,
    Default,
    Lines(u8),
}

impl Clamp {
    /// The effective line limit, given the component default used for `Clamp::Default`.
    pub fn max_lines(self, default_lines: u8) -> Option<usize> {
        let n = match self {
            Clamp::Off => return None,
            Clamp::Default => default_lines,
            Clamp::Lines(n) => n,
        };
        (1..=MAX_CLAMP_LINES).contains(&n).then_some(n as usize)
    }
}

impl From<bool> for Clamp {
    fn from(on: bool) -> Self {
        if on { Clamp::Default } else { Clamp::Off }
    }
}

impl From<u8> for Clamp {
    fn from(n: u8) -> Self {
        Clamp::Lines(n)
    }
}

fn is_soft_break(ch: char) -> bool {
    ch.is_whitespace()
        || matches!(
            ch,
            ',' | ';' | '.' | ':' | ')' | ']' | '}' | '|' | '/' | '?' | '!' | '-' | '_'
        )
}

/// Word-wraps `text` to `width` columns. Explicit newlines always start a new line.
pub fn wrap_words(text: &str, width: u16) -> Vec<String> {
    let raw = text.replace('\t', "    ");
    if width == 0 {
        return raw.lines().map(str::to_string).collect();
    }

    let max_cols = width as usize;
    let mut out: Vec<String> = Vec::new();

    for raw_line in raw.split('\n') {
        if raw_line.is_empty() {
            out.push(String::new());
            continue;
        }

        let mut line = String::new();
        let mut line_cols = 0usize;
        let mut last_soft_idx: Option<usize> = None;

        for ch in raw_line.chars() {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0);
            if line_cols.saturating_add(w) > max_cols {
                if let Some(split) = last_soft_idx {
                    let (prefix, rest) = line.split_at(split);
                    out.push(prefix.trim_end().to_string());
                    line = rest.trim_start().to_string();
                    last_soft_idx = None;
                } else if !line.is_empty() {
                    out.push(std::mem::take(&mut line));
                }
            }

            if line.is_empty() && ch.is_whitespace() {
                continue;
            }

            if is_soft_break(ch) {
                last_soft_idx = Some(line.len() + ch.len_utf8());
            }

            line.push(ch);
            line_cols = UnicodeWidthStr::width(line.as_str());
        }

        if !line.is_empty() {
            out.push(line.trim_end().to_string());
        }
    }

    out
}

/// Shortens `text` to `width` columns, replacing the overflow with an ellipsis.
pub fn truncate_to_width(text: &str, width: u16) -> String {
    if crate::render::display_width(text) <= width as usize {
        return text.replace('\t', "    ");
    }
    if width == 0 {
        return String::new();
    }
    let mut out = crate::render::slice_by_cols(text, 0, width - 1);
    out.push_str(ELLIPSIS);
    out
}

/// Wraps `text` and cuts the result to at most `limit` lines, marking the cut with an ellipsis.
pub fn wrap_clamped(text: &str, width: u16, limit: Option<usize>) -> Vec<String> {
    let mut lines = wrap_words(text, width);
    let Some(limit) = limit else {
        return lines;
    };
    if lines.len() <= limit {
        return lines;
    }
    lines.truncate(limit);
    if let Some(last) = lines.last_mut() {
        let budget = (width as usize).saturating_sub(1);
        let mut cut = crate::render::slice_by_cols(last, 0, budget as u16);
        cut.truncate(cut.trim_end().len());
        cut.push_str(ELLIPSIS);
        *last = cut;
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_wrap_splits_on_spaces() {
        assert_eq!(
            wrap_words("hello world", 5),
            vec!["hello".to_string(), "world".to_string()]
        );
    }

    #[test]
    fn word_wrap_keeps_punctuation_with_word() {
        assert_eq!(
            wrap_words("one, two", 5),
            vec!["one,".to_string(), "two".to_string()]
        );
    }

    #[test]
    fn hard_breaks_long_words() {
        assert_eq!(
            wrap_words("abcdefgh", 3),
            vec!["abc".to_string(), "def".to_string(), "gh".to_string()]
        );
    }

    #[test]
    fn clamp_marks_cut_with_ellipsis() {
        let lines = wrap_clamped("aaa bbb ccc ddd", 4, Some(2));
        assert_eq!(lines, vec!["aaa".to_string(), "bbb…".to_string()]);
    }

    #[test]
    fn truncate_adds_ellipsis_only_when_needed() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("a long title", 6), "a lon…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn clamp_limits() {
        assert_eq!(Clamp::from(true).max_lines(2), Some(2));
        assert_eq!(Clamp::from(false).max_lines(2), None);
        assert_eq!(Clamp::Lines(4).max_lines(2), Some(4));
        assert_eq!(Clamp::Lines(0).max_lines(2), None);
        assert_eq!(Clamp::Lines(7).max_lines(2), None);
    }
}
