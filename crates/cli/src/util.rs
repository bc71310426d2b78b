use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string (CJK counts double, as in the input data's
/// Korean policy titles).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Fit `s` into `width` display columns, ending with ".." when cut.
/// Walks chars by display width so CJK text never overflows the column.
pub fn clip_display(s: &str, width: usize) -> String {
    if display_width(s) <= width {
        return s.to_string();
    }
    if width < 3 {
        let first = s.chars().next().filter(|c| c.width().unwrap_or(0) <= width);
        return first.map(|c| c.to_string()).unwrap_or_default();
    }

    let budget = width - 2;
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let cw = ch.width().unwrap_or(0);
        if used + cw > budget {
            break;
        }
        used += cw;
        out.push(ch);
    }
    out.push_str("..");
    out
}
