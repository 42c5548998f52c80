use unicode_width::UnicodeWidthStr;

/// `part / whole` as a percentage, 0 when `whole` is 0
pub fn percent(part: u32, whole: u32) -> f64 {
    match whole {
        positive if positive > 0 => f64::from(part) / f64::from(positive) * 100.0,
        _ => 0.0,
    }
}

/// Cut `text` so it fits in `width` terminal columns, appending an ellipsis
/// when anything was dropped. CJK glyphs take two columns.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Format seconds as `mm:ss`
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        assert_eq!(percent(5, 10), 50.0);
        assert_eq!(percent(10, 10), 100.0);
    }

    #[test]
    fn test_percent_zero_whole() {
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(3, 0), 0.0);
    }

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello world", 6), "hello…");
    }

    #[test]
    fn test_truncate_cjk_counts_double_width() {
        // each glyph is two columns wide
        assert_eq!(truncate_to_width("图书馆", 6), "图书馆");
        assert_eq!(truncate_to_width("图书馆", 5), "图书…");
        assert_eq!(truncate_to_width("图书馆", 0), "");
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(1200), "20:00");
    }
}
