//! Text measurement and encoding for the built-in Helvetica font.
//!
//! Widths are estimates from coarse Helvetica glyph classes, good enough to
//! fit cells and wrap lines without embedding font metrics.

/// Estimated advance width of `text` in points.
pub(crate) fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let em: f32 = text.chars().map(glyph_em).sum();
    let weight = if bold { 1.06 } else { 1.0 };
    em * size * weight
}

fn glyph_em(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | '\'' | '|' | '!' | '.' | ',' | ':' | ';' => 0.25,
        ' ' | 'f' | 't' | 'I' | 'r' | '(' | ')' | '[' | ']' | '/' | '-' => 0.3,
        'm' | 'w' | 'M' | 'W' | '@' | '%' => 0.85,
        '0'..='9' | '$' | '#' | '?' | '_' | '€' | '£' | '¥' => 0.556,
        'A'..='Z' => 0.68,
        _ => 0.52,
    }
}

/// Shorten `text` with a trailing ellipsis so it fits `max_width`.
pub(crate) fn fit(text: &str, max_width: f32, size: f32, bold: bool) -> String {
    if text_width(text, size, bold) <= max_width {
        return text.to_string();
    }
    let budget = max_width - text_width("...", size, bold);
    let mut out = String::new();
    let mut used = 0.0;
    for c in text.chars() {
        let w = glyph_em(c) * size;
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

/// Word-wrap one paragraph to `max_width`. Words longer than a line are
/// broken at character boundaries.
pub(crate) fn wrap(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        if text_width(&candidate, size, false) <= max_width {
            line = candidate;
            continue;
        }
        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        let mut chunk = String::new();
        for c in word.chars() {
            chunk.push(c);
            if text_width(&chunk, size, false) > max_width && chunk.chars().count() > 1 {
                chunk.pop();
                lines.push(std::mem::take(&mut chunk));
                chunk.push(c);
            }
        }
        line = chunk;
    }
    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

/// Encode for a standard Type1 font with `WinAnsiEncoding`.
///
/// Characters outside the code page become `?`, except the rupee sign which
/// is spelled `Rs`.
pub(crate) fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' '..='~' => out.push(c as u8),
            '\u{A0}'..='\u{FF}' => out.push(c as u32 as u8),
            '€' => out.push(0x80),
            '‚' => out.push(0x82),
            '„' => out.push(0x84),
            '…' => out.push(0x85),
            '‘' => out.push(0x91),
            '’' => out.push(0x92),
            '“' => out.push(0x93),
            '”' => out.push(0x94),
            '•' => out.push(0x95),
            '–' => out.push(0x96),
            '—' => out.push(0x97),
            '™' => out.push(0x99),
            '₹' => out.extend_from_slice(b"Rs"),
            '\t' => out.push(b' '),
            _ => out.push(b'?'),
        }
    }
    out
}
