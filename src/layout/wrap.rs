use crate::foundation::error::{PageError, PageResult};
use crate::text::measure::TextMeasure;

/// Greedy width-measured word wrap. Explicit newlines start a new line.
///
/// Words are joined with single spaces while the measured line stays within
/// `max_width`. A word wider than `max_width` on its own is split between
/// characters. Every returned line measures at most `max_width`, except a
/// single glyph that is wider than the limit by itself.
pub fn wrap_words(
    text: &str,
    measure: &mut dyn TextMeasure,
    size_px: f32,
    max_width: f32,
) -> PageResult<Vec<String>> {
    if !max_width.is_finite() || max_width <= 0.0 {
        return Err(PageError::layout(format!(
            "wrap width must be > 0, got {max_width}"
        )));
    }

    let mut lines = Vec::new();
    for paragraph in text.lines() {
        wrap_paragraph(paragraph, measure, size_px, max_width, &mut lines)?;
    }
    Ok(lines)
}

fn wrap_paragraph(
    paragraph: &str,
    measure: &mut dyn TextMeasure,
    size_px: f32,
    max_width: f32,
    lines: &mut Vec<String>,
) -> PageResult<()> {
    let mut line = String::new();

    for word in paragraph.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        if measure.line_width(&candidate, size_px)? <= max_width {
            line = candidate;
            continue;
        }

        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }

        if measure.line_width(word, size_px)? <= max_width {
            line = word.to_string();
        } else {
            let mut pieces = split_long_word(word, measure, size_px, max_width)?;
            // The tail stays open so following words can join it.
            line = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    Ok(())
}

fn split_long_word(
    word: &str,
    measure: &mut dyn TextMeasure,
    size_px: f32,
    max_width: f32,
) -> PageResult<Vec<String>> {
    let mut pieces = Vec::new();
    let mut cur = String::new();
    for ch in word.chars() {
        cur.push(ch);
        if cur.chars().count() > 1 && measure.line_width(&cur, size_px)? > max_width {
            cur.pop();
            pieces.push(std::mem::take(&mut cur));
            cur.push(ch);
        }
    }
    if !cur.is_empty() {
        pieces.push(cur);
    }
    Ok(pieces)
}

/// Widest line and total block height for `lines` at `size_px`.
pub fn block_extent(
    lines: &[String],
    measure: &mut dyn TextMeasure,
    size_px: f32,
    line_spacing: f32,
) -> PageResult<(f32, f32)> {
    if lines.is_empty() {
        return Ok((0.0, 0.0));
    }
    let mut widest = 0.0f32;
    for line in lines {
        widest = widest.max(measure.line_width(line, size_px)?);
    }
    let line_h = measure.line_height(size_px)?;
    let n = lines.len() as f32;
    Ok((widest, n * line_h + (n - 1.0) * line_spacing))
}
