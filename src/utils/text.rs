//! Text layout helpers shared by the terminal UI and the plain-text CLI output

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cut `text` to at most `max_width` terminal columns, marking the cut with "…"
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Pad `text` with spaces up to `width` columns
pub fn pad_to_width(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(padding))
}

/// Format a table with aligned columns. Cells wider than `max_cell_width`
/// are truncated.
pub fn format_table(headers: &[&str], rows: &[Vec<String>], max_cell_width: usize) -> String {
    if headers.is_empty() {
        return String::new();
    }

    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| truncate_to_width(cell, max_cell_width)).collect())
        .collect();

    // Calculate column widths
    let mut widths = headers.iter().map(|h| h.width()).collect::<Vec<_>>();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.width());
            }
        }
    }

    let format_row = |cells: Vec<&str>| {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| pad_to_width(cell, widths.get(i).copied().unwrap_or(0)))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut result = String::new();
    result.push_str(&format_row(headers.to_vec()));
    result.push('\n');

    let separator = widths
        .iter()
        .map(|&width| "-".repeat(width))
        .collect::<Vec<_>>()
        .join("-|-");
    result.push_str(&separator);
    result.push('\n');

    for row in &rows {
        result.push_str(&format_row(row.iter().map(String::as_str).collect()));
        result.push('\n');
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_text() {
        assert_eq!(truncate_to_width("Page 1", 10), "Page 1");
    }

    #[test]
    fn test_truncate_marks_cut() {
        assert_eq!(truncate_to_width("Selected 13 rows", 9), "Selected…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn test_truncate_counts_wide_characters() {
        assert_eq!(truncate_to_width("葛飾北斎の版画", 7), "葛飾北…");
    }

    #[test]
    fn test_format_table_aligns_columns() {
        let rows = vec![
            vec!["1".to_string(), "Nighthawks".to_string()],
            vec!["27992".to_string(), "A Sunday on La Grande Jatte".to_string()],
        ];
        let table = format_table(&["ID", "Title"], &rows, 12);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "ID    | Title");
        assert_eq!(lines[1], "------|-------------");
        assert_eq!(lines[2], "1     | Nighthawks");
        assert_eq!(lines[3], "27992 | A Sunday on…");
    }

    #[test]
    fn test_format_table_without_rows_prints_header() {
        let table = format_table(&["ID", "Title"], &[], 10);
        assert_eq!(table.lines().count(), 2);
    }
}
