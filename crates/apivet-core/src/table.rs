//! Plain-text table layouts: elastic tabstops, markdown and CSV

use console::measure_text_width;
use std::io::Write;

/// Space added after the widest cell of each column
const PADDING: usize = 2;

/// Align `rows` into columns.
///
/// Every column is as wide as its widest cell plus two pad characters. Cells after the first
/// are prefixed with a single space.
pub fn write_tabular<W: Write>(
    out: &mut W,
    rows: &[Vec<String>],
    pad: char,
) -> std::io::Result<()> {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(i, cell)| if i == 0 { cell.clone() } else { format!(" {cell}") })
                .collect()
        })
        .collect();

    let widths = column_widths(&rows);
    for row in &rows {
        let mut line = String::new();
        for (cell, width) in row.iter().zip(&widths) {
            line.push_str(cell);
            let fill = width + PADDING - measure_text_width(cell);
            line.extend(std::iter::repeat_n(pad, fill));
        }
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Render a `|`-bordered markdown table. Header cells are centred.
pub fn write_markdown<W: Write>(
    out: &mut W,
    header: Option<&[String]>,
    rows: &[Vec<String>],
) -> std::io::Result<()> {
    let mut all: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
    if let Some(header) = header {
        all.push(header.to_vec());
    }
    all.extend(rows.iter().cloned());
    let widths = column_widths(&all);

    if let Some(header) = header {
        let cells: Vec<String> = header
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| center(cell, width))
            .collect();
        writeln!(out, "| {} |", cells.join(" | "))?;

        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
        writeln!(out, "|{}|", rule.join("|"))?;
    }

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| {
                if is_numeric(cell) {
                    format!("{}{cell}", " ".repeat(width - measure_text_width(cell)))
                } else {
                    format!("{cell}{}", " ".repeat(width - measure_text_width(cell)))
                }
            })
            .collect();
        writeln!(out, "| {} |", cells.join(" | "))?;
    }
    Ok(())
}

/// Write one CSV record, quoting fields that need it
pub fn write_csv_record<W: Write>(out: &mut W, record: &[String]) -> std::io::Result<()> {
    let fields: Vec<String> = record.iter().map(|f| csv_field(f)).collect();
    writeln!(out, "{}", fields.join(","))
}

fn csv_field(field: &str) -> String {
    let needs_quotes = field.contains([',', '"', '\r', '\n'])
        || field.starts_with([' ', '\t']);
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn column_widths(rows: &[Vec<String>]) -> Vec<usize> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    (0..columns)
        .map(|i| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| measure_text_width(cell))
                .max()
                .unwrap_or(0)
        })
        .collect()
}

fn center(cell: &str, width: usize) -> String {
    let gap = width - measure_text_width(cell);
    let left = gap / 2;
    format!("{}{cell}{}", " ".repeat(left), " ".repeat(gap - left))
}

fn is_numeric(cell: &str) -> bool {
    !cell.is_empty() && cell.parse::<f64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_tabular_alignment() {
        let data = rows(&[&["NAME", "KIND"], &["some name one", "Deployment"]]);
        let text = render(|out| write_tabular(out, &data, '-'));
        assert_eq!(
            text,
            "NAME----------- KIND--------\nsome name one-- Deployment--\n"
        );
    }

    #[test]
    fn test_markdown_layout() {
        let header = vec!["NAME".to_string(), "COUNT".to_string()];
        let data = rows(&[&["utilities", "3"], &["db", "12"]]);
        let text = render(|out| write_markdown(out, Some(&header), &data));
        assert_eq!(
            text,
            "|   NAME    | COUNT |\n\
             |-----------|-------|\n\
             | utilities |     3 |\n\
             | db        |    12 |\n"
        );
    }

    #[test]
    fn test_markdown_without_header() {
        let data = rows(&[&["a", "b"]]);
        let text = render(|out| write_markdown(out, None, &data));
        assert_eq!(text, "| a | b |\n");
    }

    #[test]
    fn test_csv_quoting() {
        let record: Vec<String> = ["plain", "a,b", "say \"hi\"", " lead", "multi\nline"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let text = render(|out| write_csv_record(out, &record));
        assert_eq!(
            text,
            "plain,\"a,b\",\"say \"\"hi\"\"\",\" lead\",\"multi\nline\"\n"
        );
    }
}
