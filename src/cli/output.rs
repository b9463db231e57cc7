//! Output helpers shared by the commands
//!
//! Tables go to stdout as TAB-delimited text or a rendered table; status
//! messages go to stderr so stdout stays machine-readable.
use crate::core::diff::DiffTable;
use colored::*;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color as TableColor, ContentArrangement, Table};
use std::io::{self, Write};

/// Create a table with the standard style
pub fn create_standard_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Create a standard header cell
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .add_attribute(Attribute::Bold)
        .fg(TableColor::Cyan)
}

/// Render a diff table for a terminal
pub fn render_table(table: &DiffTable) -> String {
    let mut out = create_standard_table();
    out.set_header(table.header.iter().map(|h| header_cell(h)));
    for row in &table.rows {
        out.add_row(row.iter().map(Cell::new));
    }
    out.to_string()
}

/// Write rows TAB-delimited, without quoting
pub fn write_tsv<'a, W: Write>(
    writer: W,
    rows: impl IntoIterator<Item = &'a Vec<String>>,
) -> io::Result<()> {
    let mut tsv = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .flexible(true)
        .from_writer(writer);

    for row in rows {
        tsv.write_record(row).map_err(into_io_error)?;
    }
    tsv.flush()
}

fn into_io_error(err: csv::Error) -> io::Error {
    match err.into_kind() {
        csv::ErrorKind::Io(e) => e,
        other => io::Error::new(io::ErrorKind::Other, format!("{:?}", other)),
    }
}

/// Write a diff table to stdout in the chosen style
pub fn print_table(table: &DiffTable, pretty: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = io::BufWriter::new(stdout.lock());
    if pretty {
        writeln!(handle, "{}", render_table(table))?;
    } else {
        write_tsv(&mut handle, table.iter_rows())?;
    }
    handle.flush()
}

/// True when `err` comes from writing into a closed pipe (e.g. `| head`)
pub fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .map(|e| e.kind() == io::ErrorKind::BrokenPipe)
            .unwrap_or(false)
            || matches!(
                cause.downcast_ref::<crate::AlnDiffError>(),
                Some(crate::AlnDiffError::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe
            )
    })
}

/// Display a status message on stderr
pub fn info(message: &str) {
    eprintln!("{} {}", "●".blue(), message);
}

/// Display a warning message on stderr
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DiffTable {
        DiffTable {
            header: vec!["site".into(), "A".into(), "B".into()],
            rows: vec![vec!["1".into(), "A".into(), "".into()]],
        }
    }

    #[test]
    fn test_tsv_keeps_empty_cells() {
        let mut out = Vec::new();
        write_tsv(&mut out, table().iter_rows()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "site\tA\tB\n1\tA\t\n");
    }

    #[test]
    fn test_rendered_table_contains_cells() {
        let rendered = render_table(&table());
        assert!(rendered.contains("site"));
        assert!(rendered.contains('A'));
    }

    #[test]
    fn test_broken_pipe_detection() {
        let err = anyhow::Error::new(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert!(is_broken_pipe(&err));
        let wrapped = anyhow::Error::new(crate::AlnDiffError::Io(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "closed",
        )))
        .context("writing output");
        assert!(is_broken_pipe(&wrapped));
        assert!(!is_broken_pipe(&anyhow::anyhow!("other failure")));
    }
}
