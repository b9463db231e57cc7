//! Site annotation tables and their join onto diff tables
//!
//! Annotation tables are keyed by site label in their first column. Labels
//! are compared as plain strings, so `42+1` only matches `42+1`.
use crate::bio::alignment::PositionLabel;
use crate::core::diff::{DiffTable, SITE_COLUMN};
use crate::AlnDiffError;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// How columns from several tables are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JoinMode {
    /// Every annotation column of every table becomes its own output column.
    #[default]
    Separate,
    /// Columns sharing a name are collapsed into one, values joined with commas.
    Join,
}

impl FromStr for JoinMode {
    type Err = AlnDiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "separate" => Ok(JoinMode::Separate),
            "join" | "joined" => Ok(JoinMode::Join),
            _ => Err(AlnDiffError::Config(format!(
                "Unknown annotation mode: '{}'. Options: separate, join",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationTable {
    header: Vec<String>,
    /// site label -> one value per annotation column
    values: HashMap<String, Vec<String>>,
}

impl AnnotationTable {
    /// Build a table from raw rows; the first row is the header.
    pub fn new(rows: Vec<Vec<String>>) -> crate::Result<Self> {
        let mut rows = rows.into_iter();
        let header = rows
            .next()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| AlnDiffError::Config("annotation table has no header row".to_string()))?;

        let width = header.len();
        let mut values: HashMap<String, Vec<String>> = HashMap::new();

        for (line, row) in rows.enumerate() {
            if row.len() < width {
                return Err(AlnDiffError::Format(format!(
                    "annotation row {} has {} fields, header has {}",
                    line + 2,
                    row.len(),
                    width
                )));
            }

            let mut fields = row.into_iter().take(width);
            let site = fields.next().unwrap_or_default();
            let entry = values
                .entry(site)
                .or_insert_with(|| vec![String::new(); width - 1]);
            for (slot, value) in entry.iter_mut().zip(fields) {
                append_value(slot, &value);
            }
        }

        Ok(Self { header, values })
    }

    /// Read a TAB-delimited table with a header line.
    pub fn from_reader<R: Read>(reader: R) -> crate::Result<Self> {
        let mut tsv = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in tsv.records() {
            let record = record.map_err(|e| AlnDiffError::Format(format!("annotation table: {}", e)))?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Self::new(rows)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::from_reader(file).map_err(|e| match e {
            AlnDiffError::Format(msg) => AlnDiffError::Format(format!("{}: {}", path.display(), msg)),
            AlnDiffError::Config(msg) => AlnDiffError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Names of the annotation columns (the header minus the site column).
    pub fn columns(&self) -> &[String] {
        &self.header[1..]
    }

    /// Values for `site`, one per annotation column.
    pub fn get(&self, site: &str) -> Option<&[String]> {
        self.values.get(site).map(Vec::as_slice)
    }

    fn value(&self, site: &str, column: usize) -> &str {
        self.get(site)
            .and_then(|v| v.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}

fn append_value(slot: &mut String, value: &str) {
    if value.is_empty() {
        return;
    }
    if !slot.is_empty() {
        slot.push(',');
    }
    slot.push_str(value);
}

/// Source of one output column: (table, annotation column) pairs.
type ColumnSources = Vec<(usize, usize)>;

#[derive(Debug, Clone, Default)]
pub struct AnnotationMerger {
    tables: Vec<AnnotationTable>,
    mode: JoinMode,
}

impl AnnotationMerger {
    pub fn new(tables: Vec<AnnotationTable>) -> Self {
        Self {
            tables,
            mode: JoinMode::Separate,
        }
    }

    pub fn with_mode(mut self, mode: JoinMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Output columns in order, with the table cells feeding each one.
    fn layout(&self) -> Vec<(String, ColumnSources)> {
        let sources = self.tables.iter().enumerate().flat_map(|(t, table)| {
            table
                .columns()
                .iter()
                .enumerate()
                .map(move |(c, name)| (name.clone(), (t, c)))
        });

        match self.mode {
            JoinMode::Separate => sources.map(|(name, src)| (name, vec![src])).collect(),
            JoinMode::Join => {
                let mut joined: IndexMap<String, ColumnSources> = IndexMap::new();
                for (name, src) in sources {
                    joined.entry(name).or_default().push(src);
                }
                joined.into_iter().collect()
            }
        }
    }

    fn annotate(&self, layout: &[(String, ColumnSources)], site: &str) -> Vec<String> {
        layout
            .iter()
            .map(|(_, sources)| {
                let mut cell = String::new();
                for &(t, c) in sources {
                    append_value(&mut cell, self.tables[t].value(site, c));
                }
                cell
            })
            .collect()
    }

    fn header(layout: &[(String, ColumnSources)]) -> Vec<String> {
        layout.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Append annotation columns to every row of `table`, matching on the site column.
    pub fn merge(&self, table: &DiffTable) -> DiffTable {
        let layout = self.layout();
        let mut header = table.header.clone();
        header.extend(Self::header(&layout));

        let mut merged = DiffTable::new(header);
        let mut matched = 0usize;
        for row in &table.rows {
            let site = row.first().map(String::as_str).unwrap_or("");
            if self.tables.iter().any(|t| t.get(site).is_some()) {
                matched += 1;
            }
            let mut out = row.clone();
            out.extend(self.annotate(&layout, site));
            merged.rows.push(out);
        }

        debug!(
            "Annotated {} of {} rows from {} tables",
            matched,
            table.len(),
            self.tables.len()
        );
        merged
    }

    /// A table with one row per label and only annotation columns.
    pub fn merge_labels(&self, labels: &[PositionLabel]) -> DiffTable {
        let layout = self.layout();
        let mut header = vec![SITE_COLUMN.to_string()];
        header.extend(Self::header(&layout));

        let mut merged = DiffTable::new(header);
        for label in labels {
            let site = label.to_string();
            let mut row = self.annotate(&layout, &site);
            row.insert(0, site);
            merged.rows.push(row);
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bio::alignment::gapped_indices;
    use pretty_assertions::assert_eq;

    fn table(rows: &[&[&str]]) -> AnnotationTable {
        AnnotationTable::new(
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    fn diff() -> DiffTable {
        DiffTable {
            header: vec!["site".into(), "A".into(), "B".into()],
            rows: vec![
                vec!["-1".into(), "M".into(), "".into()],
                vec!["3".into(), "K".into(), "R".into()],
                vec!["3+1".into(), "-".into(), "G".into()],
            ],
        }
    }

    #[test]
    fn test_separate_columns() {
        let sites = table(&[&["site", "region"], &["3", "Sa"], &["3+1", "ins"]]);
        let epitopes = table(&[&["pos", "region", "note"], &["3", "Cb", "x"]]);
        let merged = AnnotationMerger::new(vec![sites, epitopes]).merge(&diff());

        assert_eq!(merged.header, vec!["site", "A", "B", "region", "region", "note"]);
        assert_eq!(merged.rows[0], vec!["-1", "M", "", "", "", ""]);
        assert_eq!(merged.rows[1], vec!["3", "K", "R", "Sa", "Cb", "x"]);
        assert_eq!(merged.rows[2], vec!["3+1", "-", "G", "ins", "", ""]);
    }

    #[test]
    fn test_join_mode_collapses_same_named_columns() {
        let sites = table(&[&["site", "region"], &["3", "Sa"], &["3+1", "ins"]]);
        let epitopes = table(&[&["pos", "region", "note"], &["3", "Cb", "x"]]);
        let merged = AnnotationMerger::new(vec![sites, epitopes])
            .with_mode(JoinMode::Join)
            .merge(&diff());

        assert_eq!(merged.header, vec!["site", "A", "B", "region", "note"]);
        assert_eq!(merged.rows[1], vec!["3", "K", "R", "Sa,Cb", "x"]);
        assert_eq!(merged.rows[2], vec!["3+1", "-", "G", "ins", ""]);
    }

    #[test]
    fn test_labels_are_not_parsed() {
        let t = table(&[&["site", "note"], &["03", "padded"], &["3", "plain"]]);
        let merged = AnnotationMerger::new(vec![t]).merge(&diff());
        assert_eq!(merged.rows[1][3], "plain");
    }

    #[test]
    fn test_repeated_site_values_are_joined() {
        let t = table(&[&["site", "note"], &["3", "a"], &["3", "b"]]);
        assert_eq!(t.get("3").unwrap(), &["a,b".to_string()]);
    }

    #[test]
    fn test_merge_labels() {
        let t = table(&[&["site", "note"], &["1+1", "loop"]]);
        let labels = gapped_indices(b"A-C", b'-');
        let merged = AnnotationMerger::new(vec![t]).merge_labels(&labels);
        assert_eq!(
            merged.to_rows(),
            vec![
                vec!["site", "note"],
                vec!["1", ""],
                vec!["1+1", "loop"],
                vec!["2", ""],
            ]
        );
    }

    #[test]
    fn test_missing_header_is_config_error() {
        assert!(matches!(
            AnnotationTable::new(Vec::new()),
            Err(AlnDiffError::Config(_))
        ));
        assert!(matches!(
            AnnotationTable::from_reader("".as_bytes()),
            Err(AlnDiffError::Config(_))
        ));
    }

    #[test]
    fn test_short_row_is_format_error() {
        let err = AnnotationTable::from_reader("site\ta\tb\n3\tx\n".as_bytes()).unwrap_err();
        assert!(matches!(err, AlnDiffError::Format(_)));
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn test_from_reader() {
        let t = AnnotationTable::from_reader("site\tsite_name\n-2\tsignal\n42+1\tloop\n".as_bytes())
            .unwrap();
        assert_eq!(t.columns(), &["site_name".to_string()]);
        assert_eq!(t.get("-2").unwrap(), &["signal".to_string()]);
        assert_eq!(t.get("42+1").unwrap(), &["loop".to_string()]);
    }

    #[test]
    fn test_join_mode_parsing() {
        assert_eq!("join".parse::<JoinMode>().unwrap(), JoinMode::Join);
        assert_eq!("Separate".parse::<JoinMode>().unwrap(), JoinMode::Separate);
        assert!(matches!("zip".parse::<JoinMode>(), Err(AlnDiffError::Config(_))));
    }
}
