//! Edge-list file adapters.
//!
//! This module translates files into the `(graph, edge list)` pair the
//! codecs consume, and back:
//! - CSV edge lists with a header line ([`read_edge_list`])
//! - SIF triples `source relation target` without header ([`read_sif`])
//! - Whitespace-separated "database string" tables with a header
//!   ([`read_database_string`])
//! - Raw payload files ([`read_payload`])
//!
//! Node IDs are kept as strings. Quoted CSV fields are not supported.

use std::fmt;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StegoError};
use crate::graph::{AdjacencyGraph, EdgeList, EdgeRow};

/// Relation written for SIF rows that carry none.
pub const SIF_DEFAULT_RELATION: &str = "-";

/// Supported edge-list file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeFormat {
    /// Comma-separated with a header line.
    #[default]
    Csv,
    /// `source relation target` triples.
    Sif,
    /// Whitespace-separated with a header line.
    #[serde(rename = "dbstring")]
    DbString,
}

impl FromStr for EdgeFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "sif" => Ok(Self::Sif),
            "dbstring" | "database-string" => Ok(Self::DbString),
            other => Err(format!(
                "unknown edge-list format '{other}' (expected csv, sif or dbstring)"
            )),
        }
    }
}

impl fmt::Display for EdgeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::Sif => "sif",
            Self::DbString => "dbstring",
        })
    }
}

/// An edge list as read from a file: column names plus rows.
///
/// The first two columns are always the endpoints; the rest travel in
/// [`EdgeRow::attrs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeTable {
    /// Column names, endpoints first.
    pub columns: Vec<String>,
    /// Rows in file order, duplicates included.
    pub rows: EdgeList<String>,
}

impl EdgeTable {
    /// Creates a table from its parts.
    pub fn new(columns: Vec<String>, rows: EdgeList<String>) -> Self {
        Self { columns, rows }
    }

    /// Same columns, different rows.
    pub fn with_rows(&self, rows: EdgeList<String>) -> Self {
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Two-column table of integer node IDs.
    pub fn from_numeric(rows: &[EdgeRow<i64>]) -> Self {
        let rows = rows
            .iter()
            .map(|row| EdgeRow::with_attrs(row.source.to_string(), row.target.to_string(), row.attrs.clone()))
            .collect();
        Self::new(vec!["source".to_string(), "target".to_string()], rows)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Builds the graph of the table. Duplicate rows collapse.
    pub fn graph(&self, directed: bool) -> AdjacencyGraph<String> {
        AdjacencyGraph::from_edges(&self.rows, directed)
    }

    /// Parses every endpoint as an integer node ID.
    ///
    /// Errors carry the 1-based row number.
    pub fn numeric_rows(&self) -> Result<EdgeList<i64>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let parse = |id: &str| {
                    id.trim().parse::<i64>().map_err(|_| StegoError::FileFormat {
                        line: i + 1,
                        reason: format!("node ID '{id}' is not an integer"),
                    })
                };
                Ok(EdgeRow::with_attrs(
                    parse(&row.source)?,
                    parse(&row.target)?,
                    row.attrs.clone(),
                ))
            })
            .collect()
    }
}

/// Reads a table in `format` and builds its graph.
pub fn read_table(
    path: &Path,
    format: EdgeFormat,
    directed: bool,
) -> Result<(AdjacencyGraph<String>, EdgeTable)> {
    match format {
        EdgeFormat::Csv => read_edge_list(path, directed),
        EdgeFormat::Sif => read_sif(path, directed),
        EdgeFormat::DbString => read_database_string(path, directed),
    }
}

/// Writes a table in `format`.
pub fn write_table(path: &Path, format: EdgeFormat, table: &EdgeTable) -> Result<()> {
    match format {
        EdgeFormat::Csv => write_edge_list(path, table),
        EdgeFormat::Sif => write_sif(path, table),
        EdgeFormat::DbString => write_database_string(path, table),
    }
}

/// Reads a CSV edge list with a header line.
pub fn read_edge_list(path: &Path, directed: bool) -> Result<(AdjacencyGraph<String>, EdgeTable)> {
    let content = fs::read_to_string(path)?;
    let table = parse_with_header(&content, |line| line.split(',').map(str::trim).collect())?;
    Ok((table.graph(directed), table))
}

/// Writes a CSV edge list with a header line.
pub fn write_edge_list(path: &Path, table: &EdgeTable) -> Result<()> {
    write_with_header(path, table, ",")
}

/// Reads a SIF file. Columns come back as `(source, target, relation)`.
pub fn read_sif(path: &Path, directed: bool) -> Result<(AdjacencyGraph<String>, EdgeTable)> {
    let content = fs::read_to_string(path)?;
    let mut rows = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [] => continue,
            [source, relation, target] => rows.push(EdgeRow::with_attrs(
                source.to_string(),
                target.to_string(),
                vec![relation.to_string()],
            )),
            _ => {
                return Err(StegoError::FileFormat {
                    line: index + 1,
                    reason: format!("expected 3 fields, found {}", fields.len()),
                })
            }
        }
    }

    let columns = ["source", "target", "relationship"].map(String::from).to_vec();
    let table = EdgeTable::new(columns, rows);
    Ok((table.graph(directed), table))
}

/// Writes a SIF file as `source relation target` lines.
pub fn write_sif(path: &Path, table: &EdgeTable) -> Result<()> {
    let mut out = BufWriter::new(fs::File::create(path)?);
    for row in &table.rows {
        let relation = row
            .attrs
            .first()
            .map_or(SIF_DEFAULT_RELATION, String::as_str);
        writeln!(out, "{} {} {}", row.source, relation, row.target)?;
    }
    out.flush()?;
    Ok(())
}

/// Reads a whitespace-separated table with a header line.
pub fn read_database_string(
    path: &Path,
    directed: bool,
) -> Result<(AdjacencyGraph<String>, EdgeTable)> {
    let content = fs::read_to_string(path)?;
    let table = parse_with_header(&content, |line| line.split_whitespace().collect())?;
    Ok((table.graph(directed), table))
}

/// Writes a whitespace-separated table with a header line.
pub fn write_database_string(path: &Path, table: &EdgeTable) -> Result<()> {
    write_with_header(path, table, " ")
}

/// Reads a payload file as raw bytes.
pub fn read_payload(path: &Path) -> Result<Vec<u8>> {
    Ok(fs::read(path)?)
}

/// Writes raw payload bytes.
pub fn write_payload(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes)?;
    Ok(())
}

fn parse_with_header<F>(content: &str, split: F) -> Result<EdgeTable>
where
    F: Fn(&str) -> Vec<&str>,
{
    let mut lines = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((header_index, header)) = lines.next() else {
        return Err(StegoError::FileFormat {
            line: 1,
            reason: "missing header line".to_string(),
        });
    };
    let columns: Vec<String> = split(header).into_iter().map(String::from).collect();
    if columns.len() < 2 {
        return Err(StegoError::FileFormat {
            line: header_index + 1,
            reason: format!("header needs at least 2 columns, found {}", columns.len()),
        });
    }

    let mut rows = Vec::new();
    for (index, line) in lines {
        let fields = split(line);
        let [source, target, attrs @ ..] = fields.as_slice() else {
            return Err(StegoError::FileFormat {
                line: index + 1,
                reason: format!("expected at least 2 fields, found {}", fields.len()),
            });
        };
        rows.push(EdgeRow::with_attrs(
            source.to_string(),
            target.to_string(),
            attrs.iter().map(|a| a.to_string()).collect(),
        ));
    }
    Ok(EdgeTable::new(columns, rows))
}

fn write_with_header(path: &Path, table: &EdgeTable, sep: &str) -> Result<()> {
    let mut out = BufWriter::new(fs::File::create(path)?);
    writeln!(out, "{}", table.columns.join(sep))?;
    for row in &table.rows {
        write!(out, "{}{sep}{}", row.source, row.target)?;
        for attr in &row.attrs {
            write!(out, "{sep}{attr}")?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use tempfile::tempdir;

    #[test]
    fn test_csv_roundtrip_keeps_attributes_and_duplicates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cover.csv");
        fs::write(&path, "from,to,weight\na,b,1\nb,c,2\na,b,1\n").unwrap();

        let (graph, table) = read_edge_list(&path, false).unwrap();
        assert_eq!(table.columns, vec!["from", "to", "weight"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[1].attrs, vec!["2"]);
        assert_eq!(graph.num_edges(), 2);
        assert_eq!(graph.num_nodes(), 3);

        let copy = dir.path().join("copy.csv");
        write_edge_list(&copy, &table).unwrap();
        let (_, reread) = read_edge_list(&copy, false).unwrap();
        assert_eq!(reread, table);
    }

    #[test]
    fn test_sif_reorders_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("net.sif");
        fs::write(&path, "A pp B\nB pd C\n\n").unwrap();

        let (graph, table) = read_sif(&path, true).unwrap();
        assert_eq!(table.columns, vec!["source", "target", "relationship"]);
        assert_eq!(table.rows[0], EdgeRow::with_attrs("A".into(), "B".into(), vec!["pp".into()]));
        assert!(graph.has_edge(&"B".to_string(), &"C".to_string()));
        assert!(!graph.has_edge(&"C".to_string(), &"B".to_string()));

        let out = dir.path().join("out.sif");
        write_sif(&out, &table).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "A pp B\nB pd C\n");
    }

    #[test]
    fn test_sif_rejects_wrong_arity() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.sif");
        fs::write(&path, "A pp B\nA B\n").unwrap();

        match read_sif(&path, false).unwrap_err() {
            StegoError::FileFormat { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_database_string_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.txt");
        fs::write(&path, "protein1 protein2 score\n9606.A 9606.B 900\n9606.B 9606.C 150\n").unwrap();

        let (graph, table) = read_database_string(&path, false).unwrap();
        assert_eq!(graph.num_edges(), 2);
        assert_eq!(table.rows[0].source, "9606.A");

        let out = dir.path().join("out.txt");
        write_database_string(&out, &table).unwrap();
        let (_, reread) = read_database_string(&out, false).unwrap();
        assert_eq!(reread, table);
    }

    #[test]
    fn test_short_row_reports_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.csv");
        fs::write(&path, "a,b\n1,2\n3\n").unwrap();

        match read_edge_list(&path, false).unwrap_err() {
            StegoError::FileFormat { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_numeric_rows() {
        let table = EdgeTable::from_numeric(&[EdgeRow::new(0, 257), EdgeRow::new(-3, 4)]);
        assert_eq!(table.numeric_rows().unwrap()[1], EdgeRow::new(-3, 4));

        let bad = table.with_rows(vec![EdgeRow::new("x".into(), "1".into())]);
        assert!(matches!(
            bad.numeric_rows(),
            Err(StegoError::FileFormat { line: 1, .. })
        ));
    }

    #[test]
    fn test_payload_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("payload.bin");
        write_payload(&path, &[0, 255, 7]).unwrap();
        assert_eq!(read_payload(&path).unwrap(), vec![0, 255, 7]);
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("CSV".parse::<EdgeFormat>().unwrap(), EdgeFormat::Csv);
        assert_eq!("database-string".parse::<EdgeFormat>().unwrap(), EdgeFormat::DbString);
        assert!("gml".parse::<EdgeFormat>().is_err());
        assert_eq!(EdgeFormat::Sif.to_string(), "sif");
    }
}
