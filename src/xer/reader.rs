//! Tokenizer for the Primavera P6 XER tabular stream.
//!
//! The format is line-oriented, tab-delimited, legacy Windows text. Each
//! significant line starts with a marker: `ERMHDR` (file header), `%T` (begin
//! table), `%F` (field list), `%R` (data row), `%E` (end of file). The reader
//! produces the tables in file order with their raw string cells; all typing
//! happens in the builder.

use std::borrow::Cow;

use crate::error::{ImportError, ImportResult};

/// Inputs above this size are rejected before decoding.
pub const MAX_FILE_BYTES: usize = 100 * 1024 * 1024;

/// Ceiling on cumulative `%R` rows across all tables.
pub const MAX_ROWS: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XerTable {
    pub name: String,
    pub fields: Vec<String>,
    /// Raw cell values, positionally aligned to `fields`. A row may be
    /// shorter than the field list; the missing cells are absent.
    pub rows: Vec<Vec<String>>,
}

impl XerTable {
    fn new(name: String) -> Self {
        Self {
            name,
            fields: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|candidate| candidate == field)
    }

    /// Cell value for `field` in `row`. Absent and empty cells are both None.
    pub fn cell<'a>(&self, row: &'a [String], field: &str) -> Option<&'a str> {
        let index = self.field_index(field)?;
        match row.get(index) {
            Some(value) if !value.is_empty() => Some(value.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XerDocument {
    pub tables: Vec<XerTable>,
    pub has_header: bool,
}

impl XerDocument {
    pub fn table(&self, name: &str) -> Option<&XerTable> {
        self.tables.iter().find(|table| table.name == name)
    }

    pub fn row_count(&self) -> usize {
        self.tables.iter().map(|table| table.rows.len()).sum()
    }

    /// Later `%T` occurrences of a table name shadow earlier ones.
    fn push_table(&mut self, table: XerTable) {
        if let Some(existing) = self
            .tables
            .iter_mut()
            .find(|candidate| candidate.name == table.name)
        {
            tracing::debug!("duplicate table '{}', keeping the last occurrence", table.name);
            *existing = table;
        } else {
            self.tables.push(table);
        }
    }
}

/// Decodes and tokenizes an XER byte stream into its tables.
pub fn read_document(bytes: &[u8]) -> ImportResult<XerDocument> {
    if bytes.len() > MAX_FILE_BYTES {
        return Err(ImportError::FileTooLarge {
            size_mib: (bytes.len() / (1024 * 1024)) as u64,
            max_mib: (MAX_FILE_BYTES / (1024 * 1024)) as u64,
        });
    }

    let text = decode(bytes)?;

    let mut document = XerDocument::default();
    let mut current: Option<XerTable> = None;
    let mut marker_seen = false;
    let mut row_count = 0usize;
    let mut ended = false;

    for line in text.split(['\n', '\r']) {
        if line.trim().is_empty() {
            continue;
        }
        let mut cells = line.split('\t');
        let marker = cells.next().unwrap_or_default();

        match marker {
            "ERMHDR" => {
                // Version, export date, and user are informational only.
                marker_seen = true;
                document.has_header = true;
            }
            "%T" => {
                marker_seen = true;
                if let Some(table) = current.take() {
                    document.push_table(table);
                }
                let name = cells.next().unwrap_or_default().trim().to_uppercase();
                current = Some(XerTable::new(name));
            }
            "%F" => {
                marker_seen = true;
                if let Some(table) = current.as_mut() {
                    table.fields = cells.map(|field| field.trim().to_string()).collect();
                }
            }
            "%R" => {
                marker_seen = true;
                row_count += 1;
                if row_count > MAX_ROWS {
                    return Err(ImportError::TooManyRows {
                        count: row_count,
                        max: MAX_ROWS,
                    });
                }
                match current.as_mut() {
                    Some(table) if !table.fields.is_empty() => {
                        let mut row: Vec<String> =
                            cells.map(|cell| cell.to_string()).collect();
                        if row.len() > table.fields.len() {
                            tracing::debug!(
                                "row in '{}' has {} extra cell(s), ignoring them",
                                table.name,
                                row.len() - table.fields.len()
                            );
                            row.truncate(table.fields.len());
                        }
                        table.rows.push(row);
                    }
                    _ => {
                        tracing::debug!("data row before any field list, skipping");
                    }
                }
            }
            "%E" => {
                marker_seen = true;
                if let Some(table) = current.take() {
                    document.push_table(table);
                }
                ended = true;
                break;
            }
            _ => {}
        }
    }

    // Without a closing %E the trailing table only survives if it has rows.
    if !ended {
        if let Some(table) = current.take() {
            if !table.rows.is_empty() {
                document.push_table(table);
            }
        }
    }

    if !marker_seen {
        return Err(ImportError::InvalidFormat);
    }
    if !document.has_header {
        tracing::warn!("no ERMHDR line in file, proceeding without header");
    }

    Ok(document)
}

/// Windows-1252 first: the format is legacy Windows-origin and predominantly
/// single-byte. UTF-8 is the fallback.
fn decode(bytes: &[u8]) -> ImportResult<Cow<'_, str>> {
    if let Some(text) = encoding_rs::WINDOWS_1252.decode_without_bom_handling_and_without_replacement(bytes)
    {
        return Ok(text);
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(Cow::Borrowed(text)),
        Err(_) => Err(ImportError::Encoding),
    }
}
