use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A parsed sheet as handed over by the upload collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetInput {
    pub columns: Vec<String>,
    pub rows: Vec<BTreeMap<String, String>>,
    pub file_name: String,
    pub sheet_name: String,
    pub total_rows: usize,
}

impl SheetInput {
    /// Column-ordered view used by the transformation engine.
    pub fn to_data(&self) -> SheetData {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| row.get(column).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        SheetData {
            headers: self.columns.clone(),
            rows,
        }
    }
}

/// Header row plus positional cells. Rows may be shorter than `headers`;
/// missing cells read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetData {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Returns the index of `name`, appending an empty column when absent.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column_index(name) {
            return idx;
        }
        self.headers.push(name.to_string());
        self.headers.len() - 1
    }

    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn set_cell(&mut self, row: usize, column: usize, value: String) {
        let Some(cells) = self.rows.get_mut(row) else {
            return;
        };
        if cells.len() <= column {
            cells.resize(column + 1, String::new());
        }
        cells[column] = value;
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Values of one column, empty when the column is absent.
    pub fn column_values(&self, name: &str) -> Vec<&str> {
        match self.column_index(name) {
            Some(idx) => (0..self.rows.len()).map(|row| self.cell(row, idx)).collect(),
            None => Vec::new(),
        }
    }
}
