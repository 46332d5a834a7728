use crate::error::{Result, TableError};
use crate::schema::{Column, Value};

pub type Row = Vec<Value>;

/// Rows sharing one column schema, plus optional title lines
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Row>,
    title: Option<String>,
    subtitle: Option<String>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            title: None,
            subtitle: None,
        }
    }

    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_subtitle<S: Into<String>>(mut self, subtitle: S) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Append a column after rows exist. Existing rows are padded with `Null`.
    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
        for row in &mut self.rows {
            row.push(Value::Null);
        }
    }

    /// Append a row, rejecting it when its length differs from the schema
    pub fn push_row(&mut self, row: Row) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                index: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_index(&self, name: &str) -> usize {
        match self.columns.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => panic!(
                "sort column '{}' is not part of the table schema {:?}",
                name,
                self.columns.iter().map(|c| &c.name).collect::<Vec<_>>()
            ),
        }
    }

    /// Stable ascending sort by the named columns, first name has the highest
    /// priority.
    ///
    /// # Panics
    ///
    /// Panics when a name does not match a column label.
    pub fn sort_by(mut self, names: &[&str]) -> Self {
        let keys: Vec<usize> = names.iter().map(|name| self.column_index(name)).collect();
        self.rows.sort_by(|a, b| {
            keys.iter()
                .map(|&k| a[k].compare(&b[k]))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        self
    }

    /// Display width of each column: the largest of the declared minimum, the
    /// header label and the widest formatted value.
    pub fn column_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let widest_value = self
                    .rows
                    .iter()
                    .map(|row| row[index].display_text().chars().count())
                    .max()
                    .unwrap_or(0);
                column
                    .min_width
                    .max(column.name.chars().count())
                    .max(widest_value)
            })
            .collect()
    }
}
