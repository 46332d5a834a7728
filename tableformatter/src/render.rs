use crate::error::{Result, TableError};
use crate::schema::{Column, ColumnType, Value};
use crate::table::Table;
use comfy_table::{
    presets, Cell, CellAlignment, ColumnConstraint, ContentArrangement, Table as Grid, Width,
};
use serde_json::{Map, Number, Value as Json};
use std::fmt::Write;
use std::str::FromStr;

/// Output format selected with `--format`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    /// Map a user supplied selector to a format. Matching is case-insensitive
    /// and anything unrecognised selects the human-readable table.
    pub fn from_selector(selector: &str) -> Self {
        match selector.trim().to_ascii_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            "" => OutputFormat::Text,
            other => {
                tracing::debug!(selector = other, "unknown output format, using text");
                OutputFormat::Text
            }
        }
    }
}

impl FromStr for OutputFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_selector(s))
    }
}

impl Table {
    /// Render the table. `entity` names the listed records in the text
    /// summary line, e.g. `Total: 3 Secrets`.
    pub fn render(&self, entity: &str, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => self.render_text(entity),
            OutputFormat::Json => self.render_json(),
            OutputFormat::Csv => self.render_csv(),
        }
    }

    pub fn render_text(&self, entity: &str) -> Result<String> {
        let mut grid = Grid::new();
        grid.load_preset(presets::ASCII_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Disabled)
            .set_header(self.columns().iter().map(|c| Cell::new(&c.name)));

        for row in self.rows() {
            grid.add_row(row.iter().map(|v| Cell::new(v.display_text())));
        }

        let padding = 2;
        for (index, (column, width)) in self
            .columns()
            .iter()
            .zip(self.column_widths())
            .enumerate()
        {
            if let Some(grid_column) = grid.column_mut(index) {
                grid_column.set_cell_alignment(alignment(column.kind));
                grid_column.set_constraint(ColumnConstraint::LowerBoundary(Width::Fixed(
                    u16::try_from(width + padding).unwrap_or(u16::MAX),
                )));
            }
        }

        let mut out = String::new();
        writeln!(out, "{}", self.title().unwrap_or(entity)).ok();
        if let Some(subtitle) = self.subtitle() {
            writeln!(out, "{}", subtitle.trim_end()).ok();
        }
        writeln!(out, "{}", grid).ok();
        writeln!(out, "Total: {} {}", self.len(), entity).ok();
        writeln!(out).ok();
        Ok(out)
    }

    pub fn render_json(&self) -> Result<String> {
        let records = self
            .rows()
            .iter()
            .map(|row| {
                self.columns()
                    .iter()
                    .zip(row)
                    .map(|(column, value)| Ok((column.name.clone(), json_value(column, value)?)))
                    .collect::<Result<Map<String, Json>>>()
                    .map(Json::Object)
            })
            .collect::<Result<Vec<Json>>>()?;

        Ok(serde_json::to_string_pretty(&records)?)
    }

    pub fn render_csv(&self) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(self.columns().iter().map(|c| c.name.as_str()))?;
        for row in self.rows() {
            let fields = self
                .columns()
                .iter()
                .zip(row)
                .map(|(column, value)| csv_field(column, value))
                .collect::<Result<Vec<String>>>()?;
            writer.write_record(&fields)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| TableError::Io(std::io::Error::new(e.error().kind(), e.error().to_string())))?;
        Ok(String::from_utf8(bytes)?)
    }
}

fn alignment(kind: ColumnType) -> CellAlignment {
    if kind.is_numeric() {
        CellAlignment::Right
    } else {
        CellAlignment::Left
    }
}

fn json_value(column: &Column, value: &Value) -> Result<Json> {
    if matches!(value, Value::Null) {
        return Ok(Json::Null);
    }
    if !column.kind.is_numeric() {
        return Ok(Json::String(value.to_string()));
    }

    match value {
        Value::Int(i) => Ok(Json::from(*i)),
        Value::Float(f) => Number::from_f64(*f)
            .map(Json::Number)
            .ok_or_else(|| TableError::unsupported(&column.name, f, "JSON")),
        Value::Str(s) => parse_number(s)
            .ok_or_else(|| TableError::unsupported(&column.name, s, "JSON")),
        other => Err(TableError::unsupported(&column.name, other, "JSON")),
    }
}

fn parse_number(text: &str) -> Option<Json> {
    let text = text.trim();
    if let Ok(i) = text.parse::<i64>() {
        return Some(Json::from(i));
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Json::Number)
}

fn csv_field(column: &Column, value: &Value) -> Result<String> {
    match value {
        Value::Float(f) if !f.is_finite() => {
            Err(TableError::unsupported(&column.name, f, "CSV"))
        }
        other => Ok(other.to_string()),
    }
}
