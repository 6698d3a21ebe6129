//! Table formatting for CLI list output
//!
//! One formatter serves catalog listings, build contents and test results
//! so every table honours `--format tsv|csv|md|id` the same way.

use console::style;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{color_swatch, escape_csv, truncate_str};
use crate::cli::OutputFormat;
use crate::engine::performance::Priority;
use crate::engine::result::{ResultStatus, Trend};

/// Configuration for table output
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Show summary line after table (e.g., "5 component(s) found")
    pub show_summary: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { show_summary: true }
    }
}

impl TableConfig {
    /// Create config optimized for piping (no summary)
    pub fn for_pipe() -> Self {
        Self { show_summary: false }
    }
}

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Catalog or instance id (cyan)
    Id(String),
    /// Plain text, truncated to the column
    Text(String),
    /// Component category or test tier
    Type(String),
    /// Metric status with colour coding
    Status(ResultStatus),
    /// Metric trend as an arrow
    Trend(Trend),
    /// Suggestion priority with colour coding
    Priority(Priority),
    /// `#RRGGBB` colour with a swatch
    Color(String),
    /// Numeric value
    Number(i64),
    /// Empty/placeholder
    Empty,
}

impl CellValue {
    /// Format for TSV output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Id(id) => format!("{:<width$}", style(id).cyan(), width = width),
            CellValue::Text(s) | CellValue::Type(s) => {
                let truncated = truncate_str(s, width.saturating_sub(2));
                format!("{:<width$}", truncated, width = width)
            }
            CellValue::Status(status) => {
                let s = status.to_string();
                let styled = match status {
                    ResultStatus::Pass => style(s).green(),
                    ResultStatus::Warning => style(s).yellow(),
                    ResultStatus::Fail => style(s).red().bold(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Trend(trend) => {
                let styled = match trend {
                    Trend::Up => style(trend.arrow()).green(),
                    Trend::Down => style(trend.arrow()).red(),
                    Trend::Neutral => style(trend.arrow()).dim(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Priority(priority) => {
                let s = priority.to_string();
                let styled = match priority {
                    Priority::High => style(s).yellow(),
                    Priority::Medium => style(s).white(),
                    Priority::Low => style(s).dim(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Color(hex) => color_swatch(hex),
            CellValue::Number(n) => format!("{:>width$}", n, width = width),
            CellValue::Empty => format!("{:<width$}", "-", width = width),
        }
    }

    /// Format for CSV output (RFC 4180, no colors)
    pub fn format_csv(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            other => escape_csv(&other.raw()),
        }
    }

    /// Format for Markdown output (no colors, escaped pipes)
    pub fn format_md(&self) -> String {
        let raw = match self {
            CellValue::Status(ResultStatus::Fail) => "**fail**".to_string(),
            CellValue::Trend(trend) => trend.arrow().to_string(),
            CellValue::Empty => "-".to_string(),
            other => other.raw(),
        };
        raw.replace('|', "\\|")
    }

    /// Get raw string value (no formatting)
    pub fn raw(&self) -> String {
        match self {
            CellValue::Id(s) | CellValue::Text(s) | CellValue::Type(s) | CellValue::Color(s) => {
                s.clone()
            }
            CellValue::Status(status) => status.to_string(),
            CellValue::Trend(trend) => trend.to_string(),
            CellValue::Priority(priority) => priority.to_string(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Empty => String::new(),
        }
    }

    /// Get the display width of this cell's content (for dynamic column sizing)
    pub fn display_width(&self) -> usize {
        match self {
            CellValue::Trend(_) => 1,
            CellValue::Color(hex) => hex.len() + 3,
            CellValue::Empty => 1,
            other => other.raw().chars().count(),
        }
    }
}

/// Column definition with header label and maximum width
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// A row of cell values for table output
pub struct TableRow {
    /// Short reference such as `@3`, shown in the REF column when present
    pub reference: Option<String>,
    /// Value printed by `--format id`
    pub full_id: String,
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new(full_id: impl Into<String>) -> Self {
        Self {
            reference: None,
            full_id: full_id.into(),
            cells: Vec::new(),
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Table formatter that outputs rows in various formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    item_name: &'static str,
    config: TableConfig,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], item_name: &'static str) -> Self {
        Self {
            columns,
            item_name,
            config: TableConfig::default(),
        }
    }

    /// Configure the formatter with custom settings
    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Output rows in the specified format; yaml/json are handled by callers
    pub fn output<I>(&self, rows: I, format: OutputFormat)
    where
        I: IntoIterator<Item = TableRow>,
    {
        let rows: Vec<TableRow> = rows.into_iter().collect();

        match format {
            OutputFormat::Csv => self.output_csv(&rows),
            OutputFormat::Md => self.output_md(&rows),
            OutputFormat::Id => self.output_ids(&rows),
            _ => self.output_tsv(&rows),
        }
    }

    fn has_references(rows: &[TableRow]) -> bool {
        rows.iter().any(|r| r.reference.is_some())
    }

    /// Calculate dynamic column widths based on actual content
    fn calculate_widths(&self, rows: &[TableRow]) -> Vec<usize> {
        self.columns
            .iter()
            .map(|col| {
                let max_content = rows
                    .iter()
                    .filter_map(|r| r.get(col.key))
                    .map(|v| v.display_width())
                    .max()
                    .unwrap_or(0);
                // +2 leaves room for truncate_str's margin
                col.header
                    .len()
                    .max(max_content.saturating_add(2))
                    .min(col.width)
            })
            .collect()
    }

    fn output_tsv(&self, rows: &[TableRow]) {
        let widths = self.calculate_widths(rows);
        let with_refs = Self::has_references(rows);
        let ref_width = rows
            .iter()
            .filter_map(|r| r.reference.as_ref())
            .map(|r| r.len())
            .max()
            .unwrap_or(0)
            .max(3);

        let mut header_parts = Vec::new();
        if with_refs {
            header_parts.push(format!("{:<width$}", style("REF").bold().dim(), width = ref_width));
        }
        for (col, width) in self.columns.iter().zip(&widths) {
            header_parts.push(format!("{:<width$}", style(col.header).bold(), width = width));
        }
        println!("{}", header_parts.join(" "));

        let total_width: usize = widths.iter().sum::<usize>()
            + widths.len().saturating_sub(1)
            + if with_refs { ref_width + 1 } else { 0 };
        println!("{}", "-".repeat(total_width));

        for row in rows {
            let mut parts = Vec::new();
            if with_refs {
                let reference = row.reference.as_deref().unwrap_or("");
                parts.push(format!("{:<width$}", style(reference).cyan(), width = ref_width));
            }
            for (col, width) in self.columns.iter().zip(&widths) {
                match row.get(col.key) {
                    Some(value) => parts.push(value.format_tsv(*width)),
                    None => parts.push(format!("{:<width$}", "-", width = width)),
                }
            }
            println!("{}", parts.join(" ").trim_end());
        }

        if self.config.show_summary {
            println!();
            if with_refs {
                println!(
                    "{} {}(s) found. Use {} to reference by position.",
                    style(rows.len()).cyan(),
                    self.item_name,
                    style("@N").cyan()
                );
            } else {
                println!("{} {}(s) found.", style(rows.len()).cyan(), self.item_name);
            }
        }
    }

    fn output_csv(&self, rows: &[TableRow]) {
        let with_refs = Self::has_references(rows);
        let mut headers = Vec::new();
        if with_refs {
            headers.push("ref".to_string());
        }
        headers.extend(self.columns.iter().map(|c| c.key.to_string()));
        println!("{}", headers.join(","));

        for row in rows {
            let mut values = Vec::new();
            if with_refs {
                values.push(escape_csv(row.reference.as_deref().unwrap_or("")));
            }
            for col in self.columns {
                values.push(row.get(col.key).map(|v| v.format_csv()).unwrap_or_default());
            }
            println!("{}", values.join(","));
        }
    }

    fn output_md(&self, rows: &[TableRow]) {
        println!("{}", self.render_md(rows));
    }

    /// Markdown table rendered with `tabled`
    fn render_md(&self, rows: &[TableRow]) -> String {
        let with_refs = Self::has_references(rows);
        let mut builder = Builder::default();

        let mut headers = Vec::new();
        if with_refs {
            headers.push("Ref".to_string());
        }
        headers.extend(self.columns.iter().map(|c| c.header.to_string()));
        builder.push_record(headers);

        for row in rows {
            let mut values = Vec::new();
            if with_refs {
                values.push(row.reference.clone().unwrap_or_default());
            }
            for col in self.columns {
                values.push(
                    row.get(col.key)
                        .map(|v| v.format_md())
                        .unwrap_or_else(|| "-".to_string()),
                );
            }
            builder.push_record(values);
        }

        builder.build().with(Style::markdown()).to_string()
    }

    fn output_ids(&self, rows: &[TableRow]) {
        for row in rows {
            println!("{}", row.full_id);
        }
    }
}
