//
//  redmine-cli
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Formatting Module
//!
//! Renders command results either as human-readable tables or as JSON for
//! scripting.
//!
//! ## Output Formats
//!
//! | Format | Use Case | Example Flag |
//! |--------|----------|--------------|
//! | Table | Interactive terminal use | (default) |
//! | JSON | Scripting and automation | `--json` |
//!
//! Lists are printed as one `comfy-table` table followed by a
//! `Showing a-b of N` line derived from the response [`Pagination`].

mod table;

pub use table::*;

use console::style;
use serde::Serialize;

use crate::api::Pagination;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// A value that renders as one row of a list table.
pub trait TableRow {
    /// Column headers, in row order.
    fn headers() -> Vec<&'static str>;

    /// Cell values for this item.
    fn row(&self, color: bool) -> Vec<String>;
}

/// A value that renders as a detail view.
pub trait TableOutput {
    fn print_table(&self, color: bool);
}

/// Writes command results in the selected [`OutputFormat`].
pub struct OutputWriter {
    format: OutputFormat,
    color: bool,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled(),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Writes a single item.
    pub fn write<T: Serialize + TableOutput>(&self, value: &T) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Table => value.print_table(self.color),
        }
        Ok(())
    }

    /// Writes one page of a list with its pagination summary.
    pub fn write_list<T: Serialize + TableRow>(
        &self,
        values: &[T],
        page: &Pagination,
    ) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(values)?),
            OutputFormat::Table => {
                if values.is_empty() {
                    println!("No results found.");
                    return Ok(());
                }
                TableBuilder::new()
                    .color(self.color)
                    .headers(T::headers())
                    .rows(values.iter().map(|v| v.row(self.color)))
                    .print();
                println!("{}", page_summary(values.len(), page));
            }
        }
        Ok(())
    }

    pub fn write_error(&self, msg: &str) {
        if self.color {
            eprintln!("{} {}", style("error:").red().bold(), msg);
        } else {
            eprintln!("error: {}", msg);
        }
    }

    pub fn write_success(&self, msg: &str) {
        if self.format == OutputFormat::Json {
            return;
        }
        if self.color {
            println!("{} {}", style("✓").green().bold(), msg);
        } else {
            println!("✓ {}", msg);
        }
    }
}

/// Summarizes which slice of a collection was shown.
///
/// # Example
///
/// ```rust
/// use redmine_cli::api::Pagination;
/// use redmine_cli::output::page_summary;
///
/// let page = Pagination { total_count: 42, limit: 25, offset: 25 };
/// assert_eq!(page_summary(17, &page), "Showing 26-42 of 42");
/// ```
pub fn page_summary(shown: usize, page: &Pagination) -> String {
    if shown == 0 {
        return format!("Showing 0 of {}", page.total_count);
    }
    let first = u64::from(page.offset) + 1;
    let last = u64::from(page.offset) + shown as u64;
    // Endpoints without paging report no total.
    let total = u64::from(page.total_count).max(last);
    format!("Showing {}-{} of {}", first, last, total)
}

/// Prints a `key: value` line of a detail view, skipping empty values.
pub fn print_field(key: &str, value: &str, color: bool) {
    if value.is_empty() {
        return;
    }
    if color {
        println!("  {:<14} {}", style(format!("{}:", key)).dim(), value);
    } else {
        println!("  {:<14} {}", format!("{}:", key), value);
    }
}

pub fn print_header(text: &str, color: bool) {
    if color {
        println!("{}", style(text).bold());
    } else {
        println!("{}", text);
    }
    println!("{}", "-".repeat(text.chars().count()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_summary_first_page() {
        let page = Pagination {
            total_count: 42,
            limit: 25,
            offset: 0,
        };
        assert_eq!(page_summary(25, &page), "Showing 1-25 of 42");
    }

    #[test]
    fn test_page_summary_without_total() {
        assert_eq!(page_summary(3, &Pagination::default()), "Showing 1-3 of 3");
    }

    #[test]
    fn test_page_summary_empty() {
        let page = Pagination {
            total_count: 10,
            limit: 25,
            offset: 25,
        };
        assert_eq!(page_summary(0, &page), "Showing 0 of 10");
    }

    #[test]
    fn test_default_format_is_table() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }
}
