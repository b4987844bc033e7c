//! Printing the per-label summary statistics table, the final
//! observable output of the histogram subcommands. Prints either
//! human-readable (padded columns, ANSI-styled title row) or as TSV
//! for machine consumption.
//!
//! Does not escape anything in the fields; labels containing tabs or
//! newlines would make the output ambiguous.

use std::fmt::Display;
use std::io::Write;

use anyhow::{anyhow, bail, Context, Result};
use yansi::{Paint, Style};

use crate::samples::SampleSet;
use crate::stats::Summary;

pub enum Align {
    Left,
    Right,
}

pub struct Column {
    pub title: String,
    pub width: usize,
    pub align: Align,
}

/// Streams rows; the column widths are defined up front. A value
/// wider than its column still gets a single separating space.
pub struct TerminalTable {
    columns: Vec<Column>,
    padding: String,
    /// Whether to print as TSV (tab separated, no ANSI codes, no
    /// padding)
    pub tsv_mode: bool,
}

impl TerminalTable {
    pub fn new(columns: Vec<Column>, tsv_mode: bool) -> Self {
        let max_width = columns.iter().map(|c| c.width).max().unwrap_or(0);
        let padding = " ".repeat(max_width);
        Self {
            columns,
            padding,
            tsv_mode,
        }
    }

    fn write_row<V: Display>(
        &self,
        row: &[V],
        line_style: Option<&Style>,
        out: &mut impl Write,
    ) -> Result<()> {
        if row.len() != self.columns.len() {
            bail!(
                "row.len != columns.len: {} vs. {}",
                row.len(),
                self.columns.len()
            );
        }

        let mut is_first = true;
        for (column, val) in self.columns.iter().zip(row) {
            if self.tsv_mode {
                if !is_first {
                    out.write_all(b"\t")?;
                }
                out.write_all(val.to_string().as_bytes())?;
            } else {
                let s = val.to_string();
                let needed_padding = column.width.saturating_sub(s.len());
                let padding = &self.padding[0..needed_padding];
                let s: String = if let Some(style) = line_style {
                    s.paint(*style).to_string()
                } else {
                    s
                };
                match column.align {
                    Align::Left => {
                        out.write_all(s.as_bytes())?;
                        out.write_all(padding.as_bytes())?;
                    }
                    Align::Right => {
                        out.write_all(padding.as_bytes())?;
                        out.write_all(s.as_bytes())?;
                    }
                }
                // at least 1 space between columns, even when the
                // value fills the width
                out.write_all(b" ")?;
            }
            is_first = false;
        }
        out.write_all(b"\n")?;
        Ok(())
    }

    pub fn write_title_row(&self, out: &mut impl Write) -> Result<()> {
        const STYLE: Style = Style::new().bold().italic();
        let titles: Vec<&str> = self.columns.iter().map(|c| c.title.as_str()).collect();
        self.write_row(
            &titles,
            if self.tsv_mode { None } else { Some(&STYLE) },
            out,
        )
    }

    pub fn write_data_row<V: Display>(&self, data: &[V], out: &mut impl Write) -> Result<()> {
        self.write_row(data, None, out)
    }
}

const NUMBER_WIDTH: usize = 13;

/// The count/mean/std/var/min/max table over all groups, one row per
/// label. An empty group is a fatal error here, same as everywhere
/// else in the run-time evaluation.
pub fn write_summary(set: &SampleSet, tsv_mode: bool, out: &mut impl Write) -> Result<()> {
    let mut rows = Vec::new();
    for group in set.groups() {
        let summary = Summary::from_values(&group.values)
            .with_context(|| anyhow!("summarizing group {:?}", group.label))?;
        rows.push((group.label.as_str(), summary));
    }

    let label_width = rows
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0)
        .max("label".len())
        + 2;
    let number_column = |title: &str| Column {
        title: title.to_string(),
        width: NUMBER_WIDTH,
        align: Align::Right,
    };
    let table = TerminalTable::new(
        vec![
            Column {
                title: "label".to_string(),
                width: label_width,
                align: Align::Left,
            },
            Column {
                title: "count".to_string(),
                width: 7,
                align: Align::Right,
            },
            number_column("mean"),
            number_column("std"),
            number_column("var"),
            number_column("min"),
            number_column("max"),
        ],
        tsv_mode,
    );

    table.write_title_row(out)?;
    for (label, s) in rows {
        table.write_data_row(
            &[
                label.to_string(),
                s.count.to_string(),
                format!("{:.6}", s.mean),
                format!("{:.6}", s.sd),
                format!("{:.6}", s.var),
                format!("{:.6}", s.min),
                format!("{:.6}", s.max),
            ],
            out,
        )?;
    }
    Ok(())
}
