//! Reading headerless single-column run-time files into one combined,
//! label-tagged collection. Row order within a file and source order
//! across files are preserved; a line that is not a number is a fatal
//! error naming the file and line.

use std::fs::File;
use std::io::{BufRead, BufReader};

use anyhow::{anyhow, Context, Result};

use crate::config::SourceSpec;

/// All samples that were read for one label, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSamples {
    pub label: String,
    pub values: Vec<f64>,
}

/// The combined collection over all sources, grouped by label in
/// source order. Built once per invocation, not mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSet {
    groups: Vec<LabeledSamples>,
}

impl SampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends to the group for `label`, creating it on first use (the
    /// number of labels is tiny, a linear scan is fine).
    pub fn push(&mut self, label: &str, value: f64) {
        match self.groups.iter_mut().find(|g| g.label == label) {
            Some(group) => group.values.push(value),
            None => self.groups.push(LabeledSamples {
                label: label.to_string(),
                values: vec![value],
            }),
        }
    }

    pub fn groups(&self) -> &[LabeledSamples] {
        &self.groups
    }

    pub fn get(&self, label: &str) -> Option<&LabeledSamples> {
        self.groups.iter().find(|g| g.label == label)
    }

    /// Total number of samples across all groups.
    pub fn num_samples(&self) -> usize {
        self.groups.iter().map(|g| g.values.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn read_sources(sources: &[SourceSpec]) -> Result<Self> {
        let mut set = Self::new();
        for SourceSpec { path, label } in sources {
            let input = File::open(path)
                .with_context(|| anyhow!("opening run time file {path:?}"))?;
            set.read_column(BufReader::new(input), &path.to_string_lossy(), label)?;
        }
        Ok(set)
    }

    /// Reads one numeric column from `input`, tagging every value with
    /// `label`. Blank lines are skipped so that a trailing newline is
    /// not an error. Returns the number of samples read.
    pub fn read_column<R: BufRead>(
        &mut self,
        input: R,
        origin: &str,
        label: &str,
    ) -> Result<usize> {
        let mut num_read = 0;
        for (i, line) in input.lines().enumerate() {
            let linenum = i + 1;
            let line = line.with_context(|| anyhow!("reading {origin}:{linenum}"))?;
            let s = line.trim();
            if s.is_empty() {
                continue;
            }
            let value: f64 = s.parse().with_context(|| {
                anyhow!("parsing {origin}:{linenum}: expected a number, got {s:?}")
            })?;
            self.push(label, value);
            num_read += 1;
        }
        Ok(num_read)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn t_read_column() {
        let mut set = SampleSet::new();
        let n = set
            .read_column(Cursor::new("1.0\n2.0\n3.0\n"), "runs.csv", "Run 1")
            .unwrap();
        assert_eq!(n, 3);
        assert_eq!(set.get("Run 1").unwrap().values, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn t_blank_lines_skipped() {
        let mut set = SampleSet::new();
        let n = set
            .read_column(Cursor::new("1.5\n\n2.5\n   \n"), "runs.csv", "Run 1")
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(set.num_samples(), 2);
    }

    #[test]
    fn t_non_numeric_line_is_fatal() {
        let mut set = SampleSet::new();
        let e = set
            .read_column(Cursor::new("1.0\noops\n"), "runs.csv", "Run 1")
            .unwrap_err();
        let msg = format!("{e:#}");
        assert!(msg.contains("runs.csv:2"), "got: {msg}");
    }

    #[test]
    fn t_order_across_sources() {
        let mut set = SampleSet::new();
        set.read_column(Cursor::new("1.0\n2.0\n"), "a.csv", "A").unwrap();
        set.read_column(Cursor::new("9.0\n"), "b.csv", "B").unwrap();
        set.read_column(Cursor::new("3.0\n"), "a2.csv", "A").unwrap();
        let labels: Vec<&str> = set.groups().iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, ["A", "B"]);
        assert_eq!(set.get("A").unwrap().values, [1.0, 2.0, 3.0]);
        assert_eq!(set.num_samples(), 4);
    }

    #[test]
    fn t_missing_file_is_fatal() {
        let e = SampleSet::read_sources(&[SourceSpec {
            path: "/nonexistent/service_runs1_.csv".into(),
            label: "Camera Service".into(),
        }])
        .unwrap_err();
        assert!(format!("{e:#}").contains("service_runs1_"));
    }
}
