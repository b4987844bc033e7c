//! Extraction of per-service release timestamps from a free-text log.
//!
//! Only lines of the form `RELEASE2: Service <id> at <sec>.<nsec>`
//! carry data; everything else in the log is unrelated output and is
//! silently skipped. The two timestamp fields are the seconds and the
//! nanoseconds of a clock reading, printed fixed-width with 9
//! fractional digits; the conversion to milliseconds relies on that
//! width. A matching line with a different fractional width is still
//! converted with the fixed scaling but flagged with a warning, since
//! the result is then wrong (the log format would have to be
//! clarified before changing the scaling).

use std::fmt::{self, Display};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;

use crate::warn;

lazy_static! {
    static ref RELEASE_RE: Regex = Regex::new(r"RELEASE2: Service (\d+) at (\d+)\.(\d+)")
        .expect("statically known pattern");
}

pub const EXPECTED_FRACTION_DIGITS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceId(pub u32);

impl Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Service {}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleaseEvent {
    pub service: ServiceId,
    pub time_ms: f64,
}

/// Returns the event on a matching line, None otherwise. Integer
/// fields too large for their type are flagged and the line skipped
/// rather than aborting the whole evaluation.
pub fn parse_release_line(line: &str) -> Option<ReleaseEvent> {
    let caps = RELEASE_RE.captures(line)?;
    let service = match caps[1].parse::<u32>() {
        Ok(id) => ServiceId(id),
        Err(_) => {
            warn!("service id out of range, skipping line: {line:?}");
            return None;
        }
    };
    let sec = match caps[2].parse::<u64>() {
        Ok(sec) => sec,
        Err(_) => {
            warn!("seconds field out of range, skipping line: {line:?}");
            return None;
        }
    };
    let frac_str = &caps[3];
    if frac_str.len() != EXPECTED_FRACTION_DIGITS {
        warn!(
            "fractional timestamp field with {} digits instead of \
             {EXPECTED_FRACTION_DIGITS} in line {line:?}; keeping the fixed \
             nanosecond scaling, the resulting milliseconds are off",
            frac_str.len()
        );
    }
    let frac = match frac_str.parse::<u64>() {
        Ok(frac) => frac,
        Err(_) => {
            warn!("fractional field out of range, skipping line: {line:?}");
            return None;
        }
    };
    Some(ReleaseEvent {
        service,
        time_ms: sec as f64 * 1000.0 + frac as f64 / 1e6,
    })
}

/// All timestamps seen for one service, in file order (the log is not
/// guaranteed to be sorted).
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceLane {
    pub service: ServiceId,
    pub times_ms: Vec<f64>,
}

/// Lanes ordered by first appearance of each service id in the log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceTimes {
    lanes: Vec<ServiceLane>,
}

impl ServiceTimes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ReleaseEvent) {
        let ReleaseEvent { service, time_ms } = event;
        match self.lanes.iter_mut().find(|lane| lane.service == service) {
            Some(lane) => lane.times_ms.push(time_ms),
            None => self.lanes.push(ServiceLane {
                service,
                times_ms: vec![time_ms],
            }),
        }
    }

    pub fn lanes(&self) -> &[ServiceLane] {
        &self.lanes
    }

    pub fn num_lanes(&self) -> usize {
        self.lanes.len()
    }

    pub fn num_events(&self) -> usize {
        self.lanes.iter().map(|lane| lane.times_ms.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// The largest timestamp over all lanes, for the diagram's x range.
    pub fn max_time_ms(&self) -> Option<f64> {
        self.lanes
            .iter()
            .flat_map(|lane| lane.times_ms.iter().copied())
            .fold(None, |acc, t| Some(acc.map_or(t, |m: f64| m.max(t))))
    }

    pub fn read_log<R: BufRead>(input: R) -> Result<Self> {
        let mut times = Self::new();
        for (i, line) in input.lines().enumerate() {
            let line = line.with_context(|| anyhow!("reading log line {}", i + 1))?;
            if let Some(event) = parse_release_line(&line) {
                times.push(event);
            }
        }
        Ok(times)
    }

    pub fn read_log_file(path: &Path) -> Result<Self> {
        let input =
            File::open(path).with_context(|| anyhow!("opening release log {path:?}"))?;
        Self::read_log(BufReader::new(input))
    }
}
