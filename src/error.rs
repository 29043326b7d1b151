//! Error types for the compiler.
//!
//! Faults found while scanning a direction carry a [`Snapshot`] of what had
//! been accumulated so far, so the caller can print it next to the message
//! and the source text can be fixed by hand.

use std::fmt;

use super::cities::CitySpot;

/// A token that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// A day token holding no known weekday abbreviation
    #[error("no weekday abbreviation recognised in {0:?}")]
    UnknownDays(String),

    /// A feature token outside the vocabulary, under the `reject` policy
    #[error("unknown service feature {0:?}")]
    UnknownFeature(String),
}

/// A fault raised while handling a single direction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectionFault {
    #[error("station {station:?} appears before any city")]
    StationWithoutCity { station: String },

    #[error("schedule {row}: {cells} entries but only {days} days defined")]
    RowTooWide { row: usize, cells: usize, days: usize },

    #[error("more schedules entries ({width}) than days definition ({days})")]
    ScheduleWiderThanDays { width: usize, days: usize },

    #[error("station {station:?} in {city} has no schedule row left")]
    MissingSchedule { city: String, station: String },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Fatal errors of a compilation run.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("cannot read line definition: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing direction: only have {found} (should have 2)")]
    DirectionCount { found: usize },

    #[error("found duplicates in direction {direction} for city {city} in {source_name}")]
    DuplicateCity {
        direction: usize,
        city: String,
        source_name: String,
        snapshot: Box<Snapshot>,
    },

    #[error("direction {direction}: {fault}")]
    Direction {
        direction: usize,
        fault: DirectionFault,
        snapshot: Box<Snapshot>,
    },
}

impl CompileError {
    /// Partial state captured when the error was raised inside a direction.
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            CompileError::DuplicateCity { snapshot, .. }
            | CompileError::Direction { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }
}

/// Errors loading a [`crate::config::CompilerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Errors of the schedule block mixer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    #[error("missing h= definition")]
    MissingHeader,

    #[error("wrong line count for block {block}: got {found}, expect {expected}")]
    LineCount {
        block: usize,
        found: usize,
        expected: usize,
    },
}

/// Cities, stations and schedule rows of a direction at the point it failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub last_line: Option<String>,
    pub cities: Vec<CitySpot>,
    pub rows: Vec<String>,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(line) = &self.last_line {
            writeln!(f, "Last schedule line is: {line}")?;
        }
        writeln!(f, "Cities:")?;
        for spot in &self.cities {
            writeln!(f, "+ {}", spot.city)?;
            for station in &spot.stations {
                writeln!(f, "|--- {station}")?;
            }
        }
        write!(f, "Current direction schedules ({} lines)", self.rows.len())?;
        for (k, row) in self.rows.iter().enumerate() {
            write!(f, "\n[L{:02}] {row}", k + 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DirectionFault::RowTooWide {
            row: 2,
            cells: 4,
            days: 3,
        };
        assert_eq!(err.to_string(), "schedule 2: 4 entries but only 3 days defined");

        let err = CompileError::DirectionCount { found: 1 };
        assert_eq!(
            err.to_string(),
            "missing direction: only have 1 (should have 2)"
        );
        assert!(err.snapshot().is_none());

        let err = BlockError::LineCount {
            block: 2,
            found: 3,
            expected: 4,
        };
        assert_eq!(
            err.to_string(),
            "wrong line count for block 2: got 3, expect 4"
        );
    }

    #[test]
    fn test_snapshot_dump() {
        let snapshot = Snapshot {
            last_line: Some("08:00 09:00".to_string()),
            cities: vec![CitySpot {
                city: "AGDE".to_string(),
                stations: vec!["Centre".to_string(), "Gare".to_string()],
            }],
            rows: vec!["08:00 09:00".to_string()],
        };
        assert_eq!(
            snapshot.to_string(),
            "Last schedule line is: 08:00 09:00\n\
             Cities:\n\
             + AGDE\n\
             |--- Centre\n\
             |--- Gare\n\
             Current direction schedules (1 lines)\n\
             [L01] 08:00 09:00"
        );
    }
}
