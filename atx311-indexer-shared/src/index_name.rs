//! Monthly index naming.
//!
//! Documents are partitioned into one index per calendar month of their
//! creation date, named `<prefix>-<year>-<month>`.

use chrono::{Datelike, NaiveDateTime};

/// Prefix used for every index when none is configured.
pub const DEFAULT_INDEX_PREFIX: &str = "atx311";

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    /// 1-based month.
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_datetime(datetime: &NaiveDateTime) -> Self {
        Self::new(datetime.year(), datetime.month())
    }

    /// The month after this one.
    pub fn next(&self) -> Self {
        if self.month >= 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// Every month from `from` through `to`, both inclusive.
    ///
    /// Empty when `from` is after `to`.
    pub fn range_inclusive(from: Self, to: Self) -> impl Iterator<Item = Self> {
        std::iter::successors(Some(from), |current| Some(current.next()))
            .take_while(move |current| *current <= to)
    }
}

/// Render the index name for `month`.
pub fn monthly_index_name(prefix: &str, month: YearMonth) -> String {
    format!("{}-{}-{:02}", prefix, month.year, month.month)
}
