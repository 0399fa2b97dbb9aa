// Date range selection over the approval timestamp
use crate::model::{ConfigError, OrderRecord};
use chrono::NaiveDate;
use std::fmt;

/// Inclusive window of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ConfigError> {
        if start > end {
            return Err(ConfigError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Earliest and latest approval day in the table, if any order was approved.
    pub fn bounds(orders: &[OrderRecord]) -> Option<Self> {
        let mut dates = orders.iter().filter_map(OrderRecord::approval_date);
        let first = dates.next()?;
        let (start, end) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(Self { start, end })
    }

    /// Resolves the requested window against the data bounds.
    ///
    /// Missing ends default to the bounds. A window overlapping the data is
    /// clamped into the bounds; one lying entirely outside is kept as
    /// requested so it filters down to an empty table.
    pub fn select(
        bounds: DateRange,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, ConfigError> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(ConfigError::InvalidRange { start: s, end: e });
            }
        }
        let s = start.unwrap_or(bounds.start);
        let e = end.unwrap_or(bounds.end);
        if s > bounds.end || e < bounds.start {
            // a defaulted end collapses onto the supplied one
            return match (start, end) {
                (Some(s), None) => Self::new(s, s),
                (None, Some(e)) => Self::new(e, e),
                _ => Self::new(s, e),
            };
        }
        Self::new(s.max(bounds.start), e.min(bounds.end))
    }

    /// Window to show for `orders`, or `None` when no order was ever approved.
    pub fn resolve(
        orders: &[OrderRecord],
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Option<Self>, ConfigError> {
        match Self::bounds(orders) {
            Some(bounds) => Self::select(bounds, start, end).map(Some),
            None => Ok(None),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Rows approved on any day of the window, in table order.
    pub fn apply(&self, orders: &[OrderRecord]) -> Vec<OrderRecord> {
        orders
            .iter()
            .filter(|o| o.approval_date().is_some_and(|d| self.contains(d)))
            .cloned()
            .collect()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
