// crates/core/src/error.rs
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur while building a viewing calendar.
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("month out of range: {month} (expected 1-12)")]
    InvalidMonth { month: u32 },

    #[error("year not representable as a calendar date: {year}")]
    YearOutOfRange { year: i32 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CalendarError {
    pub fn invalid_month(month: u32) -> Self {
        Self::InvalidMonth { month }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CalendarError::invalid_month(13);
        assert_eq!(err.to_string(), "month out of range: 13 (expected 1-12)");

        let err = CalendarError::Store(StoreError::unavailable("connection refused"));
        assert_eq!(err.to_string(), "activity store unavailable: connection refused");
    }
}
