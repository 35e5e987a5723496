//! Scheduled FOMC rate-decision dates.
//!
//! Stored as plain `(year, month, day)` triples so the table stays a `const`;
//! [`fomc_event_dates`] turns it into `NaiveDate`s for the extractor.

use anyhow::{Result, anyhow};
use chrono::NaiveDate;

#[rustfmt::skip]
pub const FOMC_EVENT_DATES: &[(i32, u32, u32)] = &[
    (2018, 1, 31), (2018, 3, 21), (2018, 6, 13), (2018, 9, 26), (2018, 12, 19),
    (2019, 1, 30), (2019, 3, 20), (2019, 6, 19), (2019, 9, 18), (2019, 12, 11),
    (2020, 1, 29), (2020, 3, 15), (2020, 4, 29), (2020, 6, 10), (2020, 9, 16), (2020, 12, 16),
    (2021, 1, 27), (2021, 3, 17), (2021, 6, 16), (2021, 9, 22), (2021, 12, 15),
    (2022, 1, 26), (2022, 3, 16), (2022, 6, 15), (2022, 9, 21), (2022, 12, 14),
    (2023, 3, 22), (2023, 6, 14), (2023, 9, 20), (2023, 12, 13),
    (2024, 3, 20), (2024, 6, 19), (2024, 9, 18), (2024, 12, 11),
    (2025, 3, 19), (2025, 6, 18),
];

/// The event list in table order.
pub fn fomc_event_dates() -> Result<Vec<NaiveDate>> {
    FOMC_EVENT_DATES
        .iter()
        .map(|&(y, m, d)| {
            NaiveDate::from_ymd_opt(y, m, d)
                .ok_or_else(|| anyhow!("Invalid event date in table: {}-{}-{}", y, m, d))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_table_is_valid_and_ordered() {
        let dates = fomc_event_dates().unwrap();
        assert_eq!(dates.len(), FOMC_EVENT_DATES.len());
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2018, 1, 31).unwrap());
    }
}
