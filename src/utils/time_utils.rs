use anyhow::{Result, anyhow};
use chrono::{DateTime, Local, NaiveDate};

pub struct TimeUtils;

impl TimeUtils {
    pub const S_IN_D: i64 = 60 * 60 * 24;
    pub const MS_IN_S: i64 = 1000;
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d";
}

/// Build a date from a `(year, month, day)` config triple.
pub fn ymd(triple: (i32, u32, u32)) -> Result<NaiveDate> {
    let (y, m, d) = triple;
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| anyhow!("Invalid date: {}-{}-{}", y, m, d))
}

/// Midnight UTC of `date` as seconds since the epoch.
pub fn date_to_epoch_sec(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

/// Calendar date of a UTC timestamp as seen from a venue `gmt_offset_sec` away from UTC.
pub fn epoch_sec_to_local_date(epoch_sec: i64, gmt_offset_sec: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(epoch_sec + gmt_offset_sec, 0).map(|dt| dt.date_naive())
}

pub fn local_now_as_timestamp_ms() -> i64 {
    let now_local = Local::now();
    now_local.timestamp_millis()
}

pub fn how_many_seconds_ago(past_timestamp_ms: i64) -> i64 {
    // How many seconds ago was the event described by `past_timestamp_ms` ?
    let now_timestamp_ms = local_now_as_timestamp_ms();
    (now_timestamp_ms - past_timestamp_ms) / TimeUtils::MS_IN_S
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_local_date_from_open_timestamp() {
        // 2023-06-14 13:30 UTC is the NYSE open; New York is UTC-4 in June
        let open_utc = 1_686_749_400;
        let date = epoch_sec_to_local_date(open_utc, -14_400).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 6, 14).unwrap());
    }

    #[test]
    fn test_date_to_epoch_is_midnight_utc() {
        let d = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
        assert_eq!(date_to_epoch_sec(d), 1_514_764_800);
        assert_eq!(date_to_epoch_sec(d) % TimeUtils::S_IN_D, 0);
    }

    #[test]
    fn test_ymd_rejects_impossible_dates() {
        assert!(ymd((2023, 2, 30)).is_err());
        assert!(ymd((2023, 2, 28)).is_ok());
    }
}
