//! Movement window filter
//!
//! Computes the half-open UTC interval `[start, end)` covering one calendar day
//! in the operating timezone, and narrows snapshots to the records inside it.
//! A record stamped exactly at the next local midnight belongs to the next day.

use crate::domain::records::TenantRecord;
use crate::domain::snapshot::Snapshot;
use crate::domain::{EngineError, Result};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

/// Date format accepted for report dates (ISO calendar date)
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Half-open UTC interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Window {
    /// Creates a window; `start` must not be after `end`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(EngineError::Internal(format!(
                "window start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Inclusive lower bound
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive upper bound
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// True iff `start <= ts < end`
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts < self.end
    }

    /// Drops every snapshot record outside the window
    pub fn retain(&self, snapshot: &mut Snapshot) {
        self.retain_records(&mut snapshot.clients);
        self.retain_records(&mut snapshot.products);
        self.retain_records(&mut snapshot.service_orders);
    }

    fn retain_records<T: TenantRecord>(&self, records: &mut Vec<T>) {
        let before = records.len();
        records.retain(|record| self.contains(record.recorded_at()));
        let dropped = before - records.len();
        if dropped > 0 {
            tracing::debug!(
                entity = %T::KIND,
                dropped,
                "Dropped records outside the movement window"
            );
        }
    }
}

/// Computes the daily window of `date` in the given operating timezone
///
/// `start` is local midnight of `date` converted to UTC, `end = start + 24h`.
///
/// # Examples
///
/// ```
/// use tenant_backup::core::window::window_for;
/// use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
///
/// let offset = FixedOffset::west_opt(3 * 3600).unwrap();
/// let window = window_for(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(), offset);
/// assert_eq!(window.start(), Utc.with_ymd_and_hms(2024, 3, 10, 3, 0, 0).unwrap());
/// assert_eq!(window.end(), Utc.with_ymd_and_hms(2024, 3, 11, 3, 0, 0).unwrap());
/// ```
pub fn window_for(date: NaiveDate, offset: FixedOffset) -> Window {
    let local_midnight = date.and_time(NaiveTime::MIN);
    let utc_midnight = local_midnight - Duration::seconds(i64::from(offset.local_minus_utc()));
    let start = Utc.from_utc_datetime(&utc_midnight);
    Window {
        start,
        end: start + Duration::hours(24),
    }
}

/// Calendar date of `now` in the operating timezone
pub fn today_in(offset: FixedOffset, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

/// Resolves the report date of a daily movement export
///
/// An absent date means `today`. A supplied date must be a valid ISO calendar
/// date (`YYYY-MM-DD`); anything else, including an empty string, is a
/// validation error rather than a silent fallback.
pub fn parse_report_date(input: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    let Some(raw) = input else {
        return Ok(today);
    };

    let well_formed = raw.len() == 10
        && raw
            .char_indices()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });

    if !well_formed {
        return Err(EngineError::validation(
            "date",
            format!("'{raw}' is not an ISO calendar date (expected YYYY-MM-DD)"),
        ));
    }

    NaiveDate::parse_from_str(raw, REPORT_DATE_FORMAT).map_err(|e| {
        EngineError::validation("date", format!("'{raw}' is not a valid calendar date: {e}"))
    })
}

/// Parses a fixed UTC offset such as `-03:00`, `+05:30`, `Z` or `UTC`
pub fn parse_offset(value: &str) -> std::result::Result<FixedOffset, String> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(|| "invalid UTC offset".to_string());
    }

    let (sign, rest) = match value.split_at_checked(1) {
        Some(("+", rest)) => (1, rest),
        Some(("-", rest)) => (-1, rest),
        _ => return Err(format!("Invalid UTC offset '{value}'. Expected ±HH:MM")),
    };

    let (hours, minutes) = rest
        .split_once(':')
        .ok_or_else(|| format!("Invalid UTC offset '{value}'. Expected ±HH:MM"))?;
    let hours: i32 = hours
        .parse()
        .map_err(|_| format!("Invalid hours in UTC offset '{value}'"))?;
    let minutes: i32 = minutes
        .parse()
        .map_err(|_| format!("Invalid minutes in UTC offset '{value}'"))?;

    if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(format!("UTC offset '{value}' is out of range"));
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| format!("UTC offset '{value}' is out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::records::Client;
    use crate::domain::{EngineError, TenantId};
    use test_case::test_case;

    fn brt() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn client_at(ts: DateTime<Utc>) -> Client {
        Client {
            id: 1,
            tenant_id: TenantId::new("t1").unwrap(),
            name: "Cliente".into(),
            document: None,
            email: None,
            phone: None,
            address: None,
            city: None,
            created_at: ts,
        }
    }

    #[test]
    fn test_window_for_operating_offset() {
        let window = window_for(day(), brt());
        assert_eq!(
            window.start(),
            Utc.with_ymd_and_hms(2024, 3, 10, 3, 0, 0).unwrap()
        );
        assert_eq!(window.end() - window.start(), Duration::hours(24));
    }

    #[test]
    fn test_window_for_utc() {
        let window = window_for(day(), FixedOffset::east_opt(0).unwrap());
        assert_eq!(
            window.start(),
            Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap()
        );
    }

    #[test_case(2024, 3, 10, 3, 0, 0 => true ; "start is inclusive")]
    #[test_case(2024, 3, 11, 2, 59, 59 => true ; "last second of the day")]
    #[test_case(2024, 3, 11, 3, 0, 0 => false ; "end is exclusive")]
    #[test_case(2024, 3, 10, 2, 59, 59 => false ; "previous local day")]
    fn test_window_contains(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> bool {
        let window = window_for(day(), brt());
        window.contains(Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap())
    }

    #[test]
    fn test_window_new_rejects_inverted_bounds() {
        let a = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap();
        assert!(Window::new(a, b).is_ok());
        assert!(matches!(Window::new(b, a), Err(EngineError::Internal(_))));
    }

    #[test]
    fn test_retain_narrows_snapshot() {
        let window = window_for(day(), brt());
        let mut snapshot = Snapshot::empty(TenantId::new("t1").unwrap());
        snapshot.clients = vec![
            client_at(window.start()),
            client_at(window.end()),
            client_at(window.start() - Duration::seconds(1)),
            client_at(window.start() + Duration::hours(12)),
        ];

        window.retain(&mut snapshot);

        assert_eq!(snapshot.clients.len(), 2);
        assert!(snapshot
            .clients
            .iter()
            .all(|c| window.contains(c.created_at)));
    }

    #[test]
    fn test_today_in_offset() {
        // 01:30 UTC on the 11th is still the 10th in UTC-3
        let now = Utc.with_ymd_and_hms(2024, 3, 11, 1, 30, 0).unwrap();
        assert_eq!(today_in(brt(), now), day());
    }

    #[test]
    fn test_parse_report_date_absent_defaults_to_today() {
        assert_eq!(parse_report_date(None, day()).unwrap(), day());
    }

    #[test]
    fn test_parse_report_date_valid() {
        let parsed = parse_report_date(Some("2023-12-31"), day()).unwrap();
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test_case("not-a-date" ; "garbage")]
    #[test_case("" ; "empty")]
    #[test_case("2024-02-30" ; "impossible day")]
    #[test_case("2024-1-05" ; "unpadded month")]
    #[test_case("10/03/2024" ; "local format")]
    #[test_case(" 2024-03-10 " ; "surrounding whitespace")]
    #[test_case("2024-03-10\n" ; "trailing newline")]
    fn test_parse_report_date_invalid(input: &str) {
        match parse_report_date(Some(input), day()) {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "date"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test_case("-03:00" => Some(-3 * 3600) ; "brasilia")]
    #[test_case("+05:30" => Some(5 * 3600 + 1800) ; "india")]
    #[test_case("UTC" => Some(0) ; "utc keyword")]
    #[test_case("Z" => Some(0) ; "zulu")]
    #[test_case("-3" => None ; "missing minutes")]
    #[test_case("03:00" => None ; "missing sign")]
    #[test_case("+15:00" => None ; "out of range")]
    fn test_parse_offset(input: &str) -> Option<i32> {
        parse_offset(input).ok().map(|o| o.local_minus_utc())
    }
}
