use chrono::{
    DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc,
};

/// A date as read from user or persisted input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedDate {
    /// No offset in the input: a local wall-clock time.
    Local(NaiveDateTime),
    /// Offset given explicitly.
    Instant(DateTime<FixedOffset>),
}

impl ParsedDate {
    /// Calendar day in local time.
    pub fn local_date(&self) -> NaiveDate {
        match self {
            ParsedDate::Local(dt) => dt.date(),
            ParsedDate::Instant(dt) => dt.with_timezone(&Local).date_naive(),
        }
    }

    /// Calendar day of the ISO-8601 rendering. Instants render in UTC, which can land on
    /// a different day than `local_date` near midnight.
    pub fn iso_date(&self) -> NaiveDate {
        match self {
            ParsedDate::Local(dt) => dt.date(),
            ParsedDate::Instant(dt) => dt.with_timezone(&Utc).date_naive(),
        }
    }
}

/// Parses the date shapes the booking flow meets: ISO dates and datetimes, slash-separated
/// dates, RFC 2822, the verbose `Mon Jan 15 2024 00:00:00 GMT+0800 (...)` rendering and
/// `Jan 15, 2024`.
///
/// Numeric year-month-day input accepts any day from 1 to 31 and rolls overflow into the
/// following month, so `2024-02-30` reads as 2024-03-01.
pub fn parse_date_input(input: &str) -> Option<ParsedDate> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(ParsedDate::Instant(dt));
    }
    if let Some(parsed) = parse_numeric(s) {
        return Some(parsed);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(ParsedDate::Instant(dt));
    }

    // Drop a trailing zone name such as " (Taipei Standard Time)".
    let verbose = match s.find(" (") {
        Some(idx) if s.ends_with(')') => &s[..idx],
        _ => s,
    };
    if let Ok(dt) = DateTime::parse_from_str(verbose, "%a %b %d %Y %H:%M:%S GMT%z") {
        return Some(ParsedDate::Instant(dt));
    }

    for fmt in ["%b %d, %Y", "%B %d, %Y", "%a %b %d %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0).map(ParsedDate::Local);
        }
    }

    None
}

fn parse_numeric(s: &str) -> Option<ParsedDate> {
    let (date_part, time_part) = match s.find(['T', ' ']) {
        Some(idx) => (&s[..idx], Some(&s[idx + 1..])),
        None => (s, None),
    };

    let parts: Vec<&str> = date_part.split(['-', '/']).collect();
    if parts.len() != 3 {
        return None;
    }
    if parts[0].len() != 4 || !parts.iter().all(|p| is_digits(p) && p.len() <= 4) {
        return None;
    }
    let year: i32 = parts[0].parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    let day: i64 = parts[2].parse().ok()?;
    if !(1..=31).contains(&day) {
        return None;
    }
    let date = NaiveDate::from_ymd_opt(year, month, 1)? + Duration::days(day - 1);

    let Some(time) = time_part else {
        return date.and_hms_opt(0, 0, 0).map(ParsedDate::Local);
    };

    let (time, utc) = match time.strip_suffix('Z') {
        Some(t) => (t, true),
        None => (time, false),
    };
    let time = ["%H:%M:%S%.f", "%H:%M"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(time, fmt).ok())?;
    let dt = date.and_time(time);

    if utc {
        Some(ParsedDate::Instant(dt.and_utc().fixed_offset()))
    } else {
        Some(ParsedDate::Local(dt))
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// `YYYY/MM/DD`, or an empty string when the input is missing or unreadable.
pub fn format_display_date(input: Option<&str>) -> String {
    let Some(raw) = input.filter(|s| !s.is_empty()) else {
        return String::new();
    };
    match parse_date_input(raw) {
        Some(parsed) => parsed.local_date().format("%Y/%m/%d").to_string(),
        None => {
            tracing::debug!(input = raw, "date formatting error");
            String::new()
        }
    }
}

/// `YYYY-MM-DD`, or an empty string when the input is missing or unreadable.
///
/// Input without an offset keeps its written calendar day instead of shifting through UTC,
/// so `2024/01/15` gives `2024-01-15` in every timezone.
pub fn format_iso_date(input: Option<&str>) -> String {
    let Some(raw) = input.filter(|s| !s.is_empty()) else {
        return String::new();
    };
    match parse_date_input(raw) {
        Some(parsed) => parsed.iso_date().format("%Y-%m-%d").to_string(),
        None => {
            tracing::debug!(input = raw, "ISO date formatting error");
            String::new()
        }
    }
}

pub fn is_same_day(a: &NaiveDateTime, b: &NaiveDateTime) -> bool {
    a.date() == b.date()
}

pub fn is_date_before_today(date: NaiveDate) -> bool {
    is_date_before(date, Local::now().date_naive())
}

pub fn is_date_before(date: NaiveDate, today: NaiveDate) -> bool {
    date < today
}

/// Leading hour of an `HH:MM` label. Only the digits before the first `:` are read, so
/// `9:00` and `09:30` both give 9; input with no leading digits gives `None`.
pub fn get_hour_from_time_slot(slot: &str) -> Option<u32> {
    let head = slot.split(':').next()?.trim_start();
    let end = head
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(head.len());
    head[..end].parse().ok()
}

/// Drops slots at or before the current hour when `date` is today; any other date keeps
/// the full list.
pub fn filter_available_slots(slots: &[String], date: &str) -> Vec<String> {
    filter_available_slots_at(slots, date, Local::now().naive_local())
}

pub fn filter_available_slots_at(slots: &[String], date: &str, now: NaiveDateTime) -> Vec<String> {
    let is_today = parse_date_input(date)
        .map(|parsed| parsed.local_date() == now.date())
        .unwrap_or(false);
    if !is_today {
        return slots.to_vec();
    }

    let current_hour = now.hour();
    slots
        .iter()
        .filter(|slot| get_hour_from_time_slot(slot).is_some_and(|h| h > current_hour))
        .cloned()
        .collect()
}

pub fn is_valid_date_string(s: &str) -> bool {
    parse_date_input(s).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn slots(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_format_display_date() {
        assert_eq!(format_display_date(Some("2024-03-05")), "2024/03/05");
        assert_eq!(format_display_date(Some("2024/1/9")), "2024/01/09");
        assert_eq!(format_display_date(Some("2024-12-25T15:30:00")), "2024/12/25");
    }

    #[test]
    fn test_format_display_date_empty_inputs() {
        assert_eq!(format_display_date(None), "");
        assert_eq!(format_display_date(Some("")), "");
        assert_eq!(format_display_date(Some("not a date")), "");
    }

    #[test]
    fn test_format_iso_date() {
        assert_eq!(format_iso_date(Some("2023/12/25")), "2023-12-25");
        assert_eq!(format_iso_date(Some("Jan 15, 2024")), "2024-01-15");
        assert_eq!(format_iso_date(Some("2024-06-01T10:00:00")), "2024-06-01");
        assert_eq!(format_iso_date(None), "");
        assert_eq!(format_iso_date(Some("garbage")), "");
    }

    #[test]
    fn test_format_iso_date_uses_utc_for_offset_input() {
        // 2024-01-15 05:00 at +08:00 is 2024-01-14 21:00 UTC
        assert_eq!(format_iso_date(Some("2024-01-15T05:00:00+08:00")), "2024-01-14");
        assert_eq!(
            format_iso_date(Some("Mon Jan 15 2024 00:00:00 GMT+0000 (Coordinated Universal Time)")),
            "2024-01-15"
        );
    }

    #[test]
    fn test_format_iso_date_is_idempotent_on_canonical_input() {
        for input in ["2024-01-01", "2024-02-29", "1999-12-31", "2030-07-04"] {
            let once = format_iso_date(Some(input));
            assert_eq!(once, input);
            assert_eq!(format_iso_date(Some(&once)), once);
        }
    }

    #[test]
    fn test_day_overflow_rolls_into_next_month() {
        assert_eq!(format_iso_date(Some("2024-02-30")), "2024-03-01");
        assert_eq!(format_iso_date(Some("2023-04-31")), "2023-05-01");
        assert!(!is_valid_date_string("2024-02-32"));
        assert!(!is_valid_date_string("2024-13-01"));
    }

    #[test]
    fn test_is_valid_date_string() {
        assert!(is_valid_date_string("2024-01-15"));
        assert!(is_valid_date_string("2024/01/15"));
        assert!(is_valid_date_string("2024-01-15T10:00:00Z"));
        assert!(is_valid_date_string("Tue, 1 Jul 2003 10:52:37 +0200"));
        assert!(!is_valid_date_string(""));
        assert!(!is_valid_date_string("hello"));
        assert!(!is_valid_date_string("2024-01"));
    }

    #[test]
    fn test_is_same_day() {
        assert!(is_same_day(&dt("2024-01-15 00:00"), &dt("2024-01-15 23:59")));
        assert!(!is_same_day(&dt("2024-01-15 23:59"), &dt("2024-01-16 00:00")));
    }

    #[test]
    fn test_is_date_before() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        assert!(is_date_before(NaiveDate::from_ymd_opt(2024, 5, 9).unwrap(), today));
        assert!(!is_date_before(today, today));
        assert!(!is_date_before(NaiveDate::from_ymd_opt(2024, 5, 11).unwrap(), today));
    }

    #[test]
    fn test_get_hour_from_time_slot() {
        assert_eq!(get_hour_from_time_slot("14:00"), Some(14));
        assert_eq!(get_hour_from_time_slot("09:30"), Some(9));
        assert_eq!(get_hour_from_time_slot("9:00"), Some(9));
        assert_eq!(get_hour_from_time_slot("noon"), None);
    }

    #[test]
    fn test_filter_today_drops_current_and_past_hours() {
        let all = slots(&["09:00", "10:00", "11:00", "14:00", "15:00"]);
        let now = dt("2024-06-01 10:30");
        assert_eq!(
            filter_available_slots_at(&all, "2024-06-01", now),
            slots(&["11:00", "14:00", "15:00"])
        );
    }

    #[test]
    fn test_filter_today_all_past() {
        let all = slots(&["09:00", "10:00"]);
        let now = dt("2024-06-01 18:00");
        assert!(filter_available_slots_at(&all, "2024-06-01", now).is_empty());
    }

    #[test]
    fn test_filter_today_before_all_slots() {
        let all = slots(&["09:00", "10:00"]);
        let now = dt("2024-06-01 07:15");
        assert_eq!(filter_available_slots_at(&all, "2024-06-01", now), all);
    }

    #[test]
    fn test_filter_other_days_keep_everything() {
        let all = slots(&["09:00", "10:00", "11:00"]);
        let now = dt("2024-06-01 23:00");
        assert_eq!(filter_available_slots_at(&all, "2024-06-02", now), all);
        assert_eq!(filter_available_slots_at(&all, "2024-05-31", now), all);
        assert_eq!(filter_available_slots_at(&all, "not a date", now), all);
    }
}
