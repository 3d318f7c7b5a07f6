//! Trading-day windows, fixed to US Eastern wall-clock time.

use chrono::{DateTime, NaiveTime, TimeZone, Timelike};
use chrono_tz::America::New_York;
use chrono_tz::Tz;
use sn_core::PeriodLabel;

/// (seconds from midnight, nanoseconds) so sub-second instants compare
/// correctly against the whole-minute boundaries.
type ClockPoint = (u32, u32);

const fn at(hour: u32, minute: u32) -> ClockPoint {
    (hour * 3600 + minute * 60, 0)
}

const PRE_MARKET_OPEN: ClockPoint = at(4, 15);
const MARKET_OPEN: ClockPoint = at(9, 15);
const MARKET_CLOSE: ClockPoint = at(16, 15);
const POST_MARKET_CLOSE: ClockPoint = at(20, 0);

/// Map an Eastern time-of-day to its period.
///
/// `[04:15, 09:15)` is pre-market, `[09:15, 16:15]` mid-day,
/// `(16:15, 20:00]` post-market and anything else closed.
pub fn classify(time: NaiveTime) -> PeriodLabel {
    let point = (time.num_seconds_from_midnight(), time.nanosecond());

    if point >= PRE_MARKET_OPEN && point < MARKET_OPEN {
        PeriodLabel::PreMarket
    } else if point >= MARKET_OPEN && point <= MARKET_CLOSE {
        PeriodLabel::MidDay
    } else if point > MARKET_CLOSE && point <= POST_MARKET_CLOSE {
        PeriodLabel::PostMarket
    } else {
        PeriodLabel::MarketClosed
    }
}

/// Classify an instant in any zone by first moving it to New York time.
pub fn classify_instant<Z: TimeZone>(instant: &DateTime<Z>) -> PeriodLabel {
    classify(to_eastern(instant).time())
}

pub fn to_eastern<Z: TimeZone>(instant: &DateTime<Z>) -> DateTime<Tz> {
    instant.with_timezone(&New_York)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_boundaries() {
        let cases = [
            (hms(0, 0, 0), PeriodLabel::MarketClosed),
            (hms(4, 14, 59), PeriodLabel::MarketClosed),
            (hms(4, 15, 0), PeriodLabel::PreMarket),
            (hms(4, 16, 0), PeriodLabel::PreMarket),
            (hms(9, 14, 0), PeriodLabel::PreMarket),
            (hms(9, 14, 59), PeriodLabel::PreMarket),
            (hms(9, 15, 0), PeriodLabel::MidDay),
            (hms(9, 16, 0), PeriodLabel::MidDay),
            (hms(16, 14, 0), PeriodLabel::MidDay),
            (hms(16, 15, 0), PeriodLabel::MidDay),
            (hms(16, 15, 1), PeriodLabel::PostMarket),
            (hms(16, 16, 0), PeriodLabel::PostMarket),
            (hms(19, 59, 0), PeriodLabel::PostMarket),
            (hms(20, 0, 0), PeriodLabel::PostMarket),
            (hms(20, 0, 1), PeriodLabel::MarketClosed),
            (hms(20, 1, 0), PeriodLabel::MarketClosed),
            (hms(23, 59, 59), PeriodLabel::MarketClosed),
        ];
        for (time, expected) in cases {
            assert_eq!(classify(time), expected, "at {}", time);
        }
    }

    #[test]
    fn test_sub_second_after_close_is_post_market() {
        let time = NaiveTime::from_hms_milli_opt(16, 15, 0, 500).unwrap();
        assert_eq!(classify(time), PeriodLabel::PostMarket);
        let time = NaiveTime::from_hms_milli_opt(20, 0, 0, 1).unwrap();
        assert_eq!(classify(time), PeriodLabel::MarketClosed);
    }

    #[test]
    fn test_every_minute_has_one_label() {
        let mut counts = std::collections::HashMap::new();
        for minute in 0..(24 * 60) {
            let label = classify(hms(minute / 60, minute % 60, 0));
            *counts.entry(label).or_insert(0) += 1;
        }
        assert_eq!(counts[&PeriodLabel::PreMarket], 5 * 60);
        // 09:15 through 16:15 inclusive
        assert_eq!(counts[&PeriodLabel::MidDay], 7 * 60 + 1);
        // 16:16 through 20:00 inclusive
        assert_eq!(counts[&PeriodLabel::PostMarket], 3 * 60 + 45);
        assert_eq!(counts.values().sum::<i32>(), 24 * 60);
    }

    #[test]
    fn test_instant_uses_new_york_offsets() {
        // 14:00 UTC is 09:00 EST in winter
        let winter = Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap();
        assert_eq!(classify_instant(&winter), PeriodLabel::PreMarket);

        // and 10:00 EDT in summer
        let summer = Utc.with_ymd_and_hms(2024, 7, 15, 14, 0, 0).unwrap();
        assert_eq!(classify_instant(&summer), PeriodLabel::MidDay);

        let late = Utc.with_ymd_and_hms(2024, 7, 16, 0, 0, 0).unwrap();
        assert_eq!(classify_instant(&late), PeriodLabel::PostMarket);
    }
}
