//! Unit tests for scheduler interval conversion

use cron::Schedule;
use signalwatch::core::scheduler::interval_to_cron;
use std::str::FromStr;

#[test]
fn test_interval_to_cron_seconds() {
    assert_eq!(interval_to_cron(30).unwrap(), "*/30 * * * * *");
}

#[test]
fn test_interval_to_cron_minutes() {
    assert_eq!(interval_to_cron(60).unwrap(), "0 */1 * * * *");
    assert_eq!(interval_to_cron(300).unwrap(), "0 */5 * * * *");
    assert_eq!(interval_to_cron(900).unwrap(), "0 */15 * * * *");
}

#[test]
fn test_interval_to_cron_hours_and_day() {
    assert_eq!(interval_to_cron(7200).unwrap(), "0 0 */2 * * *");
    assert_eq!(interval_to_cron(21_600).unwrap(), "0 0 */6 * * *");
    assert_eq!(interval_to_cron(86_400).unwrap(), "0 0 0 * * *");
}

#[test]
fn test_interval_to_cron_zero() {
    assert!(interval_to_cron(0).is_err());
}

#[test]
fn test_interval_to_cron_rejects_uneven_intervals() {
    // 7 minutes would fire at :56 and again at :00.
    for seconds in [7, 45, 90, 420, 5400, 18_000, 172_800] {
        assert!(interval_to_cron(seconds).is_err(), "{}s was accepted", seconds);
    }
}

#[test]
fn test_generated_expressions_parse() {
    for seconds in [1, 30, 60, 300, 3600, 7200, 86_400] {
        let expr = interval_to_cron(seconds).unwrap();
        assert!(Schedule::from_str(&expr).is_ok(), "{} did not parse", expr);
    }
}
