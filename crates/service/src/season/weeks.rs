//! Pure week-schedule helpers: generation of an even split and validation
//! of explicit week lists. No database access here so every rule is unit
//! testable.

use chrono::{Duration, NaiveDate};

use crate::errors::ServiceError;
use models::week::WeekSpec;

/// Divide the season span evenly into `week_count` segments. Day offsets are
/// truncated, and the final week absorbs the rounding remainder by ending
/// exactly on the season's end date.
pub fn generate_weeks(start: NaiveDate, end: NaiveDate, week_count: i32) -> Vec<WeekSpec> {
    let total_days = (end - start).num_days() + 1;
    let days_per_week = total_days as f64 / week_count as f64;

    let mut weeks = Vec::with_capacity(week_count as usize);
    for i in 0..week_count {
        let week_start = start + Duration::days((i as f64 * days_per_week) as i64);
        let week_end = if i == week_count - 1 {
            end
        } else {
            let e = start + Duration::days(((i + 1) as f64 * days_per_week) as i64 - 1);
            e.min(end)
        };
        weeks.push(WeekSpec { week_number: i + 1, start_date: week_start, end_date: week_end });
    }
    weeks
}

/// Every week must itself be a valid interval.
pub fn validate_week_ranges(weeks: &[WeekSpec]) -> Result<(), ServiceError> {
    for week in weeks {
        if week.end_date < week.start_date {
            return Err(ServiceError::Validation(format!(
                "week {} ends before it starts",
                week.week_number
            )));
        }
    }
    Ok(())
}

/// Weeks must not overlap pairwise once sorted by start date; touching an
/// adjacent week's start date counts as an overlap.
pub fn validate_weeks_overlap(weeks: &[WeekSpec]) -> Result<(), ServiceError> {
    let mut sorted: Vec<&WeekSpec> = weeks.iter().collect();
    sorted.sort_by_key(|w| w.start_date);
    for pair in sorted.windows(2) {
        let (current, next) = (pair[0], pair[1]);
        if current.end_date >= next.start_date {
            return Err(ServiceError::Validation(format!(
                "weeks {} and {} overlap",
                current.week_number, next.week_number
            )));
        }
    }
    Ok(())
}

/// Every week must lie fully inside the season's date range.
pub fn validate_weeks_within_season(
    weeks: &[WeekSpec],
    season_start: NaiveDate,
    season_end: NaiveDate,
) -> Result<(), ServiceError> {
    for week in weeks {
        if week.start_date < season_start || week.end_date > season_end {
            return Err(ServiceError::Validation(format!(
                "week {} is outside the season's date range",
                week.week_number
            )));
        }
    }
    Ok(())
}

/// Season dates must form a forward interval and not lie in the past.
pub fn validate_date_range(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<(), ServiceError> {
    if end <= start {
        return Err(ServiceError::Validation("end date must be after start date".into()));
    }
    if start < today {
        return Err(ServiceError::Validation("start date cannot be in the past".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn wk(n: i32, start: NaiveDate, end: NaiveDate) -> WeekSpec {
        WeekSpec { week_number: n, start_date: start, end_date: end }
    }

    #[test]
    fn four_weeks_cover_a_fall_season_exactly() {
        // 2025-09-01 .. 2025-12-31 is 122 days
        let weeks = generate_weeks(d(2025, 9, 1), d(2025, 12, 31), 4);
        assert_eq!(weeks.len(), 4);
        assert_eq!(weeks[0].start_date, d(2025, 9, 1));
        assert_eq!(weeks[3].end_date, d(2025, 12, 31));

        // gap-free and non-overlapping
        for pair in weeks.windows(2) {
            assert_eq!(pair[0].end_date + chrono::Duration::days(1), pair[1].start_date);
        }
        let total: i64 = weeks
            .iter()
            .map(|w| (w.end_date - w.start_date).num_days() + 1)
            .sum();
        assert_eq!(total, 122);
    }

    #[test]
    fn last_week_absorbs_rounding_remainder() {
        // 30 days into 4 weeks: 7.5 days per week
        let weeks = generate_weeks(d(2026, 6, 1), d(2026, 6, 30), 4);
        assert_eq!(weeks.len(), 4);
        assert_eq!(weeks[3].end_date, d(2026, 6, 30));
        let total: i64 = weeks
            .iter()
            .map(|w| (w.end_date - w.start_date).num_days() + 1)
            .sum();
        assert_eq!(total, 30);
        assert!(validate_weeks_overlap(&weeks).is_ok());
        assert!(validate_weeks_within_season(&weeks, d(2026, 6, 1), d(2026, 6, 30)).is_ok());
    }

    #[test]
    fn single_week_spans_the_whole_season() {
        let weeks = generate_weeks(d(2026, 9, 1), d(2026, 9, 14), 1);
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].start_date, d(2026, 9, 1));
        assert_eq!(weeks[0].end_date, d(2026, 9, 14));
    }

    #[test]
    fn generated_weeks_always_validate() {
        for count in 1..=17 {
            let weeks = generate_weeks(d(2027, 9, 1), d(2028, 1, 4), count);
            assert_eq!(weeks.len(), count as usize);
            assert!(validate_week_ranges(&weeks).is_ok());
            assert!(validate_weeks_overlap(&weeks).is_ok());
            assert!(validate_weeks_within_season(&weeks, d(2027, 9, 1), d(2028, 1, 4)).is_ok());
            assert_eq!(weeks.last().unwrap().end_date, d(2028, 1, 4));
        }
    }

    #[test]
    fn touching_weeks_count_as_overlap() {
        let weeks = vec![
            wk(1, d(2026, 9, 1), d(2026, 9, 8)),
            wk(2, d(2026, 9, 8), d(2026, 9, 14)),
        ];
        assert!(validate_weeks_overlap(&weeks).is_err());
    }

    #[test]
    fn overlap_check_sorts_by_start_date() {
        // Out of order but disjoint
        let weeks = vec![
            wk(2, d(2026, 9, 9), d(2026, 9, 14)),
            wk(1, d(2026, 9, 1), d(2026, 9, 8)),
        ];
        assert!(validate_weeks_overlap(&weeks).is_ok());
    }

    #[test]
    fn weeks_outside_the_season_are_rejected() {
        let weeks = vec![wk(1, d(2026, 8, 31), d(2026, 9, 7))];
        assert!(validate_weeks_within_season(&weeks, d(2026, 9, 1), d(2026, 12, 31)).is_err());
        let weeks = vec![wk(1, d(2026, 12, 25), d(2027, 1, 1))];
        assert!(validate_weeks_within_season(&weeks, d(2026, 9, 1), d(2026, 12, 31)).is_err());
    }

    #[test]
    fn date_range_rules() {
        let today = d(2026, 1, 1);
        assert!(validate_date_range(d(2026, 9, 1), d(2026, 12, 31), today).is_ok());
        assert!(validate_date_range(d(2026, 9, 1), d(2026, 9, 1), today).is_err());
        assert!(validate_date_range(d(2026, 12, 31), d(2026, 9, 1), today).is_err());
        assert!(validate_date_range(d(2025, 9, 1), d(2026, 9, 1), today).is_err());
    }
}
