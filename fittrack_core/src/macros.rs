//! Daily macro totals.
//!
//! Totals are summed per component in a canonical (sorted) order, so the
//! result is bit-identical for any ordering of the same entries.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};

use crate::types::{DailyMacros, NutritionEntry};

/// Half-open `[start, end)` range of instants to aggregate over
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportingWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportingWindow {
    /// The current calendar day in the local time zone
    pub fn today() -> Self {
        Self::day_of(&Local::now())
    }

    /// The calendar day containing `instant`, in the instant's own time zone
    pub fn day_of<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self::for_date(instant.date_naive(), &instant.timezone())
    }

    /// A calendar day in the given time zone
    pub fn for_date<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Self {
        let next = date.succ_opt().unwrap_or(date);
        Self {
            start: start_of_day(date, tz),
            end: start_of_day(next, tz),
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

impl Default for ReportingWindow {
    fn default() -> Self {
        Self::today()
    }
}

/// First instant of `date` in `tz`
///
/// When midnight is skipped by a DST change the day starts at the first
/// representable hour after it.
fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(chrono::NaiveTime::MIN);
    (0..=3)
        .find_map(|h| {
            tz.from_local_datetime(&(midnight + Duration::hours(h)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

/// Sum the macros of every entry logged inside `window`
pub fn aggregate_macros<'a, I>(entries: I, window: &ReportingWindow) -> DailyMacros
where
    I: IntoIterator<Item = &'a NutritionEntry>,
{
    let mut calories = Vec::new();
    let mut protein = Vec::new();
    let mut carbs = Vec::new();
    let mut fat = Vec::new();

    for entry in entries {
        if !window.contains(entry.logged_at) {
            continue;
        }
        calories.push(entry.macros.calories);
        protein.push(entry.macros.protein);
        carbs.push(entry.macros.carbohydrates);
        fat.push(entry.macros.fat);
    }

    tracing::debug!(
        "Aggregating {} nutrition entries between {} and {}",
        calories.len(),
        window.start,
        window.end
    );

    DailyMacros {
        calories: canonical_sum(calories),
        protein: canonical_sum(protein),
        carbs: canonical_sum(carbs),
        fat: canonical_sum(fat),
    }
}

fn canonical_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    // Float `Sum` starts at -0.0; an empty day must total +0.0
    values.into_iter().fold(0.0, |acc, v| acc + v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Macros, MealType, ServingUnit};
    use chrono::FixedOffset;

    fn window() -> ReportingWindow {
        ReportingWindow::for_date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), &Utc)
    }

    fn entry(calories: f64, protein: f64, hour: i64) -> NutritionEntry {
        NutritionEntry {
            food_name: "food".into(),
            serving_size: 100.0,
            serving_unit: ServingUnit::G,
            meal_type: MealType::Snack,
            macros: Macros {
                calories,
                protein,
                carbohydrates: calories / 10.0,
                fat: protein / 3.0,
            },
            logged_at: window().start + Duration::hours(hour),
        }
    }

    #[test]
    fn test_empty_input_is_zero() {
        let totals = aggregate_macros(&Vec::<NutritionEntry>::new(), &window());
        assert_eq!(totals, DailyMacros::default());
        for v in [totals.calories, totals.protein, totals.carbs, totals.fat] {
            assert!(v.is_sign_positive());
        }

        let json = serde_json::to_value(totals).unwrap();
        assert_eq!(json["calories"].to_string(), "0.0");
    }

    #[test]
    fn test_sums_calories() {
        let entries = vec![entry(500.0, 30.0, 8), entry(300.0, 20.0, 13)];
        let totals = aggregate_macros(&entries, &window());
        assert_eq!(totals.calories, 800.0);
        assert_eq!(totals.protein, 50.0);
    }

    #[test]
    fn test_fractional_calories_same_day() {
        let entries = vec![entry(450.5, 0.0, 7), entry(299.5, 0.0, 19)];
        let totals = aggregate_macros(&entries, &window());
        assert_eq!(totals.calories, 750.0);
    }

    #[test]
    fn test_entries_outside_window_are_ignored() {
        let entries = vec![
            entry(100.0, 1.0, -1), // previous day
            entry(200.0, 2.0, 0),  // exactly at start
            entry(400.0, 4.0, 24), // exactly at end, next day
        ];
        let totals = aggregate_macros(&entries, &window());
        assert_eq!(totals.calories, 200.0);
        assert_eq!(totals.protein, 2.0);
    }

    #[test]
    fn test_order_does_not_change_totals() {
        let base: Vec<NutritionEntry> = [0.1, 0.2, 0.3, 1e16, 1.0, -0.0, 7.77, 123.456]
            .iter()
            .enumerate()
            .map(|(i, c): (usize, &f64)| entry(c.abs(), c.abs() / 7.0, i as i64))
            .collect();
        let expected = aggregate_macros(&base, &window());

        // Every rotation and the reverse of every rotation
        for shift in 0..base.len() {
            let mut rotated = base.clone();
            rotated.rotate_left(shift);
            assert_eq!(aggregate_macros(&rotated, &window()), expected);

            rotated.reverse();
            assert_eq!(aggregate_macros(&rotated, &window()), expected);
        }
    }

    #[test]
    fn test_window_follows_local_offset() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let window = ReportingWindow::for_date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), &tokyo);

        assert_eq!(
            window.start,
            Utc.with_ymd_and_hms(2024, 1, 14, 15, 0, 0).unwrap()
        );
        assert_eq!(window.end - window.start, Duration::hours(24));
        assert!(window.contains(Utc.with_ymd_and_hms(2024, 1, 15, 14, 59, 59).unwrap()));
        assert!(!window.contains(Utc.with_ymd_and_hms(2024, 1, 15, 15, 0, 0).unwrap()));
    }

    #[test]
    fn test_day_of_uses_instant_zone() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let instant = offset.with_ymd_and_hms(2024, 3, 1, 23, 30, 0).unwrap();
        let window = ReportingWindow::day_of(&instant);
        assert!(window.contains(instant.with_timezone(&Utc)));
        assert_eq!(
            window.start,
            Utc.with_ymd_and_hms(2024, 3, 1, 5, 0, 0).unwrap()
        );
    }
}
