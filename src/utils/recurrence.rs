//! 周期预约系列的展开规则
//!
//! 系列在创建时一次性展开为 N 个具体时间点，不做惰性生成。

use chrono::{DateTime, Months, TimeDelta, Utc};

use crate::errors::{BookingSystemError, Result};
use crate::models::series::entities::SeriesFrequency;

/// 按频率和间隔展开系列的所有开始时间。
///
/// `occurrence_count` 与 `until_date` 必须恰好指定一个；
/// 展开结果不允许超过 `max_occurrences`。
pub fn expand_occurrences(
    start_at_utc: DateTime<Utc>,
    frequency: SeriesFrequency,
    interval: i64,
    occurrence_count: Option<u32>,
    until_date: Option<DateTime<Utc>>,
    max_occurrences: u32,
) -> Result<Vec<DateTime<Utc>>> {
    if interval < 1 {
        return Err(BookingSystemError::validation("间隔必须大于等于 1"));
    }

    match (occurrence_count, until_date) {
        (Some(count), None) => {
            if count == 0 {
                return Err(BookingSystemError::validation("次数必须大于等于 1"));
            }
            if count > max_occurrences {
                return Err(BookingSystemError::validation(format!(
                    "系列最多允许 {max_occurrences} 次"
                )));
            }
            (0..count)
                .map(|i| nth_occurrence(start_at_utc, frequency, interval, i))
                .collect()
        }
        (None, Some(until)) => {
            if until <= start_at_utc {
                return Err(BookingSystemError::validation(
                    "结束日期必须晚于首次开始时间",
                ));
            }
            let mut occurrences = Vec::new();
            for i in 0.. {
                if i >= max_occurrences {
                    return Err(BookingSystemError::validation(format!(
                        "系列最多允许 {max_occurrences} 次"
                    )));
                }
                let occurrence = nth_occurrence(start_at_utc, frequency, interval, i)?;
                if occurrence > until {
                    break;
                }
                occurrences.push(occurrence);
            }
            Ok(occurrences)
        }
        (Some(_), Some(_)) => Err(BookingSystemError::validation(
            "occurrence_count 与 until_date 只能指定一个",
        )),
        (None, None) => Err(BookingSystemError::validation(
            "必须指定 occurrence_count 或 until_date",
        )),
    }
}

/// 第 n 次（从 0 开始）的开始时间
fn nth_occurrence(
    start_at_utc: DateTime<Utc>,
    frequency: SeriesFrequency,
    interval: i64,
    n: u32,
) -> Result<DateTime<Utc>> {
    let n = n as i64;
    match frequency {
        SeriesFrequency::Weekly => Ok(start_at_utc + TimeDelta::weeks(interval * n)),
        SeriesFrequency::Biweekly => Ok(start_at_utc + TimeDelta::weeks(2 * interval * n)),
        SeriesFrequency::Monthly => {
            let months = u32::try_from(interval * n)
                .map_err(|_| BookingSystemError::validation("月份间隔超出范围"))?;
            start_at_utc
                .checked_add_months(Months::new(months))
                .ok_or_else(|| BookingSystemError::validation("展开时间超出可表示范围"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_weekly_count() {
        let occurrences =
            expand_occurrences(start(), SeriesFrequency::Weekly, 1, Some(4), None, 52).unwrap();
        assert_eq!(occurrences.len(), 4);
        assert_eq!(occurrences[0], start());
        assert_eq!(occurrences[1] - occurrences[0], TimeDelta::weeks(1));
        assert_eq!(occurrences[3] - occurrences[0], TimeDelta::weeks(3));
    }

    #[test]
    fn test_biweekly_interval() {
        let occurrences =
            expand_occurrences(start(), SeriesFrequency::Biweekly, 1, Some(3), None, 52).unwrap();
        assert_eq!(occurrences[1] - occurrences[0], TimeDelta::weeks(2));
    }

    #[test]
    fn test_monthly_keeps_day_of_month() {
        let occurrences =
            expand_occurrences(start(), SeriesFrequency::Monthly, 1, Some(3), None, 52).unwrap();
        assert_eq!(
            occurrences[1],
            Utc.with_ymd_and_hms(2026, 4, 2, 10, 0, 0).unwrap()
        );
        assert_eq!(
            occurrences[2],
            Utc.with_ymd_and_hms(2026, 5, 2, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_until_date_bound() {
        let until = start() + TimeDelta::weeks(3) + TimeDelta::hours(1);
        let occurrences =
            expand_occurrences(start(), SeriesFrequency::Weekly, 1, None, Some(until), 52).unwrap();
        assert_eq!(occurrences.len(), 4);
        assert!(occurrences.iter().all(|o| *o <= until));
    }

    #[test]
    fn test_count_and_until_are_exclusive() {
        let err = expand_occurrences(
            start(),
            SeriesFrequency::Weekly,
            1,
            Some(4),
            Some(start() + TimeDelta::weeks(10)),
            52,
        )
        .unwrap_err();
        assert_eq!(err.code(), "E004");

        let err =
            expand_occurrences(start(), SeriesFrequency::Weekly, 1, None, None, 52).unwrap_err();
        assert_eq!(err.code(), "E004");
    }

    #[test]
    fn test_max_occurrences_enforced() {
        let err = expand_occurrences(start(), SeriesFrequency::Weekly, 1, Some(53), None, 52)
            .unwrap_err();
        assert_eq!(err.code(), "E004");
    }
}
