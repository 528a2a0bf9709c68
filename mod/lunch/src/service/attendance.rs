//! Attendance marking and the daily catering summary.

use workops_core::{new_id, now_rfc3339, today_ymd};
use workops_sql::{records, Value};

use crate::model::{AttendanceSummary, LunchAttendance, MarkAttendance};
use crate::service::{LunchError, LunchService};

const TABLE: &str = "lunch_attendance";

// Summary pages are bounded by headcount, not pagination.
const SUMMARY_LIMIT: usize = 10_000;

fn attendance_indexes(a: &LunchAttendance) -> Vec<(&'static str, Value)> {
    vec![
        ("user_id", Value::Text(a.user_id.clone())),
        ("date", Value::Text(a.date.clone())),
        ("attending", Value::Integer(a.is_attending as i64)),
        ("created_at", Value::Text(a.created_at.clone())),
        ("updated_at", Value::Text(a.updated_at.clone())),
    ]
}

fn validate_date(date: &str) -> Result<(), LunchError> {
    // Strict %Y-%m-%d: the column is compared as text, so "2026-3-2"
    // must not slip in as a second spelling of the same day.
    let parsed = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d");
    if parsed.is_err() || date.len() != 10 {
        return Err(LunchError::Validation(format!(
            "date must be YYYY-MM-DD, got {:?}",
            date
        )));
    }
    Ok(())
}

impl LunchService {
    /// Record whether a user attends lunch on a date. One record per
    /// (user, date); marking again overwrites the earlier answer.
    ///
    /// A meal option is required when attending and dropped when not.
    pub fn mark_attendance(
        &self,
        user_id: &str,
        user_name: &str,
        input: MarkAttendance,
    ) -> Result<LunchAttendance, LunchError> {
        let date = match &input.date {
            Some(d) => d.clone(),
            None => today_ymd(),
        };
        validate_date(&date)?;

        if input.is_attending && input.preferred_lunch_option.is_none() {
            return Err(LunchError::Validation(
                "preferredLunchOption is required when attending".into(),
            ));
        }
        let option = if input.is_attending {
            input.preferred_lunch_option
        } else {
            None
        };

        let now = now_rfc3339();
        tracing::info!(user = %user_id, %date, attending = input.is_attending, "attendance marked");
        match self.find_attendance(user_id, &date)? {
            Some(mut existing) => {
                existing.user_name = user_name.to_string();
                existing.is_attending = input.is_attending;
                existing.preferred_lunch_option = option;
                existing.updated_at = now;
                records::update_record(
                    self.sql.as_ref(),
                    TABLE,
                    &existing.id,
                    &existing,
                    &attendance_indexes(&existing),
                )?;
                Ok(existing)
            }
            None => {
                let attendance = LunchAttendance {
                    id: new_id(),
                    user_id: user_id.to_string(),
                    user_name: user_name.to_string(),
                    date,
                    is_attending: input.is_attending,
                    preferred_lunch_option: option,
                    created_at: now.clone(),
                    updated_at: now,
                };
                records::insert_record(
                    self.sql.as_ref(),
                    TABLE,
                    &attendance.id,
                    &attendance,
                    &attendance_indexes(&attendance),
                )?;
                Ok(attendance)
            }
        }
    }

    /// Daily summary: headcounts plus every record for the date.
    pub fn attendance_summary(&self, date: &str) -> Result<AttendanceSummary, LunchError> {
        validate_date(date)?;

        let (items, total): (Vec<LunchAttendance>, usize) = records::list_records(
            self.sql.as_ref(),
            TABLE,
            &[("date", Value::Text(date.to_string()))],
            SUMMARY_LIMIT,
            0,
        )?;

        let mut summary = AttendanceSummary {
            date: date.to_string(),
            total: total as i64,
            attending: 0,
            by_option: Default::default(),
            items,
        };

        for item in &summary.items {
            if item.is_attending {
                summary.attending += 1;
                if let Some(option) = item.preferred_lunch_option {
                    *summary
                        .by_option
                        .entry(option.as_str().to_string())
                        .or_insert(0) += 1;
                }
            }
        }

        Ok(summary)
    }

    fn find_attendance(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<Option<LunchAttendance>, LunchError> {
        let rows = self
            .sql
            .query(
                "SELECT data FROM lunch_attendance WHERE user_id = ?1 AND date = ?2",
                &[
                    Value::Text(user_id.to_string()),
                    Value::Text(date.to_string()),
                ],
            )
            .map_err(|e| LunchError::Storage(e.to_string()))?;

        match rows.first() {
            Some(row) => {
                let data = row
                    .get_str("data")
                    .ok_or_else(|| LunchError::Internal("missing data column".into()))?;
                let attendance =
                    serde_json::from_str(data).map_err(|e| LunchError::Internal(e.to_string()))?;
                Ok(Some(attendance))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use workops_sql::SqliteStore;

    use super::*;
    use crate::model::LunchOption;

    fn service() -> Arc<LunchService> {
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        LunchService::new(sql).unwrap()
    }

    fn attending(option: LunchOption, date: &str) -> MarkAttendance {
        MarkAttendance {
            is_attending: true,
            preferred_lunch_option: Some(option),
            date: Some(date.into()),
        }
    }

    #[test]
    fn test_mark_and_overwrite() {
        let svc = service();
        let first = svc
            .mark_attendance("u1", "Kim", attending(LunchOption::Veg, "2026-03-02"))
            .unwrap();
        assert!(first.is_attending);
        assert_eq!(first.preferred_lunch_option, Some(LunchOption::Veg));

        // Same user, same day: the record is replaced, not duplicated.
        let second = svc
            .mark_attendance(
                "u1",
                "Kim",
                MarkAttendance {
                    is_attending: false,
                    preferred_lunch_option: None,
                    date: Some("2026-03-02".into()),
                },
            )
            .unwrap();
        assert_eq!(second.id, first.id);
        assert!(!second.is_attending);

        let summary = svc.attendance_summary("2026-03-02").unwrap();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.attending, 0);
    }

    #[test]
    fn test_attending_requires_option() {
        let svc = service();
        let err = svc
            .mark_attendance(
                "u1",
                "Kim",
                MarkAttendance {
                    is_attending: true,
                    preferred_lunch_option: None,
                    date: Some("2026-03-02".into()),
                },
            )
            .unwrap_err();
        assert!(matches!(err, LunchError::Validation(_)));
    }

    #[test]
    fn test_option_dropped_when_not_attending() {
        let svc = service();
        let a = svc
            .mark_attendance(
                "u1",
                "Kim",
                MarkAttendance {
                    is_attending: false,
                    preferred_lunch_option: Some(LunchOption::Vegan),
                    date: Some("2026-03-02".into()),
                },
            )
            .unwrap();
        assert!(a.preferred_lunch_option.is_none());
    }

    #[test]
    fn test_date_validation() {
        let svc = service();
        for bad in ["2026/03/02", "03-02-2026", "2026-3-2", "yesterday"] {
            let err = svc
                .mark_attendance("u1", "Kim", attending(LunchOption::Veg, bad))
                .unwrap_err();
            assert!(matches!(err, LunchError::Validation(_)), "{}", bad);
        }
        assert!(svc.attendance_summary("not-a-date").is_err());
    }

    #[test]
    fn test_summary_counts_per_option() {
        let svc = service();
        svc.mark_attendance("u1", "Kim", attending(LunchOption::Veg, "2026-03-02"))
            .unwrap();
        svc.mark_attendance("u2", "Ana", attending(LunchOption::Veg, "2026-03-02"))
            .unwrap();
        svc.mark_attendance("u3", "Raj", attending(LunchOption::NonVeg, "2026-03-02"))
            .unwrap();
        svc.mark_attendance(
            "u4",
            "Lee",
            MarkAttendance {
                is_attending: false,
                preferred_lunch_option: None,
                date: Some("2026-03-02".into()),
            },
        )
        .unwrap();
        // Different day stays out of the summary.
        svc.mark_attendance("u5", "Joe", attending(LunchOption::Vegan, "2026-03-03"))
            .unwrap();

        let summary = svc.attendance_summary("2026-03-02").unwrap();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.attending, 3);
        assert_eq!(summary.by_option.get("VEG"), Some(&2));
        assert_eq!(summary.by_option.get("NON_VEG"), Some(&1));
        assert_eq!(summary.by_option.get("VEGAN"), None);
        assert_eq!(summary.items.len(), 4);
    }
}
