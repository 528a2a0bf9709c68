use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Meal preference options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LunchOption {
    Veg,
    NonVeg,
    Vegan,
}

impl LunchOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            LunchOption::Veg => "VEG",
            LunchOption::NonVeg => "NON_VEG",
            LunchOption::Vegan => "VEGAN",
        }
    }
}

/// One user's attendance record for one day. At most one record per
/// (user, date); marking again overwrites it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LunchAttendance {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    /// Day in `YYYY-MM-DD`.
    pub date: String,
    pub is_attending: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_lunch_option: Option<LunchOption>,
    pub created_at: String,
    pub updated_at: String,
}

/// Body of POST /launch/attendance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendance {
    pub is_attending: bool,
    #[serde(default)]
    pub preferred_lunch_option: Option<LunchOption>,
    /// Defaults to today when omitted.
    #[serde(default)]
    pub date: Option<String>,
}

/// Response of GET /launch/attendance-summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub date: String,
    /// Records marked for the day, attending or not.
    pub total: i64,
    pub attending: i64,
    /// Attending headcount per meal option.
    pub by_option: BTreeMap<String, i64>,
    pub items: Vec<LunchAttendance>,
}
