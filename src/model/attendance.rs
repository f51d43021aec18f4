use crate::model::user::EmployeeSummary;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "user_id": 1,
    "date": "2025-12-05",
    "check_in": "09:15:00",
    "check_out": "17:30:00",
    "status": "late",
    "remark": "Traffic jam on highway",
    "remark_verified": false,
    "verified_by": null,
    "manager_note": null
}))]
pub struct Attendance {
    pub id: u64,
    pub user_id: u64,
    #[schema(example = "2025-12-05", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "09:15:00", value_type = Option<String>)]
    pub check_in: Option<NaiveTime>,
    #[schema(example = "17:30:00", value_type = Option<String>)]
    pub check_out: Option<NaiveTime>,
    /// Free-form; conventionally `on_time`, `late` or `early_leave`.
    pub status: String,
    pub remark: Option<String>,
    /// `None` until a remark has been submitted or reviewed.
    pub remark_verified: Option<bool>,
    pub verified_by: Option<u64>,
    pub manager_note: Option<String>,
}

impl Attendance {
    /// Exact match against the `YYYY-MM-DD` rendering of `date`.
    pub fn is_on(&self, date: &str) -> bool {
        self.date.format("%Y-%m-%d").to_string() == date
    }

    /// Replaces the remark; any earlier review no longer applies.
    pub fn set_remark(&mut self, remark: String) {
        self.remark = Some(remark);
        self.remark_verified = Some(false);
        self.verified_by = None;
        self.manager_note = None;
    }

    pub fn set_verification(&mut self, verified: bool, manager_id: u64, note: Option<String>) {
        self.remark_verified = Some(verified);
        self.verified_by = Some(manager_id);
        self.manager_note = note;
    }
}

/// Staff attendance row: the record plus who it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceWithEmployee {
    #[serde(flatten)]
    pub record: Attendance,
    pub employee: EmployeeSummary,
}
