use crate::{
    api::{ApiResponse, require_body},
    auth::auth::AuthUser,
    db::Store,
    error::ApiError,
    model::attendance::Attendance,
};
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, web};
use futures::future::{Ready, ready};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateFilter {
    /// Only records on this exact date (`YYYY-MM-DD`)
    #[param(example = "2025-12-05")]
    pub date: Option<String>,
}

impl DateFilter {
    /// The first `date` key wins when the query repeats it.
    pub fn from_query(query: &str) -> Result<Self, ApiError> {
        let pairs = web::Query::<Vec<(String, String)>>::from_query(query).map_err(|err| {
            debug!(error = %err, query, "Rejected query string");
            ApiError::validation("Invalid query string")
        })?;

        let date = pairs
            .into_inner()
            .into_iter()
            .find(|(key, _)| key == "date")
            .map(|(_, value)| value);

        Ok(Self { date })
    }

    /// An empty `date=` means no filter.
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref().filter(|d| !d.is_empty())
    }
}

impl FromRequest for DateFilter {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Self::from_query(req.query_string()))
    }
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateRemark {
    /// Required; an empty string is accepted
    #[schema(example = "Traffic jam on highway")]
    pub remark: Option<String>,
}

fn empty_note() -> Option<String> {
    Some(String::new())
}

#[derive(Deserialize, ToSchema)]
pub struct VerifyRemark {
    /// Required: accept (`true`) or reject (`false`) the remark
    #[schema(example = true)]
    pub verified: Option<bool>,
    /// Defaults to an empty note when omitted
    #[serde(default = "empty_note")]
    #[schema(example = "Acceptable reason")]
    pub manager_note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RemarkUpdated {
    #[schema(example = 5)]
    pub id: u64,
    #[schema(example = "updated")]
    pub remark: Option<String>,
    #[schema(example = false)]
    pub remark_verified: Option<bool>,
}

impl From<Attendance> for RemarkUpdated {
    fn from(record: Attendance) -> Self {
        Self {
            id: record.id,
            remark: record.remark,
            remark_verified: record.remark_verified,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RemarkVerified {
    #[schema(example = 5)]
    pub id: u64,
    #[schema(example = true)]
    pub remark_verified: Option<bool>,
    #[schema(example = 5)]
    pub verified_by: Option<u64>,
    #[schema(example = "ok")]
    pub manager_note: Option<String>,
}

impl From<Attendance> for RemarkVerified {
    fn from(record: Attendance) -> Self {
        Self {
            id: record.id,
            remark_verified: record.remark_verified,
            verified_by: record.verified_by,
            manager_note: record.manager_note,
        }
    }
}

/* =========================
My attendance
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/attendance/my",
    params(DateFilter),
    responses(
        (status = 200, description = "Caller's attendance records", body = Object, example = json!({
            "success": true,
            "data": [{
                "id": 4,
                "user_id": 2,
                "date": "2025-12-05",
                "check_in": "08:45:00",
                "check_out": "17:15:00",
                "status": "on_time",
                "remark": null,
                "remark_verified": null,
                "verified_by": null,
                "manager_note": null
            }]
        })),
        (status = 401, description = "Invalid or missing token")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn my_attendance(
    auth: AuthUser,
    store: web::Data<Store>,
    query: DateFilter,
) -> Result<HttpResponse, ApiError> {
    let records = store.get_user_attendance(auth.user_id, query.date());

    debug!(
        user_id = auth.user_id,
        date = query.date(),
        count = records.len(),
        "Fetched own attendance"
    );

    Ok(ApiResponse::ok(records))
}

/* =========================
Update remark (owner)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/attendance/{id}/remark",
    params(
        ("id" = u64, Path, description = "Attendance record id")
    ),
    request_body(
        content = UpdateRemark,
        description = "New remark",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Remark updated; any earlier review is cleared", body = Object, example = json!({
            "success": true,
            "data": { "id": 5, "remark": "updated", "remark_verified": false },
            "message": "Remark updated successfully"
        })),
        (status = 400, description = "Missing remark"),
        (status = 401, description = "Invalid or missing token"),
        (status = 403, description = "Record belongs to someone else"),
        (status = 404, description = "Attendance record not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn update_remark(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<u64>,
    payload: web::Json<Map<String, Value>>,
) -> Result<HttpResponse, ApiError> {
    let attendance_id = path.into_inner();

    let UpdateRemark { remark } = require_body(payload)?;
    let remark = remark.ok_or_else(|| ApiError::validation("Missing required field: remark"))?;

    let record = store
        .find_attendance_by_id(attendance_id)
        .ok_or(ApiError::RecordNotFound)?;

    if record.user_id != auth.user_id {
        warn!(
            user_id = auth.user_id,
            attendance_id,
            owner_id = record.user_id,
            "Remark update on someone else's record"
        );
        return Err(ApiError::forbidden(
            "Not authorized to update this attendance record",
        ));
    }

    let updated = store
        .update_attendance_remark(attendance_id, remark)
        .ok_or_else(|| {
            error!(attendance_id, "Attendance record vanished during remark update");
            ApiError::Internal
        })?;

    info!(
        user_id = auth.user_id,
        username = %auth.username,
        attendance_id,
        "Remark updated"
    );

    Ok(ApiResponse::ok_with_message(
        RemarkUpdated::from(updated),
        "Remark updated successfully",
    ))
}

/* =========================
Staff attendance (manager)
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/attendance/staff",
    params(DateFilter),
    responses(
        (status = 200, description = "Attendance of the caller's direct reports", body = Object, example = json!({
            "success": true,
            "data": [{
                "id": 6,
                "user_id": 3,
                "date": "2025-12-05",
                "check_in": "09:00:00",
                "check_out": "17:00:00",
                "status": "on_time",
                "remark": null,
                "remark_verified": null,
                "verified_by": null,
                "manager_note": null,
                "employee": { "id": 3, "username": "bob_wilson", "email": "bob@company.com" }
            }]
        })),
        (status = 401, description = "Invalid or missing token"),
        (status = 403, description = "Manager role required")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn staff_attendance(
    auth: AuthUser,
    store: web::Data<Store>,
    query: DateFilter,
) -> Result<HttpResponse, ApiError> {
    auth.require_manager("Manager role required to view staff attendance")?;

    let records = store.get_staff_attendance(auth.user_id, query.date());

    debug!(
        manager_id = auth.user_id,
        date = query.date(),
        count = records.len(),
        "Fetched staff attendance"
    );

    Ok(ApiResponse::ok(records))
}

/* =========================
Verify remark (manager of owner)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/attendance/{id}/verify",
    params(
        ("id" = u64, Path, description = "Attendance record id")
    ),
    request_body(
        content = VerifyRemark,
        description = "Review decision",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Remark reviewed", body = Object, example = json!({
            "success": true,
            "data": { "id": 5, "remark_verified": true, "verified_by": 5, "manager_note": "ok" },
            "message": "Remark verified successfully"
        })),
        (status = 400, description = "Missing verified flag"),
        (status = 401, description = "Invalid or missing token"),
        (status = 403, description = "Not a manager, or not the owner's manager"),
        (status = 404, description = "Attendance record not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn verify_remark(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<u64>,
    payload: web::Json<Map<String, Value>>,
) -> Result<HttpResponse, ApiError> {
    auth.require_manager("Manager role required to verify remarks")?;

    let attendance_id = path.into_inner();
    let VerifyRemark {
        verified,
        manager_note,
    } = require_body(payload)?;

    let verified =
        verified.ok_or_else(|| ApiError::validation("Missing required field: verified"))?;

    let record = store
        .find_attendance_by_id(attendance_id)
        .ok_or(ApiError::RecordNotFound)?;

    let reports_to_caller = store
        .find_user_by_id(record.user_id)
        .is_some_and(|owner| owner.manager_id == Some(auth.user_id));

    if !reports_to_caller {
        warn!(
            manager_id = auth.user_id,
            attendance_id,
            owner_id = record.user_id,
            "Verification outside the manager's team"
        );
        return Err(ApiError::forbidden(
            "Not authorized to verify this attendance record",
        ));
    }

    let updated = store
        .verify_attendance_remark(attendance_id, verified, auth.user_id, manager_note)
        .ok_or_else(|| {
            error!(attendance_id, "Attendance record vanished during verification");
            ApiError::Internal
        })?;

    info!(
        manager_id = auth.user_id,
        attendance_id, verified, "Remark reviewed"
    );

    Ok(ApiResponse::ok_with_message(
        RemarkVerified::from(updated),
        "Remark verified successfully",
    ))
}
