use crate::api::attendance::{RemarkUpdated, RemarkVerified, UpdateRemark, VerifyRemark};
use crate::auth::handlers::{LoginRequest, LoginResponse};
use crate::model::attendance::Attendance;
use crate::model::role::Role;
use crate::model::user::{EmployeeSummary, UserProfile};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Tracker API",
        version = "1.0.0",
        description = r#"
## Employee Attendance Tracker

Employees review their own attendance and explain irregular days with a
**remark**; managers review the remarks of the people who report to them.

### Key Features
- **Login** with email and password, returning an opaque bearer token
- **My attendance**, optionally filtered by date
- **Remarks**: editing a remark clears any earlier review
- **Staff attendance** and **remark verification** for managers

### Security
Every attendance endpoint expects `Authorization: Bearer <token>`.

### Response Format
`{ "success": bool, "data": ..., "message": ... }` on success,
`{ "success": false, "error": ..., "code": ... }` on failure.
"#,
    ),
    paths(
        crate::auth::handlers::login,

        crate::api::attendance::my_attendance,
        crate::api::attendance::update_remark,
        crate::api::attendance::staff_attendance,
        crate::api::attendance::verify_remark
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            UserProfile,
            Role,
            Attendance,
            EmployeeSummary,
            UpdateRemark,
            VerifyRemark,
            RemarkUpdated,
            RemarkVerified
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login"),
        (name = "Attendance", description = "Attendance and remark review APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .build(),
                ),
            );
        }
    }
}
