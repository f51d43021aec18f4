use crate::model::role::Role;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    /// Plaintext; only ever compared.
    pub password: String,
    pub email: String,
    pub role: Role,
    /// Set for employees only.
    pub manager_id: Option<u64>,
}

/// User as exposed over the API: no password, `manager_id` only for employees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 2,
    "username": "jane_smith",
    "email": "jane@company.com",
    "role": "employee",
    "manager_id": 5
}))]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<u64>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            manager_id: match user.role {
                Role::Employee => user.manager_id,
                Role::Manager => None,
            },
        }
    }
}

/// Owner summary nested into staff attendance rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmployeeSummary {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "john_doe")]
    pub username: String,
    #[schema(example = "john@company.com")]
    pub email: String,
}

impl From<&User> for EmployeeSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}
