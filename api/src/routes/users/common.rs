use db::models::{class, user};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use validator::Validate;

lazy_static::lazy_static! {
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-z0-9_.]{3,32}$").unwrap();
    // Indonesian civil servant number: 18 digits.
    static ref NIP_REGEX: regex::Regex = regex::Regex::new(r"^\d{18}$").unwrap();
}

#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(regex(
        path = *USERNAME_REGEX,
        message = "Username must be 3-32 lowercase letters, digits, dots or underscores"
    ))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    /// "ADMIN" or "TEACHER".
    pub role: String,

    #[validate(regex(path = *NIP_REGEX, message = "NIP must be exactly 18 digits"))]
    pub nip: Option<String>,

    pub phone: Option<String>,

    /// Homeroom class to assign; only valid for teachers.
    pub class_id: Option<i64>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,

    pub role: Option<String>,

    #[validate(regex(path = *NIP_REGEX, message = "NIP must be exactly 18 digits"))]
    pub nip: Option<String>,

    pub phone: Option<String>,

    /// Reassigns the homeroom class; absent means no change. To unassign,
    /// update the class itself with `teacherId: null`.
    pub class_id: Option<i64>,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub nip: Option<String>,
    pub phone: Option<String>,
    pub class_id: Option<i64>,
    pub class_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            name: u.name,
            role: u.role.to_string(),
            nip: u.nip,
            phone: u.phone,
            class_id: None,
            class_name: None,
            created_at: u.created_at.to_rfc3339(),
            updated_at: u.updated_at.to_rfc3339(),
        }
    }
}

impl UserResponse {
    pub fn with_class_info(u: user::Model, class: Option<&class::Model>) -> Self {
        let mut base = Self::from(u);
        base.class_id = class.map(|c| c.id);
        base.class_name = class.map(|c| c.name.clone());
        base
    }

    /// Resolves the homeroom class from the database. A lookup failure logs
    /// and degrades to a response without class info.
    pub async fn with_class(db: &DatabaseConnection, u: user::Model) -> Self {
        let class = match class::Model::find_by_teacher(db, u.id).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(error = %e, user_id = u.id, "Failed to resolve homeroom class");
                None
            }
        };
        Self::with_class_info(u, class.as_ref())
    }
}
