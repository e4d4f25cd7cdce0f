use crate::auth::claims::AuthUser;
use crate::response::ApiResponse;
use axum::{
    Json,
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use db::models::{class, user, user::Role};
use sea_orm::{DatabaseConnection, EntityTrait};
use util::state::AppState;

/// Empty payload type for error responses that carry no data.
#[derive(serde::Serialize, Default)]
pub struct Empty;

type GuardError = (StatusCode, Json<ApiResponse<Empty>>);

/// The authenticated caller, resolved once per request by the guards and
/// inserted as a request extension.
///
/// `class_id` is the class the user runs as homeroom teacher, when any.
/// Admins always have `None` here; their reach is unrestricted.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: i64,
    pub role: Role,
    pub class_id: Option<i64>,
}

/// Effective class restriction for list and report reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassScope {
    /// No restriction (admin without a filter).
    All,
    /// Restricted to one class.
    Class(i64),
    /// Caller can see no class at all (teacher without an assigned class).
    Nothing,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Resolves the caller's requested class filter against their own scope.
    ///
    /// Admins get whatever they asked for. Teachers are pinned to their own
    /// class: no filter means their class, naming another class is a 403.
    pub fn scope_class(&self, requested: Option<i64>) -> Result<ClassScope, GuardError> {
        if self.is_admin() {
            return Ok(match requested {
                Some(id) => ClassScope::Class(id),
                None => ClassScope::All,
            });
        }

        match (self.class_id, requested) {
            (Some(own), None) => Ok(ClassScope::Class(own)),
            (Some(own), Some(req)) if req == own => Ok(ClassScope::Class(own)),
            (None, None) => Ok(ClassScope::Nothing),
            _ => Err((
                StatusCode::FORBIDDEN,
                Json(ApiResponse::error("You may only access your own class")),
            )),
        }
    }

    /// Whether the caller may record or change data for the given class.
    pub fn may_manage_class(&self, class_id: i64) -> bool {
        self.is_admin() || self.class_id == Some(class_id)
    }
}

/// Extracts the bearer claims, loads the account, resolves a teacher's class
/// and puts the resulting [`Principal`] into the request extensions.
async fn resolve_principal(
    db: &DatabaseConnection,
    mut req: Request<Body>,
) -> Result<(Request<Body>, Principal), GuardError> {
    let (mut parts, body) = req.into_parts();
    let AuthUser(claims) = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Authentication required")),
            )
        })?;

    let account = match user::Entity::find_by_id(claims.sub).one(db).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Account no longer exists")),
            ));
        }
        Err(e) => {
            // Fail safe: deny when the account cannot be checked.
            tracing::warn!(error = %e, user_id = claims.sub, "DB error while resolving principal; denying access");
            return Err((
                StatusCode::FORBIDDEN,
                Json(ApiResponse::error("Access could not be verified")),
            ));
        }
    };

    let class_id = match account.role {
        Role::Admin => None,
        Role::Teacher => match class::Model::find_by_teacher(db, account.id).await {
            Ok(found) => found.map(|c| c.id),
            Err(e) => {
                tracing::warn!(error = %e, user_id = account.id, "DB error while resolving teacher class; denying access");
                return Err((
                    StatusCode::FORBIDDEN,
                    Json(ApiResponse::error("Access could not be verified")),
                ));
            }
        },
    };

    let principal = Principal {
        user_id: account.id,
        role: account.role,
        class_id,
    };

    req = Request::from_parts(parts, body);
    req.extensions_mut().insert(principal.clone());
    Ok((req, principal))
}

/// Guard for any authenticated account.
pub async fn allow_authenticated(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let (req, _principal) = resolve_principal(app_state.db(), req).await?;

    Ok(next.run(req).await)
}

/// Admin-only guard. The role is checked against the database, not the
/// token, so a demoted account loses access as soon as its row changes.
pub async fn allow_admin(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let (req, principal) = resolve_principal(app_state.db(), req).await?;

    if !principal.is_admin() {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Admin access required")),
        ));
    }

    Ok(next.run(req).await)
}
