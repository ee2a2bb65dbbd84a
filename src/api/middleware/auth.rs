use std::collections::HashSet;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{
    api::state::AppState,
    auth::{hash_token, Authorizer, Permission},
    domain::Editor,
    error::AppError,
};

#[derive(Clone)]
pub struct CurrentEditor {
    pub editor: Editor,
    pub permissions: HashSet<Permission>,
}

impl Authorizer for CurrentEditor {
    fn check(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub async fn require_editor(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request).ok_or(AppError::Unauthorized)?;

    let (editor, permissions) = state
        .service_context
        .editor_repo
        .find_by_token_hash(&hash_token(token))
        .await?
        .ok_or(AppError::Unauthorized)?;

    tracing::debug!("Request authenticated as editor {}", editor.name);

    // Insert current editor into request extensions
    request.extensions_mut().insert(CurrentEditor {
        editor,
        permissions: permissions.into_iter().collect(),
    });

    Ok(next.run(request).await)
}
