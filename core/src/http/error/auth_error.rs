use actix_web::{error, http::StatusCode, HttpResponse, HttpResponseBuilder};
use derive_more::{Display, Error};
use serde_json::json;

use crate::http::security::document::DocumentError;
use crate::http::security::router::{DenialKind, DenialPanel};

#[derive(Debug, Display, Error)]
pub enum AuthError {
    /// No session on a request that needs one.
    #[display("authentication required")]
    SignInRequired,
    #[display("unauthorized: {_0}")]
    Unauthorized(#[error(not(source))] DenialPanel),
    #[display("forbidden: {_0}")]
    Forbidden(#[error(not(source))] DenialPanel),
    #[display("not recognized: {_0}")]
    NotRecognized(#[error(not(source))] DenialPanel),
    #[display("{_0}")]
    Document(DocumentError),
}

impl AuthError {
    /// Wraps a denial panel in the variant matching its kind.
    pub fn from_panel(panel: DenialPanel) -> Self {
        match panel.kind {
            DenialKind::Unauthenticated => AuthError::Unauthorized(panel),
            DenialKind::NotRecognized => AuthError::NotRecognized(panel),
            DenialKind::PermissionDenied => AuthError::Forbidden(panel),
        }
    }

    /// The denial panel, if this error is an access denial.
    pub fn panel(&self) -> Option<&DenialPanel> {
        match self {
            AuthError::Unauthorized(panel)
            | AuthError::Forbidden(panel)
            | AuthError::NotRecognized(panel) => Some(panel),
            AuthError::SignInRequired | AuthError::Document(_) => None,
        }
    }
}

impl From<DenialPanel> for AuthError {
    fn from(panel: DenialPanel) -> Self {
        AuthError::from_panel(panel)
    }
}

impl From<DocumentError> for AuthError {
    fn from(err: DocumentError) -> Self {
        AuthError::Document(err)
    }
}

impl error::ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::SignInRequired | AuthError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
            AuthError::NotRecognized(_) => StatusCode::NOT_FOUND,
            AuthError::Document(DocumentError::NotFound(_))
            | AuthError::Document(DocumentError::WrongWorkspace { .. }) => StatusCode::NOT_FOUND,
            AuthError::Document(DocumentError::AlreadyArchived(_)) => StatusCode::CONFLICT,
            AuthError::Document(DocumentError::Unavailable(_)) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self.panel() {
            Some(panel) => json!({ "denied": panel }),
            None => json!({ "error": self.to_string() }),
        };
        HttpResponseBuilder::new(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::security::{Role, User, WorkspaceRouter};
    use actix_web::body::MessageBody;
    use actix_web::ResponseError;

    fn panel_for(user: Option<&User>, requested: &str) -> DenialPanel {
        match WorkspaceRouter::new().route(user, requested) {
            crate::http::security::RouteDecision::Denied(panel) => panel,
            other => panic!("expected denial, got {:?}", other),
        }
    }

    #[test]
    fn test_status_codes_follow_denial_kind() {
        let user = User::new("1", Role::CfMember);
        assert_eq!(
            AuthError::from(panel_for(None, "cam")).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::from(panel_for(Some(&user), "cam")).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::from(panel_for(Some(&user), "unknown_ws")).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_sign_in_required() {
        let err = AuthError::SignInRequired;
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert!(err.panel().is_none());
    }

    #[test]
    fn test_document_errors() {
        assert_eq!(
            AuthError::from(DocumentError::AlreadyArchived(3)).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AuthError::from(DocumentError::Unavailable("timeout".into())).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_denial_body_is_never_empty() {
        let user = User::new("1", Role::Intendente);
        let response = AuthError::from(panel_for(Some(&user), "ampp")).error_response();
        let body = response.into_body().try_into_bytes().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["denied"]["kind"], "permission_denied");
        assert_eq!(json["denied"]["available"], serde_json::json!(["cam"]));
        assert!(json["denied"]["message"].as_str().unwrap().contains("Intendente"));
    }
}
