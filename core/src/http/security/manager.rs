use crate::http::security::authorizer::WorkspaceAuthorizer;
use crate::http::security::session::SessionRegistry;

pub struct AuthenticationManager {}

impl AuthenticationManager {
    pub fn session_registry() -> SessionRegistry {
        SessionRegistry::new()
    }
}

pub struct AuthorizationManager {}

impl AuthorizationManager {
    pub fn workspace_authorizer() -> WorkspaceAuthorizer {
        WorkspaceAuthorizer::new()
    }
}
