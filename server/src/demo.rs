//! Demo data: one bearer session per role and a handful of documents.
//!
//! Tokens are `demo-<role>`, e.g. `Authorization: Bearer demo-secretario_cam`.

use lisadocs_core::http::security::{
    DocumentStatus, InMemoryDocumentService, Permissions, Role, SessionRegistry, User, Workspace,
};

pub fn demo_token(role: Role) -> String {
    format!("demo-{}", role.as_str())
}

fn demo_user(role: Role) -> User {
    let permissions = match role {
        Role::SecretarioCam => Permissions::new()
            .view(&[Workspace::Cam])
            .manage(&[Workspace::Cam])
            .archive(&[Workspace::Cam]),
        Role::SecretarioAmpp => Permissions::new()
            .view(&[Workspace::Ampp])
            .manage(&[Workspace::Ampp]),
        Role::SecretarioCf => Permissions::new()
            .view(&[Workspace::ComisionesCf])
            .archive(&[Workspace::ComisionesCf]),
        Role::Intendente => Permissions::new().view(&[Workspace::Cam]),
        Role::CfMember => Permissions::new().view(&[Workspace::ComisionesCf]),
        _ => Permissions::new(),
    };
    let id = Role::ALL.iter().position(|r| *r == role).unwrap_or_default() + 1;
    User::new(id.to_string(), role)
        .username(role.as_str())
        .permissions(permissions)
}

/// Opens a session per role and returns the tokens.
pub fn seed_sessions(sessions: &SessionRegistry) -> Vec<(Role, String)> {
    Role::ALL
        .iter()
        .map(|role| {
            let token = demo_token(*role);
            sessions.open_with_token(token.clone(), demo_user(*role));
            (*role, token)
        })
        .collect()
}

pub fn seed_documents() -> InMemoryDocumentService {
    InMemoryDocumentService::new()
        .with_document(Workspace::Presidencia, "2", "Decreto 14", DocumentStatus::Stored)
        .with_document(Workspace::Cam, "4", "Acta de sesion", DocumentStatus::Stored)
        .with_document(Workspace::Cam, "7", "Informe de obras", DocumentStatus::Draft)
        .with_document(Workspace::Ampp, "5", "Presupuesto anual", DocumentStatus::Stored)
        .with_document(Workspace::ComisionesCf, "8", "Minuta comision", DocumentStatus::Stored)
        .with_document(Workspace::ComisionesCf, "6", "Dictamen", DocumentStatus::Archived)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lisadocs_core::http::security::AccessResolver;

    #[test]
    fn one_session_per_role() {
        let sessions = SessionRegistry::new();
        let tokens = seed_sessions(&sessions);
        assert_eq!(tokens.len(), Role::ALL.len());
        for (role, token) in tokens {
            assert_eq!(sessions.get(&token).map(|u| u.get_role()), Some(role));
        }
    }

    #[test]
    fn demo_users_stay_in_their_workspace() {
        let resolver = AccessResolver::new();
        let intendente = demo_user(Role::Intendente);
        assert_eq!(resolver.accessible_workspaces(Some(&intendente)), vec![Workspace::Cam]);
        assert_eq!(intendente.get_id(), "7");
    }
}
