//! Task-local access to the session user.
//!
//! The security middleware runs every request inside
//! [`SecurityContext::run_with`], so code below the handlers (document
//! service adapters, audit helpers) can ask who is calling without threading
//! the user through every signature.
//!
//! ```ignore
//! fn may_archive(workspace: Workspace) -> bool {
//!     SecurityContext::can_perform(Action::Archive, workspace)
//! }
//! ```

use std::cell::RefCell;

use crate::http::security::resolver::{AccessResolver, Action};
use crate::http::security::role::Role;
use crate::http::security::user::User;
use crate::http::security::workspace::Workspace;

tokio::task_local! {
    static SECURITY_CONTEXT: RefCell<Option<User>>;
}

pub struct SecurityContext;

impl SecurityContext {
    /// The current user, `None` outside a scope or for anonymous requests.
    pub fn get_user() -> Option<User> {
        SECURITY_CONTEXT
            .try_with(|ctx| ctx.borrow().clone())
            .ok()
            .flatten()
    }

    pub fn get_role() -> Option<Role> {
        SECURITY_CONTEXT
            .try_with(|ctx| ctx.borrow().as_ref().map(User::get_role))
            .ok()
            .flatten()
    }

    pub fn is_authenticated() -> bool {
        Self::get_role().is_some()
    }

    pub fn has_role(role: Role) -> bool {
        Self::get_role() == Some(role)
    }

    pub fn has_any_role(roles: &[Role]) -> bool {
        Self::get_role().is_some_and(|role| roles.contains(&role))
    }

    pub fn can_perform(action: Action, workspace: Workspace) -> bool {
        SECURITY_CONTEXT
            .try_with(|ctx| {
                AccessResolver::new().can_perform(ctx.borrow().as_ref(), action, workspace)
            })
            .unwrap_or(false)
    }

    /// Runs `f` with `user` as the current user.
    pub async fn run_with<F, R>(user: Option<User>, f: F) -> R
    where
        F: std::future::Future<Output = R>,
    {
        SECURITY_CONTEXT.scope(RefCell::new(user), f).await
    }

    /// Replaces the user for the rest of the scope, used after a profile
    /// re-fetch. No effect outside `run_with`.
    pub fn set_user(user: Option<User>) {
        let _ = SECURITY_CONTEXT.try_with(|ctx| {
            *ctx.borrow_mut() = user;
        });
    }

    pub fn clear() {
        Self::set_user(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::security::Permissions;

    #[tokio::test]
    async fn test_outside_scope() {
        assert!(SecurityContext::get_user().is_none());
        assert!(!SecurityContext::can_perform(Action::View, Workspace::Cam));
        SecurityContext::set_user(Some(User::new("1", Role::Administrador)));
        assert!(!SecurityContext::is_authenticated());
    }

    #[tokio::test]
    async fn test_run_with_user() {
        let user = User::new("3", Role::CfMember)
            .permissions(Permissions::new().archive(&[Workspace::ComisionesCf]));

        SecurityContext::run_with(Some(user), async {
            assert!(SecurityContext::is_authenticated());
            assert!(SecurityContext::has_role(Role::CfMember));
            assert!(!SecurityContext::has_any_role(&[Role::Presidente, Role::Vicepresidente]));
            assert!(SecurityContext::can_perform(Action::Archive, Workspace::ComisionesCf));
            assert!(!SecurityContext::can_perform(Action::Upload, Workspace::ComisionesCf));
        })
        .await;
    }

    #[tokio::test]
    async fn test_set_user_replaces_within_scope() {
        SecurityContext::run_with(Some(User::new("3", Role::CfMember)), async {
            SecurityContext::set_user(Some(User::new("3", Role::Presidente)));
            assert!(SecurityContext::can_perform(Action::Manage, Workspace::Presidencia));

            SecurityContext::clear();
            assert!(!SecurityContext::is_authenticated());
        })
        .await;
    }
}
