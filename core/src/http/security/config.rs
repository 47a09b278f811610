//! Seams between the security middleware and the rest of the service.
//!
//! The middleware asks an [`Authenticator`] who is calling, then hands the
//! request to an [`Authorizer`] which either forwards it or answers with a
//! denial.

use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::Error;
use futures_util::future::LocalBoxFuture;

use crate::http::security::user::User;

/// Resolves the session user behind a request.
///
/// Returning `None` means the request is anonymous. A session whose profile
/// could not be resolved must also yield `None`.
pub trait Authenticator {
    fn get_user(&self, req: &ServiceRequest) -> Option<User>;
}

/// Decides whether a request reaches its handler.
///
/// The returned response body is `EitherBody::left()` when the inner service
/// ran and `EitherBody::right()` when the authorizer answered itself.
pub trait Authorizer<B> {
    /// `next` calls the rest of the chain.
    fn process(
        &self,
        req: ServiceRequest,
        user: Option<&User>,
        next: impl FnOnce(ServiceRequest) -> LocalBoxFuture<'static, Result<ServiceResponse<B>, Error>>
            + 'static,
    ) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>>;
}
