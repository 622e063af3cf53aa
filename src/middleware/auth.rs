use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::typed_header::TypedHeaderRejectionReason;
use headers::Authorization;
use headers::authorization::Bearer;
use tracing::debug;

use crate::db::DbUser;
use crate::error::CodexError;
use crate::router::CodexState;

/// The requester, identified by `Authorization: Bearer <token>`.
///
/// A request without the header is anonymous (`None`). A malformed header or
/// an unknown token is rejected with 401 before the handler runs.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<DbUser>);

impl CurrentUser {
    /// The logged-in user, or 403 for anonymous requests.
    pub fn require(self) -> Result<DbUser, CodexError> {
        self.0.ok_or(CodexError::Unauthenticated)
    }
}

impl FromRequestParts<CodexState> for CurrentUser {
    type Rejection = CodexError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &CodexState,
    ) -> Result<Self, Self::Rejection> {
        let header = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await;
        let token = match header {
            Ok(TypedHeader(Authorization(bearer))) => bearer.token().to_owned(),
            Err(rejection) => match rejection.reason() {
                TypedHeaderRejectionReason::Missing => return Ok(Self(None)),
                _ => {
                    debug!(error = %rejection, "malformed authorization header");
                    return Err(CodexError::InvalidToken);
                }
            },
        };

        match state.storage.user_for_token(&token).await? {
            Some(user) => Ok(Self(Some(user))),
            None => Err(CodexError::InvalidToken),
        }
    }
}
