//! Login, sign-up, and logout.
//!
//! A failed attempt leaves the client token and the stored token untouched.

use crate::error::ApiError;
use crate::services::decode;
use crate::session::{Session, TokenStore};
use crate::types::{AuthToken, Credentials, Registration};

pub async fn login<S: TokenStore>(
    session: &Session<S>,
    credentials: &Credentials,
) -> Result<AuthToken, ApiError> {
    let response = session.api().post("/auth/login", credentials).await?;
    let token: AuthToken = decode(response)?;
    session.begin(&token.token)?;
    tracing::info!(email = %credentials.email, "logged in");
    Ok(token)
}

pub async fn register<S: TokenStore>(
    session: &Session<S>,
    registration: &Registration,
) -> Result<AuthToken, ApiError> {
    let response = session
        .api()
        .post_form("/auth/signin", &registration.to_form())
        .await?;
    let token: AuthToken = decode(response)?;
    session.begin(&token.token)?;
    tracing::info!(username = %registration.username, "registered");
    Ok(token)
}

pub fn logout<S: TokenStore>(session: &Session<S>) -> Result<(), ApiError> {
    session.end()
}
