use tracing::info;

use crate::api::{ApiError, Client};

/// Decide whether polling and commands are authorized to run.
///
/// An empty probe goes out first; the server honours a still-valid
/// session cookie without a password. Only on rejection is the
/// configured password submitted. Transport failures and rejections
/// both leave the system unauthenticated.
pub async fn authenticate(client: &Client, password: Option<&str>) -> Result<(), ApiError> {
    let rejection = match client.probe().await {
        Ok(()) => {
            info!("existing session accepted");
            return Ok(());
        }
        Err(err @ ApiError::Transport(_)) => return Err(err),
        Err(err) => err,
    };

    match password {
        Some(password) => {
            client.login(password).await?;
            info!("logged in");
            Ok(())
        }
        None => Err(rejection),
    }
}
