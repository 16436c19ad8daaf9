pub mod export;
pub mod show;

use anyhow::{bail, Result};
use url::Url;

use crate::config::ObisMicroscopyConfig;
use crate::openbis::OpenbisClient;

/// Build an authenticated client from configuration: session token when
/// available, credential login otherwise.
pub async fn build_client(config: &ObisMicroscopyConfig) -> Result<OpenbisClient> {
    let base_url = Url::parse(&config.server.url)?;

    if let Some(token) = &config.server.session_token {
        return Ok(OpenbisClient::from_session_token(&base_url, token.clone())?);
    }

    match (&config.server.username, &config.server.password) {
        (Some(username), Some(password)) => {
            Ok(OpenbisClient::login(&base_url, username, password).await?)
        }
        _ => bail!(
            "no openBIS session: set server.session_token (or OPENBIS_SESSION_TOKEN) \
             or server.username/server.password"
        ),
    }
}
