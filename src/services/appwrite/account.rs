use serde::Serialize;

use super::AppwriteClient;
use crate::{
    error::AppResult,
    models::{Identity, Preferences},
    services::{identity::IdentityProvider, retry::execute_with_retry},
};

#[derive(Serialize)]
struct UpdatePrefsRequest<'a> {
    prefs: &'a Preferences,
}

#[async_trait::async_trait]
impl IdentityProvider for AppwriteClient {
    async fn current_identity(&self) -> AppResult<Identity> {
        let identity: Identity =
            execute_with_retry(self.retry_policy(), || self.get("/account", &[])).await?;
        tracing::debug!(user_id = %identity.id, "Resolved current account");
        Ok(identity)
    }

    async fn preferences(&self) -> AppResult<Preferences> {
        execute_with_retry(self.retry_policy(), || self.get("/account/prefs", &[])).await
    }

    async fn update_preferences(&self, prefs: &Preferences) -> AppResult<Preferences> {
        let body = UpdatePrefsRequest { prefs };
        execute_with_retry(self.retry_policy(), || self.patch("/account/prefs", &body)).await
    }

    async fn delete_session(&self) -> AppResult<()> {
        execute_with_retry(self.retry_policy(), || {
            self.delete("/account/sessions/current")
        })
        .await?;
        tracing::info!("Session deleted");
        Ok(())
    }
}
