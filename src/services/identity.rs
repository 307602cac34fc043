use crate::{
    error::AppResult,
    models::{Identity, Preferences},
};

/// Source of the signed-in account and its preference bag
///
/// A guest session is reported as an error from [`current_identity`], which the
/// backend signals with a 401.
///
/// [`current_identity`]: IdentityProvider::current_identity
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_identity(&self) -> AppResult<Identity>;

    async fn preferences(&self) -> AppResult<Preferences>;

    /// Replaces the whole preference bag
    async fn update_preferences(&self, prefs: &Preferences) -> AppResult<Preferences>;

    /// Ends the current session
    async fn delete_session(&self) -> AppResult<()>;
}
