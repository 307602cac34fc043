//! Row-level permissions for watchlist documents
//!
//! Permissions are always built from the caller-supplied owner id. The
//! `$userId` placeholder is never used: the backend does not substitute it on
//! write, so documents created with it would be unreadable by their owner.

/// Role string for a single account
pub fn user_role(user_id: &str) -> String {
    format!("user:{}", user_id)
}

/// Owner-only read/update/delete permissions for a new document
pub fn owner_permissions(user_id: &str) -> Vec<String> {
    let role = user_role(user_id);
    ["read", "update", "delete"]
        .iter()
        .map(|action| format!("{}(\"{}\")", action, role))
        .collect()
}
