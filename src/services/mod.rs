pub mod appwrite;
pub mod embed;
pub mod filters;
pub mod identity;
pub mod migration;
pub mod retry;
pub mod watchlist;
