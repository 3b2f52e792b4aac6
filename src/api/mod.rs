//! Mastodon REST API surface used by the purge

mod client;
mod error;
pub mod models;

pub use client::{
    FAVOURITES_PATH, Listing, MastodonClient, VERIFY_CREDENTIALS_PATH, account_statuses_path,
    status_path, unfavourite_path,
};
pub use error::{ApiError, Result};
pub use models::{Account, Confirmation, Status};
