// GitHub REST API surface
//
// Only the two public, unauthenticated user endpoints the profile widget
// needs: the user record and the most recently updated repositories.

pub mod client;
pub mod models;

pub use client::GithubClient;
pub use models::{Repository, UserProfile};
