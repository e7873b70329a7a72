//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod account;
pub mod health;
pub mod links;
pub mod redirect;
pub mod shorten;

pub use account::{login_handler, register_handler};
pub use health::{health_handler, index_handler};
pub use links::list_links_handler;
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
