//! Filter catalog and query compiler for a network flow console.
//!
//! User-chosen criteria ("Namespace", "Port", ...) are validated against a
//! [`filters::catalog::Catalog`], compiled into the backend query grammar by
//! [`filters::query`], and round-tripped through the page URL by
//! [`filters::url`].

pub mod api;
pub mod filters;
pub mod models;
pub mod utils;
