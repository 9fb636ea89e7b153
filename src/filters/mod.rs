pub mod cache;
pub mod catalog;
pub mod list;
pub mod options;
pub mod query;
pub mod registry;
pub mod resource;
pub mod url;
pub mod validation;
