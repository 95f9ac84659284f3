pub mod domain;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod views;

/// Role that may edit and delete every review.
pub const SERVICE_ACCESS_ROLE: &str = "admin";
