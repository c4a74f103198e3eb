pub mod app;
pub mod extract;
pub mod routes;
