use actix_web::web;

pub mod advisor;
pub mod auth;
pub mod health;
pub mod todos;
pub mod users;

/// Configure application routes for tests and non-HttpServer contexts.
///
/// In production, `main.rs` wires these under scopes with additional
/// middleware (rate limiting, JWT extraction). Tests register the same paths
/// without those wrappers so endpoint behavior can be exercised directly.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/health").configure(health::configure_routes));
    cfg.service(web::scope("/auth").configure(auth::configure_routes));
    cfg.service(web::scope("/api/users").configure(users::configure_routes));
    cfg.service(web::scope("/api/todos").configure(todos::configure_routes));
    cfg.service(web::scope("/api/advisor").configure(advisor::configure_routes));
}
