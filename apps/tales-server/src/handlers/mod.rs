//! HTTP handlers and route configuration.

mod health;
mod posts;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/destinations", web::get().to(posts::destinations))
            .route("/authors/{id}/posts", web::get().to(posts::author_posts))
            // Feed and story routes; mutations require a bearer token
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::feed))
                    .route("", web::post().to(posts::create))
                    .route("/{id}", web::get().to(posts::detail))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete)),
            ),
    );
}
