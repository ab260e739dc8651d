use actix_web::{error, guard, web};

use crate::errors::ApiError;
use crate::handlers::health_handlers::{db_health_check, health_check};
use crate::handlers::suggestion_handlers::{create_suggestion, get_all_suggestions};
use crate::handlers::visitor_handlers::{
    get_visitor_count, get_visitor_stats, increment_visitor_count, reset_visitor_count,
};
use crate::middlewares::admin_guard::AdminGuard;

/// Configure the routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // Malformed bodies get the same error envelope as every other failure
    cfg.app_data(web::JsonConfig::default().limit(16 * 1024).error_handler(
        |err, _req| {
            let message = match &err {
                error::JsonPayloadError::ContentType => "Expected a JSON request body",
                error::JsonPayloadError::Overflow { .. }
                | error::JsonPayloadError::OverflowKnownLength { .. } => "Request body too large",
                _ => "Invalid JSON request body",
            };
            log::debug!("Rejected JSON payload: {}", err);
            ApiError::Validation(message.to_string()).into()
        },
    ));

    cfg.route("/api/health", web::get().to(health_check))
        .route("/api/health/db", web::get().to(db_health_check));

    cfg.service(
        web::scope("/api/visitors")
            .route("", web::get().to(get_visitor_count))
            .route("/increment", web::post().to(increment_visitor_count))
            // Administrative routes
            .service(
                web::resource("/stats")
                    .wrap(AdminGuard)
                    .route(web::get().to(get_visitor_stats)),
            )
            .service(
                web::resource("/reset")
                    .wrap(AdminGuard)
                    .route(web::post().to(reset_visitor_count)),
            ),
    );

    // Same path, split by method so only the listing sits behind the admin guard
    cfg.service(
        web::resource("/api/suggestions")
            .guard(guard::Post())
            .route(web::post().to(create_suggestion)),
    )
    .service(
        web::resource("/api/suggestions")
            .guard(guard::Get())
            .wrap(AdminGuard)
            .route(web::get().to(get_all_suggestions)),
    );
}
