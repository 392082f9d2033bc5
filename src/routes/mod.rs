use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{apply_security_headers, create_cors_layer};
use crate::handlers::{self, admin, auth, events, tickets};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health_check))
        // Session/authorization gate
        .route("/auth/signup", post(auth::signup))
        .route("/auth/signin", post(auth::signin))
        .route("/auth/signout", post(auth::signout))
        .route("/auth/me", get(auth::me))
        // Events
        .route("/events", get(events::list).post(events::create))
        .route(
            "/events/:event_id",
            get(events::get_by_id).delete(events::remove),
        )
        .route("/events/:event_id/purchase", post(tickets::purchase))
        .route("/events/:event_id/attendees", get(tickets::attendees))
        // Tickets and check-in
        .route("/tickets/:code", get(tickets::get_by_code))
        .route("/checkin", post(tickets::check_in))
        // Admin console operations
        .route("/admin/refunds", post(admin::refund))
        .route("/admin/bulk-email", post(admin::bulk_email))
        .route("/admin/analytics/sales", get(admin::sales_analytics))
        .route("/admin/stats", get(admin::stats))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer())
        .with_state(state);

    apply_security_headers(router)
}
