pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;

use crate::auth::handlers as auth;
use crate::auth::middleware::{require_active_plan, require_auth};
use crate::diagnosis::handlers as diagnosis;
use crate::documents::handlers as documents;
use crate::editais::handlers as editais;
use crate::payments::handlers as payments;
use crate::projects::handlers as projects;
use crate::state::AppState;
use crate::users::handlers as users;

/// PDF uploads arrive as multipart bodies; the axum default of 2 MB is too
/// small for a typical edital.
const UPLOAD_BODY_LIMIT: usize = 25 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    // No session required: account entry points, payment callbacks (the
    // payer may land back without a live session) and the MP webhook.
    let public = Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/auth/signup", post(auth::handle_signup))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/logout", post(auth::handle_logout))
        .route("/api/v1/auth/reset-password", post(auth::handle_reset_password))
        .route(
            "/api/v1/auth/reset-password/confirm",
            post(auth::handle_reset_password_confirm),
        )
        .route("/api/v1/payments/success", get(payments::handle_payment_success))
        .route("/api/v1/payments/failure", get(payments::handle_payment_failure))
        .route("/api/v1/payments/pending", get(payments::handle_payment_pending))
        .route("/api/v1/payments/webhook", post(payments::handle_webhook));

    // Session required. Profile, subscription and checkout stay reachable
    // after the trial expires so the user can still upgrade.
    let account = Router::new()
        .route("/api/v1/profile", get(users::handle_profile))
        .route("/api/v1/subscription", get(users::handle_subscription))
        .route(
            "/api/v1/subscription/cancel",
            post(users::handle_cancel_subscription),
        )
        .route("/api/v1/payments/checkout", post(payments::handle_checkout))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Session plus an active plan (premium or trial window).
    let workspace = Router::new()
        .route(
            "/api/v1/projects",
            post(projects::handle_create_project).get(projects::handle_list_projects),
        )
        .route(
            "/api/v1/projects/:id",
            get(projects::handle_get_project)
                .patch(projects::handle_update_project)
                .delete(projects::handle_delete_project),
        )
        .route("/api/v1/projects/:id/text", put(projects::handle_save_project_text))
        .route("/api/v1/projects/:id/import", post(projects::handle_import_project_text))
        .route(
            "/api/v1/projects/:id/diagnosis",
            post(diagnosis::handle_generate_diagnosis),
        )
        .route(
            "/api/v1/projects/:id/suggestions",
            post(diagnosis::handle_generate_suggestions),
        )
        .route(
            "/api/v1/projects/:id/suggestions/:number/apply",
            post(diagnosis::handle_apply_suggestion),
        )
        .route(
            "/api/v1/projects/:id/documents",
            post(documents::handle_generate_document),
        )
        .route(
            "/api/v1/projects/:id/documents/:kind",
            put(documents::handle_save_document),
        )
        .route(
            "/api/v1/editais",
            get(editais::handle_list_editais).post(editais::handle_create_edital),
        )
        .route(
            "/api/v1/editais/:id",
            get(editais::handle_get_edital)
                .put(editais::handle_update_edital)
                .delete(editais::handle_delete_edital),
        )
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .route_layer(middleware::from_fn(require_active_plan))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public)
        .merge(account)
        .merge(workspace)
        .with_state(state)
}
