mod api;
mod error;
mod state;
mod types;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tower_http::limit::RequestBodyLimitLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use self::state::*;
use crate::store::AccountStore;

#[derive(OpenApi)]
#[openapi(
    paths(api::signup_handler, api::login_handler),
    components(schemas(types::SignupForm, types::LoginForm, types::ApiResponse))
)]
pub struct ApiDoc;

/// 构建API服务器
pub fn create_app<S: AccountStore + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/", get(api::index_handler))
        .route("/signup", get(api::signup_page).post(api::signup_handler::<S>))
        .route("/login", get(api::login_page).post(api::login_handler::<S>))
        .route("/dashboard", get(api::dashboard_handler::<S>))
        .route("/logout", get(api::logout_handler::<S>))
        .route("/metrics", get(api::metrics_handler))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::disable())
        // 表单里是 base64 图片，限制 10M
        .layer(RequestBodyLimitLayer::new(1024 * 1024 * 10))
        .with_state(state)
}
