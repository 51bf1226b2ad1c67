use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;

/// API错误类型
///
/// 只覆盖注册、会话等外围路径的意外错误。照片校验走 fail-closed，
/// 永远不会产生 AppError。
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("请求处理失败: {:?}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, format!("Something went wrong: {}", self.0))
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
