use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 注册请求参数
///
/// 所有字段都按可缺失解析，缺失和空串统一在 handler 里报
/// "All fields are required"，而不是让框架返回 422。
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

/// 登录请求参数
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub image: Option<String>,
}

/// 注册表单（用于API文档）
#[derive(Debug, ToSchema)]
#[allow(unused)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub email: String,
    /// data URL 形式的摄像头抓拍，如 `data:image/jpeg;base64,...`
    pub image: String,
}

/// 登录表单（用于API文档）
#[derive(Debug, ToSchema)]
#[allow(unused)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// data URL 形式的摄像头抓拍
    pub image: String,
}

/// 通用响应
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    /// 照片校验不通过时为 true，提示前端重新抓拍
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<bool>,
}

impl ApiResponse {
    pub fn ok(message: &str) -> Self {
        Self { success: true, message: message.to_string(), retry: None }
    }

    pub fn err(message: &str) -> Self {
        Self { success: false, message: message.to_string(), retry: None }
    }

    pub fn retry(message: &str) -> Self {
        Self { success: false, message: message.to_string(), retry: Some(true) }
    }
}
