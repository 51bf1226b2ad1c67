use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::{Form, Json};
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use log::info;

use super::error::Result;
use super::state::AppState;
use super::types::*;
use crate::store::{Account, AccountStore};
use crate::{auth, metrics, verify};

/// 首页重定向到注册页
pub async fn index_handler() -> Redirect {
    Redirect::to("/signup")
}

pub async fn signup_page() -> Html<&'static str> {
    Html(include_str!("../../templates/signup.html"))
}

pub async fn login_page() -> Html<&'static str> {
    Html(include_str!("../../templates/login.html"))
}

/// 注册一个新账号
#[utoipa::path(
    post,
    path = "/signup",
    request_body(content = SignupForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, body = ApiResponse),
    )
)]
pub async fn signup_handler<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    Form(data): Form<SignupRequest>,
) -> Result<Response> {
    let (Some(username), Some(password), Some(confirm), Some(email), Some(image)) = (
        required(data.username),
        required(data.password),
        required(data.confirm_password),
        required(data.email),
        required(data.image),
    ) else {
        return Ok(reject("All fields are required"));
    };

    if password != confirm {
        return Ok(reject("Passwords do not match"));
    }
    if !auth::validate_email(&email) {
        return Ok(reject("Invalid email format"));
    }
    if state.store.exists(&username).await? {
        return Ok(reject("Username already exists"));
    }
    let Some(filename) = auth::sanitize_username(&username) else {
        return Ok(reject("Invalid username"));
    };

    info!("正在注册账号 {}", username);

    tokio::fs::create_dir_all(&state.uploads).await?;
    let image_path = state.uploads.join(format!("{}.jpg", filename));
    // 不同用户名清洗后可能同名，不能覆盖别人的参考照片
    if tokio::fs::try_exists(&image_path).await? {
        return Ok(reject("Username already exists"));
    }
    verify::save_reference(&image, &image_path)?;

    state
        .store
        .put(Account {
            username: username.clone(),
            password_hash: auth::hash_password(&password),
            email,
            image_path: image_path.to_string_lossy().into_owned(),
        })
        .await?;

    Ok(start_session(&state, &username, Json(ApiResponse::ok("Signup successful"))).await)
}

/// 登录：密码 + 摄像头抓拍双重校验
#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, body = ApiResponse),
    )
)]
pub async fn login_handler<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    Form(data): Form<LoginRequest>,
) -> Result<Response> {
    let (Some(username), Some(password), Some(image)) =
        (required(data.username), required(data.password), required(data.image))
    else {
        return Ok(reject("All fields are required"));
    };

    let Some(account) = state.store.get(&username).await? else {
        return Ok(reject("Username not found"));
    };

    if !auth::verify_password(&account.password_hash, &password) {
        return Ok(reject("Incorrect password"));
    }

    info!("正在校验 {} 的登录照片", username);

    // 照片校验 fail-closed，只会返回 true/false
    if !verify::verify(Path::new(&account.image_path), &image).await {
        return Ok(Json(ApiResponse::retry("Face does not match. Please try again."))
            .into_response());
    }

    Ok(start_session(&state, &username, Json(ApiResponse::ok("Login successful"))).await)
}

pub async fn dashboard_handler<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Response {
    let Some(username) = current_user(&state, &headers).await else {
        return Redirect::to("/login").into_response();
    };
    let page = include_str!("../../templates/dashboard.html")
        .replace("{{username}}", &escape_html(&username));
    Html(page).into_response()
}

/// 导出 prometheus 指标文本
pub async fn metrics_handler() -> Result<String> {
    Ok(metrics::export()?)
}

pub async fn logout_handler<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Response {
    if let Some(token) = session_cookie(&headers) {
        state.sessions.write().await.remove(&token);
    }
    let mut resp = Redirect::to("/login").into_response();
    resp.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_static("session=; HttpOnly; Path=/; Max-Age=0"),
    );
    resp
}

/// 表单字段缺失或为空串都算未填写
fn required(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

fn reject(message: &str) -> Response {
    Json(ApiResponse::err(message)).into_response()
}

/// 用户名会拼进 HTML 页面，先做最小转义
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// 创建会话并在响应上挂 session cookie
async fn start_session<S: AccountStore>(
    state: &AppState<S>,
    username: &str,
    body: impl IntoResponse,
) -> Response {
    let token = auth::session_token();
    state.sessions.write().await.insert(token.clone(), username.to_string());

    let mut resp = body.into_response();
    let cookie = format!("session={}; HttpOnly; Path=/", token);
    resp.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).expect("invalid cookie value"),
    );
    resp
}

/// 从 Cookie 头里取 session token
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .filter_map(|kv| kv.trim().split_once('='))
        .find(|(k, _)| *k == "session")
        .map(|(_, v)| v.to_string())
}

async fn current_user<S: AccountStore>(state: &AppState<S>, headers: &HeaderMap) -> Option<String> {
    let token = session_cookie(headers)?;
    state.sessions.read().await.get(&token).cloned()
}

#[cfg(test)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    use super::*;
    use crate::store::MemoryStore;

    /// 模拟摄像头抓拍的 data URL
    fn capture() -> String {
        let image = RgbImage::from_pixel(8, 8, Rgb([128, 128, 128]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        format!("data:image/png;base64,{}", STANDARD.encode(bytes))
    }

    fn signup_request(username: &str) -> SignupRequest {
        SignupRequest {
            username: Some(username.to_string()),
            password: Some("hunter2".to_string()),
            confirm_password: Some("hunter2".to_string()),
            email: Some(format!("{}@example.com", rand::random::<u32>())),
            image: Some(capture()),
        }
    }

    fn test_state() -> (TempDir, Arc<AppState<MemoryStore>>) {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(MemoryStore::new(), dir.path().to_path_buf());
        (dir, state)
    }

    async fn body_string(resp: Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("alice"), "alice");
        assert_eq!(
            escape_html(r#"<img src=x onerror="x('1')">"#),
            "&lt;img src=x onerror=&quot;x(&#39;1&#39;)&quot;&gt;"
        );
        assert_eq!(escape_html("a&b"), "a&amp;b");
    }

    #[tokio::test]
    async fn test_signup_filename_collision_rejected() {
        let (_dir, state) = test_state();

        let resp = signup_handler(State(state.clone()), Form(signup_request("a b")))
            .await
            .unwrap();
        assert!(body_string(resp).await.contains("\"success\":true"));

        // "a b" 和 "ab" 清洗后同名，后者不能覆盖前者的照片
        let resp = signup_handler(State(state.clone()), Form(signup_request("ab")))
            .await
            .unwrap();
        assert!(body_string(resp).await.contains("Username already exists"));
    }

    #[tokio::test]
    async fn test_dashboard_escapes_username() {
        let (_dir, state) = test_state();

        let resp = signup_handler(State(state.clone()), Form(signup_request("<b>bob</b>")))
            .await
            .unwrap();
        let cookie = resp
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();

        let mut headers = HeaderMap::new();
        let session = cookie.split(';').next().unwrap();
        headers.insert(header::COOKIE, HeaderValue::from_str(session).unwrap());

        let page = body_string(dashboard_handler(State(state), headers).await).await;
        assert!(page.contains("&lt;b&gt;bob&lt;/b&gt;"));
        assert!(!page.contains("<b>bob</b>"));
    }
}
