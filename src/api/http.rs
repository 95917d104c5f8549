//! reqwest implementation of [`ShopApi`].

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::{ApiError, MutationResult, ShopApi};
use crate::domain::{CheckoutResult, OrderPayload, Role, StatusReport, User};

/// Tunnelling proxies in front of the backend serve an interstitial page unless told not to.
const SKIP_PROXY_WARNING: (&str, &str) = ("ngrok-skip-browser-warning", "true");

/// Which route family serves the roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UsersPath {
    #[default]
    Admin,
    /// The older `/user/users` routes.
    Legacy,
}

impl UsersPath {
    fn prefix(self) -> &'static str {
        match self {
            Self::Admin => "admin/users",
            Self::Legacy => "user/users",
        }
    }
}

impl fmt::Display for UsersPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => f.write_str("admin"),
            Self::Legacy => f.write_str("user"),
        }
    }
}

impl FromStr for UsersPath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" | "legacy" => Ok(Self::Legacy),
            other => Err(format!("unknown users path: {other} (expected admin or user)")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RosterResponse {
    #[serde(default)]
    users: Vec<User>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for the shop backend.
#[derive(Debug, Clone)]
pub struct HttpShopApi {
    base_url: String,
    users_path: UsersPath,
    http: Client,
}

impl HttpShopApi {
    pub fn new(base_url: impl Into<String>, users_path: UsersPath) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            users_path,
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn users_url(&self, suffix: &str) -> String {
        if suffix.is_empty() {
            self.url(self.users_path.prefix())
        } else {
            self.url(&format!("{}/{}", self.users_path.prefix(), suffix))
        }
    }

    /// Headers every backend request carries.
    fn prepare(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(SKIP_PROXY_WARNING.0, SKIP_PROXY_WARNING.1)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    fn checkout_request(&self, order: &OrderPayload) -> RequestBuilder {
        self.prepare(self.http.post(self.url("api/checkout")).json(order))
    }

    fn role_request(&self, user_id: &str, role: Role) -> RequestBuilder {
        let body = serde_json::json!({ "role": role });
        self.prepare(self.http.put(self.users_url(&format!("{user_id}/role"))).json(&body))
    }

    fn deactivate_request(&self, user_id: &str, reason: &str) -> RequestBuilder {
        let body = serde_json::json!({ "reason": reason });
        self.prepare(
            self.http
                .put(self.users_url(&format!("{user_id}/deactivate")))
                .json(&body),
        )
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }
}

/// Turn a non-2xx response into [`ApiError::Status`], keeping whatever the body explains.
async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), body = %text, "Backend request failed");
    Err(status_error(status.as_u16(), &text))
}

/// A body that is not the usual `{error, message}` JSON still yields a status error.
fn status_error(status: u16, text: &str) -> ApiError {
    let body: ErrorBody = serde_json::from_str(text).unwrap_or_default();
    ApiError::Status {
        status,
        error: body.error,
        message: body.message,
    }
}

#[async_trait]
impl ShopApi for HttpShopApi {
    #[instrument(skip(self, order), fields(items = order.items.len(), total = order.total))]
    async fn checkout(&self, order: OrderPayload) -> Result<CheckoutResult, ApiError> {
        debug!("Posting checkout");
        self.send(self.checkout_request(&order)).await
    }

    #[instrument(skip(self))]
    async fn status(&self) -> Result<StatusReport, ApiError> {
        self.send(self.prepare(self.http.get(self.url("status")))).await
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let roster: RosterResponse = self
            .send(self.prepare(self.http.get(self.users_url(""))))
            .await?;
        debug!(count = roster.users.len(), "Roster fetched");
        Ok(roster.users)
    }

    #[instrument(skip(self))]
    async fn update_role(&self, user_id: String, role: Role) -> Result<MutationResult, ApiError> {
        self.send(self.role_request(&user_id, role)).await
    }

    #[instrument(skip(self, reason))]
    async fn deactivate_user(&self, user_id: String, reason: String) -> Result<MutationResult, ApiError> {
        self.send(self.deactivate_request(&user_id, &reason)).await
    }

    #[instrument(skip(self))]
    async fn activate_user(&self, user_id: String) -> Result<MutationResult, ApiError> {
        let request = self.http.put(self.users_url(&format!("{user_id}/activate")));
        self.send(self.prepare(request)).await
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, user_id: String) -> Result<MutationResult, ApiError> {
        self.send(self.prepare(self.http.delete(self.users_url(&user_id))))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PaymentMethod;

    #[test]
    fn builds_admin_and_legacy_routes() {
        let api = HttpShopApi::new("https://shop.example.com/", UsersPath::Admin);
        assert_eq!(api.url("status"), "https://shop.example.com/status");
        assert_eq!(api.users_url(""), "https://shop.example.com/admin/users");
        assert_eq!(api.users_url("u1/role"), "https://shop.example.com/admin/users/u1/role");

        let legacy = HttpShopApi::new("https://shop.example.com", UsersPath::Legacy);
        assert_eq!(legacy.users_url("u1"), "https://shop.example.com/user/users/u1");
    }

    #[test]
    fn users_path_parses() {
        assert_eq!("admin".parse::<UsersPath>(), Ok(UsersPath::Admin));
        assert_eq!("user".parse::<UsersPath>(), Ok(UsersPath::Legacy));
        assert!("staff".parse::<UsersPath>().is_err());
    }

    fn json_body(request: RequestBuilder) -> serde_json::Value {
        let request = request.build().unwrap();
        let bytes = request.body().and_then(|body| body.as_bytes()).unwrap();
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn account_changes_send_json_bodies_with_proxy_header() {
        let api = HttpShopApi::new("https://shop.example.com", UsersPath::Admin);

        let role = api.role_request("u1", Role::Admin).build().unwrap();
        assert_eq!(role.method(), reqwest::Method::PUT);
        assert_eq!(role.url().as_str(), "https://shop.example.com/admin/users/u1/role");
        assert_eq!(role.headers()["ngrok-skip-browser-warning"], "true");
        assert_eq!(role.headers()[reqwest::header::CONTENT_TYPE], "application/json");
        assert_eq!(
            json_body(api.role_request("u1", Role::Admin)),
            serde_json::json!({ "role": "admin" })
        );

        let deactivate = api.deactivate_request("u2", "Spam orders").build().unwrap();
        assert_eq!(deactivate.url().path(), "/admin/users/u2/deactivate");
        assert_eq!(deactivate.headers()["ngrok-skip-browser-warning"], "true");
        assert_eq!(
            json_body(api.deactivate_request("u2", "Spam orders")),
            serde_json::json!({ "reason": "Spam orders" })
        );
    }

    #[test]
    fn checkout_posts_the_order() {
        let api = HttpShopApi::new("https://shop.example.com/", UsersPath::Admin);
        let order = OrderPayload::from_cart(
            "ana@example.com".to_string(),
            &[],
            "12 Jalan Durian".to_string(),
            "09171234567".to_string(),
            PaymentMethod::CashOnDelivery,
        );

        let request = api.checkout_request(&order).build().unwrap();
        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "https://shop.example.com/api/checkout");
        let body = json_body(api.checkout_request(&order));
        assert_eq!(body["email"], "ana@example.com");
        assert_eq!(body["address"], "12 Jalan Durian");
        assert_eq!(body["paymentMethod"], "COD");
    }

    #[test]
    fn non_success_bodies_become_status_errors() {
        match status_error(400, r#"{"success":false,"error":"Missing data"}"#) {
            ApiError::Status { status, error, message } => {
                assert_eq!(status, 400);
                assert_eq!(error.as_deref(), Some("Missing data"));
                assert_eq!(message, None);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // An HTML error page from a proxy still maps to a status error, just without text.
        let err = status_error(502, "<html>Bad Gateway</html>");
        assert!(matches!(err, ApiError::Status { status: 502, error: None, message: None }));
        assert_eq!(err.backend_message(), None);
    }

    #[test]
    fn status_error_prefers_error_field() {
        let err = ApiError::Status {
            status: 400,
            error: Some("Missing data".to_string()),
            message: Some("ignored".to_string()),
        };
        assert_eq!(err.backend_message(), Some("Missing data"));

        let err = ApiError::Status {
            status: 500,
            error: None,
            message: Some("Failed to send checkout email".to_string()),
        };
        assert_eq!(err.backend_message(), Some("Failed to send checkout email"));
    }
}
