//! DealVista HTTP client with bearer-token authentication

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
    Client, Response, StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, instrument};

use dealvista_core::{
    AuthResponse, CatalogPage, CatalogQuery, CouponDetail, Error, ListedCoupon, LogEntry,
    LoginRequest, NewCoupon, RedeemedCoupon, Result, RevealCodeResponse, SignupRequest,
    UserProfile, UserStats,
};
use dealvista_persistence::cache::CouponCache;

const USER_AGENT_VALUE: &str = concat!("dealvista-client/", env!("CARGO_PKG_VERSION"));

/// Error body shape shared by every failing endpoint
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for the DealVista coupon API
///
/// Unauthenticated endpoints (browse, login) work without a token; the
/// bearer token is attached to every request once a session is active.
/// Optionally uses an in-memory cache for coupon detail lookups.
pub struct DealVistaClient {
    http: Client,
    base_url: String,
    token: Option<String>,
    /// Optional shared coupon cache
    cache: Option<Arc<CouponCache>>,
}

impl DealVistaClient {
    /// Create a new client against the given API base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .user_agent(USER_AGENT_VALUE)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: trim_trailing_slash(base_url.into()),
            token: None,
            cache: None,
        }
    }

    /// Create a new client with a shared coupon cache
    pub fn new_with_cache(base_url: impl Into<String>, cache: Arc<CouponCache>) -> Self {
        let mut client = Self::new(base_url);
        client.cache = Some(cache);
        client
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether the base URL uses an encrypted transport (drives the cookie
    /// Secure flag)
    pub fn is_secure_transport(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// Attach or replace the bearer token for authenticated requests
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Default headers for requests (bearer token when logged in)
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }

    /// Check if response indicates authentication failure
    fn check_auth_error(response: &Response) -> Option<Error> {
        match response.status() {
            StatusCode::UNAUTHORIZED => Some(Error::SessionExpired),
            StatusCode::FORBIDDEN => Some(Error::AuthenticationError("Access forbidden".to_string())),
            _ => None,
        }
    }

    /// Map a failing response to the error taxonomy using its body message
    async fn error_from_response(response: Response) -> Error {
        let status = response.status();
        let message = match response.text().await {
            Ok(body) => serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or(body),
            Err(_) => String::new(),
        };

        let lowered = message.to_lowercase();
        if lowered.contains("not enough points") || lowered.contains("insufficient points") {
            return Error::InsufficientPoints(message);
        }

        error!("Request failed: HTTP {} — {}", status, message);
        Error::ApiError(format!("HTTP {status}: {message}"))
    }

    async fn parse_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        response.json().await.map_err(|e| {
            error!("Failed to parse response: {}", e);
            Error::InvalidData(e.to_string())
        })
    }

    /// Authenticate with email/password credentials
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        let url = self.url("/auth/login");
        debug!("Logging in via: {}", url);

        let response = self
            .http
            .post(&url)
            .headers(self.default_headers())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::BAD_REQUEST {
            let err = Self::error_from_response(response).await;
            return Err(match err {
                Error::ApiError(msg) => Error::AuthenticationError(msg),
                other => other,
            });
        }
        if !status.is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let auth: AuthResponse = Self::parse_json(response).await?;
        debug!("Logged in as: {}", auth.email);
        Ok(auth)
    }

    /// Create an account
    #[instrument(skip(self, request))]
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse> {
        let url = self.url("/auth/signup");
        debug!("Signing up via: {}", url);

        let response = self
            .http
            .post(&url)
            .headers(self.default_headers())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            let err = Self::error_from_response(response).await;
            return Err(match err {
                Error::ApiError(msg) => Error::AuthenticationError(msg),
                other => other,
            });
        }
        if !status.is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Self::parse_json(response).await
    }

    /// Fetch a page of coupon listings
    ///
    /// Unset filters are omitted from the query string entirely; see
    /// [`browse_query_params`].
    #[instrument(skip(self, query))]
    pub async fn browse_coupons(&self, query: &CatalogQuery) -> Result<CatalogPage> {
        let url = self.url("/coupons");
        let params = browse_query_params(query);
        debug!("Browsing coupons: {} {:?}", url, params);

        let response = self
            .http
            .get(&url)
            .headers(self.default_headers())
            .query(&params)
            .send()
            .await?;

        if let Some(err) = Self::check_auth_error(&response) {
            return Err(err);
        }
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let page: CatalogPage = Self::parse_json(response).await?;
        debug!(
            "Fetched {} coupons (page {} of {}, {} total)",
            page.coupons.len(),
            page.current_page,
            page.total_pages,
            page.total_items
        );
        Ok(page)
    }

    /// Get details for a specific coupon (cache-aware)
    #[instrument(skip(self))]
    pub async fn get_coupon(&self, coupon_id: &str) -> Result<CouponDetail> {
        if let Some(ref cache) = self.cache {
            if let Some(cached) = cache.get(coupon_id) {
                debug!("Cache hit for {}", coupon_id);
                return Ok(cached);
            }
        }

        let url = self.url(&format!("/coupons/{coupon_id}"));

        let response = self
            .http
            .get(&url)
            .headers(self.default_headers())
            .send()
            .await?;

        if let Some(err) = Self::check_auth_error(&response) {
            return Err(err);
        }
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let detail: CouponDetail = Self::parse_json(response).await?;
        debug!("Coupon fetched: {} ({})", detail.coupon.title, coupon_id);

        if let Some(ref cache) = self.cache {
            cache.insert(detail.clone());
        }

        Ok(detail)
    }

    /// Pay points to reveal a coupon's code
    ///
    /// The server performs the balance check; an insufficient balance comes
    /// back as [`Error::InsufficientPoints`] and deducts nothing.
    #[instrument(skip(self))]
    pub async fn view_code(&self, coupon_id: &str) -> Result<RevealCodeResponse> {
        let url = self.url(&format!("/coupons/{coupon_id}/view-code"));
        debug!("Revealing code for {}", coupon_id);

        let response = self
            .http
            .post(&url)
            .headers(self.default_headers())
            .send()
            .await?;

        if let Some(err) = Self::check_auth_error(&response) {
            return Err(err);
        }
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let reveal: RevealCodeResponse = Self::parse_json(response).await?;
        debug!("Code revealed for {}", coupon_id);

        // The sold count changed; drop any cached copy
        if let Some(ref cache) = self.cache {
            cache.invalidate(coupon_id);
        }

        Ok(reveal)
    }

    /// List a new coupon
    #[instrument(skip(self, request))]
    pub async fn create_coupon(&self, request: &NewCoupon) -> Result<CouponDetail> {
        let url = self.url("/coupons");
        debug!("Listing coupon: {}", request.title);

        let response = self
            .http
            .post(&url)
            .headers(self.default_headers())
            .json(request)
            .send()
            .await?;

        if let Some(err) = Self::check_auth_error(&response) {
            return Err(err);
        }
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Self::parse_json(response).await
    }

    /// Get the current user's profile
    #[instrument(skip(self))]
    pub async fn get_profile(&self) -> Result<UserProfile> {
        self.get_authed("/users/me").await
    }

    /// Get the current user's aggregate stats (authoritative balance source)
    #[instrument(skip(self))]
    pub async fn get_stats(&self) -> Result<UserStats> {
        self.get_authed("/users/me/stats").await
    }

    /// Coupons the user has listed
    #[instrument(skip(self))]
    pub async fn get_coupons_added(&self) -> Result<Vec<ListedCoupon>> {
        self.get_authed("/users/me/coupons-added").await
    }

    /// Coupons the user has paid to reveal
    #[instrument(skip(self))]
    pub async fn get_coupons_redeemed(&self) -> Result<Vec<RedeemedCoupon>> {
        self.get_authed("/users/me/coupons-redeemed").await
    }

    /// Activity log, newest first
    #[instrument(skip(self))]
    pub async fn get_logs(&self) -> Result<Vec<LogEntry>> {
        self.get_authed("/logs").await
    }

    async fn get_authed<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!("Fetching: {}", url);

        let response = self
            .http
            .get(&url)
            .headers(self.default_headers())
            .send()
            .await?;

        if let Some(err) = Self::check_auth_error(&response) {
            return Err(err);
        }
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Self::parse_json(response).await
    }

    /// Get a reference to the cache (if one is attached)
    pub fn cache(&self) -> Option<&Arc<CouponCache>> {
        self.cache.as_ref()
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

/// Build the query string for `GET /coupons`
///
/// Only non-default values are sent: unset filters are omitted rather than
/// transmitted as wildcards, text values are trimmed, and discount types go
/// out in their canonical uppercase form. Paging is always explicit.
pub fn browse_query_params(query: &CatalogQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();

    if let Some(platform) = query.platform.as_deref().map(str::trim) {
        if !platform.is_empty() {
            params.push(("platform", platform.to_string()));
        }
    }
    if let Some(category) = query.category.as_deref().map(str::trim) {
        if !category.is_empty() {
            params.push(("category", category.to_string()));
        }
    }
    if let Some(discount_type) = query.discount_type {
        params.push(("discountType", discount_type.as_str().to_string()));
    }
    if let Some(search) = query.search.as_deref().map(str::trim) {
        if !search.is_empty() {
            params.push(("search", search.to_string()));
        }
    }
    if query.include_inactive {
        params.push(("activeOnly", "false".to_string()));
    }
    params.push(("page", query.page.to_string()));
    params.push(("size", query.page_size().to_string()));

    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealvista_core::DiscountType;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_query_params_omit_unset_filters() {
        let params = browse_query_params(&CatalogQuery::default());
        assert_eq!(
            params,
            vec![("page", "0".to_string()), ("size", "10".to_string())]
        );
    }

    #[test]
    fn test_query_params_trim_and_translate() {
        let query = CatalogQuery {
            platform: Some("  Swiggy ".into()),
            category: Some("   ".into()),
            discount_type: DiscountType::from_label("Flat Discount"),
            search: Some(" pizza ".into()),
            page: 2,
            ..Default::default()
        };
        let params = browse_query_params(&query);
        assert!(params.contains(&("platform", "Swiggy".to_string())));
        assert!(params.contains(&("discountType", "FLAT".to_string())));
        assert!(params.contains(&("search", "pizza".to_string())));
        assert!(params.contains(&("page", "2".to_string())));
        // blank category is unset, not a wildcard
        assert!(!params.iter().any(|(k, _)| *k == "category"));
    }

    #[tokio::test]
    async fn test_browse_parses_paginated_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coupons"))
            .and(query_param("category", "Food"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "coupons": [
                    {"id": "a", "title": "10% off", "platform": "Swiggy", "category": "Food"},
                    {"id": "b", "title": "Free delivery", "platform": "Zomato", "category": "Food"}
                ],
                "currentPage": 0,
                "totalPages": 1,
                "totalItems": 2,
                "pageSize": 10,
                "hasNext": false,
                "hasPrevious": false
            })))
            .mount(&server)
            .await;

        let client = DealVistaClient::new(server.uri());
        let query = CatalogQuery {
            category: Some("Food".into()),
            ..Default::default()
        };
        let page = client.browse_coupons(&query).await.unwrap();
        assert_eq!(page.coupons.len(), 2);
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn test_view_code_maps_insufficient_points() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/coupons/c1/view-code"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "message": "Not enough points. You need 5 points but have 3."
            })))
            .mount(&server)
            .await;

        let mut client = DealVistaClient::new(server.uri());
        client.set_token(Some("jwt".into()));
        let err = client.view_code("c1").await.unwrap_err();
        assert!(matches!(err, Error::InsufficientPoints(_)));
    }

    #[tokio::test]
    async fn test_expired_token_maps_to_session_expired() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let mut client = DealVistaClient::new(server.uri());
        client.set_token(Some("stale".into()));
        let err = client.get_profile().await.unwrap_err();
        assert!(matches!(err, Error::SessionExpired));
    }

    #[tokio::test]
    async fn test_login_failure_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "message": "Incorrect password. Please try again."
            })))
            .mount(&server)
            .await;

        let client = DealVistaClient::new(server.uri());
        let request = LoginRequest {
            email: "asha@example.com".into(),
            password: "wrong".into(),
        };
        let err = client.login(&request).await.unwrap_err();
        assert!(matches!(err, Error::AuthenticationError(_)));
    }
}
