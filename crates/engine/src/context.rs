//! Application context - explicit state owner passed to every handler
//!
//! Owns the HTTP client, the cookie-backed session store, and the browse
//! and redemption state machines, and wires them together: the session
//! authorizes calls, a confirmed reveal updates the session balance, and
//! browsing only reads. No ambient globals; the embedding front end holds
//! exactly one of these and re-renders after each mutating call.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use dealvista_core::{
    CatalogQuery, CouponDetail, Error, ListedCoupon, LogEntry, NewCoupon, RedeemedCoupon, Result,
    Session, SortBy, UserProfile, UserStats,
};
use dealvista_networking::{api, DealVistaClient};
use dealvista_persistence::cache::CouponCache;
use dealvista_persistence::SessionStore;

use crate::config::AppConfig;
use crate::flows::{BrowseController, RedemptionFlow};

/// Everything a front end needs, owned in one place
pub struct AppContext {
    client: DealVistaClient,
    session: SessionStore,
    browse: BrowseController,
    redemption: RedemptionFlow,
}

impl AppContext {
    /// Build a context from configuration (file-backed session cookie)
    pub fn new(config: &AppConfig) -> Self {
        let client =
            DealVistaClient::new_with_cache(config.api_url.clone(), Arc::new(CouponCache::default()));
        let session = SessionStore::on_disk(
            &config.cookie_path,
            config.session_ttl(),
            client.is_secure_transport(),
        );
        Self::with_parts(client, session, config.page_size)
    }

    /// Build a context from explicit parts (tests use an in-memory store)
    pub fn with_parts(client: DealVistaClient, session: SessionStore, page_size: u32) -> Self {
        Self {
            client,
            session,
            browse: BrowseController::new(page_size),
            redemption: RedemptionFlow::new(),
        }
    }

    // ─── Session lifecycle ───────────────────────────────────────────

    /// Restore a persisted session at startup, if one is still valid
    pub fn init(&mut self) -> Result<Option<Session>> {
        let restored = self.session.restore()?;
        match &restored {
            Some(session) => {
                debug!("Restored session for {}", session.email);
                self.client.set_token(Some(session.token.clone()));
            }
            None => self.client.set_token(None),
        }
        Ok(restored)
    }

    /// Log in and persist the fresh session
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&Session> {
        let auth = api::login(&self.client, email, password).await?;
        let session = Session::from_auth(auth, Utc::now())?;
        self.client.set_token(Some(session.token.clone()));
        let session = self.session.persist(session)?;
        info!("Logged in as {}", session.email);
        Ok(session)
    }

    /// Create an account and persist the resulting session
    pub async fn signup(&mut self, full_name: &str, email: &str, password: &str) -> Result<&Session> {
        let auth = api::signup(&self.client, full_name, email, password).await?;
        let session = Session::from_auth(auth, Utc::now())?;
        self.client.set_token(Some(session.token.clone()));
        Ok(self.session.persist(session)?)
    }

    /// Drop the session; always succeeds, no network call involved
    pub fn logout(&mut self) {
        self.session.logout();
        self.client.set_token(None);
        self.redemption.reset();
        info!("Logged out");
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.session()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    // ─── Catalog browsing ────────────────────────────────────────────

    pub fn browse(&self) -> &BrowseController {
        &self.browse
    }

    /// Presentation-only toggles; no refetch
    pub fn set_verified_only(&mut self, verified_only: bool) {
        self.browse.set_verified_only(verified_only);
    }

    pub fn set_sort(&mut self, sort_by: SortBy) {
        self.browse.set_sort(sort_by);
    }

    /// Run a fresh search from page zero
    pub async fn search(&mut self, query: CatalogQuery) -> Result<()> {
        let (ticket, query) = self.browse.begin_search(query);
        match self.client.browse_coupons(&query).await {
            Ok(page) => {
                self.browse.apply_response(ticket, page);
                Ok(())
            }
            Err(e) => {
                self.browse.apply_failure(ticket);
                Err(e)
            }
        }
    }

    /// Navigate within the current result set; out-of-range is a no-op
    pub async fn go_to_page(&mut self, page: i64) -> Result<()> {
        let Some((ticket, query)) = self.browse.begin_page(page) else {
            return Ok(());
        };
        match self.client.browse_coupons(&query).await {
            Ok(page) => {
                self.browse.apply_response(ticket, page);
                Ok(())
            }
            Err(e) => {
                self.browse.apply_failure(ticket);
                Err(e)
            }
        }
    }

    // ─── Coupon detail and redemption ────────────────────────────────

    pub fn redemption(&self) -> &RedemptionFlow {
        &self.redemption
    }

    /// Open a coupon's detail view and point the reveal flow at it
    ///
    /// Requires a session, matching the original client which gated the
    /// detail view behind login.
    pub async fn open_coupon(&mut self, coupon_id: &str) -> Result<CouponDetail> {
        if !self.is_authenticated() {
            return Err(Error::AuthenticationError(
                "Please log in to view coupon details".to_string(),
            ));
        }
        let detail = self.client.get_coupon(coupon_id).await?;
        self.redemption.select(coupon_id);
        Ok(detail)
    }

    /// Close the detail view, dropping any revealed code
    pub fn close_coupon(&mut self) {
        self.redemption.reset();
    }

    /// User pressed reveal/hide on the open coupon
    pub fn request_reveal(&mut self) {
        self.redemption.request_reveal();
    }

    /// User backed out of the confirm step
    pub fn cancel_reveal(&mut self) {
        self.redemption.cancel();
    }

    /// User confirmed the paid reveal
    ///
    /// Drives the network call emitted by the state machine, feeds the
    /// result back, and syncs the session balance to the server-reported
    /// value. Returns the revealed code on success.
    pub async fn confirm_reveal(&mut self) -> Result<String> {
        let Some(request) = self.redemption.confirm() else {
            return Err(Error::ValidationError(
                "Nothing awaiting confirmation".to_string(),
            ));
        };
        let coupon_id = request.coupon_id;

        let outcome = self.perform_reveal(&coupon_id).await;
        match outcome {
            Ok(code) => {
                self.redemption.resolve_success(&coupon_id, code.clone());
                Ok(code)
            }
            Err(e) => {
                self.redemption.resolve_failure(&coupon_id, e.to_string());
                Err(e)
            }
        }
    }

    async fn perform_reveal(&mut self, coupon_id: &str) -> Result<String> {
        let reveal = self.client.view_code(coupon_id).await?;

        // The balance is whatever the server says it is now. Some deployments
        // return it inline; otherwise ask the stats endpoint.
        let new_balance = match reveal.points {
            Some(points) => points,
            None => self.client.get_stats().await?.current_points,
        };
        self.session.apply_points_delta(new_balance)?;

        match reveal.code {
            Some(code) => Ok(code),
            None => {
                // Older deployments only confirm the deduction; the code is
                // then served on the (now authorized) detail endpoint.
                warn!("Reveal response carried no code; fetching detail for {}", coupon_id);
                self.client
                    .get_coupon(coupon_id)
                    .await?
                    .code
                    .ok_or_else(|| {
                        Error::InvalidData("reveal succeeded but no code was returned".to_string())
                    })
            }
        }
    }

    // ─── Profile, listings, activity ─────────────────────────────────

    pub async fn profile(&self) -> Result<UserProfile> {
        api::fetch_profile(&self.client).await
    }

    pub async fn stats(&self) -> Result<UserStats> {
        api::fetch_stats(&self.client).await
    }

    pub async fn coupons_added(&self) -> Result<Vec<ListedCoupon>> {
        api::fetch_coupons_added(&self.client).await
    }

    pub async fn coupons_redeemed(&self) -> Result<Vec<RedeemedCoupon>> {
        api::fetch_coupons_redeemed(&self.client).await
    }

    pub async fn logs(&self) -> Result<Vec<LogEntry>> {
        api::fetch_logs(&self.client).await
    }

    /// List a new coupon (validated locally first)
    pub async fn list_coupon(&self, coupon: &NewCoupon) -> Result<CouponDetail> {
        api::create_coupon(&self.client, coupon).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::RevealState;
    use dealvista_core::Points;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn logged_in_context(server: &MockServer, points: i64) -> AppContext {
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "u1",
                "fullName": "Asha Rao",
                "email": "asha@example.com",
                "role": "USER",
                "points": points,
                "token": "jwt"
            })))
            .mount(server)
            .await;

        let client = DealVistaClient::new(server.uri());
        let store = SessionStore::in_memory(chrono::Duration::seconds(3600));
        let mut ctx = AppContext::with_parts(client, store, 10);
        ctx.login("asha@example.com", "secret").await.unwrap();
        ctx
    }

    async fn mount_coupon_detail(server: &MockServer, id: &str, redeem_cost: u32) {
        Mock::given(method("GET"))
            .and(path(format!("/coupons/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": id,
                "title": "Flat 100 off",
                "platform": "Amazon",
                "category": "Shopping",
                "redeemCost": redeem_cost
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_confirmed_reveal_updates_balance() {
        let server = MockServer::start().await;
        let mut ctx = logged_in_context(&server, 10).await;
        mount_coupon_detail(&server, "c1", 5).await;

        Mock::given(method("POST"))
            .and(path("/coupons/c1/view-code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "code": "FLAT100",
                "points": 5,
                "message": "5 points deducted successfully"
            })))
            .mount(&server)
            .await;

        ctx.open_coupon("c1").await.unwrap();
        ctx.request_reveal();
        let code = ctx.confirm_reveal().await.unwrap();

        assert_eq!(code, "FLAT100");
        assert_eq!(ctx.session().unwrap().points_balance, Points(5));
        assert!(matches!(
            ctx.redemption().state(),
            RevealState::Revealed { .. }
        ));
    }

    #[tokio::test]
    async fn test_insufficient_points_leaves_balance_unchanged() {
        let server = MockServer::start().await;
        let mut ctx = logged_in_context(&server, 3).await;
        mount_coupon_detail(&server, "c1", 5).await;

        Mock::given(method("POST"))
            .and(path("/coupons/c1/view-code"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "message": "Not enough points. You need 5 points but have 3."
            })))
            .mount(&server)
            .await;

        ctx.open_coupon("c1").await.unwrap();
        ctx.request_reveal();
        let err = ctx.confirm_reveal().await.unwrap_err();

        assert!(matches!(err, Error::InsufficientPoints(_)));
        assert_eq!(ctx.session().unwrap().points_balance, Points(3));
        assert!(matches!(ctx.redemption().state(), RevealState::Failed { .. }));
    }

    #[tokio::test]
    async fn test_reveal_without_inline_balance_uses_stats_endpoint() {
        let server = MockServer::start().await;
        let mut ctx = logged_in_context(&server, 10).await;
        mount_coupon_detail(&server, "c1", 5).await;

        Mock::given(method("POST"))
            .and(path("/coupons/c1/view-code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "code": "FLAT100",
                "message": "5 points deducted successfully"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/me/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "couponsAdded": 2,
                "couponsRedeemed": 1,
                "currentPoints": 5,
                "totalPointsEarned": 20,
                "totalPointsSpent": 15
            })))
            .mount(&server)
            .await;

        ctx.open_coupon("c1").await.unwrap();
        ctx.request_reveal();
        ctx.confirm_reveal().await.unwrap();

        assert_eq!(ctx.session().unwrap().points_balance, Points(5));
    }

    #[tokio::test]
    async fn test_open_coupon_requires_session() {
        let server = MockServer::start().await;
        let client = DealVistaClient::new(server.uri());
        let store = SessionStore::in_memory(chrono::Duration::seconds(3600));
        let mut ctx = AppContext::with_parts(client, store, 10);

        let err = ctx.open_coupon("c1").await.unwrap_err();
        assert!(err.requires_login());
    }

    #[tokio::test]
    async fn test_logout_resets_reveal_flow() {
        let server = MockServer::start().await;
        let mut ctx = logged_in_context(&server, 10).await;
        mount_coupon_detail(&server, "c1", 5).await;

        ctx.open_coupon("c1").await.unwrap();
        ctx.request_reveal();
        ctx.logout();

        assert!(!ctx.is_authenticated());
        assert_eq!(*ctx.redemption().state(), RevealState::Hidden);
    }
}
