//! Redemption flow - confirm-gated reveal of a coupon's secret code
//!
//! Sans-IO state machine for the coupon currently open in the detail view.
//! Revealing a code costs points, so the reveal sits behind an explicit
//! confirm step; the machine only ever emits the paid network call from
//! that step, exactly once per confirmation.

use tracing::debug;

/// Reveal state for the currently selected coupon
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealState {
    /// Code masked; nothing pending
    Hidden,
    /// User asked to reveal; waiting for explicit confirmation
    PendingConfirm,
    /// Paid reveal request in flight; repeat confirmations are ignored
    Revealing,
    /// Code received for this viewing. `visible` toggles the masked
    /// presentation without touching the network or the balance.
    Revealed { code: String, visible: bool },
    /// Reveal failed; `request_reveal` starts a fresh attempt
    Failed { reason: String },
}

/// Network call emitted by a successful confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealRequest {
    pub coupon_id: String,
}

/// Per-coupon reveal flow
///
/// Selecting a different coupon (or closing the view) resets the machine
/// and drops any cached code, so a later reopen must pass through a fresh
/// confirm-and-pay cycle.
#[derive(Debug, Default)]
pub struct RedemptionFlow {
    coupon_id: Option<String>,
    state: RevealState,
}

impl Default for RevealState {
    fn default() -> Self {
        RevealState::Hidden
    }
}

impl RedemptionFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RevealState {
        &self.state
    }

    pub fn coupon_id(&self) -> Option<&str> {
        self.coupon_id.as_deref()
    }

    /// The code, only while revealed and unmasked
    pub fn visible_code(&self) -> Option<&str> {
        match &self.state {
            RevealState::Revealed { code, visible: true } => Some(code),
            _ => None,
        }
    }

    /// Point the flow at a coupon; switching targets resets to Hidden
    pub fn select(&mut self, coupon_id: &str) {
        if self.coupon_id.as_deref() != Some(coupon_id) {
            debug!("Reveal flow now targeting {}", coupon_id);
            self.coupon_id = Some(coupon_id.to_string());
            self.state = RevealState::Hidden;
        }
    }

    /// Close the detail view: drop the target and any cached code
    pub fn reset(&mut self) {
        self.coupon_id = None;
        self.state = RevealState::Hidden;
    }

    /// User pressed the reveal/hide control
    ///
    /// From Hidden or Failed this opens the confirm step; on an already
    /// revealed code it only toggles visibility.
    pub fn request_reveal(&mut self) {
        if self.coupon_id.is_none() {
            return;
        }
        match &mut self.state {
            RevealState::Hidden | RevealState::Failed { .. } => {
                self.state = RevealState::PendingConfirm;
            }
            RevealState::Revealed { visible, .. } => {
                *visible = !*visible;
            }
            RevealState::PendingConfirm | RevealState::Revealing => {}
        }
    }

    /// User dismissed the confirm step; no network call, no side effect
    pub fn cancel(&mut self) {
        if self.state == RevealState::PendingConfirm {
            self.state = RevealState::Hidden;
        }
    }

    /// User confirmed the paid reveal
    ///
    /// Emits the network call exactly once; while Revealing, further
    /// confirmations return None (reentrancy guard).
    pub fn confirm(&mut self) -> Option<RevealRequest> {
        let coupon_id = self.coupon_id.clone()?;
        if self.state != RevealState::PendingConfirm {
            return None;
        }
        self.state = RevealState::Revealing;
        Some(RevealRequest { coupon_id })
    }

    /// Apply a successful reveal response
    ///
    /// Ignored unless the flow is still Revealing the same coupon; a late
    /// response for a deselected coupon is discarded.
    pub fn resolve_success(&mut self, coupon_id: &str, code: String) {
        if self.coupon_id.as_deref() == Some(coupon_id) && self.state == RevealState::Revealing {
            self.state = RevealState::Revealed {
                code,
                visible: true,
            };
        }
    }

    /// Apply a failed reveal response
    pub fn resolve_failure(&mut self, coupon_id: &str, reason: String) {
        if self.coupon_id.as_deref() == Some(coupon_id) && self.state == RevealState::Revealing {
            debug!("Reveal failed for {}: {}", coupon_id, reason);
            self.state = RevealState::Failed { reason };
        }
    }
}
