//! Domain guard
//!
//! Gate in front of every protected surface. The domain context is known up
//! front; the caller's role arrives asynchronously. Until it does the guard
//! is `Loading`, afterwards `Decided`. A failed role lookup counts as "no
//! role", so a broken user service can only deny, never grant.

use crate::dispatch::{dispatch, SurfaceIdentifier};
use crate::domain::{AccessDecision, CallerRole, DomainContext};
use crate::error::RoleProviderError;
use crate::policy::AccessValidator;
use crate::role_provider::{CallerCredentials, RoleProvider};
use serde::Serialize;
use tracing::{info, warn};

const DEFAULT_DENIAL_REASON: &str = "Você não tem permissão para acessar esta área.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    /// Role lookup still in flight
    Loading,
    Decided(AccessDecision),
}

/// What the surrounding application should do
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GuardOutcome {
    /// Show the loading view
    Loading,
    /// Mount the surface
    Render { surface: SurfaceIdentifier },
    /// Navigate to the caller's own surface
    Redirect { target: String, sign_out: bool },
    /// Show the denial view with a login affordance
    Denied {
        reason: String,
        message: String,
        login_url: String,
        sign_out: bool,
    },
}

/// Guard for a single mount of a protected surface
#[derive(Debug)]
pub struct DomainGuard<'a> {
    validator: &'a AccessValidator,
    context: DomainContext,
    login_url: String,
    has_session: bool,
    state: GuardState,
}

impl<'a> DomainGuard<'a> {
    pub fn new(
        validator: &'a AccessValidator,
        context: DomainContext,
        login_url: impl Into<String>,
    ) -> Self {
        Self {
            validator,
            context,
            login_url: login_url.into(),
            has_session: false,
            state: GuardState::Loading,
        }
    }

    /// Record whether the caller presented a session. A denied caller with a
    /// session is told to end it, so a wrong-role platform user keeps no live
    /// session on this surface.
    pub fn with_session(mut self, has_session: bool) -> Self {
        self.has_session = has_session;
        self
    }

    pub fn context(&self) -> &DomainContext {
        &self.context
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    /// Apply the result of the role lookup. Errors fail closed to "no role".
    pub fn role_resolved(
        &mut self,
        lookup: Result<Option<CallerRole>, RoleProviderError>,
    ) -> &GuardState {
        let role = match lookup {
            Ok(role) => role,
            Err(e) => {
                warn!(error = %e, host = %self.context.host(), "Role lookup failed, treating caller as anonymous");
                metrics::counter!("portal_gate_role_lookup_failures_total").increment(1);
                None
            }
        };
        self.decide(role)
    }

    /// Re-validate after the caller's role changed (e.g. after login).
    /// Never returns to `Loading`.
    pub fn role_changed(&mut self, role: Option<CallerRole>) -> &GuardState {
        self.decide(role)
    }

    fn decide(&mut self, role: Option<CallerRole>) -> &GuardState {
        let decision = self.validator.validate(&self.context, role);

        metrics::counter!(
            "portal_gate_access_decisions_total",
            "class" => self.context.class().to_string(),
            "outcome" => decision.outcome()
        )
        .increment(1);

        if !decision.allowed {
            info!(
                host = %self.context.host(),
                class = %self.context.class(),
                role = ?role,
                outcome = decision.outcome(),
                "Access denied"
            );
        }

        self.state = GuardState::Decided(decision);
        &self.state
    }

    /// What to show for the current state
    pub fn outcome(&self) -> GuardOutcome {
        match &self.state {
            GuardState::Loading => GuardOutcome::Loading,
            GuardState::Decided(decision) if decision.allowed => GuardOutcome::Render {
                surface: dispatch(&self.context),
            },
            GuardState::Decided(AccessDecision {
                redirect_target: Some(target),
                ..
            }) => GuardOutcome::Redirect {
                target: target.clone(),
                sign_out: self.has_session,
            },
            GuardState::Decided(decision) => GuardOutcome::Denied {
                reason: decision
                    .reason
                    .clone()
                    .unwrap_or_else(|| DEFAULT_DENIAL_REASON.to_string()),
                message: self.context.class().denial_message().to_string(),
                login_url: self.login_url.clone(),
                sign_out: self.has_session,
            },
        }
    }

    /// Perform the single role lookup for this mount and decide.
    ///
    /// The lookup is not retried. Dropping the returned future abandons it.
    /// Calling `run` on an already decided guard does not look up again.
    pub async fn run<P>(&mut self, provider: &P, credentials: &CallerCredentials) -> GuardOutcome
    where
        P: RoleProvider + ?Sized,
    {
        if self.state == GuardState::Loading {
            self.has_session = credentials.bearer_token.is_some();
            let lookup = provider.caller_role(credentials).await;
            self.role_resolved(lookup);
        }
        self.outcome()
    }
}
