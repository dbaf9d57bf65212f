use std::sync::Arc;

use uuid::Uuid;

use crate::auth::{
    AccessPolicy, AuthError, Decision, OwnedResource, OwnerOnly, PasswordHashing, TokenService,
};
use crate::config::AppConfig;
use crate::database::Store;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::{EligibilityPolicy, PlaceholderQuestions, QuestionProvider, UnlimitedAttempts};

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenService>,
    pub passwords: PasswordHashing,
    pub policy: Arc<dyn AccessPolicy>,
    pub eligibility: Arc<dyn EligibilityPolicy>,
    pub questions: Arc<dyn QuestionProvider>,
}

impl AppState {
    /// State with the stock policies: owner-only access, unlimited attempts
    /// and the placeholder question set.
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Result<Self, AuthError> {
        let tokens = TokenService::new(
            &config.security.jwt_secret,
            config.security.access_token_expire_minutes,
        )?;
        let passwords = PasswordHashing::new(
            config.security.password_memory_kib,
            config.security.password_iterations,
        )?;

        Ok(Self {
            config: Arc::new(config),
            store,
            tokens: Arc::new(tokens),
            passwords,
            policy: Arc::new(OwnerOnly),
            eligibility: Arc::new(UnlimitedAttempts),
            questions: Arc::new(PlaceholderQuestions),
        })
    }

    pub fn with_policy(mut self, policy: Arc<dyn AccessPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_eligibility(mut self, eligibility: Arc<dyn EligibilityPolicy>) -> Self {
        self.eligibility = eligibility;
        self
    }

    pub fn with_questions(mut self, questions: Arc<dyn QuestionProvider>) -> Self {
        self.questions = questions;
        self
    }

    /// Resolves a path `user_id` the caller is allowed to act on.
    ///
    /// Runs before any store access. An id that does not parse can never
    /// belong to the caller and is refused the same way.
    pub fn authorize_owner(
        &self,
        caller: &AuthUser,
        raw_user_id: &str,
        kind: &'static str,
    ) -> Result<Uuid, ApiError> {
        let denied = || {
            tracing::warn!(caller = %caller.user_id, requested = raw_user_id, kind, "Ownership check failed");
            ApiError::forbidden(format!("You can only access your own {}", kind))
        };

        let owner_id = Uuid::parse_str(raw_user_id).map_err(|_| denied())?;
        match self.policy.decide(caller, &OwnedResource { owner_id, kind }) {
            Decision::Allow => Ok(owner_id),
            Decision::Deny => Err(denied()),
        }
    }
}
