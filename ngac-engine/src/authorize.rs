//! Id-level authorization façade.
//!
//! Callers at the service boundary hold opaque entity ids, not resolved
//! entities. [`PolicyEngine::authorize`] resolves the seeds through the
//! store, picks the policy class from the request and its context, runs the
//! evaluation, and shapes the boundary response.

use crate::decision::Decision;
use crate::error::{EvalError, EvalResult};
use crate::evaluate::{EvaluationRequest, PolicyEngine};
use ngac_core::Entity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

/// Default policy class when neither the request nor its context names one.
pub const DEFAULT_POLICY_CLASS: &str = "default";

/// Context key that routes an evaluation to a tenant's policy class.
const TENANT_KEY: &str = "tenant";

/// An authorization request over opaque entity ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationRequest {
    /// Subject entity id
    pub subject: String,
    /// Resource entity id
    pub resource: String,
    /// Requested action verbs; empty means "any"
    #[serde(default)]
    pub actions: Vec<String>,
    /// Explicit policy class; wins over context routing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_class: Option<String>,
    /// Free-form request context; only `tenant` is recognised
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl AuthorizationRequest {
    /// Build a request for a single action with no extra context.
    pub fn single(subject: impl Into<String>, action: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            resource: resource.into(),
            actions: vec![action.into()],
            policy_class: None,
            context: HashMap::new(),
            session_id: None,
            request_id: None,
        }
    }

    /// The policy class this request evaluates under: the explicit field,
    /// else the `tenant` context value, else [`DEFAULT_POLICY_CLASS`].
    pub fn resolve_policy_class(&self) -> String {
        if let Some(class) = self.policy_class.as_deref() {
            if !class.is_empty() {
                return class.to_string();
            }
        }
        if let Some(tenant) = self.context.get(TENANT_KEY) {
            if !tenant.is_empty() {
                return tenant.clone();
            }
        }
        DEFAULT_POLICY_CLASS.to_string()
    }
}

/// The boundary response shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationResponse {
    pub allowed: bool,
    pub reason: String,
    /// Hash id of the last entity on the chosen policy path, or empty
    #[serde(default)]
    pub policy_id: String,
    pub decision_time_ms: i64,
}

impl PolicyEngine {
    /// Resolve seeds, evaluate, and shape the boundary response.
    ///
    /// Unknown subject or resource ids surface as
    /// [`EvalError::SeedNotFound`]; the full [`Decision`] is available via
    /// [`authorize_decision`](Self::authorize_decision) when the caller
    /// needs obligations or the fired prohibitions.
    pub async fn authorize(
        &self,
        req: &AuthorizationRequest,
        cancel: &CancellationToken,
    ) -> EvalResult<AuthorizationResponse> {
        let (decision, elapsed_ms) = self.authorize_decision(req, cancel).await?;
        Ok(AuthorizationResponse {
            allowed: decision.permit,
            policy_id: decision.policy_id().unwrap_or("").to_string(),
            reason: decision.reason,
            decision_time_ms: elapsed_ms,
        })
    }

    /// Like [`authorize`](Self::authorize) but returning the full decision
    /// and the elapsed time in milliseconds.
    pub async fn authorize_decision(
        &self,
        req: &AuthorizationRequest,
        cancel: &CancellationToken,
    ) -> EvalResult<(Decision, i64)> {
        if req.subject.is_empty() || req.resource.is_empty() {
            return Err(EvalError::InvalidRequest(
                "subject and resource are required".to_string(),
            ));
        }

        let started = Instant::now();
        let policy_class = req.resolve_policy_class();
        let request_id = req
            .request_id
            .clone()
            .unwrap_or_else(|| format!("req_{}", Uuid::new_v4().simple()));

        debug!(
            subject = %req.subject,
            resource = %req.resource,
            class = %policy_class,
            request_id = %request_id,
            "Processing authorization request"
        );

        let subject = self.fetch_seed(&req.subject).await?;
        let resource = self.fetch_seed(&req.resource).await?;

        let evaluation = EvaluationRequest {
            subject,
            resource,
            actions: req.actions.clone(),
            policy_class,
            context: req.context.clone(),
            request_id: Some(request_id),
        };
        let decision = self.evaluate(&evaluation, cancel).await?;
        Ok((decision, started.elapsed().as_millis() as i64))
    }

    async fn fetch_seed(&self, id: &str) -> EvalResult<Entity> {
        self.store()
            .fetch_entity(id)
            .await
            .map_err(|err| EvalError::for_seed(id, err))
    }
}
