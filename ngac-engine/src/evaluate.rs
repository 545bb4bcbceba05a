//! The evaluation orchestrator.

use crate::config::EngineConfig;
use crate::decision::{collect_obligations, Decision};
use crate::error::{EvalError, EvalResult};
use crate::intersect::find_intersections;
use crate::path::{combine, direct_path_admissible, find_path};
use crate::prohibitions::firing_prohibitions;
use crate::subgraph::{build_subgraph, Subgraph};
use ngac_core::{Entity, PolicyStore, Prohibition};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// An evaluation request with resolved seed entities.
///
/// This is the engine boundary: callers that only hold opaque ids go
/// through [`PolicyEngine::authorize`](crate::PolicyEngine::authorize),
/// which resolves them first.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub subject: Entity,
    pub resource: Entity,
    /// Requested action verbs; empty means "any"
    pub actions: Vec<String>,
    pub policy_class: String,
    /// Caller-supplied context, carried for logging and future conditions
    pub context: HashMap<String, String>,
    pub request_id: Option<String>,
}

/// Per-request state: both subgraphs, the action list, and the prohibition
/// set pre-fetched for the policy class. Dropped when the decision returns.
struct EvaluationContext {
    policy_class: String,
    target_actions: Vec<String>,
    subject_graph: Subgraph,
    resource_graph: Subgraph,
    prohibitions: Vec<Prohibition>,
}

/// The policy decision engine.
///
/// Holds a shared store handle and configuration; each call to
/// [`evaluate`](Self::evaluate) owns its whole working state, so one engine
/// serves any number of concurrent evaluations.
#[derive(Debug, Clone)]
pub struct PolicyEngine {
    store: Arc<dyn PolicyStore>,
    config: EngineConfig,
}

impl PolicyEngine {
    /// Create an engine with default configuration.
    pub fn new(store: Arc<dyn PolicyStore>) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Create an engine with explicit configuration.
    pub fn with_config(store: Arc<dyn PolicyStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// The backing store handle.
    pub fn store(&self) -> &Arc<dyn PolicyStore> {
        &self.store
    }

    /// Evaluate one access request into a [`Decision`].
    ///
    /// Ordering is fixed: both subgraphs are built as parallel tasks and
    /// joined; prohibitions for the policy class are fetched once; then
    /// intersection, path construction, the prohibition overlay, and
    /// obligation aggregation run sequentially. Any fatal failure aborts
    /// the evaluation — there are no partial decisions.
    pub async fn evaluate(
        &self,
        req: &EvaluationRequest,
        cancel: &CancellationToken,
    ) -> EvalResult<Decision> {
        let started = Instant::now();
        debug!(
            subject = %req.subject.hash_id,
            resource = %req.resource.hash_id,
            actions = ?req.actions,
            class = %req.policy_class,
            request_id = req.request_id.as_deref().unwrap_or(""),
            "Starting access evaluation"
        );

        let subject_task = tokio::spawn(build_subgraph(
            Arc::clone(&self.store),
            req.subject.hash_id.clone(),
            "subject",
            req.policy_class.clone(),
            self.config.max_depth,
            cancel.clone(),
        ));
        let resource_task = tokio::spawn(build_subgraph(
            Arc::clone(&self.store),
            req.resource.hash_id.clone(),
            "resource",
            req.policy_class.clone(),
            self.config.max_depth,
            cancel.clone(),
        ));

        let (subject_built, resource_built) = tokio::try_join!(subject_task, resource_task)
            .map_err(|err| {
                EvalError::Store(ngac_core::Error::other(format!("subgraph task failed: {err}")))
            })?;
        let subject_graph = subject_built?;
        let resource_graph = resource_built?;

        debug!(
            subject_nodes = subject_graph.node_count(),
            resource_nodes = resource_graph.node_count(),
            "Built subgraphs"
        );

        // Everything after the join is sequential; one race against the
        // token aborts whichever store call is in flight.
        let decision = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(EvalError::Cancelled),
            result = self.decide(req, subject_graph, resource_graph) => result?,
        };

        debug!(
            permit = decision.permit,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Completed access evaluation"
        );
        Ok(decision)
    }

    async fn decide(
        &self,
        req: &EvaluationRequest,
        subject_graph: Subgraph,
        resource_graph: Subgraph,
    ) -> EvalResult<Decision> {
        let store = self.store.as_ref();
        let prohibitions = store
            .fetch_prohibitions_for_class(&req.policy_class)
            .await?;

        let mut ctx = EvaluationContext {
            policy_class: req.policy_class.clone(),
            target_actions: req.actions.clone(),
            subject_graph,
            resource_graph,
            prohibitions,
        };
        let subject_id = req.subject.hash_id.as_str();
        let resource_id = req.resource.hash_id.as_str();

        let candidates = find_intersections(
            &mut ctx.subject_graph,
            &ctx.resource_graph,
            store,
            &ctx.policy_class,
        )
        .await?;

        let mut paths = Vec::new();
        for candidate in candidates {
            if !candidate.association.covers_actions(&ctx.target_actions) {
                continue;
            }
            let subject_to_source = find_path(
                &mut ctx.subject_graph,
                store,
                &ctx.policy_class,
                subject_id,
                &candidate.association.relationship.from_id,
            )
            .await?;
            let resource_to_meeting = find_path(
                &mut ctx.resource_graph,
                store,
                &ctx.policy_class,
                resource_id,
                &candidate.meeting_node,
            )
            .await?;

            if let (Some(seg1), Some(seg3)) = (subject_to_source, resource_to_meeting) {
                let complete = combine(&seg1, &candidate.association, &seg3);
                debug!(
                    meeting = %candidate.meeting_node,
                    nodes = complete.nodes.len(),
                    "Valid path found through intersection"
                );
                paths.push(complete);
            }
        }

        if paths.is_empty() && ctx.subject_graph.contains(resource_id) {
            if let Some(direct) = find_path(
                &mut ctx.subject_graph,
                store,
                &ctx.policy_class,
                subject_id,
                resource_id,
            )
            .await?
            {
                if direct_path_admissible(
                    &direct,
                    &mut ctx.subject_graph,
                    store,
                    &ctx.policy_class,
                    &ctx.target_actions,
                    self.config.allow_pure_assignment_fallback,
                )
                .await?
                {
                    debug!("Direct path found from subject to resource");
                    paths.push(direct);
                }
            }
        }

        debug!(privilege_paths = paths.len(), "Found privilege paths");
        if paths.is_empty() {
            return Ok(Decision::no_path());
        }

        let firing = firing_prohibitions(
            &ctx.prohibitions,
            &ctx.target_actions,
            subject_id,
            resource_id,
            &paths,
        );
        debug!(prohibitions = firing.len(), "Checked prohibitions");
        if !firing.is_empty() {
            return Ok(Decision::prohibited(firing));
        }

        let (obligations, conditions) = collect_obligations(
            &paths,
            &mut ctx.subject_graph,
            &ctx.resource_graph,
            store,
            &ctx.policy_class,
        )
        .await?;

        let policy_path = paths[0].nodes.clone();
        Ok(Decision::granted(
            paths.len(),
            policy_path,
            obligations,
            conditions,
        ))
    }
}
