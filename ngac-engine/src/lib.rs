//! Authorization decision engine for the NGAC policy machine
//!
//! Given an access request (subject, resource, actions, policy class), the
//! engine walks the policy graph through a [`PolicyStore`](ngac_core::PolicyStore)
//! and returns a permit/deny [`Decision`] with a justification trail,
//! aggregated obligations, and the prohibitions that fired.
//!
//! # Evaluation pipeline
//!
//! 1. **Subgraph expansion**: two bounded BFS walks — one from the subject,
//!    one from the resource — run as parallel tasks ([`Subgraph`]).
//! 2. **Intersection**: subject-side association edges whose targets land
//!    inside the resource subgraph become candidate meeting points.
//! 3. **Path construction**: each candidate is stitched into a
//!    three-segment [`PrivilegePath`] (subject → grant source, the grant
//!    edge, resource → meeting point), gated on the grant covering the
//!    requested actions.
//! 4. **Prohibition overlay**: prohibitions for the policy class are tested
//!    against the request endpoints and every path node; all that fire are
//!    reported.
//! 5. **Decision assembly**: obligations are deduplicated in first-seen
//!    order and the [`Decision`] is emitted.
//!
//! # Failure semantics
//!
//! Missing seed entities fail the evaluation ([`EvalError::SeedNotFound`]);
//! missing intermediate nodes are logged and skipped; store I/O failures
//! are always fatal — the engine never downgrades them to a deny. A fired
//! [`CancellationToken`] aborts in-flight store calls and surfaces
//! [`EvalError::Cancelled`] without emitting a decision.

mod authorize;
mod config;
mod decision;
mod error;
mod evaluate;
mod intersect;
mod path;
mod prohibitions;
mod subgraph;

pub use authorize::{AuthorizationRequest, AuthorizationResponse};
pub use config::EngineConfig;
pub use decision::Decision;
pub use error::{EvalError, EvalResult};
pub use evaluate::{EvaluationRequest, PolicyEngine};
pub use path::PrivilegePath;
pub use subgraph::Subgraph;

pub use tokio_util::sync::CancellationToken;
