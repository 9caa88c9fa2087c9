// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `ResumeRefresh` Fetch
//!
//! Transport, step orchestration and run control for `ResumeRefresh`.
//!
//! ## Host APIs
//!
//! The [`host`] module wraps the outside world:
//!
//! - [`host::http`] - Request/response model and the [`HttpGateway`] trait
//! - [`host::client`] - reqwest gateway (no redirects, single cookie header)
//! - [`host::files`] - Reading the resume from disk
//!
//! ## Pipelines
//!
//! - [`memo::Memoized`] - A step result computed at most once
//! - [`extract::TokenPattern`] - Fixed-pattern token extraction
//! - [`graph::StepGraph`] - Declared step dependencies, run layer by layer
//! - [`refresher::ResumeRefresher`] - One provider's workflow
//! - [`orchestrator::Orchestrator`] - Runs every refresher in priority order
//!
//! ## Example
//!
//! ```ignore
//! use resumerefresh_fetch::{Orchestrator, RefreshContext};
//!
//! let ctx = RefreshContext::builder(resume).build()?;
//! let orchestrator = Orchestrator::new(refreshers);
//!
//! match orchestrator.run(&ctx).await {
//!     Ok(report) => println!("{}", report.summary()),
//!     Err(err) => eprintln!("{err}"),
//! }
//! ```

pub mod context;
pub mod error;
pub mod extract;
pub mod graph;
pub mod host;
pub mod memo;
pub mod orchestrator;
pub mod refresher;
pub mod retry;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Errors
pub use error::{RunError, transport_error};

// Host APIs
pub use host::{
    FileSource, HttpGateway, HttpRequest, HttpResponse, LocalFiles, Method, MultipartPart,
    RequestBody, ReqwestGateway,
};

// Pipelines
pub use context::{RefreshContext, RefreshContextBuilder};
pub use extract::{TokenPattern, extract};
pub use graph::{GraphError, Step, StepDef, StepGraph};
pub use memo::Memoized;
pub use orchestrator::{NO_PROVIDERS_ENABLED, Orchestrator};
pub use refresher::{RefresherInfo, ResumeRefresher};
pub use retry::{RetryStrategy, SendFailure};
