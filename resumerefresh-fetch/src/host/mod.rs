//! Host APIs used by refresh pipelines.
//!
//! - [`http`] - Request/response model and the [`HttpGateway`] trait
//! - [`client`] - reqwest implementation of the gateway
//! - [`files`] - Reading the resume from disk

pub mod client;
pub mod files;
pub mod http;

pub use client::ReqwestGateway;
pub use files::{FileSource, LocalFiles};
pub use http::{HttpGateway, HttpRequest, HttpResponse, Method, MultipartPart, RequestBody};
