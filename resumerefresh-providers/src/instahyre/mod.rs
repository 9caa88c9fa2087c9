//! Instahyre provider.
//!
//! Session-cookie login, then an in-place `PUT` of the existing resume
//! record with the file inlined as base64.

pub mod api;
mod descriptor;
pub mod pipeline;

pub use api::{InstahyreClient, InstahyreSession};
pub use descriptor::instahyre_descriptor;
pub use pipeline::InstahyreRefresher;
