//! Naukri provider.
//!
//! Bearer-token login, delete of the current resume, upload to the file
//! validation service, then an "advertise" call that attaches the new file.

pub mod api;
mod descriptor;
pub mod pipeline;

pub use api::{NaukriClient, generate_file_key};
pub use descriptor::naukri_descriptor;
pub use pipeline::NaukriRefresher;
