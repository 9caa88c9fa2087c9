//! Monster provider.

pub mod api;
mod descriptor;
pub mod pipeline;

pub use api::{LoginGrant, MonsterClient};
pub use descriptor::monster_descriptor;
pub use pipeline::MonsterRefresher;
