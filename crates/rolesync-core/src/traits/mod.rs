//! Ports to the two remote systems the engine reconciles

mod clients;

pub use clients::{ChatPlatform, MembershipDatabase, RepoResult};
