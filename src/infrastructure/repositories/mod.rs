//! Artifact Repositories
//!
//! Implementations of the `ArtifactRepository` port and the chain that
//! consults them in order.

mod chain;
mod local;
mod remote;

pub use chain::RepositoryChain;
pub use local::LocalMavenRepository;
pub use remote::{HttpMavenRepository, MAVEN_CENTRAL_URL};
