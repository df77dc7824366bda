//! Reference (non-core) diff-source adapters — not part of the engine
//! itself, only wired in so the `demos/` example and integration tests
//! have something to drive `analyze` with.

pub mod local_git;
pub mod traits;

pub use local_git::LocalGitSource;
pub use traits::DiffSource;
