//! # dailies-core
//!
//! Domain model shared by every dailies crate.
//!
//! - [`ids`]: numeric identifiers for users, projects, tasks and comments
//! - [`model`]: the records the tracker server returns (users, projects,
//!   tasks, versions, comments, reference sets)
//! - [`search`]: flat search hits, grouped results and navigation targets
//!
//! All types deserialize from the server's camelCase JSON.

#![deny(unsafe_code)]

pub mod ids;
pub mod model;
pub mod search;

pub use ids::{CommentId, ProjectId, TaskId, UserId};
pub use model::{Comment, Project, ReferenceSet, Role, Task, User, Version};
pub use search::{SearchHit, SearchId, SearchItem, SearchResultGroup, SearchTarget};
