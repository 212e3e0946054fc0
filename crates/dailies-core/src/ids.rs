//! Numeric identifiers.
//!
//! The tracker keys every record by an integer. Each record kind gets its own
//! newtype so a task id can never be passed where a project id is expected.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw server id.
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// The raw server id.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

numeric_id!(
    /// Identifies a user account.
    UserId
);
numeric_id!(
    /// Identifies a project.
    ProjectId
);
numeric_id!(
    /// Identifies a task (one shot/stage unit of work inside a project).
    TaskId
);
numeric_id!(
    /// Identifies a comment on a task.
    CommentId
);
