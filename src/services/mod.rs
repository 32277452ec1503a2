pub mod comments;
pub mod error;
pub mod gate;
pub mod products;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;

use serde::Serialize;
use uuid::Uuid;

pub use comments::{CommentInput, CommentService};
pub use error::{WorkflowError, WorkflowResult};
pub use gate::{OwnedResource, ResourceKind};
pub use products::{ProductInput, ProductService};
pub use users::{UserInput, UserService};

/// Confirmation returned by a successful delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deleted {
    pub kind: ResourceKind,
    pub id: Uuid,
    pub message: String,
}

impl Deleted {
    pub fn new(kind: ResourceKind, id: Uuid) -> Self {
        Self {
            kind,
            id,
            message: format!("{kind} deleted"),
        }
    }
}
