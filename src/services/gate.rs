//! Owner-gated access to products and comments.
//!
//! Every mutation of an owned record goes through [`gated_mutation`]:
//!
//! 1. authenticate: no caller means `Unauthenticated` and nothing else runs
//! 2. locate: the record is fetched by id, absent means `NotFound`
//! 3. authorize: the record's owner must equal the caller, else `Forbidden`
//!
//! Only then does the mutation run. Resource kinds plug in through
//! [`OwnedResource`] plus a fetch closure and a mutate closure.
use serde::Serialize;
use std::fmt;
use std::future::Future;
use uuid::Uuid;

use super::error::{WorkflowError, WorkflowResult};
use crate::auth::CallerId;
use crate::database::models::{Comment, Product};
use crate::database::StorageResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Product,
    Comment,
    User,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::Product => "product",
            ResourceKind::Comment => "comment",
            ResourceKind::User => "user",
        })
    }
}

/// A record with a single, immutable owner
pub trait OwnedResource {
    const KIND: ResourceKind;

    fn owner_id(&self) -> &str;
}

impl OwnedResource for Product {
    const KIND: ResourceKind = ResourceKind::Product;

    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

impl OwnedResource for Comment {
    const KIND: ResourceKind = ResourceKind::Comment;

    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

/// Step 1: the caller must be known
pub fn authenticate(caller: Option<&CallerId>) -> WorkflowResult<&CallerId> {
    caller.ok_or(WorkflowError::Unauthenticated)
}

/// Ids are UUIDs; anything else cannot name an existing record
pub fn parse_id(kind: ResourceKind, id: &str) -> WorkflowResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| WorkflowError::not_found(kind, id))
}

/// Step 2: fetch the record or fail with `NotFound`
pub async fn locate<R, Fetch, FetchFut>(id: &str, fetch: Fetch) -> WorkflowResult<R>
where
    R: OwnedResource,
    Fetch: FnOnce(Uuid) -> FetchFut,
    FetchFut: Future<Output = StorageResult<Option<R>>>,
{
    let key = parse_id(R::KIND, id)?;
    fetch(key)
        .await?
        .ok_or_else(|| WorkflowError::not_found(R::KIND, id))
}

/// Step 3: only the owner may proceed
pub fn authorize<R: OwnedResource>(resource: &R, id: &str, caller: &CallerId) -> WorkflowResult<()> {
    if resource.owner_id() == caller.as_str() {
        return Ok(());
    }

    tracing::warn!(
        "Denied {} {} to {}: owned by {}",
        R::KIND,
        id,
        caller,
        resource.owner_id()
    );
    Err(WorkflowError::Forbidden {
        kind: R::KIND,
        id: id.to_string(),
    })
}

/// Run `mutate` on the record named by `id` once the caller is proven to own it.
///
/// `mutate` may fail with a wider error than the gate's own, such as a request
/// body rejection that must not surface before the ownership check.
pub async fn gated_mutation<R, T, E, Fetch, FetchFut, Mutate, MutateFut>(
    caller: Option<&CallerId>,
    id: &str,
    fetch: Fetch,
    mutate: Mutate,
) -> Result<T, E>
where
    R: OwnedResource,
    E: From<WorkflowError>,
    Fetch: FnOnce(Uuid) -> FetchFut,
    FetchFut: Future<Output = StorageResult<Option<R>>>,
    Mutate: FnOnce(R) -> MutateFut,
    MutateFut: Future<Output = Result<T, E>>,
{
    let caller = authenticate(caller)?;
    let resource = locate(id, fetch).await?;
    authorize(&resource, id, caller)?;
    mutate(resource).await
}
