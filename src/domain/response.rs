//! Response shapes — items, write outcomes, and the reconciled reply.
//!
//! Success bodies are trusted: outcome structs accept any object, keeping
//! unknown fields in `extra`, so a server adding fields never breaks decoding.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::operation::ResultKind;
use crate::error::{RemoteError, SdkError};

/// One inventory item. The item schema belongs to the API; it is carried as a
/// JSON object.
pub type Document = Map<String, Value>;

// ─── Items ───────────────────────────────────────────────────────────────────

/// A single item or a list of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Items {
    Many(Vec<Document>),
    One(Document),
}

impl Items {
    pub fn len(&self) -> usize {
        match self {
            Items::Many(items) => items.len(),
            Items::One(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn first(&self) -> Option<&Document> {
        match self {
            Items::Many(items) => items.first(),
            Items::One(item) => Some(item),
        }
    }

    pub fn into_vec(self) -> Vec<Document> {
        match self {
            Items::Many(items) => items,
            Items::One(item) => vec![item],
        }
    }
}

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// Result of `update`, `updateOne`, `updateMany`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub acknowledged: Option<bool>,
    pub matched_count: Option<u64>,
    pub modified_count: Option<u64>,
    pub upserted_count: Option<u64>,
    pub upserted_id: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of `delete`, `deleteOne`, `deleteMany`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub acknowledged: Option<bool>,
    pub deleted_count: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of `batchUpdate` and `bulkWrite`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BatchOutcome {
    pub acknowledged: Option<bool>,
    pub inserted_count: Option<u64>,
    pub matched_count: Option<u64>,
    pub modified_count: Option<u64>,
    pub deleted_count: Option<u64>,
    pub upserted_count: Option<u64>,
    pub inserted_ids: Option<Value>,
    pub upserted_ids: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ─── ApiResult ───────────────────────────────────────────────────────────────

/// Untyped result of any operation; the variant follows
/// [`Operation::result_kind`](crate::domain::operation::Operation::result_kind).
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult {
    Items(Items),
    Update(UpdateOutcome),
    Delete(DeleteOutcome),
    Batch(BatchOutcome),
    Error(RemoteError),
}

impl ApiResult {
    /// Decode a success body into the variant for `kind`.
    pub fn from_body(kind: ResultKind, body: Value) -> Result<Self, SdkError> {
        Ok(match kind {
            ResultKind::Items => ApiResult::Items(decode(body)?),
            ResultKind::Update => ApiResult::Update(decode(body)?),
            ResultKind::Delete => ApiResult::Delete(decode(body)?),
            ResultKind::Batch => ApiResult::Batch(decode(body)?),
        })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ApiResult::Error(_))
    }
}

// ─── Reply ───────────────────────────────────────────────────────────────────

/// Outcome of a call in silent mode: the decoded success value, or the
/// API-reported error returned as data.
///
/// With silent mode off, `Failed` is never produced; the error is raised as
/// [`SdkError::Remote`] instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    Success(T),
    Failed(RemoteError),
}

impl<T> Reply<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Reply::Success(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Reply::Success(value) => Some(value),
            Reply::Failed(_) => None,
        }
    }

    pub fn err(&self) -> Option<&RemoteError> {
        match self {
            Reply::Success(_) => None,
            Reply::Failed(e) => Some(e),
        }
    }

    /// Collapse to a `Result`, treating the API error as an error.
    pub fn into_result(self) -> Result<T, RemoteError> {
        match self {
            Reply::Success(value) => Ok(value),
            Reply::Failed(e) => Err(e),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        match self {
            Reply::Success(value) => Reply::Success(f(value)),
            Reply::Failed(e) => Reply::Failed(e),
        }
    }
}

impl Reply<Value> {
    /// Decode the success body into `T`. Failures pass through untouched.
    pub fn decode<T: DeserializeOwned>(self) -> Result<Reply<T>, SdkError> {
        match self {
            Reply::Success(body) => Ok(Reply::Success(decode(body)?)),
            Reply::Failed(e) => Ok(Reply::Failed(e)),
        }
    }
}

impl<T> From<Reply<T>> for Result<T, RemoteError> {
    fn from(reply: Reply<T>) -> Self {
        reply.into_result()
    }
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T, SdkError> {
    serde_json::from_value(body).map_err(|e| SdkError::Decode(e.to_string()))
}
