//! Inventory domain — typed wrappers over the USF operations.

#[cfg(feature = "http")]
pub mod client;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─── BulkOperation ───────────────────────────────────────────────────────────

/// One entry of a `bulkWrite` request.
///
/// Serializes in the tagged form the API expects, e.g.
/// `{"updateOne": {"filter": {...}, "update": {...}}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BulkOperation {
    InsertOne {
        document: Value,
    },
    UpdateOne {
        filter: Value,
        update: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        upsert: Option<bool>,
    },
    UpdateMany {
        filter: Value,
        update: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        upsert: Option<bool>,
    },
    ReplaceOne {
        filter: Value,
        replacement: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        upsert: Option<bool>,
    },
    DeleteOne {
        filter: Value,
    },
    DeleteMany {
        filter: Value,
    },
}

impl BulkOperation {
    pub fn insert_one(document: Value) -> Self {
        Self::InsertOne { document }
    }

    pub fn update_one(filter: Value, update: Value) -> Self {
        Self::UpdateOne {
            filter,
            update,
            upsert: None,
        }
    }

    pub fn update_many(filter: Value, update: Value) -> Self {
        Self::UpdateMany {
            filter,
            update,
            upsert: None,
        }
    }

    pub fn replace_one(filter: Value, replacement: Value) -> Self {
        Self::ReplaceOne {
            filter,
            replacement,
            upsert: None,
        }
    }

    pub fn delete_one(filter: Value) -> Self {
        Self::DeleteOne { filter }
    }

    pub fn delete_many(filter: Value) -> Self {
        Self::DeleteMany { filter }
    }

    /// Set `upsert` on update/replace operations. No-op for the others.
    pub fn with_upsert(mut self, value: bool) -> Self {
        match &mut self {
            Self::UpdateOne { upsert, .. }
            | Self::UpdateMany { upsert, .. }
            | Self::ReplaceOne { upsert, .. } => *upsert = Some(value),
            Self::InsertOne { .. } | Self::DeleteOne { .. } | Self::DeleteMany { .. } => {}
        }
        self
    }
}
