//! Operation kinds and the per-operation wire table.
//!
//! The USF API reads the request body positionally, so which trailing slots an
//! operation carries is part of the wire contract. That knowledge lives in
//! [`Operation::wire_rule`] and nowhere else.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ─── Operation ───────────────────────────────────────────────────────────────

/// A remote action understood by the USF endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Find,
    Create,
    BatchCreate,
    Update,
    UpdateOne,
    UpdateMany,
    Delete,
    DeleteOne,
    DeleteMany,
    BatchUpdate,
    BulkWrite,
    Aggregate,
}

impl Operation {
    pub const ALL: [Operation; 12] = [
        Operation::Find,
        Operation::Create,
        Operation::BatchCreate,
        Operation::Update,
        Operation::UpdateOne,
        Operation::UpdateMany,
        Operation::Delete,
        Operation::DeleteOne,
        Operation::DeleteMany,
        Operation::BatchUpdate,
        Operation::BulkWrite,
        Operation::Aggregate,
    ];

    /// Wire name, element 0 of every request.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Find => "find",
            Self::Create => "create",
            Self::BatchCreate => "batchCreate",
            Self::Update => "update",
            Self::UpdateOne => "updateOne",
            Self::UpdateMany => "updateMany",
            Self::Delete => "delete",
            Self::DeleteOne => "deleteOne",
            Self::DeleteMany => "deleteMany",
            Self::BatchUpdate => "batchUpdate",
            Self::BulkWrite => "bulkWrite",
            Self::Aggregate => "aggregate",
        }
    }

    /// Which optional trailing slots this operation carries on the wire.
    pub fn wire_rule(&self) -> WireRule {
        match self {
            Self::Aggregate => WireRule::BARE,
            Self::BatchUpdate | Self::BulkWrite => WireRule::NO_OPTIONS,
            _ => WireRule::FULL,
        }
    }

    /// The success shape this operation produces.
    pub fn result_kind(&self) -> ResultKind {
        match self {
            Self::Find | Self::Create | Self::BatchCreate | Self::Aggregate => ResultKind::Items,
            Self::Update | Self::UpdateOne | Self::UpdateMany => ResultKind::Update,
            Self::Delete | Self::DeleteOne | Self::DeleteMany => ResultKind::Delete,
            Self::BatchUpdate | Self::BulkWrite => ResultKind::Batch,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("Unknown operation: {}", s))
    }
}

// ─── WireRule ────────────────────────────────────────────────────────────────

/// Omission rule for the trailing slots of a canonical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireRule {
    /// A supplied document is appended after the query.
    pub document: bool,
    /// An options slot is appended last.
    pub options: bool,
}

impl WireRule {
    const FULL: WireRule = WireRule {
        document: true,
        options: true,
    };
    const NO_OPTIONS: WireRule = WireRule {
        document: true,
        options: false,
    };
    /// Pipelines travel entirely in the query slot.
    const BARE: WireRule = WireRule {
        document: false,
        options: false,
    };
}

// ─── ResultKind ──────────────────────────────────────────────────────────────

/// Success variants of [`ApiResult`](crate::domain::response::ApiResult).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Items,
    Update,
    Delete,
    Batch,
}
