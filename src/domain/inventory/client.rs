//! Inventory sub-client — find, create, update, delete, batch, bulk, aggregate.

use serde::Serialize;

use crate::client::UsfClient;
use crate::domain::operation::Operation;
use crate::domain::request::{OperationDescriptor, Options};
use crate::domain::response::{BatchOutcome, DeleteOutcome, Document, Items, Reply, UpdateOutcome};
use crate::error::SdkError;

/// Sub-client for inventory operations.
pub struct Inventory<'a> {
    pub(crate) client: &'a UsfClient,
}

impl<'a> Inventory<'a> {
    /// Items matching `query`.
    pub async fn find(
        &self,
        query: &impl Serialize,
        options: Option<Options>,
    ) -> Result<Reply<Items>, SdkError> {
        let descriptor = describe(Operation::Find, Some(query), None::<&()>, options)?;
        self.client.send(descriptor).await
    }

    /// Insert one item; returns the stored item.
    pub async fn create(
        &self,
        item: &impl Serialize,
        options: Option<Options>,
    ) -> Result<Reply<Document>, SdkError> {
        let descriptor = describe(Operation::Create, None::<&()>, Some(item), options)?;
        self.client.send(descriptor).await
    }

    /// Insert several items in one request.
    pub async fn batch_create<T: Serialize>(
        &self,
        items: &[T],
        options: Option<Options>,
    ) -> Result<Reply<Vec<Document>>, SdkError> {
        let descriptor = describe(Operation::BatchCreate, None::<&()>, Some(items), options)?;
        self.client.send(descriptor).await
    }

    pub async fn update(
        &self,
        filter: &impl Serialize,
        update: &impl Serialize,
        options: Option<Options>,
    ) -> Result<Reply<UpdateOutcome>, SdkError> {
        let descriptor = describe(Operation::Update, Some(filter), Some(update), options)?;
        self.client.send(descriptor).await
    }

    pub async fn update_one(
        &self,
        filter: &impl Serialize,
        update: &impl Serialize,
        options: Option<Options>,
    ) -> Result<Reply<UpdateOutcome>, SdkError> {
        let descriptor = describe(Operation::UpdateOne, Some(filter), Some(update), options)?;
        self.client.send(descriptor).await
    }

    pub async fn update_many(
        &self,
        filter: &impl Serialize,
        update: &impl Serialize,
        options: Option<Options>,
    ) -> Result<Reply<UpdateOutcome>, SdkError> {
        let descriptor = describe(Operation::UpdateMany, Some(filter), Some(update), options)?;
        self.client.send(descriptor).await
    }

    pub async fn delete(
        &self,
        filter: &impl Serialize,
        options: Option<Options>,
    ) -> Result<Reply<DeleteOutcome>, SdkError> {
        let descriptor = describe(Operation::Delete, Some(filter), None::<&()>, options)?;
        self.client.send(descriptor).await
    }

    pub async fn delete_one(
        &self,
        filter: &impl Serialize,
        options: Option<Options>,
    ) -> Result<Reply<DeleteOutcome>, SdkError> {
        let descriptor = describe(Operation::DeleteOne, Some(filter), None::<&()>, options)?;
        self.client.send(descriptor).await
    }

    pub async fn delete_many(
        &self,
        filter: &impl Serialize,
        options: Option<Options>,
    ) -> Result<Reply<DeleteOutcome>, SdkError> {
        let descriptor = describe(Operation::DeleteMany, Some(filter), None::<&()>, options)?;
        self.client.send(descriptor).await
    }

    /// Apply a list of updates scoped by `filter`. Takes no options on the wire.
    pub async fn batch_update(
        &self,
        filter: &impl Serialize,
        updates: &impl Serialize,
    ) -> Result<Reply<BatchOutcome>, SdkError> {
        let descriptor = describe(Operation::BatchUpdate, Some(filter), Some(updates), None)?;
        self.client.send(descriptor).await
    }

    /// Run one or more [`BulkOperation`](crate::domain::inventory::BulkOperation)s.
    ///
    /// A single operation is sent as a one-element list.
    pub async fn bulk_write(
        &self,
        operations: &impl Serialize,
    ) -> Result<Reply<BatchOutcome>, SdkError> {
        let descriptor = describe(Operation::BulkWrite, Some(operations), None::<&()>, None)?;
        self.client.send(descriptor).await
    }

    /// Run an aggregation pipeline.
    ///
    /// Accepts a flat list of stages, `{"stage": ...}` envelopes, or a
    /// `{"pipeline": [...]}` envelope.
    pub async fn aggregate(
        &self,
        pipeline: &impl Serialize,
    ) -> Result<Reply<Vec<Document>>, SdkError> {
        let descriptor = describe(Operation::Aggregate, Some(pipeline), None::<&()>, None)?;
        self.client.send(descriptor).await
    }
}

fn describe<Q, D>(
    operation: Operation,
    query: Option<&Q>,
    document: Option<&D>,
    options: Option<Options>,
) -> Result<OperationDescriptor, SdkError>
where
    Q: Serialize + ?Sized,
    D: Serialize + ?Sized,
{
    Ok(OperationDescriptor {
        operation,
        query: query.map(serde_json::to_value).transpose()?,
        document: document.map(serde_json::to_value).transpose()?,
        options,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_describe_find() {
        let descriptor = describe(
            Operation::Find,
            Some(&json!({"x": 1})),
            None::<&()>,
            Some(Options::new().limit(1)),
        )
        .unwrap();
        assert_eq!(descriptor.operation, Operation::Find);
        assert_eq!(descriptor.query, Some(json!({"x": 1})));
        assert_eq!(descriptor.document, None);
        assert_eq!(descriptor.options.unwrap().get("limit"), Some(&json!(1)));
    }

    #[test]
    fn test_describe_slice_document() {
        let items = [json!({"sku": "A"}), json!({"sku": "B"})];
        let descriptor =
            describe(Operation::BatchCreate, None::<&()>, Some(&items[..]), None).unwrap();
        assert_eq!(descriptor.query, None);
        assert_eq!(
            descriptor.document,
            Some(Value::Array(vec![json!({"sku": "A"}), json!({"sku": "B"})]))
        );
    }
}
