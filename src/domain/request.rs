//! Request encoding — operation descriptors to the canonical positional array.
//!
//! Wire layout: `[operation, query, document?, options?]`. Which trailing
//! slots appear is decided by [`Operation::wire_rule`]. Query, document, and
//! option contents are opaque here; only `aggregate` and `bulkWrite` queries
//! are reshaped, and only structurally.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::operation::Operation;

// ─── Options ─────────────────────────────────────────────────────────────────

/// Trailing options object (`limit`, `sort`, `upsert`, …).
///
/// Keys are sent in insertion order. Unknown keys are passed through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(Map<String, Value>);

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an arbitrary option.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn limit(self, limit: u64) -> Self {
        self.set("limit", limit)
    }

    pub fn skip(self, skip: u64) -> Self {
        self.set("skip", skip)
    }

    pub fn sort(self, sort: Value) -> Self {
        self.set("sort", sort)
    }

    pub fn projection(self, projection: Value) -> Self {
        self.set("projection", projection)
    }

    pub fn upsert(self, upsert: bool) -> Self {
        self.set("upsert", upsert)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Options {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Options> for Value {
    fn from(options: Options) -> Self {
        Value::Object(options.0)
    }
}

// ─── OperationDescriptor ─────────────────────────────────────────────────────

/// One call's worth of request data, built fresh by a caller-facing method.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDescriptor {
    pub operation: Operation,
    pub query: Option<Value>,
    pub document: Option<Value>,
    pub options: Option<Options>,
}

impl OperationDescriptor {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            query: None,
            document: None,
            options: None,
        }
    }

    pub fn with_query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_document(mut self, document: Value) -> Self {
        self.document = Some(document);
        self
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }
}

// ─── CanonicalRequest ────────────────────────────────────────────────────────

/// The positional JSON array that is both signed and sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CanonicalRequest(Vec<Value>);

impl CanonicalRequest {
    pub fn operation(&self) -> Option<&str> {
        self.0.first().and_then(Value::as_str)
    }

    pub fn slots(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compact JSON, the exact bytes that are signed and transmitted.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }

    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }
}

// ─── Encoder ─────────────────────────────────────────────────────────────────

/// Linearize a descriptor into its canonical wire array.
pub fn encode(descriptor: OperationDescriptor) -> CanonicalRequest {
    let OperationDescriptor {
        operation,
        query,
        document,
        options,
    } = descriptor;
    let rule = operation.wire_rule();

    let query = query.unwrap_or(Value::Null);
    let query = match operation {
        Operation::Aggregate => normalize_pipeline(query),
        Operation::BulkWrite => normalize_bulk_operations(query),
        _ => query,
    };

    let mut slots = Vec::with_capacity(4);
    slots.push(Value::String(operation.as_str().to_string()));
    slots.push(query);

    if rule.document {
        if let Some(document) = document {
            slots.push(document);
        }
    }

    // Absent options still occupy the slot so positions stay fixed.
    if rule.options {
        slots.push(options.map(Value::from).unwrap_or(Value::Null));
    }

    CanonicalRequest(slots)
}

/// Collapse the accepted pipeline shapes to a flat array of stage operators.
///
/// Accepts a flat array, an array of `{"stage": {...}}` envelopes, a
/// `{"pipeline": [...]}` envelope, or a lone stage. Idempotent.
pub fn normalize_pipeline(query: Value) -> Value {
    let stages = match query {
        Value::Object(map) => match take_sole_key(map, "pipeline") {
            Ok(inner) => inner,
            Err(stage) => Value::Array(vec![Value::Object(stage)]),
        },
        other => other,
    };

    match stages {
        Value::Array(stages) => Value::Array(stages.into_iter().map(unwrap_stage).collect()),
        Value::Object(stage) => Value::Array(vec![unwrap_stage(Value::Object(stage))]),
        other => other,
    }
}

/// Wrap a single bulk operation in a one-element array.
pub fn normalize_bulk_operations(query: Value) -> Value {
    match query {
        Value::Object(op) => Value::Array(vec![Value::Object(op)]),
        other => other,
    }
}

fn unwrap_stage(stage: Value) -> Value {
    match stage {
        Value::Object(map) => match take_sole_key(map, "stage") {
            Ok(inner) => inner,
            Err(map) => Value::Object(map),
        },
        other => other,
    }
}

/// `Ok(value)` if `map` is exactly `{key: value}`, else the map untouched.
fn take_sole_key(mut map: Map<String, Value>, key: &str) -> Result<Value, Map<String, Value>> {
    if map.len() != 1 {
        return Err(map);
    }
    map.remove(key).ok_or(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode_json(descriptor: OperationDescriptor) -> Value {
        Value::Array(encode(descriptor).into_inner())
    }

    #[test]
    fn test_find_without_options_keeps_options_slot() {
        let req = encode_json(OperationDescriptor::new(Operation::Find).with_query(json!({"x": 1})));
        assert_eq!(req, json!(["find", {"x": 1}, null]));
    }

    #[test]
    fn test_find_with_options() {
        let req = encode_json(
            OperationDescriptor::new(Operation::Find)
                .with_query(json!({"sku": "A"}))
                .with_options(Options::new().limit(10).skip(5)),
        );
        assert_eq!(req, json!(["find", {"sku": "A"}, {"limit": 10, "skip": 5}]));
    }

    #[test]
    fn test_create_has_null_query_and_document() {
        let req = encode_json(
            OperationDescriptor::new(Operation::Create).with_document(json!({"sku": "A", "qty": 1})),
        );
        assert_eq!(req, json!(["create", null, {"sku": "A", "qty": 1}, null]));
    }

    #[test]
    fn test_update_carries_all_slots() {
        let req = encode_json(
            OperationDescriptor::new(Operation::UpdateOne)
                .with_query(json!({"sku": "A"}))
                .with_document(json!({"$set": {"qty": 5}}))
                .with_options(Options::new().upsert(true)),
        );
        assert_eq!(
            req,
            json!(["updateOne", {"sku": "A"}, {"$set": {"qty": 5}}, {"upsert": true}])
        );
    }

    #[test]
    fn test_options_never_sent_for_pipeline_and_batch_ops() {
        for op in [Operation::Aggregate, Operation::BatchUpdate, Operation::BulkWrite] {
            let req = encode(
                OperationDescriptor::new(op)
                    .with_query(json!([]))
                    .with_options(Options::new().limit(1)),
            );
            assert_eq!(req.len(), 2, "{op} must not carry an options slot");
            assert_eq!(req.slots(), &[json!(op.as_str()), json!([])][..]);
        }
    }

    #[test]
    fn test_batch_update_keeps_document() {
        let req = encode_json(
            OperationDescriptor::new(Operation::BatchUpdate)
                .with_query(json!({"warehouse": "W1"}))
                .with_document(json!([{"sku": "A", "qty": 1}]))
                .with_options(Options::new().upsert(true)),
        );
        assert_eq!(
            req,
            json!(["batchUpdate", {"warehouse": "W1"}, [{"sku": "A", "qty": 1}]])
        );
    }

    #[test]
    fn test_aggregate_drops_document() {
        let req = encode_json(
            OperationDescriptor::new(Operation::Aggregate)
                .with_query(json!([{"$match": {"qty": 0}}]))
                .with_document(json!({"ignored": true})),
        );
        assert_eq!(req, json!(["aggregate", [{"$match": {"qty": 0}}]]));
    }

    #[test]
    fn test_pipeline_shapes_encode_identically() {
        let flat = json!([
            {"$match": {"qty": {"$gt": 0}}},
            {"$group": {"_id": "$warehouse", "total": {"$sum": "$qty"}}}
        ]);
        let stage_wrapped = json!([
            {"stage": {"$match": {"qty": {"$gt": 0}}}},
            {"stage": {"$group": {"_id": "$warehouse", "total": {"$sum": "$qty"}}}}
        ]);
        let pipeline_wrapped = json!({"pipeline": [
            {"$match": {"qty": {"$gt": 0}}},
            {"stage": {"$group": {"_id": "$warehouse", "total": {"$sum": "$qty"}}}}
        ]});

        let encoded: Vec<String> = [flat, stage_wrapped, pipeline_wrapped]
            .into_iter()
            .map(|q| {
                encode(OperationDescriptor::new(Operation::Aggregate).with_query(q))
                    .to_json()
                    .unwrap()
            })
            .collect();

        assert_eq!(encoded[0], encoded[1]);
        assert_eq!(encoded[0], encoded[2]);
    }

    #[test]
    fn test_normalize_pipeline_is_idempotent() {
        let input = json!({"pipeline": [{"stage": {"$limit": 5}}, {"$skip": 1}]});
        let once = normalize_pipeline(input);
        let twice = normalize_pipeline(once.clone());
        assert_eq!(once, json!([{"$limit": 5}, {"$skip": 1}]));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_pipeline_lone_stage() {
        assert_eq!(
            normalize_pipeline(json!({"stage": {"$limit": 1}})),
            json!([{"$limit": 1}])
        );
        assert_eq!(normalize_pipeline(json!({"$limit": 1})), json!([{"$limit": 1}]));
    }

    #[test]
    fn test_stage_with_extra_keys_is_not_unwrapped() {
        let stage = json!({"stage": {"$limit": 1}, "note": "keep"});
        assert_eq!(normalize_pipeline(json!([stage.clone()])), json!([stage]));
    }

    #[test]
    fn test_bulk_write_single_operation_becomes_array() {
        let op = json!({"updateOne": {"filter": {"sku": "A"}, "update": {"$set": {"qty": 5}}}});
        let req = encode(OperationDescriptor::new(Operation::BulkWrite).with_query(op.clone()));
        assert_eq!(req.len(), 2);
        assert_eq!(req.slots()[1], json!([op]));
    }

    #[test]
    fn test_bulk_write_array_passes_through() {
        let ops = json!([
            {"insertOne": {"document": {"sku": "B"}}},
            {"deleteOne": {"filter": {"sku": "C"}}}
        ]);
        let req = encode(OperationDescriptor::new(Operation::BulkWrite).with_query(ops.clone()));
        assert_eq!(req.slots()[1], ops);
    }

    #[test]
    fn test_options_preserve_insertion_order() {
        let req = encode(
            OperationDescriptor::new(Operation::Find)
                .with_query(json!({"z": 1, "a": 2}))
                .with_options(Options::new().sort(json!({"qty": -1})).limit(3)),
        );
        assert_eq!(
            req.to_json().unwrap(),
            r#"["find",{"z":1,"a":2},{"sort":{"qty":-1},"limit":3}]"#
        );
        assert_eq!(req.operation(), Some("find"));
    }
}
