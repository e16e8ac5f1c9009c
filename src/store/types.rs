use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};

/// Top-level fields of a stored document, without its id
pub type Fields = Map<String, Value>;

/// A stored record: opaque id plus JSON fields
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Split a JSON object carrying an `"id"` member into a document
    pub fn from_value(value: Value) -> StoreResult<Self> {
        let Value::Object(mut fields) = value else {
            return Err(StoreError::Serialization(
                "document must be a JSON object".to_string(),
            ));
        };
        match fields.remove("id") {
            Some(Value::String(id)) if !id.is_empty() => Ok(Self { id, fields }),
            _ => Err(StoreError::Serialization(
                "document is missing a string id".to_string(),
            )),
        }
    }

    /// JSON object with the id folded back in
    pub fn to_value(&self) -> Value {
        let mut fields = self.fields.clone();
        fields.insert("id".to_string(), Value::String(self.id.clone()));
        Value::Object(fields)
    }

    pub fn decode<T: DeserializeOwned>(&self) -> StoreResult<T> {
        Ok(serde_json::from_value(self.to_value())?)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// `name` read as a timestamp, whatever precision it was written with
    pub fn timestamp(&self, name: &str) -> Option<DateTime<Utc>> {
        self.field(name)
            .and_then(|value| DateTime::<Utc>::deserialize(value).ok())
    }

    /// Shallow merge: each patch field replaces the stored one
    pub fn merge(&mut self, patch: Fields) {
        for (key, value) in patch {
            self.fields.insert(key, value);
        }
    }
}

/// Encode a payload as document fields. Any `"id"` member is dropped.
pub fn to_fields<T: Serialize + ?Sized>(value: &T) -> StoreResult<Fields> {
    match serde_json::to_value(value)? {
        Value::Object(mut fields) => {
            fields.remove("id");
            Ok(fields)
        }
        other => Err(StoreError::Serialization(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Field equality a rule requires
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    pub field: String,
    pub equals: Value,
}

/// Read and write rules applied to anonymous callers.
///
/// Collections without a read rule are freely readable. Anonymous callers
/// may only insert, and only into collections marked creatable; updates and
/// deletes always need an operator.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    read_rules: HashMap<String, FieldRule>,
    unreadable: HashSet<String>,
    creatable: HashSet<String>,
    create_rules: HashMap<String, FieldRule>,
}

impl AccessPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules of the public site: only active listings and partners are
    /// readable, enquiries are write-only, and visitors may submit
    /// enquiries and pending testimonials.
    pub fn public_site() -> Self {
        use super::collections::*;

        Self::new()
            .require_equal(LISTINGS, "adminStatus", Value::from("active"))
            .require_equal(CHANNEL_PARTNERS, "status", Value::from("active"))
            .deny_reads(ENQUIRIES)
            .allow_creates(ENQUIRIES)
            .require_on_create(TESTIMONIALS, "status", Value::from("pending"))
    }

    pub fn require_equal(mut self, collection: &str, field: &str, equals: Value) -> Self {
        self.read_rules.insert(
            collection.to_string(),
            FieldRule {
                field: field.to_string(),
                equals,
            },
        );
        self
    }

    pub fn deny_reads(mut self, collection: &str) -> Self {
        self.unreadable.insert(collection.to_string());
        self
    }

    pub fn allow_creates(mut self, collection: &str) -> Self {
        self.creatable.insert(collection.to_string());
        self
    }

    /// Allow inserts into `collection` that carry `field == equals`
    pub fn require_on_create(mut self, collection: &str, field: &str, equals: Value) -> Self {
        self.create_rules.insert(
            collection.to_string(),
            FieldRule {
                field: field.to_string(),
                equals,
            },
        );
        self.allow_creates(collection)
    }

    fn check_readable(&self, collection: &str) -> StoreResult<()> {
        if self.unreadable.contains(collection) {
            return Err(StoreError::PermissionDenied(format!(
                "reads of {collection} are not allowed"
            )));
        }
        Ok(())
    }

    /// Unfiltered reads are refused wherever a rule exists
    pub fn check_read_all(&self, collection: &str) -> StoreResult<()> {
        self.check_readable(collection)?;
        match self.read_rules.get(collection) {
            Some(rule) => Err(StoreError::PermissionDenied(format!(
                "reads of {collection} must filter on {}",
                rule.field
            ))),
            None => Ok(()),
        }
    }

    pub fn check_query(&self, collection: &str, field: &str, value: &Value) -> StoreResult<()> {
        self.check_readable(collection)?;
        match self.read_rules.get(collection) {
            Some(rule) if rule.field != field || &rule.equals != value => {
                Err(StoreError::PermissionDenied(format!(
                    "reads of {collection} must filter on {} == {}",
                    rule.field, rule.equals
                )))
            }
            _ => Ok(()),
        }
    }

    pub fn check_document(&self, collection: &str, document: &Document) -> StoreResult<()> {
        self.check_readable(collection)?;
        match self.read_rules.get(collection) {
            Some(rule) if document.field(&rule.field) != Some(&rule.equals) => {
                Err(StoreError::PermissionDenied(format!(
                    "{collection}/{} is not publicly readable",
                    document.id
                )))
            }
            _ => Ok(()),
        }
    }

    pub fn check_create(&self, collection: &str, fields: &Fields) -> StoreResult<()> {
        if !self.creatable.contains(collection) {
            return Err(Self::operator_only(collection));
        }
        match self.create_rules.get(collection) {
            Some(rule) if fields.get(&rule.field) != Some(&rule.equals) => {
                Err(StoreError::PermissionDenied(format!(
                    "new {collection} documents must have {} == {}",
                    rule.field, rule.equals
                )))
            }
            _ => Ok(()),
        }
    }

    /// Updates and deletes
    pub fn check_write(&self, collection: &str) -> StoreResult<()> {
        Err(Self::operator_only(collection))
    }

    fn operator_only(collection: &str) -> StoreError {
        StoreError::PermissionDenied(format!("writes to {collection} require an operator login"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_value_round_trip_keeps_id_out_of_fields() {
        let doc = Document::from_value(json!({"id": "a1", "area": "Baner"})).unwrap();
        assert_eq!(doc.id, "a1");
        assert!(doc.field("id").is_none());
        assert_eq!(doc.to_value(), json!({"id": "a1", "area": "Baner"}));
    }

    #[test]
    fn test_document_requires_an_id() {
        assert!(Document::from_value(json!({"area": "Baner"})).is_err());
        assert!(Document::from_value(json!(["not", "an", "object"])).is_err());
    }

    #[test]
    fn test_merge_replaces_top_level_fields() {
        let mut doc = Document::from_value(json!({"id": "a", "x": 1, "y": 2})).unwrap();
        doc.merge(to_fields(&json!({"y": 3, "z": null})).unwrap());
        assert_eq!(doc.to_value(), json!({"id": "a", "x": 1, "y": 3, "z": null}));
    }

    #[test]
    fn test_timestamps_compare_as_instants() {
        let doc = Document::from_value(json!({
            "id": "seed-1",
            "updatedAt": "2025-01-01T10:00:00.000Z",
            "area": "Baner"
        }))
        .unwrap();
        let expected = DateTime::parse_from_rfc3339("2025-01-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(doc.timestamp("updatedAt"), Some(expected));
        assert_eq!(doc.timestamp("area"), None);
        assert_eq!(doc.timestamp("missing"), None);
    }

    #[test]
    fn test_public_site_policy() {
        let policy = AccessPolicy::public_site();
        assert!(policy.check_read_all("listings").is_err());
        assert!(policy
            .check_query("listings", "adminStatus", &json!("active"))
            .is_ok());
        assert!(policy
            .check_query("listings", "adminStatus", &json!("hidden"))
            .is_err());
        assert!(policy.check_read_all("areas").is_ok());
        assert!(policy.check_read_all("enquiries").is_err());
        assert!(policy.check_create("enquiries", &Fields::new()).is_ok());
        assert!(policy.check_create("listings", &Fields::new()).is_err());
        for collection in ["listings", "enquiries", "testimonials"] {
            assert!(matches!(
                policy.check_write(collection),
                Err(StoreError::PermissionDenied(_))
            ));
        }

        let pending = to_fields(&json!({"clientName": "Asha", "status": "pending"})).unwrap();
        let approved = to_fields(&json!({"clientName": "Asha", "status": "approved"})).unwrap();
        let unmoderated = to_fields(&json!({"clientName": "Asha"})).unwrap();
        assert!(policy.check_create("testimonials", &pending).is_ok());
        assert!(policy.check_create("testimonials", &approved).is_err());
        assert!(policy.check_create("testimonials", &unmoderated).is_err());

        let hidden = Document::from_value(json!({"id": "h", "adminStatus": "hidden"})).unwrap();
        assert!(matches!(
            policy.check_document("listings", &hidden),
            Err(StoreError::PermissionDenied(_))
        ));
    }
}
