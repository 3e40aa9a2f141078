//! Collections, documents and equality filters.

use serde_json::{Map, Value};

use concur_core::DocumentId;

/// Key under which the store identifier appears in a document.
pub const ID_FIELD: &str = "_id";

/// A stored document: a JSON object.
pub type Document = Map<String, Value>;

/// The named collections of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Developers,
    Organisations,
    Applications,
    CollectionPoints,
    ConsentPreferences,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Developers => "developer_details",
            Self::Organisations => "organisation_details",
            Self::Applications => "org_applications",
            Self::CollectionPoints => "collection_points",
            Self::ConsentPreferences => "consent_preferences",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conjunction of top-level field equalities.
///
/// `_id` addresses the store identifier. An empty filter matches every
/// document in the collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Map<String, Value>);

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter on the store identifier.
    pub fn by_id(id: &DocumentId) -> Self {
        Self::new().eq(ID_FIELD, id.as_str())
    }

    /// Add an equality condition, replacing any earlier one on `field`.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// The identifier condition, if any.
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }

    /// Field conditions other than `_id`.
    pub fn fields(&self) -> Document {
        let mut fields = self.0.clone();
        fields.remove(ID_FIELD);
        fields
    }

    /// Exact-equality match against a document.
    pub fn matches(&self, doc: &Document) -> bool {
        self.0.iter().all(|(k, v)| doc.get(k) == Some(v))
    }
}
