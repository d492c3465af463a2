//! Record and field value types exchanged with the host and the store.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Identifier + locale of a record in the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordRef {
    pub id: String,
    pub locale: String,
}

impl RecordRef {
    pub fn new(id: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            locale: locale.into(),
        }
    }
}

/// Value of the parent reference field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentRef {
    /// Points at another record.
    Linked(RecordRef),
    /// No parent; the record sits at the tree root.
    Cleared,
}

impl ParentRef {
    /// Read a parent reference out of a raw field value.
    ///
    /// Anything that is not a link with a non-empty id counts as cleared.
    pub fn from_field(value: Option<&FieldValue>, locale: &str) -> Self {
        match value.and_then(FieldValue::link_id) {
            Some(id) => Self::Linked(RecordRef::new(id, locale)),
            None => Self::Cleared,
        }
    }

    pub fn linked(id: impl Into<String>, locale: impl Into<String>) -> Self {
        Self::Linked(RecordRef::new(id, locale))
    }

    /// Linked record, if any.
    pub fn record(&self) -> Option<&RecordRef> {
        match self {
            Self::Linked(r) => Some(r),
            Self::Cleared => None,
        }
    }
}

/// System metadata of a link value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSys {
    pub id: String,
}

/// A localized field value in content-management JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// `{ "sys": { "id": "..." } }`
    Link { sys: LinkSys },
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn link(id: impl Into<String>) -> Self {
        Self::Link {
            sys: LinkSys { id: id.into() },
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Linked record id, ignoring links with an empty id.
    pub fn link_id(&self) -> Option<&str> {
        match self {
            Self::Link { sys } if !sys.id.is_empty() => Some(&sys.id),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Localized values of one field: locale → value.
pub type LocalizedField = FxHashMap<String, FieldValue>;

/// A record's full field snapshot as fetched from the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub fields: FxHashMap<String, LocalizedField>,
}

impl RecordSnapshot {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: FxHashMap::default(),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, field: &str, locale: &str, value: FieldValue) -> Self {
        self.set(field, locale, value);
        self
    }

    pub fn set(&mut self, field: &str, locale: &str, value: FieldValue) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .insert(locale.to_string(), value);
    }

    pub fn remove(&mut self, field: &str, locale: &str) {
        if let Some(localized) = self.fields.get_mut(field) {
            localized.remove(locale);
        }
    }

    pub fn get(&self, field: &str, locale: &str) -> Option<&FieldValue> {
        self.fields.get(field)?.get(locale)
    }

    /// Text value of a field in a locale.
    pub fn text(&self, field: &str, locale: &str) -> Option<&str> {
        self.get(field, locale)?.as_text()
    }

    /// Parent reference stored in `field` for `locale`.
    pub fn parent(&self, field: &str, locale: &str) -> ParentRef {
        ParentRef::from_field(self.get(field, locale), locale)
    }
}
