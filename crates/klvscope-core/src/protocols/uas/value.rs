use std::borrow::Cow;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Decoded value of a known field.
///
/// Serializes without a variant tag: `Missing` becomes `null`, numbers and
/// text are plain JSON scalars, opaque bytes an array of integers and nested
/// sets an object.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Reserved "no data" pattern, or a field too short for its transform.
    Missing,
    Unsigned(u64),
    Signed(i64),
    Real(f64),
    Text(String),
    Bytes(Vec<u8>),
    Set(LocalSet),
}

impl FieldValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Real(value) => Some(*value),
            FieldValue::Unsigned(value) => Some(*value as f64),
            FieldValue::Signed(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::Unsigned(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Signed(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Bytes(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&LocalSet> {
        match self {
            FieldValue::Set(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Option<f64>> for FieldValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(FieldValue::Missing, FieldValue::Real)
    }
}

impl From<Option<u64>> for FieldValue {
    fn from(value: Option<u64>) -> Self {
        value.map_or(FieldValue::Missing, FieldValue::Unsigned)
    }
}

impl From<Option<i64>> for FieldValue {
    fn from(value: Option<i64>) -> Self {
        value.map_or(FieldValue::Missing, FieldValue::Signed)
    }
}

/// One record of a decoded local set.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// Tag listed in the field table.
    Known {
        tag: u8,
        name: &'static str,
        value: FieldValue,
    },
    /// Tag outside the field table, kept as lowercase hex of its raw bytes.
    Unknown { tag: u8, hex: String },
}

impl Entry {
    pub fn tag(&self) -> u8 {
        match self {
            Entry::Known { tag, .. } | Entry::Unknown { tag, .. } => *tag,
        }
    }

    /// Key used when the set is serialized: the field name, or `tag_<n>`.
    pub fn key(&self) -> Cow<'static, str> {
        match self {
            Entry::Known { name, .. } => Cow::Borrowed(name),
            Entry::Unknown { tag, .. } => Cow::Owned(format!("tag_{tag}")),
        }
    }
}

/// Decoded local set, in first-seen tag order.
///
/// A tag appearing twice keeps a single entry holding the later value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalSet {
    entries: Vec<Entry>,
    truncated: bool,
}

impl LocalSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, entry: Entry) {
        match self.entries.iter_mut().find(|e| e.tag() == entry.tag()) {
            Some(slot) => *slot = entry,
            None => self.entries.push(entry),
        }
    }

    pub(crate) fn mark_truncated(&mut self) {
        self.truncated = true;
    }

    /// Whether the scan stopped on a malformed record before the end.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn get(&self, tag: u8) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.tag() == tag)
    }

    /// Value of a known field by tag.
    pub fn value(&self, tag: u8) -> Option<&FieldValue> {
        match self.get(tag)? {
            Entry::Known { value, .. } => Some(value),
            Entry::Unknown { .. } => None,
        }
    }

    /// Value of a known field by name.
    pub fn value_by_name(&self, name: &str) -> Option<&FieldValue> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Known { name: n, value, .. } if *n == name => Some(value),
            _ => None,
        })
    }

    /// Unknown entries in this set and every nested set.
    pub fn unknown_count(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match entry {
                Entry::Unknown { .. } => 1,
                Entry::Known {
                    value: FieldValue::Set(nested),
                    ..
                } => nested.unknown_count(),
                Entry::Known { .. } => 0,
            })
            .sum()
    }

    /// Truncated sets among this one and every nested set.
    pub fn truncated_count(&self) -> usize {
        let nested: usize = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                Entry::Known {
                    value: FieldValue::Set(nested),
                    ..
                } => Some(nested.truncated_count()),
                _ => None,
            })
            .sum();
        nested + usize::from(self.truncated)
    }
}

impl<'a> IntoIterator for &'a LocalSet {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for LocalSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            match entry {
                Entry::Known { name, value, .. } => map.serialize_entry(name, value)?,
                Entry::Unknown { hex, .. } => map.serialize_entry(&entry.key(), hex)?,
            }
        }
        map.end()
    }
}
