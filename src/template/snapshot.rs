//! Snapshot: one consistent view of every widget value at render time.

use crate::widget::WidgetValue;
use indexmap::IndexMap;

/// Values of all registered widgets, keyed by tag in registration order.
///
/// A snapshot is taken once per render; every value in it is the result of
/// one complete read of that widget's slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    values: IndexMap<String, WidgetValue>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value for `tag`.
    pub fn insert(&mut self, tag: impl Into<String>, value: WidgetValue) {
        self.values.insert(tag.into(), value);
    }

    /// Raw value for `tag`.
    pub fn get(&self, tag: &str) -> Option<&WidgetValue> {
        self.values.get(tag)
    }

    /// Scalar text for `tag`; empty when absent.
    pub fn text(&self, tag: &str) -> String {
        self.get(tag).map(WidgetValue::to_text).unwrap_or_default()
    }

    /// Element `index` of the sequence produced by `tag`.
    pub fn item(&self, tag: &str, index: usize) -> Option<&str> {
        self.get(tag).and_then(|value| value.item(index))
    }

    /// Iterate over `(tag, value)` in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &WidgetValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the snapshot has no tags.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, WidgetValue)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (K, WidgetValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
