use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// One column value. A column written more than once within a record holds
/// an ordered list of distinct values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(untagged)]
pub enum Field {
    Scalar(String),
    List(Vec<String>),
}

impl Field {
    /// Text form of the field; list items are joined with a single space.
    pub fn as_text(&self) -> String {
        match self {
            Field::Scalar(s) => s.clone(),
            Field::List(items) => items.join(" "),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Field::Scalar(s) => s.trim().is_empty(),
            Field::List(items) => items.iter().all(|s| s.trim().is_empty()),
        }
    }

    fn merge(&mut self, value: String) {
        match self {
            Field::Scalar(existing) => {
                if *existing != value {
                    let first = std::mem::take(existing);
                    *self = Field::List(vec![first, value]);
                }
            }
            Field::List(items) => {
                if !items.contains(&value) {
                    items.push(value);
                }
            }
        }
    }
}

/// A posting under construction. Columns keep the order they were first
/// written in, which is also the order they serialize in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, Field)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&Field> {
        self.fields.iter().find(|(c, _)| c == column).map(|(_, f)| f)
    }

    /// Text of a column, `None` when the column was never written.
    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column).map(Field::as_text)
    }

    /// Writes a value, merging into a duplicate-free list when the column
    /// already holds something.
    pub fn push(&mut self, column: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(c, _)| c == column) {
            Some((_, field)) => field.merge(value),
            None => self.fields.push((column.to_string(), Field::Scalar(value))),
        }
    }

    /// Overwrites a column outright. Used for derived fields and in-place
    /// text rewrites, never for extraction.
    pub fn set(&mut self, column: &str, field: Field) {
        match self.fields.iter_mut().find(|(c, _)| c == column) {
            Some((_, existing)) => *existing = field,
            None => self.fields.push((column.to_string(), field)),
        }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(c, f)| (c.as_str(), f))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (column, field) in &self.fields {
            map.serialize_entry(column, field)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Relies on serde_json's preserve_order map to keep column order.
        let raw = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        let mut record = Record::new();
        for (column, value) in raw {
            let field = match value {
                serde_json::Value::String(s) => Field::Scalar(s),
                serde_json::Value::Array(items) => Field::List(
                    items
                        .into_iter()
                        .map(|v| match v {
                            serde_json::Value::String(s) => s,
                            other => other.to_string(),
                        })
                        .collect(),
                ),
                serde_json::Value::Null => Field::Scalar(String::new()),
                other => Field::Scalar(other.to_string()),
            };
            record.set(&column, field);
        }
        Ok(record)
    }
}
