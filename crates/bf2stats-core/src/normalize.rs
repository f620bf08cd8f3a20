use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::grouping::GroupedStats;
use crate::protocol::Dataset;
use crate::registry::EndpointSpec;
use crate::StatsError;

/// Ordered string record. Re-inserting a key keeps its position and replaces the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs columns with values. Missing values leave the column out, surplus values are dropped.
    pub fn zip(columns: &[String], values: &[String]) -> Self {
        columns
            .iter()
            .zip(values)
            .map(|(column, value)| (column.clone(), value.clone()))
            .collect()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let position = self.fields.iter().position(|(existing, _)| existing == key)?;
        Some(self.fields.remove(position).1)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Parsed content of a non-primary dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Section {
    Single(Record),
    Many(Vec<Record>),
}

impl Section {
    pub fn as_single(&self) -> Option<&Record> {
        match self {
            Self::Single(record) => Some(record),
            Self::Many(_) => None,
        }
    }

    pub fn as_many(&self) -> Option<&[Record]> {
        match self {
            Self::Single(_) => None,
            Self::Many(records) => Some(records),
        }
    }

    /// All records regardless of shape.
    pub fn records(&self) -> &[Record] {
        match self {
            Self::Single(record) => std::slice::from_ref(record),
            Self::Many(records) => records,
        }
    }
}

/// Typed result of one decoded response.
///
/// Serializes as a single JSON object: primary fields first, then each
/// section under its property key, then `grouped` when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedResult {
    fields: Record,
    sections: Vec<(String, Section)>,
    grouped: Option<GroupedStats>,
}

impl DecodedResult {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Record {
        &self.fields
    }

    pub fn section(&self, key: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, section)| section)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections
            .iter()
            .map(|(key, section)| (key.as_str(), section))
    }

    pub fn grouped(&self) -> Option<&GroupedStats> {
        self.grouped.as_ref()
    }

    pub fn set_grouped(&mut self, grouped: GroupedStats) {
        self.grouped = Some(grouped);
    }

    /// Attaches a section; a primary field or earlier section with the same key is replaced.
    pub fn insert_section(&mut self, key: impl Into<String>, section: Section) {
        let key = key.into();
        self.fields.remove(&key);
        match self.sections.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = section,
            None => self.sections.push((key, section)),
        }
    }

    fn merge_fields(&mut self, record: Record) {
        for (key, value) in record.fields {
            self.fields.insert(key, value);
        }
    }
}

impl Serialize for DecodedResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.fields.len() + self.sections.len() + usize::from(self.grouped.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        for (key, value) in self.fields.iter() {
            map.serialize_entry(key, value)?;
        }
        for (key, section) in &self.sections {
            map.serialize_entry(key, section)?;
        }
        if let Some(grouped) = &self.grouped {
            map.serialize_entry("grouped", grouped)?;
        }
        map.end()
    }
}

/// Shapes decoded datasets according to the endpoint's property keys and array policy.
///
/// Dataset 0 merges into the top level from its first row. Every later
/// dataset needs a property key; a single row becomes a flat record unless
/// the endpoint forces lists, anything else (including zero rows) a list.
pub fn normalize(datasets: Vec<Dataset>, spec: &EndpointSpec) -> Result<DecodedResult, StatsError> {
    let mut result = DecodedResult::default();

    for (index, dataset) in datasets.into_iter().enumerate() {
        if index == 0 {
            if let Some(row) = dataset.rows.first() {
                result.merge_fields(Record::zip(&dataset.columns, row));
            }
            continue;
        }

        let key = spec.property_key(index).ok_or_else(|| {
            tracing::warn!(endpoint = %spec.id, dataset = index, "no property key for dataset");
            StatsError::source(format!(
                "response contained more datasets than '{}' maps",
                spec.id
            ))
        })?;

        let section = if dataset.rows.len() == 1 && !spec.force_array {
            Section::Single(Record::zip(&dataset.columns, &dataset.rows[0]))
        } else {
            Section::Many(
                dataset
                    .rows
                    .iter()
                    .map(|row| Record::zip(&dataset.columns, row))
                    .collect(),
            )
        };
        result.insert_section(key, section);
    }

    Ok(result)
}
