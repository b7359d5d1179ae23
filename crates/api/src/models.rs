//! Wire models for the patient server.
//!
//! Responsibilities:
//! - Decode the `/view` listing, keeping the server's key order
//! - Encode the full `/create` payload and the partial `/edit` payload
//!
//! Notes:
//! - `bmi` and `verdict` are computed by the server; they are decoded for display and
//!   never sent back
//! - The record identifier is the key of the listing map, not a field of the record
//! - A listing entry that does not decode as a record is logged and left out

use carelytics_types::{FiniteNumber, NonEmptyText};
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A patient as returned by `GET /view`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub name: String,
    pub city: String,
    pub age: FiniteNumber,
    pub gender: String,
    pub height: FiniteNumber,
    pub weight: FiniteNumber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi: Option<FiniteNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<String>,
}

/// The `/view` document: record identifier to record, in document order.
///
/// A repeated key keeps its first position and takes the last value, the same
/// way a browser's `JSON.parse` resolves it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PatientDirectory {
    entries: Vec<(String, PatientRecord)>,
    /// Position of each id in `entries`.
    index: HashMap<String, usize>,
}

impl PatientDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `id`, keeping the original position on replace.
    pub fn insert(&mut self, id: impl Into<String>, record: PatientRecord) {
        let id = id.into();
        match self.index.get(&id) {
            Some(&position) => self.entries[position].1 = record,
            None => {
                self.index.insert(id.clone(), self.entries.len());
                self.entries.push((id, record));
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&PatientRecord> {
        self.index
            .get(id)
            .map(|&position| &self.entries[position].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PatientRecord)> {
        self.entries.iter().map(|(id, record)| (id.as_str(), record))
    }
}

impl IntoIterator for PatientDirectory {
    type Item = (String, PatientRecord);
    type IntoIter = std::vec::IntoIter<(String, PatientRecord)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, PatientRecord)> for PatientDirectory {
    fn from_iter<I: IntoIterator<Item = (String, PatientRecord)>>(iter: I) -> Self {
        let mut directory = PatientDirectory::new();
        for (id, record) in iter {
            directory.insert(id, record);
        }
        directory
    }
}

impl Serialize for PatientDirectory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, record) in &self.entries {
            map.serialize_entry(id, record)?;
        }
        map.end()
    }
}

/// One value of the listing map. Anything that is not a usable record is kept out of the
/// table instead of failing the whole listing.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListingEntry {
    Record(PatientRecord),
    Malformed(IgnoredAny),
}

struct DirectoryVisitor;

impl<'de> Visitor<'de> for DirectoryVisitor {
    type Value = PatientDirectory;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a map of patient id to patient record")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut directory = PatientDirectory::new();
        while let Some((id, entry)) = access.next_entry::<String, ListingEntry>()? {
            match entry {
                ListingEntry::Record(record) => directory.insert(id, record),
                ListingEntry::Malformed(IgnoredAny) => {
                    tracing::warn!("skipping malformed patient record {}", id)
                }
            }
        }
        Ok(directory)
    }
}

impl<'de> Deserialize<'de> for PatientDirectory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(DirectoryVisitor)
    }
}

/// Body of `POST /create`: every editable field, nothing derived.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewPatient {
    pub id: NonEmptyText,
    pub name: NonEmptyText,
    pub city: NonEmptyText,
    pub age: FiniteNumber,
    pub gender: NonEmptyText,
    pub height: FiniteNumber,
    pub weight: FiniteNumber,
}

/// Body of `PUT /edit/{id}`: only the fields the user filled in.
///
/// Absent fields are omitted from the JSON entirely, so the server leaves them untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<NonEmptyText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<NonEmptyText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<NonEmptyText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<FiniteNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<FiniteNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<FiniteNumber>,
}

impl PatientUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.city.is_none()
            && self.gender.is_none()
            && self.age.is_none()
            && self.height.is_none()
            && self.weight.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANN: &str = r#"{"p1": {"name":"Ann","city":"NYC","age":30,"gender":"F","height":165,"weight":60,"bmi":22.0,"verdict":"normal"}}"#;

    #[test]
    fn test_directory_decodes_listing() {
        let directory: PatientDirectory = serde_json::from_str(ANN).expect("valid listing");
        assert_eq!(directory.len(), 1);
        let ann = directory.get("p1").expect("p1 present");
        assert_eq!(ann.name, "Ann");
        assert_eq!(ann.age.to_string(), "30");
        assert_eq!(ann.bmi.map(|b| b.to_string()).as_deref(), Some("22"));
        assert_eq!(ann.verdict.as_deref(), Some("normal"));
    }

    #[test]
    fn test_directory_keeps_document_order() {
        let json = r#"{
            "zed": {"name":"Z","city":"A","age":1,"gender":"male","height":1,"weight":1},
            "amy": {"name":"A","city":"B","age":2,"gender":"female","height":2,"weight":2},
            "max": {"name":"M","city":"C","age":3,"gender":"others","height":3,"weight":3}
        }"#;
        let directory: PatientDirectory = serde_json::from_str(json).unwrap();
        let ids: Vec<&str> = directory.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["zed", "amy", "max"]);
    }

    #[test]
    fn test_directory_repeated_key_keeps_first_position_last_value() {
        let json = r#"{
            "a": {"name":"first","city":"X","age":1,"gender":"male","height":1,"weight":1},
            "b": {"name":"B","city":"X","age":1,"gender":"male","height":1,"weight":1},
            "a": {"name":"second","city":"X","age":1,"gender":"male","height":1,"weight":1}
        }"#;
        let directory: PatientDirectory = serde_json::from_str(json).unwrap();
        let names: Vec<(&str, &str)> = directory
            .iter()
            .map(|(id, r)| (id, r.name.as_str()))
            .collect();
        assert_eq!(names, vec![("a", "second"), ("b", "B")]);
    }

    #[test]
    fn test_directory_decodes_large_listing_in_order() {
        let records: Vec<String> = (0..50_000)
            .map(|i| {
                format!(
                    r#""p{i}": {{"name":"N{i}","city":"C","age":{},"gender":"F","height":1.7,"weight":60}}"#,
                    i % 90
                )
            })
            .collect();
        let json = format!("{{{}}}", records.join(","));

        let directory: PatientDirectory = serde_json::from_str(&json).expect("valid listing");
        assert_eq!(directory.len(), 50_000);
        assert_eq!(directory.get("p49999").map(|r| r.name.as_str()), Some("N49999"));
        let first: Vec<&str> = directory.iter().take(3).map(|(id, _)| id).collect();
        assert_eq!(first, vec!["p0", "p1", "p2"]);
    }

    #[test]
    fn test_directory_skips_malformed_records() {
        let json = r#"{
            "p1": {"name":"Ann","city":"NYC","age":30,"gender":"F","height":165,"weight":60},
            "p2": {"name":"Bo","city":"LA","age":null,"gender":"male","height":1.8,"weight":80},
            "p3": null
        }"#;
        let directory: PatientDirectory = serde_json::from_str(json).expect("listing decodes");
        let ids: Vec<&str> = directory.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["p1"]);
        assert!(directory.get("p2").is_none());
    }

    #[test]
    fn test_directory_from_iter_replaces_in_place() {
        let record = |name: &str| PatientRecord {
            name: name.into(),
            city: "X".into(),
            age: FiniteNumber::new(1.0).unwrap(),
            gender: "F".into(),
            height: FiniteNumber::new(1.0).unwrap(),
            weight: FiniteNumber::new(1.0).unwrap(),
            bmi: None,
            verdict: None,
        };
        let directory: PatientDirectory = vec![
            ("a".to_string(), record("one")),
            ("b".to_string(), record("two")),
            ("a".to_string(), record("three")),
        ]
        .into_iter()
        .collect();

        assert_eq!(directory.len(), 2);
        assert_eq!(directory.get("a").map(|r| r.name.as_str()), Some("three"));
        let ids: Vec<&str> = directory.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_record_without_derived_fields_decodes() {
        let json = r#"{"name":"Bo","city":"LA","age":40,"gender":"male","height":1.8,"weight":80}"#;
        let record: PatientRecord = serde_json::from_str(json).unwrap();
        assert!(record.bmi.is_none());
        assert!(record.verdict.is_none());
    }

    #[test]
    fn test_directory_rejects_non_map_document() {
        let result: Result<PatientDirectory, _> = serde_json::from_str("[]");
        assert!(result.is_err());
    }

    #[test]
    fn test_update_serialises_only_present_fields() {
        let update = PatientUpdate {
            city: Some(NonEmptyText::new("Leeds").unwrap()),
            age: Some(FiniteNumber::new(41.0).unwrap()),
            ..PatientUpdate::default()
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value, serde_json::json!({"city": "Leeds", "age": 41}));
    }

    #[test]
    fn test_update_is_empty_by_default() {
        assert!(PatientUpdate::default().is_empty());
        let update = PatientUpdate {
            weight: Some(FiniteNumber::new(70.5).unwrap()),
            ..PatientUpdate::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_new_patient_has_no_derived_fields() {
        let patient = NewPatient {
            id: NonEmptyText::new("p9").unwrap(),
            name: NonEmptyText::new("Cy").unwrap(),
            city: NonEmptyText::new("Oslo").unwrap(),
            age: FiniteNumber::new(52.0).unwrap(),
            gender: NonEmptyText::new("others").unwrap(),
            height: FiniteNumber::new(1.7).unwrap(),
            weight: FiniteNumber::new(65.0).unwrap(),
        };
        let value = serde_json::to_value(&patient).unwrap();
        let object = value.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["age", "city", "gender", "height", "id", "name", "weight"]
        );
    }
}
