use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

pub const SLOT_SUBJECT_NAME: &str = "nombre";
pub const SLOT_DATE: &str = "fecha";
pub const SLOT_SPECIALTY: &str = "especialidad";

/// Read access to the conversation slots filled by the dialogue engine.
pub trait SlotStore: Send + Sync {
    fn get_slot(&self, key: &str) -> Option<String>;
}

impl SlotStore for HashMap<String, String> {
    fn get_slot(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlotSnapshot {
    values: BTreeMap<String, String>,
}

impl SlotSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Builds a snapshot from a JSON slot object.
    ///
    /// Strings are kept verbatim and non-zero numbers use their textual form. Zero,
    /// nulls, booleans, lists and objects are treated as unset.
    pub fn from_json(slots: &Map<String, Value>) -> Self {
        let values = slots
            .iter()
            .filter_map(|(key, value)| slot_text(value).map(|text| (key.clone(), text)))
            .collect();
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SlotStore for SlotSnapshot {
    fn get_slot(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for SlotSnapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { values: iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect() }
    }
}

fn slot_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        // Zero is falsy for the engine's slot checks, same as an empty string.
        Value::Number(number) if number.as_f64().is_some_and(|value| value == 0.0) => None,
        Value::Number(number) => Some(number.to_string()),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::{SlotSnapshot, SlotStore, SLOT_DATE, SLOT_SPECIALTY, SLOT_SUBJECT_NAME};

    #[test]
    fn json_slots_keep_text_and_numbers() {
        let raw = json!({
            "nombre": "Ana",
            "fecha": 20251201,
            "especialidad": null,
            "confirmado": true,
            "sintomas": ["tos"],
            "edad": 0,
            "peso": 0.0,
            "piso": -2,
        });
        let snapshot = SlotSnapshot::from_json(raw.as_object().expect("object literal"));

        assert_eq!(snapshot.get_slot(SLOT_SUBJECT_NAME).as_deref(), Some("Ana"));
        assert_eq!(snapshot.get_slot(SLOT_DATE).as_deref(), Some("20251201"));
        assert_eq!(snapshot.get_slot(SLOT_SPECIALTY), None);
        assert_eq!(snapshot.get_slot("confirmado"), None);
        assert_eq!(snapshot.get_slot("sintomas"), None);
        assert_eq!(snapshot.get_slot("edad"), None);
        assert_eq!(snapshot.get_slot("peso"), None);
        assert_eq!(snapshot.get_slot("piso").as_deref(), Some("-2"));
        assert_eq!(snapshot.len(), 3);
    }

    #[test]
    fn builder_and_iterator_construct_equal_snapshots() {
        let built = SlotSnapshot::new().with_slot("nombre", "Luis").with_slot("fecha", "mañana");
        let collected: SlotSnapshot =
            [("nombre", "Luis"), ("fecha", "mañana")].into_iter().collect();

        assert_eq!(built, collected);
    }

    #[test]
    fn hash_map_is_a_slot_store() {
        let mut slots = HashMap::new();
        slots.insert("especialidad".to_string(), "Pediatría".to_string());

        assert_eq!(slots.get_slot(SLOT_SPECIALTY).as_deref(), Some("Pediatría"));
        assert_eq!(slots.get_slot(SLOT_SUBJECT_NAME), None);
    }
}
