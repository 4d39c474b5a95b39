use serde::Deserialize;
use serde_json::{Map, Value};

/// Editable profile fields. Absent or blank values leave the column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

impl UpdateUserRequest {
    /// Column changes as a PostgREST PATCH body.
    pub fn changes(&self) -> Map<String, Value> {
        let mut changes = Map::new();

        let fields = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("phone_number", &self.phone_number),
        ];
        for (column, value) in fields {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                changes.insert(column.to_string(), Value::String(value.to_string()));
            }
        }

        changes
    }
}
