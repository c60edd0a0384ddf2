use serde::{Deserialize, Serialize};

/// A row of the player directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    pub position: Option<String>,
}

impl PlayerRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position: position.map(str::to_string),
        }
    }
}
