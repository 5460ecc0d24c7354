use serde::{Deserialize, Serialize};

use crate::domain::common::{Displayable, Identifiable};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl Member {
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// "First Last", collapsing a missing half.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

impl Identifiable for Member {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Member {
    fn display_label(&self) -> String {
        self.full_name()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub id: String,
    pub name: String,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl Identifiable for Group {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Group {
    fn display_label(&self) -> String {
        self.name.trim().to_string()
    }
}
