use serde::{Deserialize, Serialize};

/// Server-assigned identity of a section. Opaque to the client.
pub type SectionId = String;

/// Server-assigned identity of an item, unique within its section.
pub type ItemId = String;

/// A single trackable entry inside a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "_id")]
    pub id: ItemId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// A named group of items, exactly as the backend returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "_id")]
    pub id: SectionId,
    pub title: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Section {
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    /// (completed, total) item counts.
    pub fn completion_ratio(&self) -> (usize, usize) {
        let total = self.items.len();
        let done = self.items.iter().filter(|i| i.completed).count();
        (done, total)
    }

    pub fn is_complete(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|i| i.completed)
    }
}
