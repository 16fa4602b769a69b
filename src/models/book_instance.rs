//! Book instance (physical copy) model

use chrono::NaiveDate;
use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};
use utoipa::ToSchema;
use uuid::Uuid;

/// Copy availability status, stored as its label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BookInstanceStatus {
    Available,
    Maintenance,
    Loaned,
    Reserved,
}

impl BookInstanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookInstanceStatus::Available => "Available",
            BookInstanceStatus::Maintenance => "Maintenance",
            BookInstanceStatus::Loaned => "Loaned",
            BookInstanceStatus::Reserved => "Reserved",
        }
    }
}

impl From<&str> for BookInstanceStatus {
    fn from(s: &str) -> Self {
        match s {
            "Available" => BookInstanceStatus::Available,
            "Loaned" => BookInstanceStatus::Loaned,
            "Reserved" => BookInstanceStatus::Reserved,
            _ => BookInstanceStatus::Maintenance,
        }
    }
}

impl Default for BookInstanceStatus {
    fn default() -> Self {
        BookInstanceStatus::Maintenance
    }
}

impl std::fmt::Display for BookInstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    /// Referenced book
    pub book: Uuid,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: Option<NaiveDate>,
}

impl BookInstance {
    pub fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }
}

impl Serialize for BookInstance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("BookInstance", 6)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("book", &self.book)?;
        s.serialize_field("imprint", &self.imprint)?;
        s.serialize_field("status", &self.status)?;
        s.serialize_field("due_back", &self.due_back)?;
        s.serialize_field("url", &self.url())?;
        s.end()
    }
}
