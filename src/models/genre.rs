//! Genre model

use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::parse_ref;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
}

impl Genre {
    pub fn url(&self) -> String {
        format!("/catalog/genre/{}", self.id)
    }
}

impl Serialize for Genre {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Genre", 3)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("url", &self.url())?;
        s.end()
    }
}

/// A genre as offered in the book form, with its pre-selection state.
/// Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct GenreChoice {
    #[serde(flatten)]
    pub genre: Genre,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub checked: bool,
}

impl GenreChoice {
    /// Mark every genre whose id is among `selected`.
    ///
    /// Membership by id only: the catalog and the selection may differ in
    /// length and order, and selected values that do not parse match nothing.
    pub fn mark<S: AsRef<str>>(genres: Vec<Genre>, selected: &[S]) -> Vec<GenreChoice> {
        let selected: Vec<Uuid> = selected.iter().filter_map(|s| parse_ref(s.as_ref())).collect();
        genres
            .into_iter()
            .map(|genre| {
                let checked = selected.contains(&genre.id);
                GenreChoice { genre, checked }
            })
            .collect()
    }
}
