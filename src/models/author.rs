//! Author model and derived display fields

use chrono::NaiveDate;
use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Full author model from database.
///
/// Display name, lifespan, form dates and URL are computed from the stored
/// fields and only appear in the serialized output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Medium date format, e.g. `Oct 17, 2026`
fn format_medium(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

fn format_iso(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

impl Author {
    /// "family_name, first_name"
    pub fn name(&self) -> String {
        format!("{}, {}", self.family_name, self.first_name)
    }

    pub fn lifespan(&self) -> String {
        format!(
            "{} - {}",
            format_medium(self.date_of_birth),
            format_medium(self.date_of_death)
        )
    }

    /// Birth date as `YYYY-MM-DD` for date inputs
    pub fn date_of_birth_form(&self) -> String {
        format_iso(self.date_of_birth)
    }

    /// Death date as `YYYY-MM-DD` for date inputs
    pub fn date_of_death_form(&self) -> String {
        format_iso(self.date_of_death)
    }

    pub fn url(&self) -> String {
        format!("/catalog/author/{}", self.id)
    }
}

impl Serialize for Author {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Author", 10)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("first_name", &self.first_name)?;
        s.serialize_field("family_name", &self.family_name)?;
        s.serialize_field("date_of_birth", &self.date_of_birth)?;
        s.serialize_field("date_of_death", &self.date_of_death)?;
        s.serialize_field("name", &self.name())?;
        s.serialize_field("lifespan", &self.lifespan())?;
        s.serialize_field("dateform_birth", &self.date_of_birth_form())?;
        s.serialize_field("dateform_death", &self.date_of_death_form())?;
        s.serialize_field("url", &self.url())?;
        s.end()
    }
}
