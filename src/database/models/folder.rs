use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::filter::{FieldValue, Filterable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Filterable for Folder {
    fn field(&self, column: &str) -> FieldValue<'_> {
        match column {
            "id" => FieldValue::Uuid(Some(self.id)),
            "user_id" => FieldValue::Uuid(Some(self.user_id)),
            "name" => FieldValue::Text(Some(&self.name)),
            "created_at" => FieldValue::Timestamp(self.created_at),
            "updated_at" => FieldValue::Timestamp(self.updated_at),
            _ => FieldValue::Missing,
        }
    }
}
