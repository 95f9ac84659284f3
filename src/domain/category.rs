use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Free-form tag shared between products. Names are unique and case-sensitive.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Category {
    /// Unique identifier of the category.
    pub id: i32,
    /// Unique name of the category.
    pub name: String,
    /// Timestamp for when the category was first referenced.
    pub created_at: NaiveDateTime,
}
