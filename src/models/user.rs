use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Directory entry for a customer. Credentials live outside the booking core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub drivers_license: String,
    pub created_at: DateTime<Utc>,
}
