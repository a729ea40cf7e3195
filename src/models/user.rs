use serde::Deserialize;
use serde_json::Value;

use super::id_string;

/// A user with access to a location.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "userID", deserialize_with = "id_string")]
    pub user_id: String,
    pub username: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub created: Option<Value>,
    pub deleted: Option<Value>,
    pub activated: Option<bool>,
    pub connected_home_account_exists: Option<bool>,
}

impl User {
    pub fn name(&self) -> Option<&str> {
        self.username.as_deref()
    }
}
