use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::update::ColumnMap;

/// A user as returned by the API. The password credential is write-only
/// and deliberately has no field here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub const USER_COLUMNS: ColumnMap = ColumnMap::new(
    "users",
    "username",
    &[
        ("firstName", "first_name"),
        ("lastName", "last_name"),
        ("isAdmin", "is_admin"),
    ],
    &["username"],
    &[],
);
