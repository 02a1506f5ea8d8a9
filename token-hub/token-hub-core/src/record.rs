//! Mapping between [`TokenRecord`] values and flat CSV rows.

use crate::storage::Row;
use serde::{Deserialize, Serialize};

/// Number of fields in a persisted token row.
pub const FIELD_COUNT: usize = 6;

/// One access token entry. Every field is free-form text and is stored
/// verbatim.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    pub project_name: String,
    pub token: String,
    pub permission: String,
    pub user_id: String,
    pub user_name: String,
    pub expiry_date: String,
}

impl TokenRecord {
    /// Decode a row positionally. Returns `None` unless the row has exactly
    /// [`FIELD_COUNT`] fields.
    pub fn from_row(row: Row) -> Option<Self> {
        let [project_name, token, permission, user_id, user_name, expiry_date] =
            <[String; FIELD_COUNT]>::try_from(row).ok()?;
        Some(Self {
            project_name,
            token,
            permission,
            user_id,
            user_name,
            expiry_date,
        })
    }

    pub fn into_row(self) -> Row {
        vec![
            self.project_name,
            self.token,
            self.permission,
            self.user_id,
            self.user_name,
            self.expiry_date,
        ]
    }

    pub fn to_row(&self) -> Row {
        self.clone().into_row()
    }
}

/// Decode every well-formed row, keeping file order. Rows with the wrong
/// field count are skipped.
pub fn decode_all(rows: impl IntoIterator<Item = Row>) -> Vec<TokenRecord> {
    let mut records = Vec::new();
    for (idx, row) in rows.into_iter().enumerate() {
        let fields = row.len();
        match TokenRecord::from_row(row) {
            Some(record) => records.push(record),
            None => tracing::debug!(row = idx, fields, "skipping malformed token row"),
        }
    }
    records
}
