use club_derive::api_model;

/// Identity of a record removed by a delete endpoint.
#[api_model]
pub struct DeletedRecord {
    pub id: i64,
    /// Display string of the record before deletion
    pub name: String,
}

/// Body of every successful delete.
#[api_model]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted: DeletedRecord,
}

impl DeleteResponse {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self { success: true, deleted: DeletedRecord { id, name: name.into() } }
    }
}
