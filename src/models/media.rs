use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Media {
    pub id: String,
    pub project_id: String,
    pub file_name: String,
    pub storage_path: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub uploaded_by: Option<i64>,
    pub uploaded_at: String,
}
