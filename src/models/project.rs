use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: String,
    pub owner_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateProject {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub description: Option<String>,
}
