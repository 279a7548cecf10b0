use crate::models::{Project, UpdateProject};
use crate::Database;
use anyhow::Result;
use std::str::FromStr;
use uuid::Uuid;

const MAX_TITLE_LENGTH: usize = 200;
const MAX_DESCRIPTION_LENGTH: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectSort {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
}

impl ProjectSort {
    fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Title => "title",
        }
    }
}

impl FromStr for ProjectSort {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "created_at" => Ok(Self::CreatedAt),
            "updated_at" => Ok(Self::UpdatedAt),
            "title" => Ok(Self::Title),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
pub struct ProjectQuery {
    pub q: Option<String>,
    pub sort: ProjectSort,
    pub order: SortOrder,
    pub limit: usize,
    pub offset: usize,
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        anyhow::bail!("Title cannot be empty");
    }
    if title.len() > MAX_TITLE_LENGTH {
        anyhow::bail!("Title must be {} characters or less", MAX_TITLE_LENGTH);
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<()> {
    if description.len() > MAX_DESCRIPTION_LENGTH {
        anyhow::bail!(
            "Description must be {} characters or less",
            MAX_DESCRIPTION_LENGTH
        );
    }
    Ok(())
}

fn row_to_project(row: &rusqlite::Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

const PROJECT_COLUMNS: &str = "id, owner_id, title, description, created_at, updated_at";

pub fn create_project(
    db: &Database,
    owner_id: i64,
    title: &str,
    description: Option<&str>,
) -> Result<Project> {
    validate_title(title)?;
    if let Some(desc) = description {
        validate_description(desc)?;
    }

    let id = Uuid::new_v4().to_string();
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO projects (id, owner_id, title, description) VALUES (?, ?, ?, ?)",
        (&id, owner_id, title.trim(), description),
    )?;

    let project = conn.query_row(
        &format!("SELECT {} FROM projects WHERE id = ?", PROJECT_COLUMNS),
        [&id],
        row_to_project,
    )?;
    Ok(project)
}

pub fn get_project(db: &Database, id: &str) -> Result<Option<Project>> {
    let conn = db.get()?;
    let project = conn
        .query_row(
            &format!("SELECT {} FROM projects WHERE id = ?", PROJECT_COLUMNS),
            [id],
            row_to_project,
        )
        .ok();
    Ok(project)
}

pub fn update_project(db: &Database, id: &str, update: &UpdateProject) -> Result<()> {
    let conn = db.get()?;
    if let Some(ref title) = update.title {
        validate_title(title)?;
        conn.execute(
            "UPDATE projects SET title = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
            (title.trim(), id),
        )?;
    }
    if let Some(ref description) = update.description {
        validate_description(description)?;
        conn.execute(
            "UPDATE projects SET description = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
            (description, id),
        )?;
    }
    Ok(())
}

pub fn delete_project(db: &Database, id: &str) -> Result<()> {
    let conn = db.get()?;
    conn.execute("DELETE FROM projects WHERE id = ?", [id])?;
    Ok(())
}

pub fn list_projects(db: &Database, owner_id: i64, query: &ProjectQuery) -> Result<Vec<Project>> {
    let conn = db.get()?;
    // Sort column and direction come from whitelisted enums, never raw input.
    let sql = format!(
        "SELECT {} FROM projects WHERE owner_id = ?1 AND (?2 IS NULL OR title LIKE ?3 OR description LIKE ?3) ORDER BY {} {} LIMIT ?4 OFFSET ?5",
        PROJECT_COLUMNS,
        query.sort.column(),
        query.order.keyword(),
    );
    let pattern = query.q.as_ref().map(|q| format!("%{}%", q));
    let mut stmt = conn.prepare(&sql)?;
    let projects = stmt
        .query_map(
            (
                owner_id,
                query.q.as_deref(),
                pattern.as_deref(),
                query.limit,
                query.offset,
            ),
            row_to_project,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(projects)
}

pub fn count_projects(db: &Database, owner_id: i64, q: Option<&str>) -> Result<i64> {
    let conn = db.get()?;
    let pattern = q.map(|q| format!("%{}%", q));
    let count = conn.query_row(
        "SELECT COUNT(*) FROM projects WHERE owner_id = ?1 AND (?2 IS NULL OR title LIKE ?3 OR description LIKE ?3)",
        (owner_id, q, pattern.as_deref()),
        |row| row.get(0),
    )?;
    Ok(count)
}
