mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, Row};

use crate::defaults;
use crate::models::*;

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(default_path()?)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    /// Insert the built-in content if the database holds no projects yet.
    /// Returns whether anything was written.
    pub fn seed_if_empty(&self) -> Result<bool> {
        if !self.get_all_projects()?.is_empty() {
            return Ok(false);
        }

        tracing::info!("Seeding database...");

        // Oldest first, so the newest-first listing reads in declaration order.
        for project in defaults::projects().into_iter().rev() {
            self.create_project(project)?;
        }
        for skill in defaults::skills() {
            self.create_skill(skill)?;
        }
        for entry in defaults::timeline() {
            self.create_timeline_entry(entry)?;
        }
        for cert in defaults::certifications() {
            self.create_certification(cert)?;
        }

        tracing::info!("Seeding complete.");
        Ok(true)
    }

    // ============================================================
    // Project operations
    // ============================================================

    pub fn get_all_projects(&self) -> Result<Vec<Project>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, title, description, tech_stack, repo_url, demo_url, featured, created_at
             FROM projects ORDER BY created_at DESC, id DESC",
        )?;

        let projects = stmt
            .query_map([], project_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(projects)
    }

    pub fn get_project(&self, id: i64) -> Result<Option<Project>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, title, description, tech_stack, repo_url, demo_url, featured, created_at
             FROM projects WHERE id = ?",
        )?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            Ok(Some(project_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn create_project(&self, input: CreateProjectInput) -> Result<Project> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let now = Utc::now();
        let tech_stack = serde_json::to_string(&input.tech_stack)?;

        conn.execute(
            "INSERT INTO projects (title, description, tech_stack, repo_url, demo_url, featured, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            (
                &input.title,
                &input.description,
                &tech_stack,
                &input.repo_url,
                &input.demo_url,
                if input.featured { 1 } else { 0 },
                now.to_rfc3339_opts(SecondsFormat::Micros, true),
            ),
        )?;

        Ok(Project {
            id: conn.last_insert_rowid(),
            title: input.title,
            description: input.description,
            tech_stack: input.tech_stack,
            repo_url: input.repo_url,
            demo_url: input.demo_url,
            featured: input.featured,
            created_at: now,
        })
    }

    // ============================================================
    // Skill operations
    // ============================================================

    pub fn get_all_skills(&self) -> Result<Vec<Skill>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, category, name, proficiency FROM skills ORDER BY category, name",
        )?;

        let skills = stmt
            .query_map([], |row| {
                Ok(Skill {
                    id: row.get(0)?,
                    category: row.get(1)?,
                    name: row.get(2)?,
                    proficiency: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(skills)
    }

    pub fn create_skill(&self, input: CreateSkillInput) -> Result<Skill> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "INSERT INTO skills (category, name, proficiency) VALUES (?, ?, ?)",
            (&input.category, &input.name, &input.proficiency),
        )?;

        Ok(Skill {
            id: conn.last_insert_rowid(),
            category: input.category,
            name: input.name,
            proficiency: input.proficiency,
        })
    }

    // ============================================================
    // Timeline operations
    // ============================================================

    pub fn get_timeline(&self) -> Result<Vec<TimelineEntry>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, company, role, duration, description, \"order\"
             FROM experience ORDER BY \"order\", id",
        )?;

        let entries = stmt
            .query_map([], |row| {
                Ok(TimelineEntry {
                    id: row.get(0)?,
                    company: row.get(1)?,
                    role: row.get(2)?,
                    duration: row.get(3)?,
                    description: row.get(4)?,
                    order: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    pub fn create_timeline_entry(&self, input: CreateTimelineInput) -> Result<TimelineEntry> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "INSERT INTO experience (company, role, duration, description, \"order\")
             VALUES (?, ?, ?, ?, ?)",
            (
                &input.company,
                &input.role,
                &input.duration,
                &input.description,
                input.order,
            ),
        )?;

        Ok(TimelineEntry {
            id: conn.last_insert_rowid(),
            company: input.company,
            role: input.role,
            duration: input.duration,
            description: input.description,
            order: input.order,
        })
    }

    // ============================================================
    // Certification operations
    // ============================================================

    pub fn get_certifications(&self) -> Result<Vec<Certification>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, name, issuer, issue_date, expiry_date, credential_id, credential_url
             FROM certifications ORDER BY id",
        )?;

        let certs = stmt
            .query_map([], |row| {
                Ok(Certification {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    issuer: row.get(2)?,
                    issue_date: row.get(3)?,
                    expiry_date: row.get(4)?,
                    credential_id: row.get(5)?,
                    credential_url: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(certs)
    }

    pub fn create_certification(&self, input: CreateCertificationInput) -> Result<Certification> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "INSERT INTO certifications (name, issuer, issue_date, expiry_date, credential_id, credential_url)
             VALUES (?, ?, ?, ?, ?, ?)",
            (
                &input.name,
                &input.issuer,
                &input.issue_date,
                &input.expiry_date,
                &input.credential_id,
                &input.credential_url,
            ),
        )?;

        Ok(Certification {
            id: conn.last_insert_rowid(),
            name: input.name,
            issuer: input.issuer,
            issue_date: input.issue_date,
            expiry_date: input.expiry_date,
            credential_id: input.credential_id,
            credential_url: input.credential_url,
        })
    }

    // ============================================================
    // Contact messages
    // ============================================================

    /// Store a contact submission. Callers validate the input first.
    pub fn create_message(&self, input: CreateMessageInput) -> Result<ContactMessage> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let now = Utc::now();
        let name = input.name.trim().to_string();
        let email = input.email.trim().to_string();
        let message = input.message.trim().to_string();

        conn.execute(
            "INSERT INTO messages (name, email, message, created_at) VALUES (?, ?, ?, ?)",
            (
                &name,
                &email,
                &message,
                now.to_rfc3339_opts(SecondsFormat::Micros, true),
            ),
        )?;

        Ok(ContactMessage {
            id: conn.last_insert_rowid(),
            name,
            email,
            message,
            created_at: now,
        })
    }

    /// All contact messages, newest first.
    pub fn get_messages(&self) -> Result<Vec<ContactMessage>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, name, email, message, created_at FROM messages ORDER BY created_at DESC, id DESC",
        )?;

        let messages = stmt
            .query_map([], |row| {
                Ok(ContactMessage {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    message: row.get(3)?,
                    created_at: parse_datetime(row.get::<_, String>(4)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(messages)
    }
}

/// `<data_dir>/folio.db` under the platform's per-user data directory.
pub fn default_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "folio")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().join("folio.db"))
}

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        tech_stack: parse_string_list(row.get::<_, String>(3)?),
        repo_url: row.get(4)?,
        demo_url: row.get(5)?,
        featured: row.get::<_, i32>(6)? != 0,
        created_at: parse_datetime(row.get::<_, String>(7)?),
    })
}

fn parse_string_list(s: String) -> Vec<String> {
    serde_json::from_str(&s).unwrap_or_default()
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
