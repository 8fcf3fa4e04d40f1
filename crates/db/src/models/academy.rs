use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use crate::sync::SyncRecord;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub fee_cents: i64,
    pub schedule: Option<String>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateCourse {
    pub name: String,
    pub description: Option<String>,
    pub fee_cents: i64,
    pub schedule: Option<String>,
}

#[derive(
    Debug, Clone, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StudentStatus {
    #[default]
    Active,
    Completed,
    Withdrawn,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub course_id: Option<Uuid>,
    pub enrolled_at: DateTime<Utc>,
    pub status: StudentStatus,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateStudent {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub course_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateStudent {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub course_id: Option<Uuid>,
    pub status: StudentStatus,
}

impl Course {
    pub async fn find_all(
        pool: &SqlitePool,
        include_archived: bool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        if include_archived {
            sqlx::query_as::<_, Self>("SELECT * FROM courses ORDER BY name ASC")
                .fetch_all(pool)
                .await
        } else {
            sqlx::query_as::<_, Self>(
                "SELECT * FROM courses WHERE is_archived = 0 ORDER BY name ASC",
            )
            .fetch_all(pool)
            .await
        }
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateCourse,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO courses (id, name, description, fee_cents, schedule)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING *"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.fee_cents)
        .bind(&data.schedule)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &CreateCourse,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE courses
               SET name = $2, description = $3, fee_cents = $4, schedule = $5,
                   updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.fee_cents)
        .bind(&data.schedule)
        .fetch_one(pool)
        .await
    }

    pub async fn set_archived(
        pool: &SqlitePool,
        id: Uuid,
        archived: bool,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE courses SET is_archived = $2, updated_at = datetime('now', 'subsec') WHERE id = $1",
        )
        .bind(id)
        .bind(archived)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn purge(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1 AND is_archived = 1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Non-archived students still enrolled in this course.
    pub async fn count_active_students(pool: &SqlitePool, id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM students WHERE course_id = $1 AND is_archived = 0 AND status = 'active'",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }
}

impl Student {
    pub async fn find_all(
        pool: &SqlitePool,
        include_archived: bool,
    ) -> Result<Vec<Self>, sqlx::Error> {
        if include_archived {
            sqlx::query_as::<_, Self>("SELECT * FROM students ORDER BY created_at DESC")
                .fetch_all(pool)
                .await
        } else {
            sqlx::query_as::<_, Self>(
                "SELECT * FROM students WHERE is_archived = 0 ORDER BY created_at DESC",
            )
            .fetch_all(pool)
            .await
        }
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM students WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_course_id(
        pool: &SqlitePool,
        course_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM students WHERE course_id = $1 AND is_archived = 0 ORDER BY name ASC",
        )
        .bind(course_id)
        .fetch_all(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateStudent,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO students (id, name, email, phone, course_id)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING *"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(data.course_id)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateStudent,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE students
               SET name = $2, email = $3, phone = $4, course_id = $5, status = $6,
                   updated_at = datetime('now', 'subsec')
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(data.course_id)
        .bind(&data.status)
        .fetch_one(pool)
        .await
    }

    pub async fn set_archived(
        pool: &SqlitePool,
        id: Uuid,
        archived: bool,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE students SET is_archived = $2, updated_at = datetime('now', 'subsec') WHERE id = $1",
        )
        .bind(id)
        .bind(archived)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn purge(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1 AND is_archived = 1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl SyncRecord for Course {
    const TABLE: &'static str = "courses";

    fn sync_id(&self) -> Uuid {
        self.id
    }

    async fn fetch_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        Self::find_all(pool, true).await
    }

    async fn upsert(tx: &mut Transaction<'_, Sqlite>, row: &Self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"INSERT INTO courses (id, name, description, fee_cents, schedule, is_archived, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, datetime('now', 'subsec'))
               ON CONFLICT(id) DO UPDATE SET
                   name = excluded.name,
                   description = excluded.description,
                   fee_cents = excluded.fee_cents,
                   schedule = excluded.schedule,
                   is_archived = excluded.is_archived,
                   updated_at = datetime('now', 'subsec')"#,
        )
        .bind(row.id)
        .bind(&row.name)
        .bind(&row.description)
        .bind(row.fee_cents)
        .bind(&row.schedule)
        .bind(row.is_archived)
        .bind(row.created_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl SyncRecord for Student {
    const TABLE: &'static str = "students";

    fn sync_id(&self) -> Uuid {
        self.id
    }

    async fn fetch_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        Self::find_all(pool, true).await
    }

    async fn upsert(tx: &mut Transaction<'_, Sqlite>, row: &Self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"INSERT INTO students (id, name, email, phone, course_id, enrolled_at, status, is_archived, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, datetime('now', 'subsec'))
               ON CONFLICT(id) DO UPDATE SET
                   name = excluded.name,
                   email = excluded.email,
                   phone = excluded.phone,
                   course_id = excluded.course_id,
                   enrolled_at = excluded.enrolled_at,
                   status = excluded.status,
                   is_archived = excluded.is_archived,
                   updated_at = datetime('now', 'subsec')"#,
        )
        .bind(row.id)
        .bind(&row.name)
        .bind(&row.email)
        .bind(&row.phone)
        .bind(row.course_id)
        .bind(row.enrolled_at)
        .bind(&row.status)
        .bind(row.is_archived)
        .bind(row.created_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
