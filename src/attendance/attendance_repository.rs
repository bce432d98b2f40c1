use crate::error::Result;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;
use super::attendance_models::Attendance;

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// `None` when the user already checked in on `work_date`.
    pub async fn check_in(&self, user_id: Uuid, work_date: NaiveDate) -> Result<Option<Attendance>> {
        let attendance = sqlx::query_as::<_, Attendance>(
            "INSERT INTO attendance (user_id, work_date)
             VALUES ($1, $2)
             ON CONFLICT (user_id, work_date) DO NOTHING
             RETURNING *"
        )
        .bind(user_id)
        .bind(work_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendance)
    }

    pub async fn find_by_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<Attendance>> {
        let records = sqlx::query_as::<_, Attendance>(
            "SELECT * FROM attendance WHERE user_id = $1 ORDER BY work_date DESC LIMIT $2"
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
