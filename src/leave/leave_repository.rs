use async_trait::async_trait;
use crate::error::Result;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;
use super::leave_models::{LeaveRequest, LeaveStatus};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeaveStore: Send + Sync {
    async fn create(&self, user_id: Uuid, leave_date: NaiveDate, reason: &str) -> Result<LeaveRequest>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<LeaveRequest>>;

    /// Newest first.
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<LeaveRequest>>;

    /// Earliest leave date first.
    async fn find_pending(&self) -> Result<Vec<LeaveRequest>>;

    /// Moves a pending request to `status`; `None` if it was not pending.
    async fn review(
        &self,
        id: Uuid,
        status: LeaveStatus,
        reviewer_id: Uuid,
    ) -> Result<Option<LeaveRequest>>;
}

#[derive(Clone)]
pub struct LeaveRepository {
    pool: PgPool,
}

impl LeaveRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeaveStore for LeaveRepository {
    async fn create(&self, user_id: Uuid, leave_date: NaiveDate, reason: &str) -> Result<LeaveRequest> {
        let leave = sqlx::query_as::<_, LeaveRequest>(
            "INSERT INTO leave_requests (user_id, leave_date, reason)
             VALUES ($1, $2, $3)
             RETURNING *"
        )
        .bind(user_id)
        .bind(leave_date)
        .bind(reason)
        .fetch_one(&self.pool)
        .await?;

        Ok(leave)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<LeaveRequest>> {
        let leave = sqlx::query_as::<_, LeaveRequest>("SELECT * FROM leave_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(leave)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<LeaveRequest>> {
        let leaves = sqlx::query_as::<_, LeaveRequest>(
            "SELECT * FROM leave_requests WHERE user_id = $1 ORDER BY created_at DESC"
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(leaves)
    }

    async fn find_pending(&self) -> Result<Vec<LeaveRequest>> {
        let leaves = sqlx::query_as::<_, LeaveRequest>(
            "SELECT * FROM leave_requests WHERE status = $1 ORDER BY leave_date ASC, created_at ASC"
        )
        .bind(LeaveStatus::Pending.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(leaves)
    }

    async fn review(
        &self,
        id: Uuid,
        status: LeaveStatus,
        reviewer_id: Uuid,
    ) -> Result<Option<LeaveRequest>> {
        let leave = sqlx::query_as::<_, LeaveRequest>(
            "UPDATE leave_requests
             SET status = $2, reviewed_by = $3, updated_at = NOW()
             WHERE id = $1 AND status = $4
             RETURNING *"
        )
        .bind(id)
        .bind(status.as_str())
        .bind(reviewer_id)
        .bind(LeaveStatus::Pending.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(leave)
    }
}
