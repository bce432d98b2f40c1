use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLeaveRequest {
    pub leave_date: NaiveDate,
    #[validate(length(min = 1, max = 1000))]
    pub reason: String,
}
