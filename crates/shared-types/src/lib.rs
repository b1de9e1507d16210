use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity returned by `GET /api/auth/me` for a signed-in internal user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUserResponse {
    pub email: String,
    pub name: String,
}

/// A grant record as shown on the internal grants page.
///
/// Carries confidential fields (budget, evaluator, cost center) and must only
/// be served behind the internal authentication gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalGrant {
    pub id: String,
    pub project_name: String,
    pub recipient: String,
    pub amount: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub evaluator: Option<String>,
    pub cost_center: Option<String>,
    pub status: GrantStatus,
    pub approved_at: Option<DateTime<Utc>>,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantStatus {
    Submitted,
    InReview,
    Approved,
    Rejected,
    Completed,
}
