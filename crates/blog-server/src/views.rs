//! JSON output shapes for API responses.

use blog_core::storage::User;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Public view of a user account. Never carries the credential record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

/// Convert multiple users to their public views.
pub fn users_view(users: &[User]) -> Vec<UserView> {
    users.iter().map(UserView::from).collect()
}

/// Body of a successful login.
#[derive(Debug, Serialize)]
pub struct LoginView {
    pub message: &'static str,
    pub user: UserView,
}

impl LoginView {
    pub fn new(user: &User) -> Self {
        Self {
            message: "Login successful",
            user: UserView::from(user),
        }
    }
}
