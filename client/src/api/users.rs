//! Typed wrappers for the user account and admin endpoints.
//!
//! Account edits replace one field per call, mirroring the account page's
//! forms. The admin toggle answers with the user's new role set as a
//! comma-joined string, normalized here before anyone else sees it.

use crate::api::client::ApiClient;
use crate::auth::models::{Role, roles_from_joined};
use crate::errors::{ClientError, ClientResult};
use serde::Deserialize;

/// A user record as the list and profile endpoints deliver it.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub profile_pic: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl ApiClient {
    pub async fn get_user(&self, user_id: i64) -> ClientResult<UserRecord> {
        self.get_json(&format!("/users/get/{}", user_id)).await
    }

    pub async fn list_users(&self) -> ClientResult<Vec<UserRecord>> {
        self.get_json("/users/get").await
    }

    pub async fn delete_user(&self, user_id: i64) -> ClientResult<()> {
        self.delete_unit(&format!("/users/delete/{}", user_id)).await
    }

    pub async fn update_email(&self, username: &str, email: &str) -> ClientResult<()> {
        self.post_unit(
            "/users/email/update",
            &serde_json::json!({ "username": username, "email": email }),
        )
        .await
    }

    pub async fn update_username(&self, old_username: &str, username: &str) -> ClientResult<()> {
        self.post_unit(
            "/users/username/update",
            &serde_json::json!({ "olduser": old_username, "username": username }),
        )
        .await
    }

    pub async fn update_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> ClientResult<()> {
        self.post_unit(
            "/users/password/update",
            &serde_json::json!({
                "username": username,
                "oldPassword": old_password,
                "newPassword": new_password
            }),
        )
        .await
    }

    /// Flips a user's admin grant and returns the role set now in force.
    pub async fn toggle_admin(&self, user_id: i64) -> ClientResult<Vec<Role>> {
        let joined: String = self.post_json("/users/admin/update", &user_id).await?;
        roles_from_joined(&joined).map_err(ClientError::malformed_response)
    }

    pub async fn create_user(&self, username: &str, password: &str, email: &str) -> ClientResult<()> {
        self.post_unit(
            "/users/admin/create",
            &serde_json::json!({
                "username": username,
                "password": password,
                "email": email
            }),
        )
        .await
    }
}
