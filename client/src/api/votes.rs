//! Typed wrappers for the vote endpoints.

use crate::api::client::ApiClient;
use crate::errors::ClientResult;
use serde::{Deserialize, Serialize};

/// One bar of a poll's results chart.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerVotes {
    pub name: String,
    pub value: i64,
    pub pollname: String,
}

/// A vote the signed-in user has cast, as listed on the my-votes page.
#[derive(Debug, Clone, Deserialize)]
pub struct UserVote {
    pub poll_id: String,
    pub player_id: String,
    pub player_name: String,
    pub poll_name: String,
    #[serde(default)]
    pub poll_image: String,
}

#[derive(Debug, Serialize)]
pub struct VotePayload {
    #[serde(rename = "playerid")]
    pub player_id: String,
    #[serde(rename = "pollid")]
    pub poll_id: i64,
    #[serde(rename = "userid")]
    pub user_id: i64,
}

impl ApiClient {
    /// Current tallies for a poll.
    pub async fn poll_votes(&self, poll_id: i64) -> ClientResult<Vec<PlayerVotes>> {
        self.get_json(&format!("/votes/players/{}", poll_id)).await
    }

    /// Casts a vote. The server answers with a plain-text confirmation.
    pub async fn cast_vote(&self, vote: &VotePayload) -> ClientResult<()> {
        self.post_unit("/votes/players", vote).await
    }

    /// Everything one user has voted on.
    pub async fn user_votes(&self, user_id: i64) -> ClientResult<Vec<UserVote>> {
        self.get_json(&format!("/votes/users/get/{}", user_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_payload_uses_the_wire_field_names() {
        let payload = VotePayload {
            player_id: "jokicni01".to_string(),
            poll_id: 3,
            user_id: 7,
        };

        let encoded = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            encoded,
            serde_json::json!({"playerid": "jokicni01", "pollid": 3, "userid": 7})
        );
    }
}
