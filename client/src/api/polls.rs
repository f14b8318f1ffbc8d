//! Typed wrappers for the poll and season endpoints.
//!
//! Polls drive everything the app shows: each poll names a season and a stat
//! selection, and the poll's player table is served ready-ranked by the API.
//! The server omits zero-valued stat fields, so every stat deserializes with
//! a default.

use crate::api::client::ApiClient;
use crate::errors::ClientResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poll {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub selected_stats: String,
    pub season: String,
    #[serde(default)]
    pub user_id: i64,
}

/// Fields the creation form submits; the id is assigned server-side.
#[derive(Debug, Clone)]
pub struct NewPoll {
    pub name: String,
    pub description: String,
    pub selected_stats: String,
    pub season: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerStats {
    #[serde(default)]
    pub g: i64,
    #[serde(default)]
    pub gs: i64,
    #[serde(default)]
    pub mpg: f64,
    #[serde(default)]
    pub ppg: f64,
    #[serde(default)]
    pub rpg: f64,
    #[serde(default)]
    pub apg: f64,
    #[serde(default)]
    pub spg: f64,
    #[serde(default)]
    pub bpg: f64,
    #[serde(default)]
    pub topg: f64,
    #[serde(default)]
    pub fgpct: f64,
    #[serde(default)]
    pub threefgpct: f64,
    #[serde(default)]
    pub ftpct: f64,
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub position: String,
    #[serde(default, rename = "team")]
    pub team_abbr: String,
    #[serde(default)]
    pub rookie: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdvancedStats {
    #[serde(default)]
    pub per: f64,
    #[serde(default)]
    pub ts: f64,
    #[serde(default)]
    pub usg: f64,
    #[serde(default)]
    pub ows: f64,
    #[serde(default)]
    pub dws: f64,
    #[serde(default)]
    pub ws: f64,
    #[serde(default)]
    pub obpm: f64,
    #[serde(default)]
    pub dbpm: f64,
    #[serde(default)]
    pub bpm: f64,
    #[serde(default)]
    pub vorp: f64,
    #[serde(default)]
    pub offrtg: f64,
    #[serde(default)]
    pub defrtg: f64,
}

/// One row of a poll's player table.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "playerid")]
    pub player_id: String,
    #[serde(default)]
    pub college: String,
    #[serde(default, rename = "team")]
    pub team_abbr: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub age: i64,
    #[serde(default)]
    pub stats: PlayerStats,
    #[serde(default)]
    pub advstats: AdvancedStats,
}

#[derive(Debug, Deserialize)]
pub struct PollDeleted {
    pub message: String,
    pub rows_affected: i64,
}

impl ApiClient {
    pub async fn get_polls(&self) -> ClientResult<Vec<Poll>> {
        self.get_json("/polls/get").await
    }

    pub async fn get_poll(&self, poll_id: i64) -> ClientResult<Poll> {
        self.get_json(&format!("/polls/get/{}", poll_id)).await
    }

    /// The ranked player table backing a poll's voting page.
    pub async fn poll_players(&self, poll_id: i64) -> ClientResult<Vec<PlayerInfo>> {
        self.get_json(&format!("/polls/players/get/{}", poll_id))
            .await
    }

    /// Creates a poll. The wire is a multipart form; the poll photo part is
    /// uploaded separately and is not this client's concern.
    pub async fn create_poll(&self, poll: &NewPoll) -> ClientResult<()> {
        let payload = poll.clone();
        self.post_multipart("/polls/create", move || {
            reqwest::multipart::Form::new()
                .text("name", payload.name.clone())
                .text("description", payload.description.clone())
                .text("season", payload.season.clone())
                .text("selectedStats", payload.selected_stats.clone())
                .text("userid", payload.user_id.to_string())
        })
        .await
    }

    pub async fn update_poll(&self, poll: &Poll) -> ClientResult<()> {
        self.post_unit("/polls/update", poll).await
    }

    pub async fn delete_poll(&self, poll_id: i64) -> ClientResult<PollDeleted> {
        self.delete_json(&format!("/polls/delete/{}", poll_id)).await
    }

    pub async fn reset_poll_votes(&self, poll_id: i64) -> ClientResult<()> {
        self.post_unit("/polls/votes/reset", &poll_id).await
    }

    /// Polls created by one user.
    pub async fn user_polls(&self, user_id: i64) -> ClientResult<Vec<Poll>> {
        self.get_json(&format!("/polls/users/get/{}", user_id)).await
    }

    pub async fn get_seasons(&self) -> ClientResult<Vec<String>> {
        self.get_json("/seasons/get").await
    }
}
