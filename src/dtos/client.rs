use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::client::Client;

/// Shared by create and update; updates rewrite every field.
#[derive(Deserialize)]
pub struct ClientRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ClientResponse {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            name: client.name,
            phone: client.phone,
            email: client.email,
            created_at: client.created_at,
        }
    }
}
