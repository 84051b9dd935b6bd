use serde::{Deserialize, Serialize};

/// The signed-in user's own profile, delivered on the user channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}
