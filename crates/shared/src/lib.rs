pub mod chat;
pub mod error;

pub mod settings {
    use serde::{Deserialize, Serialize};

    /// Inference backend endpoints.
    ///
    /// All four capability routes (`/chat`, `/generate-image`, `/search`,
    /// `/upload-pdf` + `/ask-pdf`) hang off the same base URL.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct BackendSettings {
        pub base_url: String,
    }

    impl Default for BackendSettings {
        fn default() -> Self {
            Self {
                base_url: "https://naveenasenthil-intellio.hf.space".into(),
            }
        }
    }

    /// Remote chat-history store (account-scoped row store).
    #[derive(Debug, Clone, Serialize, Deserialize, Default)]
    pub struct StoreSettings {
        /// Project base URL, e.g. "https://xyz.supabase.co"
        pub url: Option<String>,
        /// Project API key sent as the `apikey` header
        pub api_key: Option<String>,
    }

    impl StoreSettings {
        pub fn is_configured(&self) -> bool {
            self.url.is_some() && self.api_key.is_some()
        }
    }

    /// Externally issued identity. The core treats both fields as opaque
    /// tokens; they only scope persistence and document queries.
    #[derive(Debug, Clone, Serialize, Deserialize, Default)]
    pub struct Identity {
        pub user_id: Option<String>,
        pub access_token: Option<String>,
        pub email: Option<String>,
    }

    /// User profile for personalization
    #[derive(Debug, Clone, Serialize, Deserialize, Default)]
    pub struct UserProfile {
        pub name: String,
        pub dark_mode: bool,
    }

    #[derive(Debug, Clone, Serialize, Deserialize, Default)]
    pub struct AppSettings {
        #[serde(default)]
        pub backend: BackendSettings,
        #[serde(default)]
        pub store: StoreSettings,
        #[serde(default)]
        pub identity: Identity,
        #[serde(default)]
        pub user_profile: UserProfile,
    }
}

pub mod api {
    use serde::{Deserialize, Serialize};

    /// Role-tagged history entry in the shape the chat route expects.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ChatMessage {
        pub role: String, // "user" | "assistant"
        pub content: String,
    }
}
