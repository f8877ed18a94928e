use std::env;

const DEFAULT_SECRET_KEY: &str = "unsafe-secret-key";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub google_auth_url: String,
    pub google_token_url: String,
    pub google_userinfo_url: String,
    pub gmail_api_base_url: String,
    pub redirect_uri: String,
    pub frontend_url: String,
    pub secret_key: String,
    pub openai_model: String,
    pub openai_api_hostname: String,
    pub openai_api_key: String,
}

impl AppConfig {
    /// Returns the OAuth client id and secret, or `None` when either is
    /// missing or blank.
    pub fn google_client(&self) -> Option<(&str, &str)> {
        let id = self.google_client_id.as_deref().filter(|s| !s.is_empty())?;
        let secret = self
            .google_client_secret
            .as_deref()
            .filter(|s| !s.is_empty())?;
        Some((id, secret))
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        // A missing .env file is fine, everything can come from the
        // process environment
        let _ = dotenvy::dotenv();

        let google_client_id = env::var("GOOGLE_CLIENT_ID").ok();
        let google_client_secret = env::var("GOOGLE_CLIENT_SECRET").ok();
        let google_auth_url = env::var("GOOGLE_AUTH_URL")
            .unwrap_or_else(|_| "https://accounts.google.com/o/oauth2/auth".to_string());
        let google_token_url = env::var("GOOGLE_TOKEN_URL")
            .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string());
        let google_userinfo_url = env::var("GOOGLE_USERINFO_URL")
            .unwrap_or_else(|_| "https://www.googleapis.com/oauth2/v2/userinfo".to_string());
        let gmail_api_base_url = env::var("GMAIL_API_BASE_URL")
            .unwrap_or_else(|_| "https://gmail.googleapis.com".to_string());
        let redirect_uri = env::var("REDIRECT_URI")
            .unwrap_or_else(|_| "http://localhost:8000/auth/callback".to_string());
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let secret_key = env::var("SECRET_KEY").unwrap_or_else(|_| DEFAULT_SECRET_KEY.to_string());
        let openai_api_hostname = env::var("OPENAI_API_HOSTNAME")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());
        let openai_api_key =
            env::var("OPENAI_API_KEY").unwrap_or_else(|_| "thiswontworkforopenai".to_string());
        let openai_model = env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4.1-mini".to_string());

        Self {
            google_client_id,
            google_client_secret,
            google_auth_url,
            google_token_url,
            google_userinfo_url,
            gmail_api_base_url,
            redirect_uri,
            frontend_url,
            secret_key,
            openai_model,
            openai_api_hostname,
            openai_api_key,
        }
    }
}
