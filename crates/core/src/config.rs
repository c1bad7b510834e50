use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `STUDIO_REACH__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,
    #[serde(default)]
    pub calling: CallingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// How long a one-time code stays valid.
    #[serde(default = "default_otp_ttl_secs")]
    pub otp_ttl_secs: u64,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppConfig {
    #[serde(default = "default_whatsapp_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_whatsapp_session_name")]
    pub session_name: String,
    #[serde(default)]
    pub sender_number: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallingConfig {
    #[serde(default = "default_calling_url")]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
    #[serde(default = "default_calling_agent_name")]
    pub agent_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

// Default functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_otp_ttl_secs() -> u64 {
    600
}
fn default_session_ttl_hours() -> u64 {
    24
}
fn default_whatsapp_api_base_url() -> String {
    "https://wasenderapi.com/api".to_string()
}
fn default_whatsapp_session_name() -> String {
    "studio-reach".to_string()
}
fn default_calling_url() -> String {
    "wss://localhost:7880".to_string()
}
fn default_calling_agent_name() -> String {
    "outbound-caller".to_string()
}
fn default_metrics_port() -> u16 {
    9091
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            otp_ttl_secs: default_otp_ttl_secs(),
            session_ttl_hours: default_session_ttl_hours(),
        }
    }
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_whatsapp_api_base_url(),
            api_key: String::new(),
            session_name: default_whatsapp_session_name(),
            sender_number: String::new(),
        }
    }
}

impl Default for CallingConfig {
    fn default() -> Self {
        Self {
            url: default_calling_url(),
            api_key: String::new(),
            api_secret: String::new(),
            agent_name: default_calling_agent_name(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            port: default_metrics_port(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            auth: AuthConfig::default(),
            whatsapp: WhatsAppConfig::default(),
            calling: CallingConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("STUDIO_REACH")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
