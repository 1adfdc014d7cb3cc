use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `PROMO_LANDING__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub page: PageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

/// Connection settings for the hosted wallet provider.
#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    #[serde(default = "default_wallet_base_url")]
    pub base_url: String,
    /// DApp identifier registered with the provider.
    #[serde(default)]
    pub app_id: String,
    #[serde(default = "default_wallet_network")]
    pub network: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_idle_ttl_secs")]
    pub idle_ttl_secs: u64,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
    #[serde(default = "default_maintenance_interval_secs")]
    pub maintenance_interval_secs: u64,
}

/// Copy and branding for the rendered landing page.
#[derive(Debug, Clone, Deserialize)]
pub struct PageConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_event_date_label")]
    pub event_date_label: String,
    #[serde(default = "default_follow_links")]
    pub follow_links: Vec<String>,
    #[serde(default = "default_create_wallet_url")]
    pub create_wallet_url: String,
    #[serde(default = "default_logo_path")]
    pub logo_path: String,
    #[serde(default = "default_logo_alt")]
    pub logo_alt: String,
    #[serde(default = "default_favicon_path")]
    pub favicon_path: String,
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

// Default functions
fn default_node_id() -> String {
    "landing-01".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_metrics_enabled() -> bool {
    true
}
fn default_metrics_port() -> u16 {
    9091
}
fn default_wallet_base_url() -> String {
    "https://api.portis.io".to_string()
}
fn default_wallet_network() -> String {
    "mainnet".to_string()
}
fn default_request_timeout_ms() -> u64 {
    30_000
}
fn default_connect_timeout_ms() -> u64 {
    10_000
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_idle_ttl_secs() -> u64 {
    1800
}
fn default_max_sessions() -> usize {
    100_000
}
fn default_maintenance_interval_secs() -> u64 {
    60
}
fn default_title() -> String {
    "Portis × 3LAU".to_string()
}
fn default_event_date_label() -> String {
    "06.04.21".to_string()
}
fn default_follow_links() -> Vec<String> {
    vec![
        "https://twitter.com/3LAU".to_string(),
        "https://twitter.com/portis_io".to_string(),
    ]
}
fn default_create_wallet_url() -> String {
    "https://wallet.portis.io/register".to_string()
}
fn default_logo_path() -> String {
    "/static/3lau-logo.png".to_string()
}
fn default_logo_alt() -> String {
    "3LAU Logo".to_string()
}
fn default_favicon_path() -> String {
    "/static/favicon.ico".to_string()
}
fn default_refresh_secs() -> u64 {
    1
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            port: default_metrics_port(),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            base_url: default_wallet_base_url(),
            app_id: String::new(),
            network: default_wallet_network(),
            request_timeout_ms: default_request_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: default_idle_ttl_secs(),
            max_sessions: default_max_sessions(),
            maintenance_interval_secs: default_maintenance_interval_secs(),
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            event_date_label: default_event_date_label(),
            follow_links: default_follow_links(),
            create_wallet_url: default_create_wallet_url(),
            logo_path: default_logo_path(),
            logo_alt: default_logo_alt(),
            favicon_path: default_favicon_path(),
            refresh_secs: default_refresh_secs(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            wallet: WalletConfig::default(),
            polling: PollingConfig::default(),
            session: SessionConfig::default(),
            page: PageConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> crate::PromoResult<Self> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("PROMO_LANDING")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("page.follow_links"),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Reject values the rest of the service cannot work with.
    pub fn validate(&self) -> crate::PromoResult<()> {
        if self.polling.tick_interval_ms == 0 {
            return Err(crate::PromoError::Config(
                "polling.tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.session.max_sessions == 0 {
            return Err(crate::PromoError::Config(
                "session.max_sessions must be greater than zero".to_string(),
            ));
        }
        if self.wallet.base_url.is_empty() {
            return Err(crate::PromoError::Config(
                "wallet.base_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
