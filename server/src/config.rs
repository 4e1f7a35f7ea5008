//! Server configuration
//!
//! Configuration is loaded from environment variables. Unset or unparseable
//! variables fall back to the defaults below.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,

    /// Session store configuration
    pub session: SessionConfig,

    /// Booking flow configuration
    pub flow: FlowConfig,
}

/// Session-related configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Idle time after which a session is considered expired
    pub ttl: Duration,
    /// Interval between expiry sweeps
    pub cleanup_interval: Duration,
    /// Name of the cookie carrying the session id
    pub cookie_name: String,
}

/// How strictly step preconditions are enforced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationPolicy {
    /// Only the confirmation step is guarded
    #[default]
    Permissive,
    /// Every step checks that the steps it depends on were visited
    Strict,
}

impl FromStr for NavigationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown navigation policy: {}", other)),
        }
    }
}

/// Booking flow configuration
#[derive(Debug, Clone)]
pub struct FlowConfig {
    /// Artificial delay applied to every search
    pub search_delay: Duration,
    /// Verification attempt number that finally succeeds
    pub otp_success_attempt: u32,
    /// Step precondition enforcement
    pub navigation: NavigationPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            session: SessionConfig::default(),
            flow: FlowConfig::default(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30 * 60), // 30 minutes
            cleanup_interval: Duration::from_secs(60),
            cookie_name: "detour_session".to_string(),
        }
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            search_delay: Duration::from_secs(2),
            otp_success_attempt: 4,
            navigation: NavigationPolicy::Permissive,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Server config
        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("PORT")
            && let Ok(p) = port.parse()
        {
            config.port = p;
        }

        // Session config
        if let Ok(val) = env::var("SESSION_TTL_MINS")
            && let Ok(mins) = val.parse::<u64>()
        {
            config.session.ttl = Duration::from_secs(mins * 60);
        }
        if let Ok(val) = env::var("SESSION_CLEANUP_INTERVAL_SECS")
            && let Ok(secs) = val.parse::<u64>()
            && secs > 0
        {
            config.session.cleanup_interval = Duration::from_secs(secs);
        }
        if let Ok(name) = env::var("SESSION_COOKIE_NAME")
            && !name.is_empty()
        {
            config.session.cookie_name = name;
        }

        // Flow config
        if let Ok(val) = env::var("SEARCH_DELAY_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            config.flow.search_delay = Duration::from_millis(ms);
        }
        if let Ok(val) = env::var("OTP_SUCCESS_ATTEMPT")
            && let Ok(n) = val.parse::<u32>()
            && n > 0
        {
            config.flow.otp_success_attempt = n;
        }
        if let Ok(val) = env::var("NAVIGATION_POLICY") {
            match val.parse() {
                Ok(policy) => config.flow.navigation = policy,
                Err(e) => tracing::warn!("Ignoring NAVIGATION_POLICY: {}", e),
            }
        }

        config
    }
}
