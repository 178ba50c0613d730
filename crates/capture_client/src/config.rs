use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("dsn must use the https scheme: {0}")]
    UnsupportedScheme(String),
    #[error("dsn is missing the public key: {0}")]
    MissingKey(String),
    #[error("dsn is missing the host: {0}")]
    MissingHost(String),
    #[error("dsn is missing the project id: {0}")]
    MissingProject(String),
}

/// Ingest credentials and endpoint, fixed for the lifetime of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    key: String,
    endpoint: String,
    project: String,
}

impl ClientConfig {
    pub fn new(key: impl Into<String>, host: &str, project: impl Into<String>) -> Self {
        let project = project.into();
        Self {
            key: key.into(),
            endpoint: format!("https://{host}/api/{project}"),
            project,
        }
    }

    /// Parses `https://<key>@<host>/<project>`.
    pub fn from_dsn(dsn: &str) -> Result<Self, ConfigError> {
        let rest = dsn
            .strip_prefix("https://")
            .ok_or_else(|| ConfigError::UnsupportedScheme(dsn.to_string()))?;
        let (key, rest) = rest
            .split_once('@')
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| ConfigError::MissingKey(dsn.to_string()))?;
        let (host, project) = rest.split_once('/').unwrap_or((rest, ""));
        if host.is_empty() {
            return Err(ConfigError::MissingHost(dsn.to_string()));
        }
        let project = project.trim_end_matches('/');
        if project.is_empty() {
            return Err(ConfigError::MissingProject(dsn.to_string()));
        }
        Ok(Self::new(key, host, project))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn store_url(&self) -> String {
        self.ingest_url("store")
    }

    pub fn envelope_url(&self) -> String {
        self.ingest_url("envelope")
    }

    fn ingest_url(&self, kind: &str) -> String {
        format!(
            "{}/{kind}/?sentry_version=7&sentry_key={}",
            self.endpoint, self.key
        )
    }
}

/// What the hosting page exposes about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    pub location: String,
    pub referrer: Option<String>,
    pub user_agent: String,
}

impl PageContext {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    /// The referrer, or the page location when there is none.
    pub fn referrer(&self) -> &str {
        self.referrer
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or(&self.location)
    }
}
