//! Client configuration.
//!
//! Every field is checked before a channel is built. Problems are collected,
//! not reported one at a time.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use url::Url;

use crate::core::NfseError;

/// Target environment of the national API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    /// 1: production.
    Production,
    /// 2: restricted production (homologação).
    #[default]
    Staging,
}

impl Environment {
    /// Numeric code used by the national API.
    pub fn code(self) -> u8 {
        match self {
            Self::Production => 1,
            Self::Staging => 2,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, NfseError> {
        match code {
            1 => Ok(Self::Production),
            2 => Ok(Self::Staging),
            other => Err(NfseError::Configuration(format!(
                "environment must be 1 (production) or 2 (staging), got {other}"
            ))),
        }
    }

    /// National contributor endpoint for this environment.
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Production => "https://adn.nfse.gov.br/contribuintes",
            Self::Staging => "https://adn.producaorestrita.nfse.gov.br/contribuintes",
        }
    }
}

impl FromStr for Environment {
    type Err = NfseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "production" | "producao" | "produção" => Ok(Self::Production),
            "2" | "staging" | "homologacao" | "homologação" => Ok(Self::Staging),
            other => Err(NfseError::Configuration(format!(
                "unrecognized environment '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Staging => f.write_str("staging"),
        }
    }
}

/// Client certificate and private key, PEM encoded in one bundle.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCertificate {
    pem: Vec<u8>,
}

impl ClientCertificate {
    /// Accepts a bundle holding at least one certificate and one private key.
    pub fn from_pem(pem: impl Into<Vec<u8>>) -> Result<Self, NfseError> {
        let pem = pem.into();
        let text = String::from_utf8_lossy(&pem);
        if !text.contains("-----BEGIN CERTIFICATE-----") {
            return Err(NfseError::Configuration(
                "certificate bundle has no PEM certificate".into(),
            ));
        }
        if !text.contains("PRIVATE KEY-----") {
            return Err(NfseError::Configuration(
                "certificate bundle has no PEM private key".into(),
            ));
        }
        Ok(Self { pem })
    }

    pub fn from_pem_file(path: impl AsRef<Path>) -> Result<Self, NfseError> {
        let path = path.as_ref();
        let pem = std::fs::read(path).map_err(|e| {
            NfseError::Configuration(format!("cannot read certificate {}: {e}", path.display()))
        })?;
        Self::from_pem(pem)
    }

    pub fn pem(&self) -> &[u8] {
        &self.pem
    }
}

impl fmt::Debug for ClientCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCertificate")
            .field("pem", &"[REDACTED]")
            .finish()
    }
}

/// Connection settings for the national NFS-e API.
///
/// Custom `Debug` implementation redacts the certificate.
#[derive(Clone)]
pub struct NfseConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,
    pub environment: Environment,
    /// Client identity for mutual TLS. Required.
    pub certificate: Option<ClientCertificate>,
    /// Per-request timeout in seconds. Must be positive.
    pub timeout_secs: u64,
    /// Embedded in the `User-Agent` header.
    pub client_version: String,
    /// When false, server certificates are not verified at all.
    /// Unsafe outside of test environments.
    pub validate_server_certificate: bool,
}

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CLIENT_VERSION: &str = "1.01";

impl fmt::Debug for NfseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NfseConfig")
            .field("base_url", &self.base_url)
            .field("environment", &self.environment)
            .field(
                "certificate",
                &self.certificate.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .field("client_version", &self.client_version)
            .field(
                "validate_server_certificate",
                &self.validate_server_certificate,
            )
            .finish()
    }
}

impl NfseConfig {
    pub fn builder() -> NfseConfigBuilder {
        NfseConfigBuilder::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `NFSE_ENVIRONMENT` (default: `staging`)
    /// - `NFSE_BASE_URL` (default: the environment's national endpoint)
    /// - `NFSE_CERT_PEM_PATH` (required)
    /// - `NFSE_TIMEOUT_SECS` (default: 30)
    /// - `NFSE_CLIENT_VERSION` (default: `1.01`)
    /// - `NFSE_VALIDATE_SERVER_CERT` (default: `true`)
    pub fn from_env() -> Result<Self, NfseError> {
        let mut builder = Self::builder();
        if let Some(env) = env_var("NFSE_ENVIRONMENT") {
            builder = builder.environment(env.parse()?);
        }
        if let Some(url) = env_var("NFSE_BASE_URL") {
            builder = builder.base_url(url);
        }
        let cert_path = env_var("NFSE_CERT_PEM_PATH").ok_or_else(|| {
            NfseError::Configuration("NFSE_CERT_PEM_PATH environment variable is required".into())
        })?;
        builder = builder.certificate(ClientCertificate::from_pem_file(cert_path)?);
        if let Some(raw) = env_var("NFSE_TIMEOUT_SECS") {
            let secs = raw.trim().parse().map_err(|_| {
                NfseError::Configuration(format!("NFSE_TIMEOUT_SECS is not a number: '{raw}'"))
            })?;
            builder = builder.timeout_secs(secs);
        }
        if let Some(version) = env_var("NFSE_CLIENT_VERSION") {
            builder = builder.client_version(version);
        }
        if let Some(raw) = env_var("NFSE_VALIDATE_SERVER_CERT") {
            builder = builder.validate_server_certificate(parse_flag(&raw)?);
        }
        builder.build()
    }

    /// Every problem with this configuration; empty when valid.
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.base_url.trim().is_empty() {
            errors.push("base URL is required".to_string());
        } else {
            match Url::parse(&self.base_url) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                Ok(url) => errors.push(format!(
                    "base URL must use http or https, got '{}'",
                    url.scheme()
                )),
                Err(e) => errors.push(format!("base URL is invalid: {e}")),
            }
        }
        if self.certificate.is_none() {
            errors.push("client certificate is required".to_string());
        }
        if self.timeout_secs == 0 {
            errors.push("timeout must be greater than zero".to_string());
        }
        if self.client_version.trim().is_empty() {
            errors.push("client version is required".to_string());
        }
        errors
    }

    pub fn validate(&self) -> Result<(), NfseError> {
        let errors = self.validation_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(NfseError::Configuration(errors.join(", ")))
        }
    }

    pub(crate) fn user_agent(&self) -> String {
        format!("nfse/{}", self.client_version.trim())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(raw: &str) -> Result<bool, NfseError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(NfseError::Configuration(format!(
            "NFSE_VALIDATE_SERVER_CERT must be true or false, got '{other}'"
        ))),
    }
}

/// Builder for [`NfseConfig`].
#[derive(Debug, Clone)]
pub struct NfseConfigBuilder {
    base_url: Option<String>,
    environment: Environment,
    certificate: Option<ClientCertificate>,
    timeout_secs: u64,
    client_version: String,
    validate_server_certificate: bool,
}

impl Default for NfseConfigBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            environment: Environment::default(),
            certificate: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            client_version: DEFAULT_CLIENT_VERSION.to_string(),
            validate_server_certificate: true,
        }
    }
}

impl NfseConfigBuilder {
    /// Override the environment's default endpoint.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn certificate(mut self, certificate: ClientCertificate) -> Self {
        self.certificate = Some(certificate);
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn client_version(mut self, version: impl Into<String>) -> Self {
        self.client_version = version.into();
        self
    }

    /// Disabling this accepts any server certificate. Never do so in production.
    pub fn validate_server_certificate(mut self, validate: bool) -> Self {
        self.validate_server_certificate = validate;
        self
    }

    pub fn build(self) -> Result<NfseConfig, NfseError> {
        let config = NfseConfig {
            base_url: self
                .base_url
                .unwrap_or_else(|| self.environment.default_base_url().to_string()),
            environment: self.environment,
            certificate: self.certificate,
            timeout_secs: self.timeout_secs,
            client_version: self.client_version,
            validate_server_certificate: self.validate_server_certificate,
        };
        config.validate()?;
        Ok(config)
    }
}
