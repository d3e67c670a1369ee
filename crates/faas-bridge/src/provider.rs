//! Provider selection and runtime API endpoint derivation.
//!
//! Both supported platforms expose the same invocation protocol behind
//! slightly different URL layouts. Tencent SCF serves it from
//! `http://$SCF_RUNTIME_API:$SCF_RUNTIME_API_PORT/runtime/` and adds a
//! one-time readiness handshake; AWS Lambda serves it from
//! `http://$AWS_LAMBDA_RUNTIME_API/2018-06-01/runtime/`.

use crate::error::ProviderError;
use std::fmt;
use std::str::FromStr;

/// Version segment of the AWS Lambda runtime API paths.
pub const RUNTIME_API_VERSION: &str = "2018-06-01";

/// Environment variable naming the SCF runtime API host.
pub const SCF_API_HOST: &str = "SCF_RUNTIME_API";

/// Environment variable naming the SCF runtime API port.
pub const SCF_API_PORT: &str = "SCF_RUNTIME_API_PORT";

/// Environment variable naming the Lambda runtime API authority (host:port).
pub const AWS_API_AUTHORITY: &str = "AWS_LAMBDA_RUNTIME_API";

/// A supported serverless platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Tencent Serverless Cloud Function.
    Scf,
    /// AWS Lambda.
    Aws,
}

impl FromStr for Provider {
    type Err = ProviderError;

    /// Parses a provider name.
    ///
    /// Only `"scf"` and `"aws"` are accepted. An unknown name is a
    /// configuration mistake that must stop startup before any polling
    /// begins, so it fails here rather than degrading.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "scf" => Ok(Provider::Scf),
            "aws" => Ok(Provider::Aws),
            other => Err(ProviderError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Scf => write!(f, "scf"),
            Provider::Aws => write!(f, "aws"),
        }
    }
}

/// Resolved runtime API URLs for one provider.
///
/// Endpoints are computed once at configuration time and stay fixed for the
/// life of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEndpoints {
    /// Long-poll URL that yields the next invocation event.
    pub next_url: String,

    /// URL that completion reports are posted to.
    pub report_url: String,

    /// One-time readiness handshake URL. Only SCF has one.
    pub ready_url: Option<String>,
}

impl RuntimeEndpoints {
    /// Builds the SCF endpoint set for the given host and port.
    pub fn scf(host: &str, port: &str) -> Self {
        let base = format!("http://{}:{}/runtime/", host, port);
        Self {
            next_url: format!("{}invocation/next", base),
            report_url: format!("{}invocation/response", base),
            ready_url: Some(format!("{}init/ready", base)),
        }
    }

    /// Builds the Lambda endpoint set for the given authority (host:port).
    pub fn aws(authority: &str) -> Self {
        let base = format!("http://{}/{}/runtime/", authority, RUNTIME_API_VERSION);
        Self {
            next_url: format!("{}invocation/next", base),
            report_url: format!("{}invocation/response", base),
            ready_url: None,
        }
    }

    /// Derives the endpoint set for `provider` from the process environment.
    ///
    /// A missing variable is logged and treated as empty, which yields
    /// endpoints that fail at poll time. Startup itself never fails on
    /// environment problems.
    pub fn from_env(provider: Provider) -> Self {
        Self::from_env_with(provider, |name| std::env::var(name).ok())
    }

    /// Derives the endpoint set using a caller-supplied variable lookup.
    ///
    /// # Arguments
    ///
    /// * `provider` - The platform whose variables to read
    /// * `lookup` - Returns the value of a named variable, if set
    pub fn from_env_with<F>(provider: Provider, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match provider {
            Provider::Scf => {
                let host = var_or_empty(&lookup, SCF_API_HOST);
                let port = var_or_empty(&lookup, SCF_API_PORT);
                Self::scf(&host, &port)
            }
            Provider::Aws => {
                let authority = var_or_empty(&lookup, AWS_API_AUTHORITY);
                Self::aws(&authority)
            }
        }
    }
}

fn var_or_empty<F>(lookup: &F, name: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value,
        None => {
            tracing::warn!(
                variable = name,
                "environment variable not set; derived endpoints will be unreachable"
            );
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn scf_endpoints_follow_the_runtime_base() {
        let endpoints = RuntimeEndpoints::scf("169.254.0.1", "9001");

        assert_eq!(
            endpoints.next_url,
            "http://169.254.0.1:9001/runtime/invocation/next"
        );
        assert_eq!(
            endpoints.report_url,
            "http://169.254.0.1:9001/runtime/invocation/response"
        );
        assert_eq!(
            endpoints.ready_url.as_deref(),
            Some("http://169.254.0.1:9001/runtime/init/ready")
        );
    }

    #[test]
    fn aws_endpoints_carry_the_api_version() {
        let endpoints = RuntimeEndpoints::aws("127.0.0.1:9001");

        assert_eq!(
            endpoints.next_url,
            "http://127.0.0.1:9001/2018-06-01/runtime/invocation/next"
        );
        assert_eq!(
            endpoints.report_url,
            "http://127.0.0.1:9001/2018-06-01/runtime/invocation/response"
        );
        assert_eq!(endpoints.ready_url, None);
    }

    #[test]
    fn provider_names_round_trip() {
        assert_eq!("scf".parse::<Provider>().unwrap(), Provider::Scf);
        assert_eq!("aws".parse::<Provider>().unwrap(), Provider::Aws);
        assert_eq!(Provider::Scf.to_string(), "scf");
        assert_eq!(Provider::Aws.to_string(), "aws");
    }

    #[test]
    fn unknown_provider_is_refused() {
        let parsed = "gcf".parse::<Provider>();

        assert!(matches!(
            parsed,
            Err(crate::error::ProviderError::Unknown(name)) if name == "gcf"
        ));
    }

    #[test]
    #[serial]
    fn from_env_reads_the_scf_variables() {
        temp_env::with_vars(
            [
                (SCF_API_HOST, Some("10.0.0.5")),
                (SCF_API_PORT, Some("9100")),
            ],
            || {
                let endpoints = RuntimeEndpoints::from_env(Provider::Scf);
                assert_eq!(endpoints, RuntimeEndpoints::scf("10.0.0.5", "9100"));
            },
        );
    }

    #[test]
    #[serial]
    fn from_env_reads_the_aws_variable() {
        temp_env::with_var(AWS_API_AUTHORITY, Some("127.0.0.1:8124"), || {
            let endpoints = RuntimeEndpoints::from_env(Provider::Aws);
            assert_eq!(endpoints, RuntimeEndpoints::aws("127.0.0.1:8124"));
        });
    }

    #[test]
    fn missing_variables_default_to_empty() {
        let endpoints = RuntimeEndpoints::from_env_with(Provider::Scf, |_| None);

        assert_eq!(endpoints, RuntimeEndpoints::scf("", ""));
    }
}
