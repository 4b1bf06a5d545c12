//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use skika_domain::SkikaError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SkikaError);

impl From<InfraError> for SkikaError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SkikaError> for InfraError {
    fn from(value: SkikaError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoSkikaError {
    fn into_skika(self) -> SkikaError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → SkikaError */
/* -------------------------------------------------------------------------- */

impl IntoSkikaError for HttpError {
    fn into_skika(self) -> SkikaError {
        if self.is_builder() {
            return SkikaError::Config(format!("invalid HTTP request: {}", self));
        }

        if self.is_timeout() {
            return SkikaError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return SkikaError::Network(format!("HTTP connection failure: {}", self));
        }

        SkikaError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_skika())
    }
}

/* -------------------------------------------------------------------------- */
/* config file errors → SkikaError */
/* -------------------------------------------------------------------------- */

impl IntoSkikaError for std::io::Error {
    fn into_skika(self) -> SkikaError {
        SkikaError::Config(format!("Failed to read config file: {}", self))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_skika())
    }
}

impl IntoSkikaError for toml::de::Error {
    fn into_skika(self) -> SkikaError {
        SkikaError::Config(format!("Invalid TOML format: {}", self))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(value.into_skika())
    }
}

impl IntoSkikaError for serde_json::Error {
    fn into_skika(self) -> SkikaError {
        SkikaError::Config(format!("Invalid JSON format: {}", self))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_skika())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::Client;

    use super::*;

    #[tokio::test]
    async fn refused_connection_maps_to_network_error() {
        // Bind then drop so the port is known to be closed.
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(format!("http://127.0.0.1:{}/", port)).send().await.unwrap_err();

        let mapped: SkikaError = InfraError::from(error).into();
        assert!(matches!(mapped, SkikaError::Network(_)), "got {:?}", mapped);
    }

    #[test]
    fn invalid_url_maps_to_config_error() {
        let client = Client::new();
        let error = client.get("not a url").build().unwrap_err();

        let mapped: SkikaError = InfraError::from(error).into();
        assert!(matches!(mapped, SkikaError::Config(_)), "got {:?}", mapped);
    }

    #[test]
    fn toml_errors_are_config_errors() {
        let error = toml::from_str::<toml::Value>("key = ").unwrap_err();
        let mapped: SkikaError = InfraError::from(error).into();
        match mapped {
            SkikaError::Config(msg) => assert!(msg.contains("TOML")),
            other => panic!("expected config error, got {:?}", other),
        }
    }
}
