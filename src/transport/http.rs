//! HTTP transport implementation.
//!
//! Each call is a single blocking request built from the connection
//! descriptor's endpoint and database.

use crate::connection::{ConnectionDescriptor, Route};
use crate::error::TransportError;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, warn};

use super::messages::{MutateResponse, QueryResponse, RequestEnvelope};
use super::protocol::Transport;

/// HTTP transport backed by a reused blocking client.
pub struct HttpTransport {
    client: Client,
    descriptor: ConnectionDescriptor,
}

impl HttpTransport {
    /// Create a transport for a descriptor.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::IoError` if the HTTP client cannot be
    /// initialized (for example when no TLS backend is available).
    pub fn new(descriptor: ConnectionDescriptor) -> Result<Self, TransportError> {
        let client = Client::builder()
            .build()
            .map_err(|e| TransportError::IoError(e.to_string()))?;
        Ok(Self { client, descriptor })
    }

    pub fn descriptor(&self) -> &ConnectionDescriptor {
        &self.descriptor
    }

    fn url(&self, route: Route) -> Result<Url, TransportError> {
        self.descriptor
            .endpoint_url(route)
            .map_err(|e| TransportError::InvalidEndpoint(e.to_string()))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.descriptor.username {
            Some(username) => request.basic_auth(username, self.descriptor.password()),
            None => request,
        }
    }

    /// POST an envelope and return the successful response.
    fn post(&self, route: Route, sql: &str, parameters: &[Value]) -> Result<Response, TransportError> {
        let url = self.url(route)?;
        debug!(
            route = ?route,
            url = %url,
            parameters = parameters.len(),
            "Sending statement"
        );

        let envelope = RequestEnvelope::new(sql, parameters);
        let response = self
            .authorize(self.client.post(url))
            .json(&envelope)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            warn!(route = ?route, status = status.as_u16(), "Service rejected statement");
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown status").to_string(),
            });
        }

        Ok(response)
    }
}

impl Transport for HttpTransport {
    fn health_check(&self) -> bool {
        let url = match self.url(Route::HealthCheck) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "Health check skipped");
                return false;
            }
        };

        debug!(url = %url, "Checking service health");
        match self.authorize(self.client.get(url)).send() {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                warn!(status = response.status().as_u16(), "Health check failed");
                false
            }
            Err(e) => {
                warn!(error = %e, "Health check failed");
                false
            }
        }
    }

    fn query(&self, sql: &str, parameters: &[Value]) -> Result<QueryResponse, TransportError> {
        let body = self.post(Route::Query, sql, parameters)?.bytes()?;
        let response: QueryResponse = serde_json::from_slice(&body)?;

        debug!(
            columns = response.schema.len(),
            rows = response.results.len(),
            "Query completed"
        );
        Ok(response)
    }

    fn mutate(&self, sql: &str, parameters: &[Value]) -> Result<i64, TransportError> {
        let body = self.post(Route::Mutate, sql, parameters)?.bytes()?;
        let response: MutateResponse = serde_json::from_slice(&body)?;

        let count = response.count().ok_or_else(|| {
            TransportError::MalformedResponse("missing or non-integer rowsAffected".to_string())
        })?;

        debug!(rows_affected = count, "Mutation completed");
        Ok(count)
    }
}
