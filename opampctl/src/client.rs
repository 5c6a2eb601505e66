use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },
    #[error("{status} from {url}: {body}")]
    Status { url: String, status: reqwest::StatusCode, body: String },
    #[error("failed to decode response body from {url}: {source}")]
    Decode { url: String, source: reqwest::Error },
}

/// A thin REST client over `opampd`'s `/api/v1` surface. Blocking, since
/// `opampctl` is a single-shot CLI with no concurrent work to overlap.
pub struct ApiClient {
    base_url: String,
    principal: String,
    http: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(base_url: String, principal: String) -> Self {
        Self {
            base_url,
            principal,
            http: reqwest::blocking::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn get(&self, path: &str) -> Result<Value, ClientError> {
        let url = self.url(path);
        let response = self
            .http
            .get(&url)
            .header("x-opampd-principal", &self.principal)
            .send()
            .map_err(|source| ClientError::Request { url: url.clone(), source })?;
        Self::into_json(url, response)
    }

    pub fn put_json(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        let url = self.url(path);
        let response = self
            .http
            .put(&url)
            .header("x-opampd-principal", &self.principal)
            .json(body)
            .send()
            .map_err(|source| ClientError::Request { url: url.clone(), source })?;
        Self::into_json(url, response)
    }

    pub fn put_bytes(&self, path: &str, content_type: &str, body: Vec<u8>) -> Result<Value, ClientError> {
        let url = self.url(path);
        let response = self
            .http
            .put(&url)
            .header("x-opampd-principal", &self.principal)
            .header("content-type", content_type)
            .body(body)
            .send()
            .map_err(|source| ClientError::Request { url: url.clone(), source })?;
        Self::into_json(url, response)
    }

    pub fn delete(&self, path: &str) -> Result<(), ClientError> {
        let url = self.url(path);
        let response = self
            .http
            .delete(&url)
            .header("x-opampd-principal", &self.principal)
            .send()
            .map_err(|source| ClientError::Request { url: url.clone(), source })?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(ClientError::Status { url, status, body });
        }
        Ok(())
    }

    fn into_json(url: String, response: reqwest::blocking::Response) -> Result<Value, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ClientError::Status { url, status, body });
        }
        response.json().map_err(|source| ClientError::Decode { url, source })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use httpmock::MockServer;

    #[test]
    fn get_decodes_a_successful_response() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(httpmock::Method::GET).path("/api/v1/ping").header("x-opampd-principal", "alice");
            then.status(200).json_body(serde_json::json!({"status": "ok"}));
        });

        let client = ApiClient::new(server.base_url(), "alice".to_string());
        let value = client.get("/api/v1/ping").unwrap();

        assert_eq!(value["status"], "ok");
        mock.assert();
    }

    #[test]
    fn non_success_status_becomes_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::GET).path("/api/v1/agents/missing");
            then.status(404).json_body(serde_json::json!({"error": "not found"}));
        });

        let client = ApiClient::new(server.base_url(), "alice".to_string());
        let err = client.get("/api/v1/agents/missing").unwrap_err();
        assert_matches::assert_matches!(err, ClientError::Status { status, .. } if status == reqwest::StatusCode::NOT_FOUND);
    }
}
