use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;

/// The authenticated administrator identity every REST request is assumed
/// to carry. Authentication itself (OAuth device flow, bearer tokens,
/// basic auth) is external plumbing out of scope here; this extractor only
/// codifies the contract handlers rely on: read the identity the auth
/// middleware attached upstream, or reject the request if none is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
}

const PRINCIPAL_HEADER: &str = "x-opampd-principal";

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let subject = parts
            .headers
            .get(PRINCIPAL_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .ok_or((StatusCode::UNAUTHORIZED, "missing authenticated principal"))?;
        Ok(Self { subject: subject.to_string() })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn rejects_requests_without_the_principal_header() {
        let request = Request::builder().uri("/").body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        let result = Principal::from_request_parts(&mut parts, &()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn extracts_the_principal_header() {
        let request = Request::builder().uri("/").header(PRINCIPAL_HEADER, "alice").body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        let principal = Principal::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(principal.subject, "alice");
    }
}
