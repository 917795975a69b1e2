use http::HeaderName;
use http::HeaderValue;
use http::Request;
use http::Response;

/// Places a token in, and extracts it from, HTTP messages.
///
/// Implementations decide where the token lives (header, cookie, query
/// string, session); the authenticator service only uses these four
/// operations.
pub trait TokenCarrier: Send + Sync + 'static {
    /// Extract the token sent with a request.
    fn retrieve<B>(&self, request: &Request<B>) -> Option<String>;

    /// Hand a token to the client.
    fn embed<B>(&self, token: &str, response: Response<B>) -> Response<B>;

    /// Inject a token into a request, as if the client had sent it.
    fn smuggle<B>(&self, token: &str, request: Request<B>) -> Request<B>;

    /// Tell the client to drop its token.
    fn discard<B>(&self, response: Response<B>) -> Response<B>;
}

/// Carries the token in a named HTTP header.
#[derive(Debug, Clone)]
pub struct HeaderCarrier {
    name: HeaderName,
}

impl HeaderCarrier {
    pub const DEFAULT_HEADER: &'static str = "x-auth-token";

    pub fn new(name: HeaderName) -> Self {
        Self { name }
    }

    /// Create a carrier for a header name given as a string.
    ///
    /// # Errors
    /// * `InvalidHeaderName` - Name is not a valid HTTP header name
    pub fn named(name: &str) -> Result<Self, http::header::InvalidHeaderName> {
        Ok(Self::new(HeaderName::from_bytes(name.as_bytes())?))
    }

    pub fn header_name(&self) -> &HeaderName {
        &self.name
    }
}

impl Default for HeaderCarrier {
    fn default() -> Self {
        Self::new(HeaderName::from_static(Self::DEFAULT_HEADER))
    }
}

impl TokenCarrier for HeaderCarrier {
    fn retrieve<B>(&self, request: &Request<B>) -> Option<String> {
        request
            .headers()
            .get(&self.name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }

    fn embed<B>(&self, token: &str, mut response: Response<B>) -> Response<B> {
        match HeaderValue::from_str(token) {
            Ok(value) => {
                response.headers_mut().insert(self.name.clone(), value);
            }
            Err(e) => tracing::warn!(
                header = %self.name,
                error = %e,
                "Token is not a valid header value"
            ),
        }
        response
    }

    fn smuggle<B>(&self, token: &str, mut request: Request<B>) -> Request<B> {
        if let Ok(value) = HeaderValue::from_str(token) {
            request.headers_mut().insert(self.name.clone(), value);
        }
        request
    }

    fn discard<B>(&self, mut response: Response<B>) -> Response<B> {
        response.headers_mut().remove(&self.name);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smuggle_then_retrieve() {
        let carrier = HeaderCarrier::default();
        let request = carrier.smuggle("token-1", Request::new(()));

        assert_eq!(carrier.retrieve(&request), Some("token-1".to_string()));
    }

    #[test]
    fn test_retrieve_missing_header() {
        let carrier = HeaderCarrier::named("Authorization-Token").unwrap();
        assert_eq!(carrier.retrieve(&Request::new(())), None);
    }

    #[test]
    fn test_embed_and_discard() {
        let carrier = HeaderCarrier::default();
        let response = carrier.embed("token-1", Response::new(()));
        assert_eq!(
            response.headers().get("x-auth-token").unwrap(),
            &HeaderValue::from_static("token-1")
        );

        let response = carrier.discard(response);
        assert!(response.headers().get("x-auth-token").is_none());
    }

    #[test]
    fn test_invalid_header_name() {
        assert!(HeaderCarrier::named("bad header").is_err());
    }
}
