//! reqwest-backed [`HttpTransport`].

use async_trait::async_trait;
use bytes::Bytes;
use msalive_types::{FORM_CONTENT_TYPE, HttpTransport, traits::Result};
use std::time::Duration;

/// Posts token requests over HTTPS with a shared [`reqwest::Client`].
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport, optionally with an overall request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Http`](msalive_types::AuthError::Http) if the client cannot be built.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    /// Non-2xx responses are returned as bodies: the token endpoint reports
    /// `invalid_grant` and friends as JSON with a 400 status.
    async fn post_form(&self, url: &str, body: String) -> Result<Bytes> {
        let resp = self
            .client
            .post(url)
            .header("Content-Type", FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::debug!(status = %status, "token endpoint returned non-success status");
        }
        Ok(resp.bytes().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::parse_token_response;
    use msalive_types::AuthError;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const INVALID_GRANT: &str =
        r#"{"error":"invalid_grant","error_description":"The refresh token has expired."}"#;

    /// Accept one connection, capture the request, answer with `status` and `body`.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/oauth20_token.srf", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {status}\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
            request
        });
        (url, handle)
    }

    /// Read headers plus a `Content-Length` body.
    async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some((head, body)) = text.split_once("\r\n\r\n") {
                let len = head
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                if body.len() >= len {
                    break;
                }
            }
        }
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn test_post_form_returns_error_body_for_400() {
        let (url, server) = serve_once("400 Bad Request", INVALID_GRANT).await;
        let transport = ReqwestTransport::new(Some(Duration::from_secs(5))).unwrap();

        let bytes = transport
            .post_form(&url, "grant_type=refresh_token&refresh_token=T".into())
            .await
            .unwrap();
        assert_eq!(&bytes[..], INVALID_GRANT.as_bytes());

        match parse_token_response(&bytes) {
            Err(AuthError::Provider { error, description }) => {
                assert_eq!(error, "invalid_grant");
                assert_eq!(description.as_deref(), Some("The refresh token has expired."));
            }
            other => panic!("expected provider error, got {other:?}"),
        }

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /oauth20_token.srf HTTP/1.1\r\n"));
        assert!(
            request
                .to_ascii_lowercase()
                .contains("content-type: application/x-www-form-urlencoded\r\n")
        );
        assert!(request.ends_with("\r\n\r\ngrant_type=refresh_token&refresh_token=T"));
    }

    #[tokio::test]
    async fn test_post_form_returns_success_body() {
        let body = r#"{"access_token":"tok","expires_in":3600,"user_id":"u1"}"#;
        let (url, server) = serve_once("200 OK", body).await;
        let transport = ReqwestTransport::new(None).unwrap();

        let bytes = transport.post_form(&url, String::new()).await.unwrap();
        let result = parse_token_response(&bytes).unwrap();
        assert_eq!(result.access_token, "tok");
        assert_eq!(result.user_id, "u1");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_post_form_connection_refused_is_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/oauth20_token.srf", listener.local_addr().unwrap());
        drop(listener);

        let transport = ReqwestTransport::new(Some(Duration::from_secs(5))).unwrap();
        let err = transport.post_form(&url, String::new()).await.unwrap_err();
        assert!(matches!(err, AuthError::Http(_)), "got {err:?}");
    }
}
