//! Parameter extraction from redirect URLs.
//!
//! The implicit flow returns its tokens in the URL fragment
//! (`…/oauth20_desktop.srf?lc=1033#access_token=…&refresh_token=…`), while
//! sign-out reports failures in the query string. Anything that does not
//! parse is treated as absent so a malformed redirect never advances the flow.

/// Decoded `name=value` pairs, in URL order.
pub type Params = Vec<(String, String)>;

/// Parse the fragment (after `#`) as a query string.
///
/// Returns `None` if the URL has no fragment or the fragment does not decode.
#[must_use]
pub fn fragment_params(url: &str) -> Option<Params> {
    let (_, fragment) = url.split_once('#')?;
    parse(fragment)
}

/// Parse the query string (between `?` and `#`).
///
/// Returns `None` if the URL has no query or the query does not decode.
#[must_use]
pub fn query_params(url: &str) -> Option<Params> {
    let without_fragment = url.split_once('#').map_or(url, |(head, _)| head);
    let (_, query) = without_fragment.split_once('?')?;
    parse(query)
}

/// First value for `name`.
#[must_use]
pub fn value_of<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// The URL without query and fragment, safe to log.
#[must_use]
pub fn strip_params(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

fn parse(raw: &str) -> Option<Params> {
    match serde_urlencoded::from_str::<Params>(raw) {
        Ok(params) => Some(params),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring undecodable redirect parameters");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN_REDIRECT: &str = "https://login.live.com/oauth20_desktop.srf?lc=1033\
        #access_token=ABC&refresh_token=XYZ&expires_in=100";

    #[test]
    fn test_fragment_refresh_token() {
        let params = fragment_params(LOGIN_REDIRECT).unwrap();
        assert_eq!(value_of(&params, "refresh_token"), Some("XYZ"));
        assert_eq!(value_of(&params, "access_token"), Some("ABC"));
        assert_eq!(value_of(&params, "expires_in"), Some("100"));
    }

    #[test]
    fn test_fragment_does_not_see_query() {
        let params = fragment_params(LOGIN_REDIRECT).unwrap();
        assert_eq!(value_of(&params, "lc"), None);
    }

    #[test]
    fn test_fragment_missing() {
        assert!(fragment_params("https://login.live.com/oauth20_desktop.srf?lc=1033").is_none());
    }

    #[test]
    fn test_fragment_encoded_value() {
        let params =
            fragment_params("https://x/desktop.srf#refresh_token=M.R3%21abc%2A&x=1").unwrap();
        assert_eq!(value_of(&params, "refresh_token"), Some("M.R3!abc*"));
    }

    #[test]
    fn test_query_error() {
        let params = query_params(
            "https://login.live.com/oauth20_desktop.srf?error=server_error&lc=1033",
        )
        .unwrap();
        assert_eq!(value_of(&params, "error"), Some("server_error"));
    }

    #[test]
    fn test_query_excludes_fragment() {
        let params = query_params("https://x/desktop.srf?lc=1033#error=nope").unwrap();
        assert_eq!(value_of(&params, "lc"), Some("1033"));
        assert_eq!(value_of(&params, "error"), None);
    }

    #[test]
    fn test_query_missing() {
        assert!(query_params("https://x/desktop.srf#error=nope").is_none());
    }

    #[test]
    fn test_value_of_first_wins() {
        let params = fragment_params("https://x/#a=1&a=2").unwrap();
        assert_eq!(value_of(&params, "a"), Some("1"));
    }

    #[test]
    fn test_strip_params() {
        assert_eq!(
            strip_params(LOGIN_REDIRECT),
            "https://login.live.com/oauth20_desktop.srf"
        );
        assert_eq!(strip_params("https://x/a#frag"), "https://x/a");
        assert_eq!(strip_params("https://x/a"), "https://x/a");
    }
}
