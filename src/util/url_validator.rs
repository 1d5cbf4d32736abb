use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Errors from validating a user-configured URL.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL points to a private/internal IP address.
    #[error("Private IP address not allowed: {0}")]
    PrivateIp(String),
    /// The URL points to localhost.
    #[error("Localhost not allowed")]
    Localhost,
}

/// Validates a URL configured as the blog feed source.
///
/// The feed URL comes from a user-editable config file and is fetched
/// server-side, so it is validated to prevent SSRF: non-HTTP(S) schemes,
/// localhost, and private/link-local IP ranges are rejected.
///
/// # Examples
///
/// ```
/// use atelier::util::validate_url;
///
/// assert!(validate_url("https://feeds.example.com/posts").is_ok());
/// assert!(validate_url("file:///etc/passwd").is_err());
/// assert!(validate_url("http://127.0.0.1/feed").is_err());
/// ```
pub fn validate_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if let Some(host) = url.host_str() {
        if host == "localhost" {
            return Err(UrlValidationError::Localhost);
        }

        // IPv6 hosts arrive bracketed
        let host_for_parse = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);

        if let Ok(ip) = host_for_parse.parse::<IpAddr>() {
            if ip.is_loopback() {
                return Err(UrlValidationError::Localhost);
            }
            if is_private_ip(&ip) {
                return Err(UrlValidationError::PrivateIp(ip.to_string()));
            }
        }
    }

    Ok(url)
}

fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => {
            ipv4.is_private() || ipv4.is_loopback() || ipv4.is_link_local() || ipv4.is_unspecified()
        }
        IpAddr::V6(ipv6) => {
            if ipv6.is_loopback() || ipv6.is_unspecified() {
                return true;
            }
            let segments = ipv6.segments();
            // fc00::/7 unique local, fe80::/10 link local
            (segments[0] & 0xfe00) == 0xfc00 || (segments[0] & 0xffc0) == 0xfe80
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_urls_accepted() {
        assert!(validate_url("https://feeds.feedburner.com/SomeBlog").is_ok());
        assert!(validate_url("http://blog.example.org/feeds/posts/default").is_ok());
        assert!(validate_url("https://example.com:8443/feed").is_ok());
    }

    #[test]
    fn test_non_http_schemes_rejected() {
        assert!(validate_url("file:///etc/passwd").is_err());
        assert!(validate_url("ftp://example.com/feed").is_err());
    }

    #[test]
    fn test_localhost_rejected() {
        assert!(validate_url("http://localhost/feed").is_err());
        assert!(validate_url("http://127.0.0.1/feed").is_err());
        assert!(validate_url("http://[::1]/feed").is_err());
    }

    #[test]
    fn test_private_ranges_rejected() {
        assert!(validate_url("http://10.0.0.1/feed").is_err());
        assert!(validate_url("http://172.16.0.1/feed").is_err());
        assert!(validate_url("http://192.168.1.1:8080/feed").is_err());
        assert!(validate_url("http://169.254.1.1/feed").is_err());
        assert!(validate_url("http://[fe80::1]/feed").is_err());
    }

    #[test]
    fn test_unparseable_url_rejected() {
        assert!(validate_url("not a url").is_err());
    }
}
