use url::Url;

/// Why an anchor's href was not imported.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum HrefRejection {
    #[error("empty href")]
    Empty,

    #[error("not an absolute url: {0}")]
    Unparseable(url::ParseError),

    #[error("scheme '{0}' not allowed")]
    SchemeNotAllowed(String),

    #[error("url has no host")]
    MissingHost,
}

/// Accepts absolute urls with a host and one of `allowed_schemes`.
pub fn check_href(href: &str, allowed_schemes: &[String]) -> Result<Url, HrefRejection> {
    if href.trim().is_empty() {
        return Err(HrefRejection::Empty);
    }

    let parsed = Url::parse(href).map_err(HrefRejection::Unparseable)?;

    if !allowed_schemes
        .iter()
        .any(|s| s.eq_ignore_ascii_case(parsed.scheme()))
    {
        return Err(HrefRejection::SchemeNotAllowed(parsed.scheme().to_string()));
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(parsed),
        _ => Err(HrefRejection::MissingHost),
    }
}
