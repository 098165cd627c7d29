//! Browser-like default headers expected by the rewards API.

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, DNT, ORIGIN, REFERER,
    USER_AGENT,
};

use crate::rewards::types::{RewardsError, RewardsResult};

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:134.0) Gecko/20100101 Firefox/134.0";

/// Build the fixed header set for an app served from `origin`.
pub fn browser_headers(origin: &str) -> RewardsResult<HeaderMap> {
    let origin = origin.trim_end_matches('/');
    let mut headers = HeaderMap::new();

    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(DNT, HeaderValue::from_static("1"));
    headers.insert(HeaderName::from_static("sec-gpc"), HeaderValue::from_static("1"));
    headers.insert(HeaderName::from_static("sec-fetch-dest"), HeaderValue::from_static("empty"));
    headers.insert(HeaderName::from_static("sec-fetch-mode"), HeaderValue::from_static("cors"));
    headers.insert(HeaderName::from_static("sec-fetch-site"), HeaderValue::from_static("same-site"));

    headers.insert(ORIGIN, header_value(origin)?);
    headers.insert(REFERER, header_value(&format!("{}/", origin))?);

    Ok(headers)
}

fn header_value(value: &str) -> RewardsResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| RewardsError::InvalidHeader(format!("{}: {}", value, e)))
}
