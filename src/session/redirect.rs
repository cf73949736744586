//! Helpers for redirect URLs during the log-in flow.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

fn is_safe_redirect_url(redirect_url: &str) -> bool {
    let path = redirect_url
        .split_once('?')
        .map(|(path, _)| path)
        .unwrap_or(redirect_url);

    // Browsers treat `\` as `/`, so `/\evil.com` would leave the site.
    if !path.starts_with('/') || path.starts_with("//") || path.contains('\\') {
        return false;
    }

    path != endpoints::LOG_IN_VIEW && !path.starts_with("/api")
}

/// Accept `raw_url` only if it is a relative path on this site.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }
    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

/// Build the log-in page URL that sends the user back to the requested page afterwards.
///
/// Requests to form endpoints under `/api` fall back to the page they usually redirect to.
pub fn build_log_in_redirect_url(request: &Request) -> String {
    let path = request.uri().path();
    let redirect_target = if path == endpoints::CART_ITEMS_API || path == endpoints::CHECKOUT_API
    {
        Some(endpoints::CART_VIEW.to_owned())
    } else {
        request
            .uri()
            .path_and_query()
            .and_then(|path_and_query| normalize_redirect_url(path_and_query.as_str()))
    };

    match redirect_target {
        Some(target) => build_log_in_redirect_url_from_target(&target),
        None => endpoints::LOG_IN_VIEW.to_owned(),
    }
}

fn build_log_in_redirect_url_from_target(redirect_target: &str) -> String {
    match serde_urlencoded::to_string([("redirect_url", redirect_target)]) {
        Ok(param) => format!("{}?{}", endpoints::LOG_IN_VIEW, param),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {redirect_target}: {error}");
            endpoints::LOG_IN_VIEW.to_owned()
        }
    }
}

#[cfg(test)]
mod redirect_tests {
    use axum::{body::Body, extract::Request};

    use crate::endpoints;

    use super::{build_log_in_redirect_url, normalize_redirect_url};

    #[test]
    fn accepts_relative_paths() {
        assert_eq!(
            normalize_redirect_url("/transactions"),
            Some("/transactions".to_owned())
        );
        assert_eq!(
            normalize_redirect_url("/products/2?x=1"),
            Some("/products/2?x=1".to_owned())
        );
    }

    #[test]
    fn rejects_other_sites_and_log_in_page() {
        for url in [
            "https://example.com",
            "//example.com/cart",
            "cart",
            "/\\evil.com",
            "/\\/evil.com",
            "/cart\\..\\\\evil.com",
            endpoints::LOG_IN_VIEW,
            endpoints::CHECKOUT_API,
        ] {
            assert_eq!(normalize_redirect_url(url), None, "should reject {url}");
        }
    }

    #[test]
    fn log_in_redirect_encodes_current_page() {
        let request = Request::builder()
            .uri("/transactions")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            build_log_in_redirect_url(&request),
            "/log_in?redirect_url=%2Ftransactions"
        );
    }

    #[test]
    fn log_in_redirect_for_form_endpoint_goes_to_cart() {
        let request = Request::builder()
            .method("POST")
            .uri(endpoints::CHECKOUT_API)
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            build_log_in_redirect_url(&request),
            "/log_in?redirect_url=%2Fcart"
        );
    }
}
