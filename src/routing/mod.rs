//! Project id resolution from page URLs.
//!
//! Supported shapes, tried in this order:
//! - `project.html#id=<id>` - fragment parsed as a query string
//! - `project.html#<id>` - bare fragment
//! - `project.html?id=<id>` - query parameter
//! - `/project/<id>` or `/project/<id>.html` - last path segment
//!
//! Fragments come first because static hosts that rewrite URLs tend to drop
//! or mangle the query string but leave the fragment alone.

use tracing::debug;
use url::Url;
use url::form_urlencoded;

/// Page file name used when none is configured.
pub const DEFAULT_PAGE_NAME: &str = "project.html";

/// Path segment that never names a project.
const RESERVED_SEGMENT: &str = "project";

/// Extracts a project id from a URL.
#[derive(Debug, Clone)]
pub struct ProjectIdResolver {
    page_name: String,
}

impl Default for ProjectIdResolver {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_NAME)
    }
}

impl ProjectIdResolver {
    /// `page_name` is the detail page's own file name; it is skipped when
    /// looking at path segments.
    pub fn new(page_name: impl Into<String>) -> Self {
        Self {
            page_name: page_name.into(),
        }
    }

    /// Resolve the project id carried by `url`, if any.
    ///
    /// Accepts absolute URLs as well as site-relative references such as
    /// `#id=x`, `?id=x` or `/project/x`.
    pub fn resolve(&self, url: &str) -> Option<String> {
        let parsed = parse_url(url)?;

        if let Some(fragment) = parsed.fragment().filter(|f| !f.is_empty()) {
            if fragment.contains('=') {
                if let Some(id) = query_id(fragment) {
                    debug!("Project id from fragment query: {}", id);
                    return Some(id);
                }
            } else if !fragment.contains('/') {
                debug!("Project id from bare fragment: {}", fragment);
                return Some(fragment.to_string());
            }
        }

        if let Some(id) = parsed.query().and_then(query_id) {
            debug!("Project id from query: {}", id);
            return Some(id);
        }

        if let Some(id) = self.path_id(parsed.path()) {
            debug!("Project id from path: {}", id);
            return Some(id);
        }

        debug!("No project id in {}", url);
        None
    }

    fn path_id(&self, path: &str) -> Option<String> {
        let last = path
            .split('/')
            .filter(|part| !part.is_empty() && *part != RESERVED_SEGMENT && *part != self.page_name)
            .last()?;

        let id = last.strip_suffix(".html").unwrap_or(last);
        if id.is_empty() || id == RESERVED_SEGMENT {
            return None;
        }
        Some(id.to_string())
    }
}

/// Resolve with the default page name.
pub fn resolve_project_id(url: &str) -> Option<String> {
    ProjectIdResolver::default().resolve(url)
}

fn parse_url(url: &str) -> Option<Url> {
    match Url::parse(url) {
        Ok(parsed) => Some(parsed),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse("http://localhost/").ok()?;
            base.join(url).ok()
        }
        Err(e) => {
            debug!("Unparseable URL {:?}: {}", url, e);
            None
        }
    }
}

/// First non-empty `id` parameter of a query string.
fn query_id(query: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
