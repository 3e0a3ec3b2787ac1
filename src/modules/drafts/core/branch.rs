// Branch name resolution.
//
// Responsibilities
// - Prefer the `sourceBranch` query parameter, reduced to its last path segment.
// - Fall back to the source-branch element's text, then to a literal default.
// - Never fail and never return an empty name. Failures are logged and resolve to the default.

use crate::modules::drafts::core::ports::{PageContext, PageError};
use std::borrow::Cow;
use thiserror::Error;
use tracing::warn;
use url::Url;

pub const SOURCE_BRANCH_PARAM: &str = "sourceBranch";
pub const FALLBACK_BRANCH_SELECTOR: &str = r#"[data-testid="source-branch-name"]"#;
pub const DEFAULT_BRANCH: &str = "default";

#[derive(Debug, Error)]
enum ResolveError {
    #[error(transparent)]
    Page(#[from] PageError),

    #[error("invalid page url: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid branch encoding: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("malformed percent escape in branch reference: {0}")]
    MalformedEscape(String),
}

pub fn resolve_branch_name(page: &dyn PageContext) -> String {
    match try_resolve(page) {
        Ok(Some(branch)) => branch,
        Ok(None) => DEFAULT_BRANCH.to_string(),
        Err(err) => {
            warn!(error = %err, "failed to get branch name");
            DEFAULT_BRANCH.to_string()
        }
    }
}

fn try_resolve(page: &dyn PageContext) -> Result<Option<String>, ResolveError> {
    let url = Url::parse(&page.page_url()?)?;
    let reference = url
        .query_pairs()
        .find(|(name, _)| name == SOURCE_BRANCH_PARAM)
        .map(|(_, value)| value.into_owned());

    if let Some(reference) = reference.filter(|r| !r.is_empty()) {
        // Query parsing decodes once; references arrive encoded twice.
        let decoded = decode_component(&reference)?;
        let last_segment = decoded.rsplit('/').next().unwrap_or_default();
        if !last_segment.is_empty() {
            return Ok(Some(last_segment.to_string()));
        }
    }

    if let Some(text) = page.element_text(FALLBACK_BRANCH_SELECTOR)? {
        let text = text.trim();
        if !text.is_empty() {
            return Ok(Some(text.to_string()));
        }
    }

    Ok(None)
}

/// Percent-decodes a URI component. Every `%` must start a two-digit hex escape.
fn decode_component(component: &str) -> Result<Cow<'_, str>, ResolveError> {
    let bytes = component.as_bytes();
    let well_formed = bytes.iter().enumerate().all(|(i, b)| {
        *b != b'%'
            || bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
    });
    if !well_formed {
        return Err(ResolveError::MalformedEscape(component.to_string()));
    }
    Ok(urlencoding::decode(component)?)
}
