use crate::constants::VIEWER_PATH_PREFIX;

/// Outbound link to the external pattern viewer: `<base>/v/<id>`.
///
/// An empty base yields a site-relative link. The target is never fetched
/// or validated here.
pub fn viewer_url(base: &str, id: &str) -> String {
    format!("{}{VIEWER_PATH_PREFIX}{id}", base.trim_end_matches('/'))
}
