//! Dashboard URL derivation

use regex::Regex;
use std::sync::LazyLock;

static NON_SLUG_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Turn a dashboard title into its URL slug
///
/// `"Terraform Acceptance Test"` becomes `"terraform-acceptance-test"`.
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    NON_SLUG_CHARS
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Relative path of a dashboard: `/d/<uid>/<slug>`
pub fn dashboard_path(uid: &str, title: Option<&str>) -> String {
    let slug = title.map(slugify).unwrap_or_default();
    if slug.is_empty() {
        format!("/d/{uid}")
    } else {
        format!("/d/{uid}/{slug}")
    }
}

/// Absolute dashboard URL under `base`
pub fn dashboard_url(base: &str, uid: &str, title: Option<&str>) -> String {
    format!("{}{}", base.trim_end_matches('/'), dashboard_path(uid, title))
}
