pub const STORAGE_KEY_PREFIX: &str = "bitbucket_pr_description_";

// Keys left behind by an older layout that tracked save times separately.
const LEGACY_TIMESTAMP_SUFFIX: &str = "_timestamp";

/// The branch name is used verbatim.
pub fn storage_key(branch: &str) -> String {
    format!("{STORAGE_KEY_PREFIX}{branch}")
}

/// The branch a stored key belongs to, or `None` for keys this crate does not list.
pub fn branch_from_key(key: &str) -> Option<&str> {
    if key.ends_with(LEGACY_TIMESTAMP_SUFFIX) {
        return None;
    }
    key.strip_prefix(STORAGE_KEY_PREFIX)
}
