// ABOUTME: Version and target-list helpers for provisioning runs
// ABOUTME: Strips package build metadata and orders the databases to visit

/// Drop everything from the first `+` onward
///
/// Package versions such as `3.5.3+dfsg-1` carry build metadata the server
/// does not know about; the extension version is the part before the `+`.
/// Input without a `+` is returned unchanged.
///
/// # Examples
///
/// ```
/// # use postgis_provisioner::provision::strip_build_metadata;
/// assert_eq!(strip_build_metadata("3.5.3+dfsg-1"), "3.5.3");
/// assert_eq!(strip_build_metadata("3.5.3"), "3.5.3");
/// ```
pub fn strip_build_metadata(raw: &str) -> &str {
    match raw.split_once('+') {
        Some((core, _)) => core,
        None => raw,
    }
}

/// Build the ordered list of databases to provision
///
/// The template database always comes first and the primary database second,
/// followed by `extras` in the order given. Duplicates are kept.
pub fn target_databases<S: AsRef<str>>(template: &str, primary: &str, extras: &[S]) -> Vec<String> {
    let mut databases = Vec::with_capacity(extras.len() + 2);
    databases.push(template.to_string());
    databases.push(primary.to_string());
    databases.extend(extras.iter().map(|db| db.as_ref().to_string()));
    databases
}
