use std::collections::BTreeSet;

/// Decide whether an asset is referenced by any member of the reference set.
///
/// An asset counts as used when some reference ends with the asset's file name, or when the
/// asset's site-relative path ends with some reference. Plain string suffixes are compared, so
/// `logo.png` also matches a reference to `site-logo.png`; the comparison only ever errs towards
/// "used".
pub fn is_used_by(asset_relative: &str, references: &BTreeSet<String>) -> bool {
    let asset_relative = asset_relative.replace('\\', "/");
    let file_name = asset_relative
        .rsplit('/')
        .next()
        .unwrap_or(asset_relative.as_str());

    if file_name.is_empty() {
        return false;
    }

    references.iter().any(|reference| {
        reference.ends_with(file_name)
            || (!reference.is_empty() && asset_relative.ends_with(reference.as_str()))
    })
}
