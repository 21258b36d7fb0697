use super::Version;
use crate::errors::MilestoneResult;
use std::cmp::Ordering;

/// Compares two version identifiers given as text.
///
/// Both sides are parsed first, so a malformed identifier on either side is an
/// `InvalidVersionFormat` error rather than a guessed ordering.
///
/// ```rust
/// use milestone::version::compare_versions;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_versions("1.2", "1.10").unwrap(), Ordering::Less);
/// assert_eq!(compare_versions("1.4", "1.4.0").unwrap(), Ordering::Equal);
/// assert!(compare_versions("1.2", "").is_err());
/// ```
pub fn compare_versions(left: &str, right: &str) -> MilestoneResult<Ordering> {
    let left = Version::parse(left)?;
    let right = Version::parse(right)?;
    Ok(left.cmp(&right))
}

/// Orders a possibly absent watermark against a concrete version.
///
/// An absent watermark sorts strictly below every version, including `0`.
pub fn compare_watermark(watermark: Option<&Version>, version: &Version) -> Ordering {
    match watermark {
        Some(watermark) => watermark.cmp(version),
        None => Ordering::Less,
    }
}
