//! String normalization used to reconcile records across upstream providers.
//!
//! The geocoding provider formats official names with middle initials
//! ("John Q. Public") while the legislative provider does not ("John Public").
//! Names are matched on the normalized "first last" form. Category labels are
//! turned into the subject slugs the legislative API expects in its URLs.

use chrono::NaiveDate;

/// Drop every whitespace-delimited token that contains a period.
///
/// A last name containing a period is dropped too; upstream data has not
/// required handling that case.
///
/// ```
/// use voterinfo_api::normalize::normalize_name;
///
/// assert_eq!(normalize_name("John Q. Public"), "John Public");
/// assert_eq!(normalize_name("Jo Ann Davis"), "Jo Ann Davis");
/// ```
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .filter(|token| !token.contains('.'))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convert a category label into a subject slug.
///
/// Commas and apostrophes are removed and the remaining tokens are joined
/// with single hyphens. Case is preserved.
///
/// ```
/// use voterinfo_api::normalize::category_slug;
///
/// assert_eq!(
///     category_slug("Women's Health, Reproductive Rights"),
///     "Womens-Health-Reproductive-Rights"
/// );
/// ```
#[must_use]
pub fn category_slug(name: &str) -> String {
    name.replace([',', '\''], "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// The slug of a bill id is everything before the first hyphen
/// (`hr1234-115` becomes `hr1234`).
#[must_use]
pub fn bill_slug(bill_id: &str) -> &str {
    bill_id.split_once('-').map_or(bill_id, |(slug, _)| slug)
}

/// Join roster first and last names into the display name used as the
/// cross-provider join key.
#[must_use]
pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{first_name} {last_name}")
}

/// Parse a roster `next_election` year ("2020") into January 1st of that year.
///
/// Returns `None` if the value is not a four-digit year.
#[must_use]
pub fn parse_election_year(year: &str) -> Option<NaiveDate> {
    let year = year.trim();
    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, 1, 1)
}
