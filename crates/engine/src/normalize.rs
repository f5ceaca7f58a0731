//! Field-level text normalization.
//!
//! Everything here is total and pure. Records pass through exactly once, at
//! load time; blocking and scoring read the canonical values.

/// Lowercase, replace every non-alphanumeric run with a single space, trim.
pub fn clean_text(raw: &str) -> String {
    let spaced: String = raw
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    spaced
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Clean an address and abbreviate common street suffixes (whole words only).
pub fn normalize_address(raw: &str) -> String {
    clean_text(raw)
        .split_whitespace()
        .map(|token| match token {
            "street" => "st",
            "road" => "rd",
            "avenue" => "ave",
            "drive" => "dr",
            other => other,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncate a zip/postal code to at most 5 characters and right-pad with `'0'`
/// to exactly 5.
pub fn normalize_zip(raw: &str) -> String {
    let mut zip: String = raw.trim().chars().take(5).collect();
    let mut len = zip.chars().count();
    while len < 5 {
        zip.push('0');
        len += 1;
    }
    zip
}

/// Join normalized name and address with a single space. Either side may be
/// empty; the result carries no leading or trailing space.
pub fn combined(name: &str, address: &str) -> String {
    match (name.is_empty(), address.is_empty()) {
        (true, true) => String::new(),
        (false, true) => name.to_string(),
        (true, false) => address.to_string(),
        (false, false) => format!("{name} {address}"),
    }
}
