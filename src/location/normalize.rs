//! Name normalization: strip Chinese administrative-unit suffixes.

/// Suffix marking a city ("市").
const CITY_SUFFIX: &str = "市";

/// Provincial-level suffixes. Only one is removed per call.
const ADMIN_SUFFIXES: &[&str] = &["特别行政区", "自治区", "省", "市"];

/// Remove a trailing "市" to get a bare city candidate.
pub fn strip_suffix(input: &str) -> &str {
    input.strip_suffix(CITY_SUFFIX).unwrap_or(input)
}

/// Remove one trailing province / municipality / autonomous-region /
/// SAR suffix to get a bare province candidate.
pub fn strip_admin_suffix(input: &str) -> &str {
    ADMIN_SUFFIXES
        .iter()
        .find_map(|suffix| input.strip_suffix(suffix))
        .unwrap_or(input)
}
