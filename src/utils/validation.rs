//! Centralized validation for catalog input.

/// Maximum number of annotations accepted in a single catalog
pub const MAX_ANNOTATIONS: usize = 10_000_000;

/// Maximum number of simultaneously displayed segments
pub const MAX_SEGMENTS: usize = 10_000;

/// Catalog validation error types
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unknown map '{0}'")]
    UnknownMap(String),
    #[error("Unknown chromosome '{name}' on map '{map}'")]
    UnknownChromosome { map: String, name: String },
    #[error("Duplicate map id '{0}'")]
    DuplicateMap(String),
    #[error("Duplicate chromosome '{name}' on map '{map}'")]
    DuplicateChromosome { map: String, name: String },
    #[error("Chromosome '{0}' must have a positive length")]
    InvalidLength(String),
    #[error("Annotation '{0}' has a negative coordinate")]
    NegativeCoordinate(String),
    #[error("Annotation name must not be empty")]
    EmptyName,
    #[error("Segment of chromosome '{0}' shows nothing: start and stop coincide")]
    EmptySegment(String),
    #[error("{0}")]
    TooMany(String),
}

/// Check if adding another annotation would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding.
#[must_use]
pub fn check_annotation_limit(count: usize) -> Option<String> {
    if count >= MAX_ANNOTATIONS {
        Some(format!(
            "Too many annotations: adding another would exceed maximum of {MAX_ANNOTATIONS}"
        ))
    } else {
        None
    }
}

/// Check if adding another segment would exceed the maximum allowed.
#[must_use]
pub fn check_segment_limit(count: usize) -> Option<String> {
    if count >= MAX_SEGMENTS {
        Some(format!(
            "Too many segments: adding another would exceed maximum of {MAX_SEGMENTS}"
        ))
    } else {
        None
    }
}

/// Validate a chromosome length
///
/// # Errors
///
/// Returns `ValidationError::InvalidLength` if `length` is not positive.
pub fn validate_length(name: &str, length: i64) -> Result<(), ValidationError> {
    if length <= 0 {
        return Err(ValidationError::InvalidLength(name.to_string()));
    }
    Ok(())
}

/// Validate an annotation's name and coordinates
///
/// # Errors
///
/// Returns `ValidationError::EmptyName` for a blank name, or
/// `ValidationError::NegativeCoordinate` if either coordinate is negative.
pub fn validate_annotation(name: &str, start: i64, stop: i64) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if start < 0 || stop < 0 {
        return Err(ValidationError::NegativeCoordinate(name.to_string()));
    }
    Ok(())
}

/// Split a `map:chromosome` segment label.
///
/// # Examples
///
/// ```
/// use synteny_select::utils::validation::parse_segment_label;
///
/// assert_eq!(parse_segment_label("rat:chr1"), Some(("rat", "chr1")));
/// assert_eq!(parse_segment_label("chr1"), None);
/// ```
#[must_use]
pub fn parse_segment_label(label: &str) -> Option<(&str, &str)> {
    let (map, chromosome) = label.split_once(':')?;
    let (map, chromosome) = (map.trim(), chromosome.trim());
    if map.is_empty() || chromosome.is_empty() {
        return None;
    }
    Some((map, chromosome))
}
