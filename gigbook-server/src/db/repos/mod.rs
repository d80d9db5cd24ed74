//! Repository implementations for database access
//!
//! Each repository borrows the request's connection (normally a
//! transaction) and follows these patterns:
//! - Uses JOINs for list operations (no N+1)
//! - Missing rows come back as `DbError::NotFound`, never as `None`

pub mod artists;
pub mod shows;
pub mod venues;

pub use artists::ArtistRepo;
pub use shows::ShowRepo;
pub use venues::VenueRepo;

/// `ILIKE` pattern matching `term` as a literal substring.
///
/// `%`, `_` and the escape character itself are escaped; queries use
/// `ESCAPE '\'`.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_term_matches_everything() {
        assert_eq!(like_pattern(""), "%%");
    }

    #[test]
    fn plain_term_is_wrapped() {
        assert_eq!(like_pattern("fillmore"), "%fillmore%");
    }

    #[test]
    fn wildcards_are_literal() {
        assert_eq!(like_pattern("100%"), r"%100\%%");
        assert_eq!(like_pattern("a_b"), r"%a\_b%");
        assert_eq!(like_pattern(r"back\slash"), r"%back\\slash%");
    }
}
