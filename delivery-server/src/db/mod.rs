//! Database access layer
//!
//! Plain functions over `sqlx` executors. Read helpers accept any
//! `PgExecutor` so the same query runs on the pool or inside a transaction.

pub mod customers;
pub mod orders;
pub mod products;
pub mod reports;
pub mod restaurants;

pub type DbResult<T> = Result<T, sqlx::Error>;

/// Build an `ILIKE` pattern matching `term` anywhere, with wildcards escaped
pub fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("ana"), "%ana%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
