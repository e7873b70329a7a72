//! Classification of PostgreSQL constraint violations.

/// Unique constraint on `urls.short_code`.
pub const SHORT_CODE_CONSTRAINT: &str = "urls_short_code_key";

/// Unique constraints on `users.username` and `users.email`.
pub const USER_CONSTRAINTS: &[&str] = &["users_username_key", "users_email_key"];

/// Returns the name of the violated unique constraint, if `e` is a unique violation.
pub fn unique_violation_constraint(e: &sqlx::Error) -> Option<&str> {
    let db_err = e.as_database_error()?;

    if !db_err.is_unique_violation() {
        return None;
    }

    db_err.constraint()
}

/// Returns true if `e` is a unique violation on the short code column.
pub fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    matches!(unique_violation_constraint(e), Some(SHORT_CODE_CONSTRAINT))
}

/// Returns true if `e` is a unique violation on the username or email column.
pub fn is_unique_violation_on_user(e: &sqlx::Error) -> bool {
    unique_violation_constraint(e).is_some_and(|c| USER_CONSTRAINTS.contains(&c))
}
