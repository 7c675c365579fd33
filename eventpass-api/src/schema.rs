//! Schema bootstrap.
//!
//! Both tables are created with `IF NOT EXISTS`, so running this on every
//! startup is safe. Unique constraints carry fixed names because the store
//! uses them to tell a taken username from a taken email.

use deadpool_postgres::Pool;
use eventpass_core::limits;

use crate::error::ApiResult;

/// Constraint backing username uniqueness.
pub const USERS_USERNAME_KEY: &str = "users_username_key";

/// Constraint backing email uniqueness.
pub const USERS_EMAIL_KEY: &str = "users_email_key";

/// DDL for the `users` table, column widths taken from [`limits`].
pub fn users_table_ddl() -> String {
    format!(
        "
CREATE TABLE IF NOT EXISTS users (
    user_id           VARCHAR(36)  PRIMARY KEY,
    first_name        VARCHAR({first_name}) NOT NULL,
    last_name         VARCHAR({last_name}) NOT NULL,
    username          VARCHAR({username}) NOT NULL,
    email             VARCHAR({email}) NOT NULL,
    password_verifier VARCHAR(255) NOT NULL,
    phone             VARCHAR({phone})  NOT NULL,
    created_at        TIMESTAMPTZ  NOT NULL DEFAULT NOW(),
    CONSTRAINT {USERS_USERNAME_KEY} UNIQUE (username),
    CONSTRAINT {USERS_EMAIL_KEY} UNIQUE (email)
)",
        first_name = limits::FIRST_NAME,
        last_name = limits::LAST_NAME,
        username = limits::USERNAME,
        email = limits::EMAIL,
        phone = limits::PHONE,
    )
}

/// DDL for the `events` table, column widths taken from [`limits`].
pub fn events_table_ddl() -> String {
    format!(
        "
CREATE TABLE IF NOT EXISTS events (
    event_id    VARCHAR(36)  PRIMARY KEY,
    title       VARCHAR({title}) NOT NULL,
    description TEXT         NOT NULL,
    location    VARCHAR({location}) NOT NULL,
    date        DATE         NOT NULL,
    start_time  TIME         NOT NULL,
    end_time    TIME         NOT NULL,
    created_by  VARCHAR({created_by}) NOT NULL,
    total_slots INTEGER      NOT NULL CHECK (total_slots >= 0),
    created_at  TIMESTAMPTZ  NOT NULL DEFAULT NOW()
)",
        title = limits::EVENT_TITLE,
        location = limits::EVENT_LOCATION,
        created_by = limits::CREATED_BY,
    )
}

/// Create the `users` and `events` tables if they are missing.
pub async fn ensure_schema(pool: &Pool) -> ApiResult<()> {
    let conn = pool.get().await?;
    conn.batch_execute(&users_table_ddl()).await?;
    conn.batch_execute(&events_table_ddl()).await?;
    tracing::info!("Database schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ddl_is_idempotent() {
        assert!(users_table_ddl().contains("IF NOT EXISTS"));
        assert!(events_table_ddl().contains("IF NOT EXISTS"));
    }

    #[test]
    fn test_unique_constraints_named() {
        let ddl = users_table_ddl();
        assert!(ddl.contains("CONSTRAINT users_username_key UNIQUE (username)"));
        assert!(ddl.contains("CONSTRAINT users_email_key UNIQUE (email)"));
    }

    #[test]
    fn test_slot_count_checked() {
        assert!(events_table_ddl().contains("CHECK (total_slots >= 0)"));
    }

    #[test]
    fn test_column_widths_follow_limits() {
        let users = users_table_ddl();
        assert!(users.contains("username          VARCHAR(100) NOT NULL"));
        assert!(users.contains("email             VARCHAR(255) NOT NULL"));
        assert!(users.contains("phone             VARCHAR(32)  NOT NULL"));

        let events = events_table_ddl();
        assert!(events.contains("title       VARCHAR(255) NOT NULL"));
        assert!(events.contains("created_by  VARCHAR(100) NOT NULL"));
    }
}
