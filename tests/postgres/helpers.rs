//! Temporary databases for the `PostgreSQL` tests.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::Connection;
use groundcrew::db::{self, GroundcrewPgPool};
use uuid::Uuid;

/// Names a database URL on a server the tests may create databases on.
pub const TEST_DATABASE_URL: &str = "GROUNDCREW_TEST_DATABASE_URL";

/// A schema-initialised database owned by one test.
pub struct TemporaryDatabase {
    admin_url: String,
    name: String,
    pool: GroundcrewPgPool,
}

impl TemporaryDatabase {
    /// Creates a database with the groundcrew schema applied.
    ///
    /// Returns `None` when [`TEST_DATABASE_URL`] is unset.
    pub async fn create() -> Option<Self> {
        let Ok(admin_url) = std::env::var(TEST_DATABASE_URL) else {
            skip_notice();
            return None;
        };
        let name = format!("groundcrew_test_{}", Uuid::new_v4().simple());
        let statement = format!("CREATE DATABASE \"{name}\"");
        let url = admin_url.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = PgConnection::establish(&url).expect("admin connection");
            connection.batch_execute(&statement).expect("database created");
        })
        .await
        .expect("create task finishes");

        let pool = db::connect(&database_url(&admin_url, &name), 4).expect("pool builds");
        db::apply_schema(&pool).await.expect("schema applies");
        Some(Self {
            admin_url,
            name,
            pool,
        })
    }

    /// Returns the pool for the temporary database.
    pub const fn pool(&self) -> &GroundcrewPgPool {
        &self.pool
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        let statement = format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)", self.name);
        let cleanup = PgConnection::establish(&self.admin_url)
            .map_err(|err| err.to_string())
            .and_then(|mut connection| {
                connection
                    .batch_execute(&statement)
                    .map_err(|err| err.to_string())
            });
        if let Err(err) = cleanup {
            report(&format!("failed to drop {}: {err}", self.name));
        }
    }
}

/// Swaps the database name in `admin_url` for `name`, keeping any query.
fn database_url(admin_url: &str, name: &str) -> String {
    let (base, query) = admin_url
        .split_once('?')
        .map_or((admin_url, None), |(base, query)| (base, Some(query)));
    let (server, _) = base
        .rsplit_once('/')
        .expect("database URL names a database");
    query.map_or_else(
        || format!("{server}/{name}"),
        |params| format!("{server}/{name}?{params}"),
    )
}

fn skip_notice() {
    report(&format!("{TEST_DATABASE_URL} is unset; skipping PostgreSQL test"));
}

#[expect(clippy::print_stderr, reason = "tests report skipped database work")]
fn report(message: &str) {
    eprintln!("{message}");
}

#[cfg(test)]
mod tests {
    use super::database_url;
    use rstest::rstest;

    #[rstest]
    #[case("postgres://crew@localhost:5432/postgres", "postgres://crew@localhost:5432/t1")]
    #[case(
        "postgres://crew@localhost/postgres?sslmode=disable",
        "postgres://crew@localhost/t1?sslmode=disable"
    )]
    fn swaps_the_database_name(#[case] admin: &str, #[case] expected: &str) {
        assert_eq!(database_url(admin, "t1"), expected);
    }
}
