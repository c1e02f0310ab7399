mod profiles;
mod time_entries;

pub use profiles::PgProfileReader;
pub use time_entries::PgTimeEntryStore;

use zman_core::StoreError;

/// Name of the partial unique index enforcing one running entry per owner.
const RUNNING_UNIQUE_CONSTRAINT: &str = "one_running_entry_per_owner";

pub(crate) fn into_store_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.constraint() == Some(RUNNING_UNIQUE_CONSTRAINT) => {
            StoreError::DuplicateRunning(db.message().to_string())
        }
        _ => StoreError::backend(err.to_string()),
    }
}
