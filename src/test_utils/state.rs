use std::sync::Arc;

use rusqlite::Connection;
use time::{OffsetDateTime, macros::datetime};

use crate::{app_state::StoreState, clock::FixedClock, db::Store};

/// The time that test clocks are fixed to.
pub(crate) const TEST_NOW: OffsetDateTime = datetime!(2024-01-20 10:30 UTC);

#[track_caller]
pub(crate) fn must_create_store_state() -> StoreState {
    let connection =
        Connection::open_in_memory().expect("Could not create in-memory SQLite database");
    let store = Store::new(connection).expect("Could not initialize test DB");

    StoreState {
        store,
        clock: Arc::new(FixedClock(TEST_NOW)),
    }
}
