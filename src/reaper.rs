use std::thread;
use std::time::{Duration, SystemTime};

use crate::store::NoteStore;

pub const DEFAULT_INTERVAL_SECS: u64 = 300;

/// Periodic hygiene pass over the store. Lazy expiry in `read` already
/// enforces deadlines, so a missed tick costs nothing but lingering rows.
pub fn spawn(store: NoteStore, interval: Duration) -> thread::JoinHandle<()> {
    thread::spawn(move || loop {
        thread::sleep(interval);
        match store.sweep(SystemTime::now()) {
            Ok(0) => {}
            Ok(scrubbed) => log::info!("reaper scrubbed {} stale note(s)", scrubbed),
            Err(err) => log::error!("reaper sweep failed: {}", err),
        }
    })
}
