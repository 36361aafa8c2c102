//! Pre-mutation snapshots
//!
//! A [`SnapshotRecord`] is captured from a fetched detail document and handed
//! to a [`SnapshotStore`]. Destructive jobs only mutate a resource after the
//! store has acknowledged its record.

pub mod checksum;
pub mod record;
pub mod store;
pub mod verify;

pub use record::SnapshotRecord;
pub use store::{backup_file_name, FileSnapshotStore, SnapshotAck, SnapshotStore};
pub use verify::{read_backup, verify_backup, BackupFailure, BackupVerification};
