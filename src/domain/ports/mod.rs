pub mod liveness;
pub mod notifier;
pub mod process_table;

pub use liveness::{LivenessProbe, ProbeError};
pub use notifier::{NotificationError, Notifier};
pub use process_table::{ProcessTable, ProcessTableError};
