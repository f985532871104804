pub mod descriptor;
pub mod process;

pub use descriptor::{controlling_terminal, working_directory, DescriptorRecord, CWD_LABEL};
pub use process::{BestEffort, MonitoredProcess, ProcessListing};
