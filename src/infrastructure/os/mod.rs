pub mod process_table;
pub mod signal_probe;
