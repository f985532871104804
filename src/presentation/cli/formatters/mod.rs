pub mod process_fmt;
