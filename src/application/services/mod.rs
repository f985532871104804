pub mod resolver;
pub mod watcher;
