pub mod notifications;
pub mod os;
