pub mod format;
pub mod platform;
pub mod test_utils;
