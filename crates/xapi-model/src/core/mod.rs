pub mod enums;
pub mod format;
pub mod types;
pub mod value;
