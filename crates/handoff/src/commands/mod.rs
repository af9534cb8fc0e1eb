pub mod hooks;
pub mod status;
pub mod version;
