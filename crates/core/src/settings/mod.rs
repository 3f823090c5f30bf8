//! Local durability for settings-class operations

pub mod fallback;

pub use fallback::LocalSettingsFallback;
