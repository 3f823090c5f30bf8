//! Process-wide signal publication

pub mod bus;
pub mod ports;

pub use bus::SignalBus;
pub use ports::SignalSink;
