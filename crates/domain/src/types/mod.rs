//! Domain types and models

pub mod entity;
pub mod governance;
pub mod request;
pub mod response;
pub mod session;
pub mod settings;
pub mod signal;

pub use entity::EntityKind;
pub use governance::{ActionDescriptor, GovernanceDecision, RiskLevel};
pub use request::{HttpMethod, RequestBody, RequestDescriptor, RequestDescriptorBuilder};
pub use response::ResponsePayload;
pub use session::{Durability, LoginCredentials, Session};
pub use settings::SettingsClass;
pub use signal::{GovernanceSignal, Signal};
