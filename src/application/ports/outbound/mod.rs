//! Outbound ports - Interfaces that the application requires from external systems

mod content_port;

pub use content_port::ContentPackPort;
