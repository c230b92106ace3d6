//! Configuration module

mod site;

pub use site::MathConfig;
pub use site::SiteConfig;
