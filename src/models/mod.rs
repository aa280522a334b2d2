//! Domain models for the portfolio.
//!
//! # Content
//!
//! - [`Project`]: A showcased piece of work with its tech stack and links.
//! - [`Skill`]: A named skill grouped under a category ("Frontend", "Tools", ...).
//! - [`TimelineEntry`]: A role, education or milestone on the experience timeline.
//!   Entries carry an explicit `order` used for display.
//! - [`Certification`]: A credential with issuer, dates and an optional verification link.
//!
//! ## Inbound
//!
//! - [`ContactMessage`]: A message left through the contact form. Write-only from
//!   the visitor's point of view.

mod certification;
mod message;
mod project;
mod skill;
mod timeline;

pub use certification::*;
pub use message::*;
pub use project::*;
pub use skill::*;
pub use timeline::*;
