//! Interactive terminal client for the blog posts API.
//!
//! The `Controller` maps user actions to `blog-core` requests one-to-one and
//! reports every outcome through a single feedback line, behind two seams:
//! `Transport` (who executes the HTTP round-trip) and `Screen` (where posts
//! and feedback go). The binary wires in ureq and the terminal; tests wire in
//! recording fakes.

pub mod config;
pub mod controller;
pub mod transport;
pub mod view;

pub use config::Config;
pub use controller::{Controller, FormMode};
pub use transport::{Transport, TransportError, UreqTransport};
pub use view::{Screen, TerminalScreen};
