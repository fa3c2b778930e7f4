//! External Collaborators Module
//!
//! Trait seams for the services the core consumes but never inspects:
//! the content processor (OCR/PDF/LLM pipeline), the identity resolver
//! (platform signature verification), and the notifier (message
//! delivery). Production deployments plug their own implementations;
//! the built-ins here keep the service runnable and testable on their
//! own.

mod identity;
mod notifier;
mod processor;

// Re-export public types
pub use identity::{IdentityResolver, PlainIdentityResolver};
pub use notifier::{LogNotifier, Notifier};
pub use processor::{ContentProcessor, ExtractiveProcessor};
