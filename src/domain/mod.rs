//! Domain types and DTOs
//!
//! These types define the data structures for profiles, links, cards,
//! analytics and organizations.

pub mod analytics;
pub mod auth;
pub mod cards;
pub mod demo;
pub mod editor;
pub mod leads;
pub mod links;
pub mod organizations;
pub mod profiles;

// Re-export commonly used types
pub use editor::{EditorError, EditorState, LinkEditor};
pub use links::{Link, LinkField, LinkType};
pub use profiles::Profile;
