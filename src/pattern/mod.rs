//! URI pattern subsystem.
//!
//! # Data Flow
//! ```text
//! Route template string ("/users/${id}/posts/**")
//!     → segment.rs (split, classify, validate)
//!     → UriPattern (compiled, immutable)
//!
//! Request path ("/users/42/posts/2024/01/hello")
//!     → segment.rs (normalize . / .. / empty segments)
//!     → matcher.rs (segment-by-segment match, capture variables)
//!     → bool / name -> capture map
//! ```
//!
//! # Design Decisions
//! - Patterns compiled once at startup, immutable at runtime
//! - No regex: plain segment comparison keeps matching linear
//! - Total specificity order so registries sort deterministically
//! - Variable names never affect pattern equality, only captures

pub mod matcher;
pub mod segment;

pub use matcher::UriPattern;
pub use segment::Segment;
