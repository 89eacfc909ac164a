// src/canon/mod.rs
// =============================================================================
// URL canonicalization and site scope.
//
// Submodules:
// - normalize: turns raw strings into CanonicalUrl values and resolves links
// - scope: decides whether a canonical URL belongs to the site being crawled
//
// Nothing in here does I/O. Every function is deterministic for its input,
// which is what lets the crawler use CanonicalUrl as a HashSet key.
// =============================================================================

mod normalize;
mod scope;

pub use normalize::{canonicalize, join, CanonicalUrl};
pub use scope::{is_followable_href, is_in_scope, SiteScope};
