//! In-memory adapter implementations for the integration contract.

mod source;

pub use source::{DEFAULT_SOURCE_NAME, InMemoryTaskSource, SIGNATURE_HEADER};
