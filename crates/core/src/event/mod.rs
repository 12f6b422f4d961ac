//! Queue trigger events.
//!
//! Both handlers are invoked with the same envelope: a batch of queue
//! messages, each carrying an opaque JSON-encoded body.

mod types;

pub use types::*;
