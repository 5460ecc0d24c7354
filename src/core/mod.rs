//! Calendar and contract services built on top of the document store.

pub mod services;
