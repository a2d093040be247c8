//! Runtime support emitted alongside translated code.
//!
//! Each module here is compiled into this crate so it can be tested, and its
//! source text is also available as a constant for injection into generated
//! documents.

pub mod id_getter;

/// The source of [`id_getter`], prepended to documents that allocate objects.
pub const ID_GETTER_PRELUDE: &str = include_str!("support/id_getter.rs");
