//! Foundation types for tagdb.
//!
//! This crate provides the identifier format, the item capability interface,
//! and the any-typed value container shared by every other tagdb crate.
//!
//! # Key Types
//!
//! - [`Pointer`] -- Decoded `kind{key:val}` identifier
//! - [`Item`] -- Capability interface implemented by everything a loader produces
//! - [`ItemRef`] -- Shared handle to a type-erased item
//! - [`Value`] -- Any-typed container held by the store, with checked downcasts

pub mod error;
pub mod item;
pub mod pointer;
pub mod value;

pub use error::TypeError;
pub use item::{AsAny, Item, ItemRef};
pub use pointer::{encode, Pointer};
pub use value::Value;
