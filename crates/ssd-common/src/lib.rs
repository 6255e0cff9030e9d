//! Common utilities for the SSD scene description toolkit.
//!
//! This crate provides the low-level building blocks shared by the SSD crates:
//!
//! - [`BinaryReader`] - Zero-copy big-endian reading from byte slices
//! - [`BinaryWriter`] - Big-endian writing into a growable buffer
//! - [`Error`] - Low-level read/write failures

mod error;
mod reader;
mod writer;

pub use error::{Error, Result};
pub use reader::BinaryReader;
pub use writer::BinaryWriter;
