//! # stringsutil
//!
//! Prints the string constants of Java class files, like `strings(1)` but
//! driven by the class file structure instead of raw byte scanning.
//!
//! ## Architecture
//!
//! - **sniff**: Classifies a resource as class file, archive or neither from its first four bytes
//! - **constant_pool**: Constant pool reader and index lookups
//! - **mutf8**: Modified UTF-8 decoding for `CONSTANT_Utf8` entries
//! - **class_file**: Reads a class file up to `this_class` and emits its strings
//! - **archive**: Opens zip-family archives and hands out filtered members
//! - **traverse**: Walks files and nested archives with an explicit frame stack
//! - **scan**: Directory walking
//! - **filter**: Include/exclude glob matching
//! - **resource**: File, in-memory and archive-member byte sources
//! - **output**: Output and diagnostic channels

pub mod archive;
pub mod class_file;
pub mod cli;
pub mod config;
pub mod constant_pool;
pub mod error;
pub mod filter;
pub mod mutf8;
pub mod output;
pub mod resource;
pub mod scan;
pub mod sniff;
pub mod traverse;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::{Error, Malformed};
