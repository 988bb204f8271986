#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(test, deny(warnings))]

//! # mapfield-entities
//!
//! Reusable, agnostic domain entities for the mapfield location picker.
//!
//! The entities only contain generic functionality that does not reveal any
//! widget-specific behavior.

pub mod field;
pub mod geo;
pub mod geometry;
pub mod location;
pub mod projection;
pub mod search;
