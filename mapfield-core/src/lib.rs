//! # mapfield-core
//!
//! The widget logic of the map location picker: the capabilities a map
//! engine and a geocoding service have to provide, the map control that wires
//! drawing to the host field and the search that feeds the options list.

pub use mapfield_entities as entities;

pub mod button;
pub mod codec;
pub mod control;
pub mod gateways;
pub mod headless;
pub mod map;
pub mod search;
pub mod widget;
