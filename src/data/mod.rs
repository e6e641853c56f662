//! Data layer: column parsing, element matching and isotope statistics.
//!
//! Architecture:
//! ```text
//!  measurement / depth files          masses.dat
//!        │                                 │
//!        ▼                                 ▼
//!   ┌──────────┐                     ┌──────────┐
//!   │ parsing  │  lines → Table<T>   │  masses  │  symbol → [IsotopeRecord]
//!   └──────────┘                     └──────────┘
//!        │                                 │
//!        ▼                                 ▼
//!   ┌──────────┐                     ┌──────────┐
//!   │ matching │  labels ↔ Element   │ element  │  standard mass, ordering
//!   └──────────┘                     └──────────┘
//! ```
//!
//! The three leaves (`parsing`, `matching`, `masses`) do not depend on each
//! other; `element` ties the entity used by the matcher to the isotope table.

pub mod convert;
pub mod element;
pub mod error;
pub mod masses;
pub mod matching;
pub mod model;
pub mod parsing;

pub use element::{sort_by_mass, Element};
pub use error::{ElementError, MassError, ParseError};
pub use masses::{IsotopeChoices, IsotopeRecord, IsotopeTable};
pub use matching::{
    find_match_in_tables, match_elements_to_strs, match_strs_to_elements, Identified, SearchTable,
};
pub use model::{Table, Value};
pub use parsing::{parse_file, parse_str, parse_strs, ParseOptions};
