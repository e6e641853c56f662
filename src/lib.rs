//! Data handling for ToF-ERD measurement analysis: column oriented text
//! parsing, element/isotope label matching and isotope statistics.

pub mod data;
