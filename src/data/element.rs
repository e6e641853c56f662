use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::{ElementError, MassError};
use super::masses::IsotopeTable;
use super::matching::Identified;

static ELEMENT_RE: OnceLock<Regex> = OnceLock::new();
static SUM_RE: OnceLock<Regex> = OnceLock::new();

fn element_re() -> &'static Regex {
    ELEMENT_RE.get_or_init(|| {
        Regex::new(r"^(?P<isotope>[0-9]{0,3})(?P<symbol>[a-zA-Z]{1,2})(\s(?P<amount>\d*(\.?\d+)?))?")
            .expect("element pattern is valid")
    })
}

fn sum_re() -> &'static Regex {
    SUM_RE.get_or_init(|| {
        Regex::new(r"^(?P<isotope>[0-9]{0,3})(?P<symbol>[a-zA-Z]{1,3})(\s(?P<amount>\d*(\.?\d+)?))?")
            .expect("sum pattern is valid")
    })
}

/// An element, optionally a specific isotope of it, with an optional
/// amount (e.g. its share in a target layer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub symbol: String,
    pub isotope: Option<u32>,
    #[serde(default)]
    pub amount: f64,
}

impl Element {
    pub fn new(symbol: impl Into<String>, isotope: Option<u32>, amount: f64) -> Self {
        Element {
            symbol: symbol.into(),
            isotope,
            amount,
        }
    }

    /// Parse `"[isotope]symbol[ amount]"`, e.g. `"He"`, `"4He"`, `"3H 2"`.
    pub fn from_string(s: &str) -> Result<Self, ElementError> {
        let re = if s == "SUM" { sum_re() } else { element_re() };
        let caps = re
            .captures(s.trim())
            .ok_or_else(|| ElementError::InvalidString(s.to_string()))?;

        let symbol = caps["symbol"].to_string();
        let isotope = match caps.name("isotope").map(|m| m.as_str()) {
            Some(iso) if !iso.is_empty() => Some(
                iso.parse::<u32>()
                    .map_err(|_| ElementError::InvalidString(s.to_string()))?,
            ),
            _ => None,
        };
        let amount = match caps.name("amount").map(|m| m.as_str()) {
            Some(amount) if !amount.is_empty() => amount
                .parse::<f64>()
                .map_err(|_| ElementError::InvalidString(s.to_string()))?,
            _ => 0.0,
        };

        Ok(Element {
            symbol,
            isotope,
            amount,
        })
    }

    /// Element of a cut file name, e.g. `16O` from `tof1234.16O.ERD.0.cut`
    /// or `Ta` from `sample.35Cl.RBS_Ta.0.cut`.
    pub fn from_cutfile_string(name: &str) -> Result<Self, ElementError> {
        let invalid = || ElementError::InvalidCutFile(name.to_string());
        let parts: Vec<&str> = name.split('.').collect();
        if parts.len() < 4 {
            return Err(invalid());
        }
        if parts[2] == "ERD" {
            Self::from_string(parts[1])
        } else if let Some(scatter) = parts[2].strip_prefix("RBS_") {
            Self::from_string(scatter)
        } else {
            Err(invalid())
        }
    }

    /// `"[isotope]symbol"`, never the amount.
    pub fn prefix(&self) -> String {
        match self.isotope {
            Some(iso) => format!("{iso}{}", self.symbol),
            None => self.symbol.clone(),
        }
    }

    pub fn standard_mass(&self, table: &IsotopeTable) -> Result<f64, MassError> {
        table.get_standard_isotope(&self.symbol)
    }

    /// Mass of the isotope, or the standard mass when no isotope is set.
    pub fn mass(&self, table: &IsotopeTable) -> Result<Option<f64>, MassError> {
        match self.isotope {
            Some(iso) => table.find_mass_of_isotope(&self.symbol, f64::from(iso)),
            None => self.standard_mass(table).map(Some),
        }
    }

    /// Mass number of the most common isotope of this element.
    pub fn most_common_isotope(&self, table: &IsotopeTable) -> Result<Option<i64>, MassError> {
        match table.get_most_common_isotope(&self.symbol) {
            Ok((mass_number, _)) => Ok(Some(mass_number)),
            Err(MassError::NoIsotopes(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Order elements by standard mass, then isotope-less before isotopes,
    /// then by string form. Elements without a known standard mass come
    /// after those that have one.
    pub fn compare_by_mass(
        &self,
        other: &Self,
        table: &IsotopeTable,
    ) -> Result<Ordering, MassError> {
        let m1 = self.standard_mass(table)?;
        let m2 = other.standard_mass(table)?;
        Ok(self.compare_with_masses(other, m1, m2))
    }

    fn compare_with_masses(&self, other: &Self, m1: f64, m2: f64) -> Ordering {
        if self.symbol != other.symbol {
            if m1 != 0.0 && m2 != 0.0 {
                return m1.total_cmp(&m2);
            }
            if m1 != m2 {
                // the known mass goes first
                return m2.total_cmp(&m1);
            }
        }

        match (self.isotope, other.isotope) {
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            _ => self.to_string().cmp(&other.to_string()),
        }
    }
}

/// Sort `elements` with [`Element::compare_by_mass`].
pub fn sort_by_mass(elements: &mut [Element], table: &IsotopeTable) -> Result<(), MassError> {
    let mut masses: HashMap<String, f64> = HashMap::new();
    for elem in elements.iter() {
        if !masses.contains_key(&elem.symbol) {
            masses.insert(elem.symbol.clone(), elem.standard_mass(table)?);
        }
    }
    elements.sort_by(|a, b| a.compare_with_masses(b, masses[&a.symbol], masses[&b.symbol]));
    Ok(())
}

/// `"[isotope]symbol[ amount]"`. Isotope 0 and amount 0 are left out;
/// whole amounts keep one decimal (`"4He 2.0"`).
impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.isotope {
            Some(iso) if iso != 0 => write!(f, "{iso}{}", self.symbol)?,
            _ => write!(f, "{}", self.symbol)?,
        }
        if self.amount == 0.0 {
            Ok(())
        } else if self.amount.is_finite() && self.amount.fract() == 0.0 {
            write!(f, " {:.1}", self.amount)
        } else {
            write!(f, " {}", self.amount)
        }
    }
}

impl FromStr for Element {
    type Err = ElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl Identified for Element {
    fn canonical_form(&self) -> String {
        self.to_string()
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }
}
