use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info};
use serde::Serialize;

use super::error::MassError;

/// Minimum number of fields in a row of the isotope file.
const MIN_FIELDS: usize = 6;
const MASS_FIELD: usize = 2;
const SYMBOL_FIELD: usize = 3;
const ABUNDANCE_FIELD: usize = 5;

// ---------------------------------------------------------------------------
// IsotopeRecord – one row of the isotope file
// ---------------------------------------------------------------------------

/// Mass and natural abundance (percent) of one isotope, kept as read from
/// the file. Values are converted when they are queried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsotopeRecord {
    pub mass: String,
    pub abundance: String,
}

impl IsotopeRecord {
    pub fn new(mass: impl Into<String>, abundance: impl Into<String>) -> Self {
        IsotopeRecord {
            mass: mass.into(),
            abundance: abundance.into(),
        }
    }

    pub fn mass_value(&self, symbol: &str) -> Result<f64, MassError> {
        to_f64(&self.mass, symbol, "mass")
    }

    /// The mass field read as an integral mass number.
    pub fn mass_number(&self, symbol: &str) -> Result<i64, MassError> {
        self.mass
            .trim()
            .parse::<i64>()
            .map_err(|_| conversion_error(symbol, "mass number", &self.mass))
    }

    pub fn abundance_value(&self, symbol: &str) -> Result<f64, MassError> {
        to_f64(&self.abundance, symbol, "abundance")
    }
}

fn to_f64(raw: &str, symbol: &str, field: &'static str) -> Result<f64, MassError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| conversion_error(symbol, field, raw))
}

fn conversion_error(symbol: &str, field: &'static str, raw: &str) -> MassError {
    MassError::Conversion {
        symbol: symbol.to_string(),
        field,
        value: raw.to_string(),
    }
}

// ---------------------------------------------------------------------------
// IsotopeChoices – what a selection widget shows for one element
// ---------------------------------------------------------------------------

/// Selectable isotopes of an element, most abundant first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IsotopeChoices {
    /// `(mass, abundance)` pairs with non-zero abundance.
    pub items: Vec<(String, f64)>,
    /// Position of the caller's current isotope in `items`, if present.
    pub selected: Option<usize>,
}

// ---------------------------------------------------------------------------
// IsotopeTable – symbol → isotopes
// ---------------------------------------------------------------------------

/// Isotopes of each element, in the order they appear in the source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IsotopeTable {
    isotopes: BTreeMap<String, Vec<IsotopeRecord>>,
}

impl IsotopeTable {
    /// Load the table from a space separated isotope file.
    ///
    /// Field 2 of each row is the mass, field 3 the element symbol and
    /// field 5 the abundance in percent. Blank rows are skipped.
    pub fn from_path(path: &Path) -> Result<Self, MassError> {
        let file = File::open(path)?;
        let table = Self::from_reader(file)?;
        info!(
            "Loaded {} isotopes of {} elements from {}",
            table.isotope_count(),
            table.isotopes.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, MassError> {
        // a final newline makes every row end on a line terminator, so the
        // reader's line count right after a row is that row's line + 2
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader.chain(&b"\n"[..]));

        let mut isotopes: BTreeMap<String, Vec<IsotopeRecord>> = BTreeMap::new();
        let mut record = csv::StringRecord::new();
        while reader.read_record(&mut record)? {
            let line = reader.position().line().saturating_sub(2) as usize;
            // repeated spaces show up as empty fields
            let fields: Vec<&str> = record.iter().filter(|f| !f.trim().is_empty()).collect();
            if fields.is_empty() {
                continue;
            }
            if fields.len() < MIN_FIELDS {
                return Err(MassError::MalformedRow {
                    line,
                    fields: fields.len(),
                });
            }

            isotopes
                .entry(fields[SYMBOL_FIELD].to_string())
                .or_default()
                .push(IsotopeRecord::new(
                    fields[MASS_FIELD],
                    fields[ABUNDANCE_FIELD].trim(),
                ));
        }

        debug!("isotope table has {} elements", isotopes.len());
        Ok(IsotopeTable { isotopes })
    }

    /// Build a table from already grouped records.
    pub fn from_records(isotopes: BTreeMap<String, Vec<IsotopeRecord>>) -> Self {
        IsotopeTable { isotopes }
    }

    /// Known element symbols, sorted.
    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.isotopes.keys().map(String::as_str)
    }

    /// Raw records of `symbol` in file order; empty when unknown.
    pub fn isotopes(&self, symbol: &str) -> &[IsotopeRecord] {
        self.isotopes.get(symbol).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn isotope_count(&self) -> usize {
        self.isotopes.values().map(Vec::len).sum()
    }

    /// Copies of the records of `symbol`.
    ///
    /// With `sort_by_abundance` the most abundant isotope comes first (ties
    /// keep file order); with `filter_unlikely` isotopes of zero abundance
    /// are left out.
    pub fn get_isotopes(
        &self,
        symbol: &str,
        sort_by_abundance: bool,
        filter_unlikely: bool,
    ) -> Result<Vec<IsotopeRecord>, MassError> {
        let mut isotopes = self
            .isotopes(symbol)
            .iter()
            .map(|iso| -> Result<_, MassError> { Ok((iso.abundance_value(symbol)?, iso)) })
            .collect::<Result<Vec<_>, MassError>>()?;

        if filter_unlikely {
            isotopes.retain(|(abundance, _)| *abundance != 0.0);
        }
        if sort_by_abundance {
            isotopes.sort_by(|(a, _), (b, _)| b.total_cmp(a));
        }
        Ok(isotopes.into_iter().map(|(_, iso)| iso.clone()).collect())
    }

    /// Abundance weighted mass of `symbol`; `0.0` when the symbol is unknown.
    pub fn get_standard_isotope(&self, symbol: &str) -> Result<f64, MassError> {
        let mut standard = 0.0;
        for iso in self.isotopes(symbol) {
            standard += iso.mass_value(symbol)? * iso.abundance_value(symbol)?;
        }
        Ok(standard / 100.0)
    }

    /// The `(mass number, abundance)` of the most abundant isotope. The
    /// first one in file order wins a tie.
    pub fn get_most_common_isotope(&self, symbol: &str) -> Result<(i64, f64), MassError> {
        let most_common = self
            .get_isotopes(symbol, true, false)?
            .into_iter()
            .next()
            .ok_or_else(|| MassError::NoIsotopes(symbol.to_string()))?;

        Ok((
            most_common.mass_number(symbol)?,
            most_common.abundance_value(symbol)?,
        ))
    }

    /// Mass of the isotope whose mass number equals `isotope` rounded.
    /// Only isotopes with a non-zero abundance are considered.
    pub fn find_mass_of_isotope(
        &self,
        symbol: &str,
        isotope: f64,
    ) -> Result<Option<f64>, MassError> {
        let rounded = isotope.round();
        for iso in self.get_isotopes(symbol, true, true)? {
            if iso.mass_value(symbol)?.round() == rounded {
                return iso.mass_value(symbol).map(Some);
            }
        }
        Ok(None)
    }

    /// Isotopes to offer for selection: most abundant first, zero abundance
    /// removed, and the position of `current` among them.
    pub fn isotope_choices(
        &self,
        symbol: &str,
        current: Option<&str>,
    ) -> Result<IsotopeChoices, MassError> {
        let items = self
            .get_isotopes(symbol, true, true)?
            .into_iter()
            .map(|iso| -> Result<_, MassError> {
                let abundance = iso.abundance_value(symbol)?;
                Ok((iso.mass, abundance))
            })
            .collect::<Result<Vec<_>, MassError>>()?;

        let selected = current.and_then(|cur| items.iter().position(|(mass, _)| mass == cur));
        Ok(IsotopeChoices { items, selected })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HYDROGEN: &str = "1 1 1 H 1 99.9\n1 2 2 H 1 0.1\n";

    const SAMPLE: &str = "\
1 1 1 H 1 99.985
1 2 2 H 2 0.015
1 3 3 H 3 0

2 3 3 He 3 0.000137
2 4 4 He 4 99.999863
3 6 6 Li 6 7.5
3  7 7  Li 7 92.5
6 12 12 C 12 98.90
6 13 13 C 13 1.10
";

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    fn sample() -> IsotopeTable {
        IsotopeTable::from_reader(SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn loads_records_in_file_order() {
        let table = IsotopeTable::from_reader(HYDROGEN.as_bytes()).unwrap();
        assert_eq!(
            table.isotopes("H"),
            &[IsotopeRecord::new("1", "99.9"), IsotopeRecord::new("2", "0.1")]
        );
        assert_eq!(table.elements().collect::<Vec<_>>(), vec!["H"]);
        assert!(approx_eq(
            table.get_standard_isotope("H").unwrap(),
            1.001,
            1e-9
        ));
        assert_eq!(table.get_most_common_isotope("H").unwrap(), (1, 99.9));
    }

    #[test]
    fn blank_lines_and_repeated_spaces_are_ignored() {
        let table = sample();
        assert_eq!(table.elements().count(), 4);
        assert_eq!(table.isotope_count(), 9);
        assert_eq!(table.isotopes("Li")[1], IsotopeRecord::new("7", "92.5"));
    }

    #[test]
    fn short_row_is_malformed() {
        let err = IsotopeTable::from_reader("1 1 1 H 1 99.9\n1 2 2 H\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MassError::MalformedRow { line: 1, fields: 4 }));
    }

    #[test]
    fn malformed_row_reports_file_line() {
        let err = IsotopeTable::from_reader("1 1 1 H 1 99.9\n\n\n1 2 2 H\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, MassError::MalformedRow { line: 3, fields: 4 }));
        assert_eq!(
            err.to_string(),
            "isotope file line 3 has 4 fields, expected at least 6"
        );
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = IsotopeTable::from_path(&dir.path().join("masses.dat")).unwrap_err();
        assert!(matches!(err, MassError::Io { .. }));
    }

    #[test]
    fn loads_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let table = IsotopeTable::from_path(file.path()).unwrap();
        assert_eq!(table, sample());
    }

    #[test]
    fn standard_mass() {
        let table = sample();
        assert!(approx_eq(
            table.get_standard_isotope("Li").unwrap(),
            6.925,
            1e-9
        ));
        assert!(approx_eq(
            table.get_standard_isotope("C").unwrap(),
            12.011,
            1e-9
        ));
        assert_eq!(table.get_standard_isotope("foo").unwrap(), 0.0);
    }

    #[test]
    fn non_numeric_abundance_fails_at_query_time() {
        let table = IsotopeTable::from_reader("1 1 1 H 1 lots\n".as_bytes()).unwrap();
        let err = table.get_standard_isotope("H").unwrap_err();
        assert!(matches!(
            err,
            MassError::Conversion {
                field: "abundance",
                ..
            }
        ));
    }

    #[test]
    fn most_common_isotope() {
        let table = sample();
        assert_eq!(table.get_most_common_isotope("He").unwrap(), (4, 99.999863));
        assert_eq!(table.get_most_common_isotope("Li").unwrap(), (7, 92.5));
        assert!(matches!(
            table.get_most_common_isotope("foo"),
            Err(MassError::NoIsotopes(_))
        ));
    }

    #[test]
    fn most_common_compares_numerically() {
        // "9.5" > "10.5" as strings
        let table =
            IsotopeTable::from_reader("0 0 20 X 0 9.5\n0 0 21 X 0 10.5\n".as_bytes()).unwrap();
        assert_eq!(table.get_most_common_isotope("X").unwrap(), (21, 10.5));
    }

    #[test]
    fn most_common_tie_goes_to_first() {
        let table =
            IsotopeTable::from_reader("0 0 20 X 0 50\n0 0 21 X 0 50\n".as_bytes()).unwrap();
        assert_eq!(table.get_most_common_isotope("X").unwrap(), (20, 50.0));
    }

    #[test]
    fn get_isotopes_sorting_and_filtering() {
        let table = sample();
        let all = table.get_isotopes("H", false, false).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all, table.isotopes("H"));

        let likely = table.get_isotopes("H", false, true).unwrap();
        assert_eq!(likely.len(), 2);
        assert!(likely.iter().all(|iso| all.contains(iso)));

        let sorted = table.get_isotopes("Li", true, false).unwrap();
        assert_eq!(sorted[0].mass, "7");
        assert_eq!(sorted[1].mass, "6");

        assert!(table.get_isotopes("foo", true, true).unwrap().is_empty());
    }

    #[test]
    fn mass_of_isotope() {
        let table = sample();
        assert_eq!(table.find_mass_of_isotope("H", 1.0).unwrap(), Some(1.0));
        assert_eq!(table.find_mass_of_isotope("H", 1.8).unwrap(), Some(2.0));
        assert_eq!(table.find_mass_of_isotope("H", 3.0).unwrap(), None);
        assert_eq!(table.find_mass_of_isotope("foo", 42.0).unwrap(), None);
    }

    #[test]
    fn choices_skip_rare_and_mark_current() {
        let table = sample();
        let choices = table.isotope_choices("H", Some("2")).unwrap();
        assert_eq!(
            choices.items,
            vec![("1".to_string(), 99.985), ("2".to_string(), 0.015)]
        );
        assert_eq!(choices.selected, Some(1));

        let choices = table.isotope_choices("H", Some("3")).unwrap();
        assert_eq!(choices.selected, None);

        let choices = table.isotope_choices("foo", None).unwrap();
        assert!(choices.items.is_empty());
    }
}
