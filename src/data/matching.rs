use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Something that can be named either fully (`"12C"`) or by its element
/// symbol alone (`"C"`).
pub trait Identified {
    fn canonical_form(&self) -> String;
    fn symbol(&self) -> &str;
}

impl<T: Identified + ?Sized> Identified for &T {
    fn canonical_form(&self) -> String {
        (**self).canonical_form()
    }

    fn symbol(&self) -> &str {
        (**self).symbol()
    }
}

/// A key → value mapping that can be searched by [`find_match_in_tables`].
pub trait SearchTable<Q: ?Sized, V> {
    fn find(&self, key: &Q) -> Option<&V>;
}

impl<K, V, Q> SearchTable<Q, V> for HashMap<K, V>
where
    K: Borrow<Q> + Hash + Eq,
    Q: Hash + Eq + ?Sized,
{
    fn find(&self, key: &Q) -> Option<&V> {
        self.get(key)
    }
}

impl<K, V, Q> SearchTable<Q, V> for BTreeMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: Ord + ?Sized,
{
    fn find(&self, key: &Q) -> Option<&V> {
        self.get(key)
    }
}

// ---------------------------------------------------------------------------
// Lookup primitive
// ---------------------------------------------------------------------------

/// Return the value bound to `value` in the first table that contains it.
///
/// Tables are searched in order and the search stops at the first hit, so
/// later tables never override earlier ones.
pub fn find_match_in_tables<'t, Q, V>(
    value: &Q,
    tables: &[&'t dyn SearchTable<Q, V>],
) -> Option<&'t V>
where
    Q: ?Sized,
{
    tables.iter().find_map(|table| table.find(value))
}

// ---------------------------------------------------------------------------
// Strings → elements
// ---------------------------------------------------------------------------

/// Lazily match each string to an element.
///
/// A string first matches an element whose canonical form equals it; when
/// `match_by_symbol` is set and there is no such element, a bare symbol
/// matches an element with that symbol. If several elements share a key,
/// the last one given wins.
pub fn match_strs_to_elements<I, S, J, E>(
    strs: I,
    elements: J,
    match_by_symbol: bool,
) -> StrMatches<I::IntoIter, E>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    J: IntoIterator<Item = E>,
    E: Identified + Clone,
{
    let mut full = HashMap::new();
    let mut symbols = match_by_symbol.then(HashMap::new);
    for elem in elements {
        if let Some(symbols) = symbols.as_mut() {
            symbols.insert(elem.symbol().to_string(), elem.clone());
        }
        full.insert(elem.canonical_form(), elem);
    }

    StrMatches {
        strs: strs.into_iter(),
        full,
        symbols,
    }
}

/// Iterator returned by [`match_strs_to_elements`].
#[derive(Debug)]
pub struct StrMatches<I, E> {
    strs: I,
    full: HashMap<String, E>,
    symbols: Option<HashMap<String, E>>,
}

impl<I, S, E> Iterator for StrMatches<I, E>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
    E: Clone,
{
    type Item = (S, Option<E>);

    fn next(&mut self) -> Option<Self::Item> {
        let s = self.strs.next()?;
        let full: &dyn SearchTable<str, E> = &self.full;
        let found = match &self.symbols {
            Some(symbols) => {
                let symbols: &dyn SearchTable<str, E> = symbols;
                find_match_in_tables(s.as_ref(), &[full, symbols])
            }
            None => find_match_in_tables(s.as_ref(), &[full]),
        };
        let found = found.cloned();
        Some((s, found))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.strs.size_hint()
    }
}

// ---------------------------------------------------------------------------
// Elements → strings
// ---------------------------------------------------------------------------

/// Lazily match each element to one of `strs`: its canonical form first,
/// then (if `match_by_symbol`) its bare symbol.
pub fn match_elements_to_strs<I, E, J, S>(
    elements: I,
    strs: J,
    match_by_symbol: bool,
) -> ElementMatches<I::IntoIter, S>
where
    I: IntoIterator<Item = E>,
    E: Identified,
    J: IntoIterator<Item = S>,
    S: AsRef<str> + Clone,
{
    let strs = strs
        .into_iter()
        .map(|s| (s.as_ref().to_string(), s))
        .collect();

    ElementMatches {
        elements: elements.into_iter(),
        strs,
        match_by_symbol,
    }
}

/// Iterator returned by [`match_elements_to_strs`].
#[derive(Debug)]
pub struct ElementMatches<I, S> {
    elements: I,
    strs: HashMap<String, S>,
    match_by_symbol: bool,
}

impl<I, E, S> Iterator for ElementMatches<I, S>
where
    I: Iterator<Item = E>,
    E: Identified,
    S: Clone,
{
    type Item = (E, Option<S>);

    fn next(&mut self) -> Option<Self::Item> {
        let elem = self.elements.next()?;
        let tables: [&dyn SearchTable<str, S>; 1] = [&self.strs];

        let mut found = find_match_in_tables(elem.canonical_form().as_str(), &tables);
        if found.is_none() && self.match_by_symbol {
            found = find_match_in_tables(elem.symbol(), &tables);
        }
        let found = found.cloned();
        Some((elem, found))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.elements.size_hint()
    }
}
