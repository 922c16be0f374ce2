//! Case-insensitive substring search over listed entities.

/// An entity exposing the text fields a search term is matched against.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

/// Normalize a raw search term; blank terms mean "no filter".
pub fn normalize_term(term: Option<&str>) -> Option<String> {
    term.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

/// True when any searchable field contains the term.
pub fn matches<T: Searchable + ?Sized>(item: &T, term: Option<&str>) -> bool {
    match normalize_term(term) {
        None => true,
        Some(needle) => item
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle)),
    }
}

/// Keep only the items matching the term.
pub fn filter<T: Searchable>(items: Vec<T>, term: Option<&str>) -> Vec<T> {
    items.into_iter().filter(|item| matches(item, term)).collect()
}
