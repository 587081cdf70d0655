pub mod campaigns;
pub mod decks;
pub mod owned;
pub mod packs;
pub mod session;

/// Collect the repeated `code` query parameters (`?code=a&code=b`), which
/// serde-based extraction flattens.
pub fn codes_from_query(query: Option<&str>) -> Vec<String> {
    query
        .unwrap_or("")
        .split('&')
        .filter_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            (k == "code" && !v.is_empty()).then(|| v.to_string())
        })
        .collect()
}
