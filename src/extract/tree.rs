//! Sibling-walk primitive used for section segmentation

use scraper::ElementRef;

/// Collects the element siblings following `start`, stopping before the
/// first one for which `is_boundary` holds
///
/// Text and comment nodes between siblings are skipped. The walk never
/// descends into children; a boundary nested inside a collected sibling does
/// not end the walk.
///
/// # Arguments
///
/// * `start` - The element whose following siblings are collected
/// * `is_boundary` - Predicate marking the first sibling not to collect
///
/// # Returns
///
/// The collected siblings in document order
pub fn collect_until<'a, F>(start: ElementRef<'a>, is_boundary: F) -> Vec<ElementRef<'a>>
where
    F: Fn(&ElementRef<'a>) -> bool,
{
    start
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .take_while(|sibling| !is_boundary(sibling))
        .collect()
}

/// Returns the element's text pieces trimmed, with empty pieces dropped,
/// joined by `separator`
pub fn joined_text(element: &ElementRef<'_>, separator: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}
