//! Page-number window for pagination controls.

/// Default number of page buttons shown at once
pub const DEFAULT_WINDOW: usize = 5;

/// Page numbers to display for `current_page` out of `total_pages`.
///
/// The window holds at most `window` consecutive pages and keeps the
/// current page centered when possible. Near either end it is clamped so it
/// never runs past page 1 or `total_pages`. An even window puts the extra
/// page after the current one. `current_page` is clamped into range first.
///
/// # Examples
/// ```
/// use cinebot_core::pagination::page_window;
///
/// assert_eq!(page_window(1, 1, 5), vec![1]);
/// assert_eq!(page_window(3, 10, 5), vec![1, 2, 3, 4, 5]);
/// assert_eq!(page_window(6, 10, 5), vec![4, 5, 6, 7, 8]);
/// assert_eq!(page_window(10, 10, 5), vec![6, 7, 8, 9, 10]);
/// ```
pub fn page_window(current_page: u32, total_pages: u32, window: usize) -> Vec<u32> {
    if total_pages == 0 || window == 0 {
        return Vec::new();
    }

    let width = u32::try_from(window).unwrap_or(u32::MAX).min(total_pages);
    let current = current_page.clamp(1, total_pages);

    let before = (width - 1) / 2;
    let last_start = total_pages - width + 1;
    let start = current.saturating_sub(before).clamp(1, last_start);

    (start..start + width).collect()
}
