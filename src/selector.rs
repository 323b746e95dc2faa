//! Random page and photo selection.
//!
//! A search first picks a random result page, then a random photo on it,
//! so repeated searches do not keep showing the top hit.

use rand::seq::SliceRandom;
use rand::Rng;

/// Picks a page in `[0, min(total_pages, cap))`.
///
/// Returns `None` when that range is empty.
pub fn select_page(total_pages: u64, cap: u32) -> Option<u32> {
    select_page_with(&mut rand::thread_rng(), total_pages, cap)
}

/// [`select_page`] with a caller-supplied random source.
pub fn select_page_with<R: Rng + ?Sized>(rng: &mut R, total_pages: u64, cap: u32) -> Option<u32> {
    let effective = total_pages.min(u64::from(cap)) as u32;
    if effective == 0 {
        return None;
    }
    Some(rng.gen_range(0..effective))
}

/// Picks one item uniformly, or `None` for an empty slice.
pub fn select_photo<T>(records: &[T]) -> Option<&T> {
    select_photo_with(&mut rand::thread_rng(), records)
}

/// [`select_photo`] with a caller-supplied random source.
pub fn select_photo_with<'a, R: Rng + ?Sized, T>(rng: &mut R, records: &'a [T]) -> Option<&'a T> {
    records.choose(rng)
}
