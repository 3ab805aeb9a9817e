//! Variant selection for playlist downloads.

use super::manifest::{AudioVariant, VideoVariant};

/// Picks one variant out of `variants`.
///
/// The first variant whose `attribute` equals `target` wins. Without an exact
/// match the variant with the largest attribute is used, the earliest one on ties.
/// Returns `None` for an empty list.
pub fn select<T>(variants: &[T], target: u32, attribute: impl Fn(&T) -> u32) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;

    for (index, variant) in variants.iter().enumerate() {
        let value = attribute(variant);
        if value == target {
            return Some(index);
        }
        match best {
            Some((_, max)) if value <= max => {}
            _ => best = Some((index, value)),
        }
    }

    best.map(|(index, _)| index)
}

pub fn select_video(variants: &[VideoVariant], width: u32) -> Option<usize> {
    select(variants, width, |v| v.width)
}

pub fn select_audio(variants: &[AudioVariant], sample_rate: u32) -> Option<usize> {
    select(variants, sample_rate, |a| a.sample_rate)
}
