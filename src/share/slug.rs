use crate::reel::Track;

/// URL-safe form of a track name: lower-cased, whitespace runs become `-`.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Reverse of `slugify` as far as it goes: hyphens back to spaces.
pub fn deslugify(slug: &str) -> String {
    slug.replace('-', " ")
}

/// Find the track a `track` parameter refers to, ignoring case.
///
/// Both sides are compared in slug space, so a name that itself contains
/// hyphens ("Hip-Hop Promo") still matches its own slug. Names that share a
/// slug ("Hip Hop Promo" and "Hip-Hop Promo") are ambiguous; the first one in
/// reel order wins.
pub fn find_track(tracks: &[Track], param: &str) -> Option<usize> {
    let wanted = slugify(&deslugify(param.trim()));
    if wanted.is_empty() {
        return None;
    }
    tracks
        .iter()
        .position(|t| slugify(&deslugify(&t.name)) == wanted)
}
