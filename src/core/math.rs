// Math utilities and helper functions

/// Normalize a heading in degrees into [0, 360)
///
/// Works for any finite input, not just values one wrap away.
pub fn normalize_heading(heading: f64) -> f64 {
    let wrapped = heading.rem_euclid(360.0);
    // rem_euclid of a tiny negative can round up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
