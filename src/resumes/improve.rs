/// Marker that tells an improved description apart.
pub const IMPROVED_MARKER: &str = "[Improved]";

pub const IMPROVEMENT: &str = "Ability to multitask and strong analytical skills let me work \
effectively with large volumes of information and quickly find sound solutions to complex \
problems. [Improved]";

/// Description after improvement, or `None` when it already carries the marker.
pub fn improved_description(current: Option<&str>) -> Option<String> {
    match current {
        Some(text) if text.contains(IMPROVED_MARKER) => None,
        Some(text) if !text.trim().is_empty() => Some(format!("{text} {IMPROVEMENT}")),
        _ => Some(IMPROVEMENT.to_string()),
    }
}
