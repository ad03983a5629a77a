//! Pluralization for log messages.

/// Format count with noun, handling pluralization
///
/// - `plural_count(0, "layer")` -> `"0 layers"`
/// - `plural_count(1, "layer")` -> `"1 layer"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "layer"), "0 layers");
        assert_eq!(plural_count(1, "layer"), "1 layer");
        assert_eq!(plural_count(12, "pixel"), "12 pixels");
    }
}
