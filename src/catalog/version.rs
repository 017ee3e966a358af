use std::cmp::Ordering;

/// Parse the numeric segments of a dotted version string.
///
/// Each segment is returned as its digits without leading zeros, so zero is
/// the empty string. Non-numeric segments are treated as 0 so that the
/// comparator stays total.
///
/// Examples:
/// - "1.2.3" -> ["1", "2", "3"]
/// - "1.010" -> ["1", "10"]
/// - "1.x.0" -> ["1", "", ""]
pub fn parse_segments(version: &str) -> Vec<&str> {
    version.split('.').map(numeric_segment).collect()
}

fn numeric_segment(segment: &str) -> &str {
    let segment = segment.trim();
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return "";
    }
    segment.trim_start_matches('0')
}

/// Compare two normalized segments as integers of any size
fn compare_segments(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Compare two dotted version strings segment by segment.
///
/// Segments are compared as integers from left to right. A missing segment on
/// either side counts as 0, so "1.2" and "1.2.0" are equal.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let a = parse_segments(a);
    let b = parse_segments(b);
    let len = a.len().max(b.len());

    (0..len)
        .map(|i| {
            let left = a.get(i).copied().unwrap_or("");
            let right = b.get(i).copied().unwrap_or("");
            compare_segments(left, right)
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Returns true if `candidate` is strictly newer than `current`.
pub fn is_newer(candidate: &str, current: &str) -> bool {
    compare_versions(candidate, current) == Ordering::Greater
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.10.0", "1.9.0", Ordering::Greater)]
    #[case("1.9.0", "1.10.0", Ordering::Less)]
    #[case("1.2.3", "1.2.3", Ordering::Equal)]
    #[case("1.2", "1.2.0", Ordering::Equal)] // missing segment is 0
    #[case("1.2.0.1", "1.2", Ordering::Greater)]
    #[case("2", "1.99.99", Ordering::Greater)]
    #[case("0.0.1", "0.0.0", Ordering::Greater)]
    #[case("1.x.0", "1.0.0", Ordering::Equal)] // non-numeric fails closed to 0
    #[case("", "0.0.0", Ordering::Equal)]
    #[case("1.20000000000000000000", "1.1", Ordering::Greater)] // beyond u64
    #[case("1.99999999999999999999", "1.100000000000000000000", Ordering::Less)]
    #[case("1.007", "1.7", Ordering::Equal)] // leading zeros
    #[case("1.-1", "1.0", Ordering::Equal)]
    fn compare_versions_returns_expected(
        #[case] a: &str,
        #[case] b: &str,
        #[case] expected: Ordering,
    ) {
        assert_eq!(compare_versions(a, b), expected);
    }

    #[test]
    fn compare_versions_is_antisymmetric() {
        let versions = ["1.0.0", "1.0", "1.9.0", "1.10.0", "2", "0.5.7", "bogus"];

        for a in versions {
            for b in versions {
                assert_eq!(compare_versions(a, b), compare_versions(b, a).reverse());
            }
        }
    }

    #[rstest]
    #[case("1.3.0", "1.2.0", true)]
    #[case("1.2.0", "1.2.0", false)]
    #[case("1.2.0", "1.3.0", false)]
    fn is_newer_returns_expected(
        #[case] candidate: &str,
        #[case] current: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(is_newer(candidate, current), expected);
    }

    #[rstest]
    #[case("1.2.3", vec!["1", "2", "3"])]
    #[case("1.010", vec!["1", "10"])]
    #[case("1.x.0", vec!["1", "", ""])]
    fn parse_segments_normalizes_digits(#[case] version: &str, #[case] expected: Vec<&str>) {
        assert_eq!(parse_segments(version), expected);
    }
}
