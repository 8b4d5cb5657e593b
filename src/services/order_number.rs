use chrono::Utc;
use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

/// How many times an insert is attempted before giving up on a colliding
/// order number.
pub const MAX_GENERATION_ATTEMPTS: usize = 3;

/// Produces an order number of the form `ORD-YYYYMMDD-HHMMSSmmm-RRRRPPPP`:
/// UTC date, wall-clock time to the millisecond, four random digits, and four
/// digits sliced from a high-resolution clock reading.
///
/// Collision avoidance is best-effort; the caller retries the insert with a
/// fresh number when the unique constraint trips.
pub fn generate_order_number() -> String {
    let now = Utc::now();
    let random: u16 = rand::thread_rng().gen_range(0..10_000);
    let precision = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| (d.subsec_nanos() / 100) % 10_000)
        .unwrap_or(0);

    format!(
        "ORD-{}-{}-{:04}{:04}",
        now.format("%Y%m%d"),
        now.format("%H%M%S%3f"),
        random,
        precision
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use regex::Regex;
    use std::collections::HashSet;

    static SHAPE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^ORD-\d{8}-\d{9}-\d{8}$").unwrap());

    #[test]
    fn order_numbers_have_the_documented_shape() {
        let number = generate_order_number();
        assert!(
            SHAPE.is_match(&number),
            "unexpected order number shape: {}",
            number
        );
    }

    #[test]
    fn rapid_generation_yields_distinct_numbers() {
        let numbers: HashSet<String> = (0..200).map(|_| generate_order_number()).collect();
        // Even inside a single millisecond the random and high-resolution
        // suffixes keep collisions vanishingly unlikely.
        assert_eq!(numbers.len(), 200);
    }

    #[test]
    fn date_segment_matches_today() {
        let number = generate_order_number();
        let expected = Utc::now().format("%Y%m%d").to_string();
        assert_eq!(&number[4..12], expected.as_str());
    }
}
