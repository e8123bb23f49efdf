//! Small general-purpose helpers.

use chrono::{DateTime, TimeZone};
use rand::seq::SliceRandom;
use rand::Rng;

use super::constants::{DATE_FORMAT, DEFAULT_LOCALE};

/// Format a date for display in `locale`.
///
/// `ja-JP` gives `2024/03/09`, `en-US` gives `3/9/2024`; any other locale
/// falls back to ISO `2024-03-09`.
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, locale: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let pattern = match locale {
        DEFAULT_LOCALE => DATE_FORMAT,
        "en-US" => "%-m/%-d/%Y",
        _ => "%Y-%m-%d",
    };
    date.format(pattern).to_string()
}

/// True when `s` parses as an absolute URL.
pub fn is_valid_url(s: &str) -> bool {
    url::Url::parse(s).is_ok()
}

/// Return a shuffled copy of `items`, leaving the input untouched.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn format_date_by_locale() {
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        assert_eq!(format_date(&date, "ja-JP"), "2024/03/09");
        assert_eq!(format_date(&date, "en-US"), "3/9/2024");
        assert_eq!(format_date(&date, "de-DE"), "2024-03-09");
    }

    #[test]
    fn url_validation() {
        assert!(is_valid_url("https://example.com/poker?room=abc"));
        assert!(is_valid_url("http://localhost:5173/"));
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn shuffle_keeps_elements_and_input() {
        let input = vec![1, 2, 3, 4, 5, 6, 7, 8];
        let mut rng = StdRng::seed_from_u64(7);
        let mut out = shuffle(&input, &mut rng);
        assert_eq!(input, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        out.sort();
        assert_eq!(out, input);
    }

    #[test]
    fn shuffle_of_empty_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(shuffle::<u8, _>(&[], &mut rng).is_empty());
    }
}
