//! Price normalization and the effective-price precedence rule.

/// Parses a locale-formatted price cell into a number.
///
/// Whitespace anywhere in the cell is removed (including non-breaking
/// spaces used as thousands separators) and a decimal comma becomes a
/// period. Empty cells and anything that still fails to parse yield `None`;
/// this never errors.
#[must_use]
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Chooses the effective price of a row.
///
/// A positive promotional price wins; otherwise a positive regular price;
/// otherwise there is no effective price. A missing promo column and a
/// blank or zero promo cell are treated the same way.
#[must_use]
pub fn select_price(regular: Option<f64>, promo: Option<f64>) -> Option<f64> {
    promo
        .filter(|p| *p > 0.0)
        .or_else(|| regular.filter(|r| *r > 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_price_comma_decimal() {
        assert_eq!(parse_price("1,29"), Some(1.29));
    }

    #[test]
    fn parse_price_period_decimal() {
        assert_eq!(parse_price("1.29"), Some(1.29));
    }

    #[test]
    fn parse_price_strips_whitespace_everywhere() {
        assert_eq!(parse_price("  1 299,50 "), Some(1299.5));
        assert_eq!(parse_price("2,\u{a0}49"), Some(2.49));
    }

    #[test]
    fn parse_price_comma_and_period_forms_agree() {
        let pairs = [
            (" 0,99", "0.99"),
            ("12,5 ", "12.5"),
            ("1 000,00", "1000.00"),
            ("\t3,10\n", "3.10"),
            ("7", "7"),
        ];
        for (comma, period) in pairs {
            assert_eq!(parse_price(comma), parse_price(period), "{comma:?} vs {period:?}");
            assert!(parse_price(comma).is_some());
        }
    }

    #[test]
    fn parse_price_empty_and_blank_are_absent() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("   "), None);
    }

    #[test]
    fn parse_price_garbage_is_absent() {
        assert_eq!(parse_price("n/a"), None);
        assert_eq!(parse_price("1,2,3"), None);
        assert_eq!(parse_price("€1,29"), None);
    }

    #[test]
    fn parse_price_rejects_non_finite() {
        assert_eq!(parse_price("inf"), None);
        assert_eq!(parse_price("NaN"), None);
    }

    #[test]
    fn select_price_exhaustive_grid() {
        // {absent, <= 0, > 0} for each input.
        let values = [None, Some(0.0), Some(-1.0), Some(2.49)];
        for regular in values {
            for promo in values {
                let expected = match (promo, regular) {
                    (Some(p), _) if p > 0.0 => Some(p),
                    (_, Some(r)) if r > 0.0 => Some(r),
                    _ => None,
                };
                assert_eq!(
                    select_price(regular, promo),
                    expected,
                    "regular={regular:?} promo={promo:?}"
                );
            }
        }
    }

    #[test]
    fn select_price_promo_wins_even_when_higher() {
        assert_eq!(select_price(Some(1.0), Some(1.5)), Some(1.5));
    }

    #[test]
    fn select_price_zero_promo_falls_back_to_regular() {
        assert_eq!(select_price(Some(1.39), Some(0.0)), Some(1.39));
        assert_eq!(select_price(Some(1.39), None), Some(1.39));
    }

    #[test]
    fn select_price_nothing_positive_is_absent() {
        assert_eq!(select_price(Some(0.0), Some(0.0)), None);
        assert_eq!(select_price(None, None), None);
    }
}
