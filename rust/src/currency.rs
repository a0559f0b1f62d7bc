//! Currency amounts in Dominican-Spanish notation (`4,623.00`).

/// Number of fraction digits rendered by [`currency`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FractionDigits {
    #[default]
    Zero,
    One,
    Two,
}

impl FractionDigits {
    pub fn count(self) -> usize {
        match self {
            Self::Zero => 0,
            Self::One => 1,
            Self::Two => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::One => "1",
            Self::Two => "2",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "0" => Some(Self::Zero),
            "1" => Some(Self::One),
            "2" => Some(Self::Two),
            _ => None,
        }
    }
}

const GROUP_SEPARATOR: char = ',';
const DECIMAL_SEPARATOR: char = '.';

fn group_thousands(int_part: &str) -> String {
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(c);
    }
    out
}

/// Round the decimal digits `int_part.frac_part` to `n` fraction digits,
/// halves away from zero. Returns the rounded digits with the fraction
/// digits last.
fn round_digits(int_part: &str, frac_part: &str, n: usize) -> String {
    let mut units: Vec<u8> = int_part.bytes().collect();
    units.extend(frac_part.bytes().take(n));
    units.resize(int_part.len() + n, b'0');

    if frac_part.as_bytes().get(n).is_some_and(|&d| d >= b'5') {
        let mut carry = true;
        for d in units.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            units.insert(0, b'1');
        }
    }

    units.into_iter().map(char::from).collect()
}

/// Format `amount` with thousands grouping and exactly `digits` fraction
/// digits. Rounding works on the shortest decimal form of `amount`, so
/// `1.005` rounds to `1.01`. Halves round away from zero.
pub fn currency(amount: f64, digits: FractionDigits) -> String {
    if amount.is_nan() {
        return "NaN".to_string();
    }
    if amount.is_infinite() {
        return if amount < 0.0 { "-∞" } else { "∞" }.to_string();
    }

    let n = digits.count();
    // `Display` for f64 prints the shortest round-tripping decimal, never in
    // exponent form.
    let decimal = amount.abs().to_string();
    let (int_part, frac_part) = decimal.split_once('.').unwrap_or((decimal.as_str(), ""));
    let units = round_digits(int_part, frac_part, n);

    let (int_part, frac_part) = units.split_at(units.len() - n);
    let mut out = String::new();
    if amount < 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if n > 0 {
        out.push(DECIMAL_SEPARATOR);
        out.push_str(frac_part);
    }
    out
}

/// [`currency`] with no fraction digits.
pub fn cash(amount: f64) -> String {
    currency(amount, FractionDigits::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cash_fraction_digits() {
        assert_eq!(currency(4623.0, FractionDigits::Two), "4,623.00");
        assert_eq!(currency(4623.0, FractionDigits::One), "4,623.0");
        assert_eq!(currency(4623.0, FractionDigits::Zero), "4,623");
        assert_eq!(cash(4623.0), "4,623");
    }

    #[test]
    fn test_grouping() {
        assert_eq!(cash(0.0), "0");
        assert_eq!(cash(999.0), "999");
        assert_eq!(cash(1000.0), "1,000");
        assert_eq!(cash(123456.0), "123,456");
        assert_eq!(cash(1234567.0), "1,234,567");
        assert_eq!(
            currency(1234567.891, FractionDigits::Two),
            "1,234,567.89"
        );
    }

    #[test]
    fn test_rounding() {
        assert_eq!(cash(2.5), "3");
        assert_eq!(cash(999.5), "1,000");
        assert_eq!(currency(0.25, FractionDigits::One), "0.3");
        assert_eq!(currency(0.05, FractionDigits::Two), "0.05");
        assert_eq!(currency(0.004, FractionDigits::Two), "0.00");
    }

    #[test]
    fn test_rounding_follows_decimal_form() {
        // 1.005 and 2.675 sit just below the half in binary.
        assert_eq!(currency(1.005, FractionDigits::Two), "1.01");
        assert_eq!(currency(2.675, FractionDigits::Two), "2.68");
        assert_eq!(currency(1.45, FractionDigits::One), "1.5");
        assert_eq!(currency(1.44, FractionDigits::One), "1.4");
        assert_eq!(currency(-1.005, FractionDigits::Two), "-1.01");
        assert_eq!(currency(9999.995, FractionDigits::Two), "10,000.00");
        assert_eq!(currency(0.5, FractionDigits::Zero), "1");
        assert_eq!(currency(7.0, FractionDigits::Two), "7.00");
    }

    #[test]
    fn test_negative_and_non_finite() {
        assert_eq!(currency(-4623.5, FractionDigits::One), "-4,623.5");
        assert_eq!(cash(-1000.0), "-1,000");
        assert_eq!(cash(f64::NAN), "NaN");
        assert_eq!(cash(f64::INFINITY), "∞");
        assert_eq!(cash(f64::NEG_INFINITY), "-∞");
    }

    #[test]
    fn test_fraction_digits_parse() {
        assert_eq!(FractionDigits::parse("0"), Some(FractionDigits::Zero));
        assert_eq!(FractionDigits::parse("2"), Some(FractionDigits::Two));
        assert_eq!(FractionDigits::parse("3"), None);
        assert_eq!(FractionDigits::Two.as_str(), "2");
        assert_eq!(FractionDigits::default().count(), 0);
    }
}
