//! UK postcode normalisation and outward code parsing
//!
//! A full postcode is `<outward> <inward>` where the inward code is always
//! three characters (digit + two letters). Only the outward code matters for
//! region checks: 1-2 area letters followed by a 1-2 digit district.

use serde::Serialize;

/// Length of the inward code ("1RH" in "PH22 1RH")
const INWARD_CODE_LEN: usize = 3;

/// Longest string still treated as outward-only when written without a space
const MAX_OUTWARD_ONLY_LEN: usize = 4;

/// Area letters and district number of a postcode, e.g. `PH` + `22`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ParsedOutwardCode {
    pub area_prefix: String,
    pub district: u8,
}

impl ParsedOutwardCode {
    /// Parse a postcode in any casing/spacing. Returns None if no
    /// `^[A-Z]{1,2}\d{1,2}` outward code can be found.
    pub fn parse(postcode: &str) -> Option<Self> {
        parse_outward(&outward_code(postcode))
    }
}

impl std::fmt::Display for ParsedOutwardCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.area_prefix, self.district)
    }
}

/// Extract the uppercased outward code from a raw postcode string
///
/// - "PH22 1RH" -> "PH22" (text before the first space)
/// - "PH221RH"  -> "PH22" (trailing inward code dropped)
/// - "PH22"     -> "PH22" (short input taken whole)
pub fn outward_code(postcode: &str) -> String {
    let upper = postcode.trim().to_uppercase();

    if let Some((outward, _)) = upper.split_once(char::is_whitespace) {
        return outward.to_string();
    }

    let stripped: Vec<char> = upper.chars().filter(|c| !c.is_whitespace()).collect();
    if stripped.len() > MAX_OUTWARD_ONLY_LEN {
        stripped[..stripped.len() - INWARD_CODE_LEN].iter().collect()
    } else {
        stripped.into_iter().collect()
    }
}

/// Match `^([A-Z]{1,2})(\d{1,2})` at the start of an outward code
fn parse_outward(outward: &str) -> Option<ParsedOutwardCode> {
    let bytes = outward.as_bytes();

    let letters = bytes.iter().take_while(|b| b.is_ascii_uppercase()).count();
    if !(1..=2).contains(&letters) {
        return None;
    }

    let digits = bytes[letters..].iter().take(2).take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }

    let district = outward[letters..letters + digits].parse::<u8>().ok()?;

    Some(ParsedOutwardCode { area_prefix: outward[..letters].to_string(), district })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outward_code_with_space() {
        assert_eq!(outward_code("PH22 1RH"), "PH22");
        assert_eq!(outward_code("  iv2 3ab "), "IV2");
        assert_eq!(outward_code("ZE1\t0AA"), "ZE1");
    }

    #[test]
    fn test_outward_code_without_space() {
        assert_eq!(outward_code("PH221RH"), "PH22");
        assert_eq!(outward_code("iv23ab"), "IV2");
        assert_eq!(outward_code("KW1"), "KW1");
        assert_eq!(outward_code("PA20"), "PA20");
    }

    #[test]
    fn test_outward_code_empty() {
        assert_eq!(outward_code(""), "");
        assert_eq!(outward_code("   "), "");
    }

    #[test]
    fn test_parse_full_postcode() {
        let parsed = ParsedOutwardCode::parse("PH22 1RH").unwrap();
        assert_eq!(parsed.area_prefix, "PH");
        assert_eq!(parsed.district, 22);
        assert_eq!(parsed.to_string(), "PH22");
    }

    #[test]
    fn test_parse_single_letter_area() {
        let parsed = ParsedOutwardCode::parse("G1 1AA").unwrap();
        assert_eq!(parsed.area_prefix, "G");
        assert_eq!(parsed.district, 1);
    }

    #[test]
    fn test_parse_london_style_district_suffix() {
        // District letter after the digits is ignored, as in "EC1A"
        let parsed = ParsedOutwardCode::parse("EC1A 1BB").unwrap();
        assert_eq!(parsed.area_prefix, "EC");
        assert_eq!(parsed.district, 1);
    }

    #[test]
    fn test_parse_takes_at_most_two_digits() {
        let parsed = parse_outward("PH123").unwrap();
        assert_eq!(parsed.district, 12);

        // Written without a space, five characters lose the inward part first
        assert!(ParsedOutwardCode::parse("PH123").is_none());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(ParsedOutwardCode::parse("").is_none());
        assert!(ParsedOutwardCode::parse("not a postcode").is_none());
        assert!(ParsedOutwardCode::parse("ABC1 2DE").is_none());
        assert!(ParsedOutwardCode::parse("12 3AB").is_none());
        assert!(ParsedOutwardCode::parse("PH 1RH").is_none());
    }

    #[test]
    fn test_parse_non_ascii_does_not_panic() {
        assert!(ParsedOutwardCode::parse("ÉÉÉÉÉÉ").is_none());
        assert!(ParsedOutwardCode::parse("P\u{0130}22 1RH").is_none());
    }
}
