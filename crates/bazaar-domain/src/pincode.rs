//! Indian postal (PIN) code validation.
//!
//! A PIN code is exactly six ASCII digits whose leading digits match one of
//! the regional prefixes below. The table is ordered and matching is
//! first-match, so overlapping prefixes resolve to the earlier region.

/// Regional prefixes, in lookup order.
const REGION_PREFIXES: &[(&str, &[&str])] = &[
    ("Delhi", &["11"]),
    ("Haryana", &["12", "13"]),
    ("Punjab", &["14", "15", "16"]),
    ("Himachal Pradesh", &["17"]),
    ("Jammu & Kashmir", &["18", "19"]),
    (
        "Uttar Pradesh",
        &["20", "21", "22", "23", "24", "25", "26", "27", "28"],
    ),
    ("Rajasthan", &["30", "31", "32", "33", "34"]),
    ("Gujarat", &["36", "37", "38", "39"]),
    ("Maharashtra", &["40", "41", "42", "43", "44"]),
    ("Madhya Pradesh", &["45", "46", "47", "48", "49"]),
    ("Andhra Pradesh", &["50", "51", "52", "53"]),
    ("Karnataka", &["56", "57", "58", "59"]),
    ("Tamil Nadu", &["60", "61", "62", "63", "64"]),
    ("Kerala", &["67", "68", "69"]),
    ("West Bengal", &["70", "71", "72", "73", "74"]),
    ("Odisha", &["75", "76", "77"]),
    ("Assam", &["78"]),
    ("North Eastern", &["79"]),
    ("Bihar", &["80", "81", "82", "83", "84", "85"]),
    ("Jharkhand", &["81", "82", "83"]),
    ("Chhattisgarh", &["49"]),
];

/// PIN code length in characters.
pub const PINCODE_LEN: usize = 6;

fn is_well_formed(code: &str) -> bool {
    code.len() == PINCODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
}

fn first_region(code: &str) -> Option<&'static str> {
    REGION_PREFIXES
        .iter()
        .find(|(_, prefixes)| prefixes.iter().any(|p| code.starts_with(p)))
        .map(|(region, _)| *region)
}

/// Whether `code` is a valid PIN code. Input is not trimmed or padded.
pub fn is_valid(code: &str) -> bool {
    region_for(code).is_some()
}

/// Region name for a valid PIN code, `None` for anything invalid.
pub fn region_for(code: &str) -> Option<&'static str> {
    if !is_well_formed(code) {
        return None;
    }
    first_region(code)
}
