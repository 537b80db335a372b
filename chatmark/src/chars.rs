//! Character classes shared by the extractors, by Unicode general category.
//!
//! `char::is_alphabetic` and `char::is_numeric` are wider than these: they
//! also accept letter-like numbers (`Ⅻ`), other numbers (`½`, `²`) and
//! combining marks.

use unicode_general_category::{get_general_category, GeneralCategory};

/// Any letter category (Lu, Ll, Lt, Lm, Lo)
pub fn is_letter(ch: char) -> bool {
    matches!(
        get_general_category(ch),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

/// Decimal digits (Nd) in any script
pub fn is_digit(ch: char) -> bool {
    matches!(get_general_category(ch), GeneralCategory::DecimalNumber)
}
