//! Field rules shared by the form state holders.

use std::sync::LazyLock;

use regex::Regex;

/// Address pattern equivalent to the platform's standard email matcher.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"^[a-zA-Z0-9+._%\-]{1,256}@[a-zA-Z0-9][a-zA-Z0-9\-]{0,64}(\.[a-zA-Z0-9][a-zA-Z0-9\-]{0,25})+$",
  )
  .expect("email pattern compiles")
});

pub const PHONE_MIN_DIGITS: usize = 8;
pub const PHONE_MAX_DIGITS: usize = 15;
pub const PASSWORD_MIN_LEN: usize = 4;

/// Why a phone number was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneError {
  TooShort,
  TooLong,
}

pub fn is_not_blank(s: &str) -> bool { !s.trim().is_empty() }

pub fn is_valid_email(s: &str) -> bool { is_not_blank(s) && EMAIL.is_match(s.trim()) }

/// Whether `c` may be typed into a phone field.
pub fn is_phone_char(c: char) -> bool { c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')') }

/// Number of digits once formatting characters are stripped.
pub fn phone_digit_count(s: &str) -> usize { s.chars().filter(char::is_ascii_digit).count() }

/// A phone number must carry between 8 and 15 digits.
pub fn validate_phone(s: &str) -> Result<(), PhoneError> {
  match phone_digit_count(s) {
    n if n < PHONE_MIN_DIGITS => Err(PhoneError::TooShort),
    n if n > PHONE_MAX_DIGITS => Err(PhoneError::TooLong),
    _ => Ok(()),
  }
}

pub fn is_valid_password(s: &str) -> bool { s.chars().count() >= PASSWORD_MIN_LEN }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn email_pattern() {
    assert!(is_valid_email("juan.gonzalez@bomberos.cl"));
    assert!(is_valid_email("a+b@x.co"));
    assert!(!is_valid_email("juan.gonzalez"));
    assert!(!is_valid_email("@bomberos.cl"));
    assert!(!is_valid_email("juan@bomberos"));
    assert!(!is_valid_email(""));
  }

  #[test]
  fn phone_counts_digits_only() {
    assert_eq!(phone_digit_count("+56 9 1234 5678"), 11);
    assert_eq!(validate_phone("+56 9 1234 5678"), Ok(()));
    assert_eq!(validate_phone("(32) 123"), Err(PhoneError::TooShort));
    assert_eq!(validate_phone("1234567890123456"), Err(PhoneError::TooLong));
    assert_eq!(validate_phone("12345678"), Ok(()));
  }

  #[test]
  fn phone_input_filter() {
    let filtered: String = "+56 (9) abc-12".chars().filter(|c| is_phone_char(*c)).collect();
    assert_eq!(filtered, "+56 (9) -12");
  }

  #[test]
  fn password_length() {
    assert!(is_valid_password("1234"));
    assert!(!is_valid_password("123"));
  }
}
