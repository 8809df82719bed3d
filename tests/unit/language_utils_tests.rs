/*!
 * Tests for locale code utilities
 */

use yaltwai::language_utils::{describe_locale, get_language_name, validate_locale};

#[test]
fn test_validateLocale_withRegionalCodes_shouldSucceed() {
    assert!(validate_locale("en").is_ok());
    assert!(validate_locale("pt-BR").is_ok());
    assert!(validate_locale("zh_TW").is_ok());
    assert!(validate_locale("fra").is_ok());
}

#[test]
fn test_validateLocale_withInvalidCodes_shouldFail() {
    assert!(validate_locale("").is_err());
    assert!(validate_locale("xx").is_err());
    assert!(validate_locale("english").is_err());
}

#[test]
fn test_getLanguageName_shouldReturnEnglishName() {
    assert_eq!(get_language_name("de").unwrap(), "German");
    assert_eq!(get_language_name("es-MX").unwrap(), "Spanish");
    assert_eq!(get_language_name("fre").unwrap(), "French");
}

#[test]
fn test_describeLocale_shouldKeepOriginalCode() {
    assert_eq!(describe_locale("fr"), "French (fr)");
    assert_eq!(describe_locale(" ko "), "Korean (ko)");
}
