//! English display names for language and region codes.
//!
//! Maps ISO 639-1/639-2 language codes (e.g., "pt", "yue") and ISO 3166-1
//! alpha-2 or UN M.49 region codes (e.g., "BR", "419") to names suitable
//! for a voice picker.

/// Display name for a lower-case language code.
///
/// Returns `None` for codes not in the table; callers fall back to the
/// raw code.
pub fn language_name(code: &str) -> Option<&'static str> {
    let name = match code {
        // Western European
        "en" => "English",
        "fr" => "French",
        "de" => "German",
        "nl" => "Dutch",
        "it" => "Italian",
        "es" => "Spanish",
        "pt" => "Portuguese",
        "ca" => "Catalan",
        "eu" => "Basque",
        "gl" => "Galician",
        "ga" => "Irish",
        "cy" => "Welsh",
        "lb" => "Luxembourgish",
        "mt" => "Maltese",

        // Nordic
        "da" => "Danish",
        "fi" => "Finnish",
        "is" => "Icelandic",
        "nb" => "Norwegian Bokmål",
        "nn" => "Norwegian Nynorsk",
        "no" => "Norwegian",
        "sv" => "Swedish",

        // Central / Eastern European
        "pl" => "Polish",
        "cs" => "Czech",
        "sk" => "Slovak",
        "hu" => "Hungarian",
        "ro" => "Romanian",
        "bg" => "Bulgarian",
        "hr" => "Croatian",
        "sr" => "Serbian",
        "bs" => "Bosnian",
        "sl" => "Slovenian",
        "mk" => "Macedonian",
        "sq" => "Albanian",
        "el" => "Greek",
        "ru" => "Russian",
        "uk" => "Ukrainian",
        "be" => "Belarusian",

        // Baltic
        "et" => "Estonian",
        "lv" => "Latvian",
        "lt" => "Lithuanian",

        // Middle Eastern
        "ar" => "Arabic",
        "he" => "Hebrew",
        "fa" => "Persian",
        "tr" => "Turkish",
        "ku" => "Kurdish",
        "ckb" => "Central Kurdish",
        "ps" => "Pashto",
        "yi" => "Yiddish",

        // South Asian
        "hi" => "Hindi",
        "ur" => "Urdu",
        "bn" => "Bangla",
        "ta" => "Tamil",
        "te" => "Telugu",
        "ml" => "Malayalam",
        "kn" => "Kannada",
        "gu" => "Gujarati",
        "pa" => "Punjabi",
        "mr" => "Marathi",
        "ne" => "Nepali",
        "si" => "Sinhala",
        "sd" => "Sindhi",
        "dv" => "Divehi",
        "or" => "Odia",
        "as" => "Assamese",

        // East / Southeast Asian
        "zh" => "Chinese",
        "yue" => "Cantonese",
        "wuu" => "Wu Chinese",
        "ja" => "Japanese",
        "ko" => "Korean",
        "vi" => "Vietnamese",
        "th" => "Thai",
        "id" => "Indonesian",
        "ms" => "Malay",
        "fil" => "Filipino",
        "km" => "Khmer",
        "lo" => "Lao",
        "my" => "Burmese",
        "mn" => "Mongolian",
        "ug" => "Uyghur",
        "kk" => "Kazakh",
        "uz" => "Uzbek",
        "ka" => "Georgian",
        "hy" => "Armenian",
        "az" => "Azerbaijani",

        // African
        "af" => "Afrikaans",
        "sw" => "Swahili",
        "zu" => "Zulu",
        "xh" => "Xhosa",
        "am" => "Amharic",
        "yo" => "Yoruba",
        "ha" => "Hausa",
        "so" => "Somali",

        _ => return None,
    };
    Some(name)
}

/// Display name for an upper-case region code.
///
/// Returns `None` for codes not in the table; callers fall back to the
/// raw code.
pub fn region_name(code: &str) -> Option<&'static str> {
    let name = match code {
        // Americas
        "US" => "United States",
        "CA" => "Canada",
        "MX" => "Mexico",
        "BR" => "Brazil",
        "AR" => "Argentina",
        "CO" => "Colombia",
        "CL" => "Chile",
        "PE" => "Peru",
        "VE" => "Venezuela",
        "EC" => "Ecuador",
        "BO" => "Bolivia",
        "PY" => "Paraguay",
        "UY" => "Uruguay",
        "CR" => "Costa Rica",
        "PA" => "Panama",
        "DO" => "Dominican Republic",
        "CU" => "Cuba",
        "PR" => "Puerto Rico",
        "419" => "Latin America",

        // Europe
        "GB" => "United Kingdom",
        "IE" => "Ireland",
        "FR" => "France",
        "BE" => "Belgium",
        "DE" => "Germany",
        "AT" => "Austria",
        "CH" => "Switzerland",
        "NL" => "Netherlands",
        "LU" => "Luxembourg",
        "ES" => "Spain",
        "PT" => "Portugal",
        "IT" => "Italy",
        "PL" => "Poland",
        "CZ" => "Czechia",
        "SK" => "Slovakia",
        "HU" => "Hungary",
        "RO" => "Romania",
        "BG" => "Bulgaria",
        "HR" => "Croatia",
        "RS" => "Serbia",
        "SI" => "Slovenia",
        "GR" => "Greece",
        "RU" => "Russia",
        "UA" => "Ukraine",
        "FI" => "Finland",
        "SE" => "Sweden",
        "NO" => "Norway",
        "DK" => "Denmark",
        "IS" => "Iceland",
        "EE" => "Estonia",
        "LV" => "Latvia",
        "LT" => "Lithuania",
        "TR" => "Türkiye",

        // Asia / Pacific
        "CN" => "China mainland",
        "TW" => "Taiwan",
        "HK" => "Hong Kong",
        "MO" => "Macao",
        "JP" => "Japan",
        "KR" => "South Korea",
        "VN" => "Vietnam",
        "TH" => "Thailand",
        "ID" => "Indonesia",
        "MY" => "Malaysia",
        "SG" => "Singapore",
        "PH" => "Philippines",
        "IN" => "India",
        "PK" => "Pakistan",
        "BD" => "Bangladesh",
        "LK" => "Sri Lanka",
        "NP" => "Nepal",
        "AU" => "Australia",
        "NZ" => "New Zealand",

        // Middle East
        "SA" => "Saudi Arabia",
        "AE" => "United Arab Emirates",
        "IL" => "Israel",
        "IR" => "Iran",
        "IQ" => "Iraq",
        "JO" => "Jordan",
        "EG" => "Egypt",
        "001" => "World",

        // Africa
        "ZA" => "South Africa",
        "KE" => "Kenya",
        "NG" => "Nigeria",
        "TZ" => "Tanzania",
        "ET" => "Ethiopia",

        _ => return None,
    };
    Some(name)
}

/// Whether a language is written right-to-left.
pub fn is_rtl_language(code: &str) -> bool {
    matches!(
        code,
        "ar" | "he" | "fa" | "ur" | "yi" | "ps" | "sd" | "dv" | "ckb" | "ug"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve() {
        assert_eq!(language_name("pt"), Some("Portuguese"));
        assert_eq!(region_name("BR"), Some("Brazil"));
        assert_eq!(region_name("419"), Some("Latin America"));
    }

    #[test]
    fn unknown_codes_return_none() {
        assert_eq!(language_name("xx"), None);
        assert_eq!(region_name("ZZ"), None);
    }

    #[test]
    fn rtl_languages() {
        assert!(is_rtl_language("ar"));
        assert!(is_rtl_language("he"));
        assert!(!is_rtl_language("en"));
    }
}
