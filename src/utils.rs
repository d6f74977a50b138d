/// Shown when the backend could not derive any initials.
const INITIALS_PLACEHOLDER: &str = "??";

/// Formats initials as letters separated by periods with a trailing period,
/// e.g. "JM" becomes "J.M.". Empty input falls back to the placeholder.
pub fn format_initials(initials: &str) -> String {
    let initials = if initials.is_empty() {
        INITIALS_PLACEHOLDER
    } else {
        initials
    };
    let mut out = String::with_capacity(initials.len() * 2);
    for c in initials.chars() {
        out.push(c);
        out.push('.');
    }
    out
}

/// Flag image URL for a lowercase two-letter country code, `None` when the
/// order carried no country.
pub fn flag_url(country_code: &str) -> Option<String> {
    if country_code.is_empty() {
        None
    } else {
        Some(format!("https://flagcdn.com/w40/{country_code}.png"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_get_a_period_after_every_letter() {
        assert_eq!(format_initials("J"), "J.");
        assert_eq!(format_initials("JM"), "J.M.");
    }

    #[test]
    fn empty_initials_use_the_placeholder() {
        assert_eq!(format_initials(""), "?.?.");
    }

    #[test]
    fn flag_url_is_templated_from_the_country_code() {
        assert_eq!(
            flag_url("it").as_deref(),
            Some("https://flagcdn.com/w40/it.png")
        );
        assert_eq!(flag_url(""), None);
    }
}
