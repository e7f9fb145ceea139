use std::sync::LazyLock;

use regex::Regex;

/// Email providers aimed at children. A guardian address may not use them.
pub static CHILD_EMAIL_DOMAINS: &[&str] = &["kidsemail.com", "kidzui.com", "jumpstart.com"];

static EMAIL_SHAPE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Returns whether an address is acceptable as a guardian contact.
///
/// Malformed input returns `false`; this predicate never errors.
#[must_use]
pub fn validate_guardian_email(email: &str) -> bool {
    let Some(shape) = EMAIL_SHAPE.as_ref() else {
        return false;
    };

    if !shape.is_match(email) {
        return false;
    }

    let Some((_, domain)) = email.split_once('@') else {
        return false;
    };

    let domain = domain.to_lowercase();
    !CHILD_EMAIL_DOMAINS.contains(&domain.as_str())
}

#[cfg(test)]
mod tests {
    use super::validate_guardian_email;

    #[test]
    fn ordinary_address_is_accepted() {
        assert!(validate_guardian_email("parent@example.com"));
        assert!(validate_guardian_email("first.last+kids@mail.example.org"));
    }

    #[test]
    fn child_provider_domains_are_rejected_case_insensitively() {
        assert!(!validate_guardian_email("mom@kidsemail.com"));
        assert!(!validate_guardian_email("dad@KidZui.com"));
        assert!(!validate_guardian_email("me@jumpstart.com"));
    }

    #[test]
    fn subdomain_of_child_provider_is_not_on_the_list() {
        assert!(validate_guardian_email("parent@mail.kidsemail.com"));
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        for candidate in [
            "",
            "parent",
            "parent@",
            "@example.com",
            "parent@example",
            "par ent@example.com",
            "parent@@example.com",
        ] {
            assert!(!validate_guardian_email(candidate), "{candidate}");
        }
    }
}
