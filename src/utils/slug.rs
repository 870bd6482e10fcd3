use rand::{Rng, distributions::Alphanumeric};

/// Length of the random suffix appended to every generated slug.
const SUFFIX_LEN: usize = 6;

/// Lowercase a title into a URL-safe token: alphanumerics kept, everything
/// else collapsed into single hyphens.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        slug.push_str("item");
    }

    slug
}

/// Slug with a random alphanumeric suffix for uniqueness. Callers still
/// retry on a unique-constraint violation as the backstop.
pub fn unique_slug(title: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect();

    format!("{}-{}", slugify(title), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Intro to Rust"), "intro-to-rust");
        assert_eq!(slugify("  Algebra II:  Midterm!  "), "algebra-ii-midterm");
    }

    #[test]
    fn test_slugify_empty_falls_back() {
        assert_eq!(slugify("!!!"), "item");
        assert_eq!(slugify(""), "item");
    }

    #[test]
    fn test_unique_slug_has_suffix() {
        let slug = unique_slug("Final Exam");
        assert!(slug.starts_with("final-exam-"));
        assert_eq!(slug.len(), "final-exam-".len() + SUFFIX_LEN);
    }

    #[test]
    fn test_unique_slug_differs_between_calls() {
        assert_ne!(unique_slug("Final Exam"), unique_slug("Final Exam"));
    }
}
