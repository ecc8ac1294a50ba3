use email_address::EmailAddress;

pub const MAX_USERNAME_CHARS: usize = 128;
pub const MIN_PASSWORD_CHARS: usize = 4;
pub const MAX_PASSWORD_CHARS: usize = 512;

pub fn check_control_whitespace<G>(
    given: G,
    max_chars: Option<usize>
) -> bool
where
    G: AsRef<str>
{
    let given_ref = given.as_ref();
    let mut iter = given_ref.chars();
    let mut char_count = 0;

    if let Some(max_chars) = max_chars {
        while let Some(ch) = iter.next() {
            if ch.is_control() || ch.is_whitespace() {
                return false;
            }

            char_count += 1;

            if char_count > max_chars {
                return false;
            }
        }
    } else {
        while let Some(ch) = iter.next() {
            if ch.is_control() || ch.is_whitespace() {
                return false;
            }
        }
    }

    true
}

pub fn username_valid(given: &String) -> bool {
    !given.is_empty() && check_control_whitespace(given, Some(MAX_USERNAME_CHARS))
}

pub fn email_valid(given: &String) -> bool {
    EmailAddress::is_valid(given)
}

pub fn password_valid(given: &String) -> bool {
    let count = given.chars().count();

    count >= MIN_PASSWORD_CHARS && count <= MAX_PASSWORD_CHARS
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    pub fn check_control_whitespace_whitespace_chars() {
        let leading = String::from(" test");
        let trailing = String::from("test ");
        let contains = String::from("test test");

        assert!(!check_control_whitespace(leading, None), "leading whitespace characters");
        assert!(!check_control_whitespace(trailing, None), "trailing whitespace characters");
        assert!(!check_control_whitespace(contains, None), "contains whitespace characters");
    }

    #[test]
    pub fn check_control_whitespace_control_chars() {
        let trailing = String::from("test\u{0000}");
        let leading = String::from("\u{0000}test");
        let contains = String::from("test\u{0000}test");

        assert!(!check_control_whitespace(trailing, None), "trailing control characters");
        assert!(!check_control_whitespace(leading, None), "leading control characters");
        assert!(!check_control_whitespace(contains, None), "contains control characters");
    }

    #[test]
    pub fn check_control_whitespace_max_length() {
        let k = String::from("abcdefghijklmnopqrstuvwxyzA");
        let count = k.chars().count();
        let max = count - 1;

        assert!(!check_control_whitespace(k, Some(max)), "max {} total {}", max, count);
    }

    #[test]
    pub fn username_valid_rejects_empty() {
        assert!(!username_valid(&String::new()));
    }

    #[test]
    pub fn email_valid_rejects_malformed() {
        let missing_domain = String::from("admin@");
        let missing_local = String::from("@root.com");
        let plain = String::from("admin");

        assert!(!email_valid(&missing_domain));
        assert!(!email_valid(&missing_local));
        assert!(!email_valid(&plain));
        assert!(email_valid(&String::from("admin@root.com")));
    }

    #[test]
    pub fn password_valid_bounds() {
        assert!(!password_valid(&String::from("abc")));
        assert!(password_valid(&String::from("admin")));
    }
}
