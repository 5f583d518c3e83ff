//! Canonical string encoding shared by every signable message.

/// Field delimiter of the gateway's signature protocol.
pub const DELIMITER: char = '|';

/// Joins already-resolved field values in order and appends the secret.
///
/// Values are not escaped: a field containing `|` makes the result ambiguous.
/// The gateway computes the same string, so escaping here would break every
/// signature it checks.
pub fn encode<'a, I>(fields: I, secret: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    for field in fields {
        out.push_str(field);
        out.push(DELIMITER);
    }
    out.push_str(secret);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_last() {
        assert_eq!(encode(["a", "b"], "s"), "a|b|s");
    }

    #[test]
    fn test_no_fields() {
        assert_eq!(encode::<[&str; 0]>([], "s"), "s");
    }

    #[test]
    fn test_delimiter_not_escaped() {
        assert_eq!(encode(["a|b"], "s"), "a|b|s");
    }
}
