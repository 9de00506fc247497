//! SQL literal helpers

/// Quote a value as a SQL string literal.
///
/// Wraps the value in single quotes and doubles any embedded single quotes.
pub(crate) fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_literal() {
        assert_eq!(quote_literal("analytics"), "'analytics'");
        assert_eq!(quote_literal("o'brien"), "'o''brien'");
        assert_eq!(quote_literal(""), "''");
    }
}
