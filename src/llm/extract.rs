//! Pull a bare `SELECT` statement out of a model reply.

use super::generator::QueryGenError;

/// Clean a model reply down to a single `SELECT` statement.
///
/// Strips surrounding whitespace, a Markdown code fence (with or without a
/// language tag) and trailing semicolons. Anything that does not then start
/// with `SELECT` is rejected.
///
/// ```
/// use voice_flight_agent::llm::extract_select;
///
/// let reply = "```sql\nSELECT * FROM flights;\n```";
/// assert_eq!(extract_select(reply).unwrap(), "SELECT * FROM flights");
/// assert!(extract_select("DROP TABLE flights").is_err());
/// ```
pub fn extract_select(reply: &str) -> Result<String, QueryGenError> {
    let mut sql = reply.trim();

    if let (Some(open), Some(close)) = (sql.find("```"), sql.rfind("```")) {
        if close > open {
            sql = sql[open + 3..close].trim_start();
            if let (Some(tag), Some(rest)) = (sql.get(..3), sql.get(3..)) {
                if tag.eq_ignore_ascii_case("sql") && rest.starts_with(char::is_whitespace) {
                    sql = rest;
                }
            }
        }
    }

    let sql = sql.trim().trim_end_matches(';').trim_end();
    if sql.is_empty() {
        return Err(QueryGenError::EmptyResponse);
    }

    let starts_with_select = sql
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("select"));
    if !starts_with_select {
        return Err(QueryGenError::NotSelect(sql.to_string()));
    }

    Ok(sql.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_query_passes_through() {
        assert_eq!(
            extract_select("SELECT * FROM flights WHERE origin = 'Delhi'").unwrap(),
            "SELECT * FROM flights WHERE origin = 'Delhi'"
        );
    }

    #[test]
    fn trailing_semicolons_and_whitespace_are_removed() {
        assert_eq!(
            extract_select("  select * from flights;;  \n").unwrap(),
            "select * from flights"
        );
    }

    #[test]
    fn fenced_query_with_tag() {
        let reply = "Here you go:\n```SQL\nSELECT airline\nFROM flights;\n```\nEnjoy";
        assert_eq!(extract_select(reply).unwrap(), "SELECT airline\nFROM flights");
    }

    #[test]
    fn fenced_query_without_tag() {
        assert_eq!(
            extract_select("```SELECT 1```").unwrap(),
            "SELECT 1"
        );
    }

    #[test]
    fn non_select_is_rejected() {
        let err = extract_select("DELETE FROM flights").unwrap_err();
        assert!(matches!(err, QueryGenError::NotSelect(ref s) if s == "DELETE FROM flights"));
    }

    #[test]
    fn prose_is_rejected() {
        assert!(matches!(
            extract_select("I cannot help with that."),
            Err(QueryGenError::NotSelect(_))
        ));
    }

    #[test]
    fn empty_reply() {
        assert!(matches!(extract_select("  "), Err(QueryGenError::EmptyResponse)));
        assert!(matches!(extract_select("``````"), Err(QueryGenError::EmptyResponse)));
    }
}
