//! Composes the repair-request e-mail for the service desk.

use reqwest::Url;

use crate::prelude::*;

pub const SUPPORT_EMAIL: &str = "digitalenergygroupkz@gmail.com";

/// Build a `mailto:` URL the user can open in any mail client.
pub fn build_mailto(meter: &str, comment: &str, sender: &str) -> Result<Url> {
    let comment = if comment.trim().is_empty() { "-" } else { comment.trim() };
    let mut url = Url::parse(&format!("mailto:{SUPPORT_EMAIL}"))?;
    url.query_pairs_mut()
        .append_pair("subject", &format!("Repair request — meter {meter}"))
        .append_pair(
            "body",
            &format!("Meter: {meter}\nUser comment: {comment}\n\nSent from {sender}"),
        );
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailto_ok() -> Result {
        let url = build_mailto("100500", "leaking valve", "user@example.com")?;
        assert_eq!(url.scheme(), "mailto");
        assert_eq!(url.path(), SUPPORT_EMAIL);
        let query = url.query().unwrap();
        assert!(query.contains("subject="));
        assert!(query.contains("100500"));
        assert!(!query.contains(' '), "the query must be percent-encoded");
        Ok(())
    }

    #[test]
    fn test_empty_comment_becomes_dash() -> Result {
        let url = build_mailto("1", "  ", "user@example.com")?;
        let body = url
            .query_pairs()
            .find(|(key, _)| key == "body")
            .map(|(_, value)| value.into_owned())
            .unwrap();
        assert!(body.contains("User comment: -"));
        Ok(())
    }
}
