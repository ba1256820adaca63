//! ARN field extraction.
//!
//! Identity derivation downstream relies on the exact credential formats the
//! token service emits; these helpers parse them strictly and return `None`
//! for anything that does not match.

/// Extract the 12-digit account ID (field 5 in colon-delimited format).
pub fn account_from_arn(arn: &str) -> Option<String> {
    let parts: Vec<&str> = arn.split(':').collect();
    if parts.len() >= 6 {
        let account_id = parts[4];
        if account_id.len() == 12 && account_id.bytes().all(|b| b.is_ascii_digit()) {
            return Some(account_id.to_string());
        }
    }
    None
}

/// The resource portion of an ARN (everything after the fifth colon).
pub fn resource_from_arn(arn: &str) -> Option<&str> {
    arn.splitn(6, ':').nth(5)
}

/// Role name from an `assumed-role/<role>/<session>` or `role/<role>` ARN.
pub fn role_name_from_arn(arn: &str) -> Option<&str> {
    let mut segments = resource_from_arn(arn)?.split('/');
    match segments.next()? {
        "assumed-role" | "role" => segments.next().filter(|name| !name.is_empty()),
        _ => None,
    }
}

/// Session name from an `assumed-role/<role>/<session>` ARN.
pub fn session_name_from_arn(arn: &str) -> Option<&str> {
    let mut segments = resource_from_arn(arn)?.split('/');
    if segments.next()? != "assumed-role" {
        return None;
    }
    segments.next()?;
    segments.next().filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_from_arn_valid() {
        assert_eq!(
            account_from_arn("arn:aws:iam::123456789012:role/audit"),
            Some("123456789012".to_string())
        );
        assert_eq!(
            account_from_arn("arn:aws-cn:sts::987654321098:assumed-role/audit/session"),
            Some("987654321098".to_string())
        );
    }

    #[test]
    fn test_account_from_arn_invalid() {
        assert_eq!(account_from_arn("not-an-arn"), None);
        assert_eq!(account_from_arn("arn:aws:iam"), None);
        assert_eq!(account_from_arn("arn:aws:iam::::"), None);
        // wrong length
        assert_eq!(account_from_arn("arn:aws:iam::12345678901:role/r"), None);
        assert_eq!(account_from_arn("arn:aws:iam::1234567890123:role/r"), None);
        // non-numeric
        assert_eq!(account_from_arn("arn:aws:iam::12345678901a:role/r"), None);
    }

    #[test]
    fn test_role_name_from_arn() {
        assert_eq!(
            role_name_from_arn("arn:aws:iam::123456789012:role/audit-role"),
            Some("audit-role")
        );
        assert_eq!(
            role_name_from_arn("arn:aws:sts::123456789012:assumed-role/audit-role/session"),
            Some("audit-role")
        );
        assert_eq!(
            role_name_from_arn("arn:aws:iam::123456789012:user/someone"),
            None
        );
        assert_eq!(role_name_from_arn("arn:aws:iam::123456789012:role/"), None);
    }

    #[test]
    fn test_session_name_from_arn() {
        assert_eq!(
            session_name_from_arn("arn:aws:sts::123456789012:assumed-role/audit/my-session"),
            Some("my-session")
        );
        assert_eq!(
            session_name_from_arn("arn:aws:iam::123456789012:role/audit"),
            None
        );
        assert_eq!(
            session_name_from_arn("arn:aws:sts::123456789012:assumed-role/audit"),
            None
        );
    }
}
