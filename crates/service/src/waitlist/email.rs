use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("Email is required")]
    Missing,
    #[error("Invalid email format")]
    InvalidFormat,
}

/// Check the shape `local@domain.tld`:
/// - local part: one or more of `A-Z a-z 0-9 . _ % + -`
/// - domain: one or more of `A-Z a-z 0-9 . -`, then a dot, then a TLD of at
///   least two ASCII letters
///
/// The address is not normalized; the store compares it byte for byte.
pub fn validate_email(email: &str) -> Result<(), EmailError> {
    if email.is_empty() {
        return Err(EmailError::Missing);
    }
    let (local, domain) = email.split_once('@').ok_or(EmailError::InvalidFormat)?;
    if local.is_empty() || !local.chars().all(is_local_char) {
        return Err(EmailError::InvalidFormat);
    }
    let (host, tld) = domain.rsplit_once('.').ok_or(EmailError::InvalidFormat)?;
    if host.is_empty() || !host.chars().all(is_domain_char) {
        return Err(EmailError::InvalidFormat);
    }
    if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(EmailError::InvalidFormat);
    }
    Ok(())
}

fn is_local_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-')
}

fn is_domain_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-')
}
