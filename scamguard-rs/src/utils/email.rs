use crate::error::{Result, ScamError};

/// Normalize an address for blocklist storage and lookup.
///
/// Entries are compared case-insensitively; only the lowercase form is
/// ever stored or listed.
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

/// Structural email validation
pub fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() {
        return Err(ScamError::InvalidEmail("address is empty".to_string()));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ScamError::InvalidEmail(
            "address must contain exactly one @".to_string(),
        ));
    }

    let (local, domain) = (parts[0], parts[1]);

    if local.is_empty() || domain.is_empty() {
        return Err(ScamError::InvalidEmail(
            "local part and domain cannot be empty".to_string(),
        ));
    }

    if !domain.contains('.') {
        return Err(ScamError::InvalidEmail(
            "domain must contain a dot".to_string(),
        ));
    }

    Ok(())
}
