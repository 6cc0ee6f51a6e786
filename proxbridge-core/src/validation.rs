///! Input validation module
///! Validates interface identifiers and compute resource connection settings

use proxbridge_common::Error;
use regex::Regex;
use std::sync::LazyLock;

/// Regex patterns for validation
static IDENTIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^net[0-9]+$").unwrap()
});

static USER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+$").unwrap()
});

/// Validation result type
pub type ValidationResult<T> = Result<T, Error>;

/// Interface identifier validation
///
/// `index` is the position of the interface on the host and shows up in the
/// error message as `interface[index]`.
pub fn validate_identifier(index: usize, identifier: &str) -> ValidationResult<()> {
    if identifier.is_empty() {
        return Err(Error::Validation(format!(
            "Identifier interface[{}] required.",
            index
        )));
    }

    if !IDENTIFIER_REGEX.is_match(identifier) {
        return Err(Error::Validation(format!(
            "Invalid identifier interface[{}]. Must be net[n] with n integer >= 0",
            index
        )));
    }

    Ok(())
}

/// True for `net<N>` identifiers
pub fn is_identifier(identifier: &str) -> bool {
    IDENTIFIER_REGEX.is_match(identifier)
}

/// Proxmox user validation, `<name>@<realm>`
pub fn validate_user(user: &str) -> ValidationResult<()> {
    if user.is_empty() {
        return Err(Error::Validation("User can't be blank".to_string()));
    }

    if !USER_REGEX.is_match(user) {
        return Err(Error::Validation(
            "User must be of the form name@realm (e.g. root@pam)".to_string()
        ));
    }

    Ok(())
}

/// Password validation
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(Error::Validation("Password can't be blank".to_string()));
    }

    Ok(())
}

/// URL validation
pub fn validate_url(url: &str) -> ValidationResult<()> {
    if url.is_empty() {
        return Err(Error::Validation("URL can't be blank".to_string()));
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(Error::Validation(
            "URL must start with http:// or https://".to_string()
        ));
    }

    let parsed = url::Url::parse(url).map_err(|e| {
        Error::Validation(format!("Invalid URL: {}", e))
    })?;

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(Error::Validation("URL must contain a host".to_string()));
    }

    Ok(())
}

/// Validates compute resource connection settings
pub fn validate_connection(url: &str, user: &str, password: &str) -> ValidationResult<()> {
    validate_url(url)?;
    validate_user(user)?;
    validate_password(password)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier(0, "net0").is_ok());
        assert!(validate_identifier(3, "net12").is_ok());
        assert!(validate_identifier(0, "").is_err());
        assert!(validate_identifier(0, "eth0").is_err());
        assert!(validate_identifier(0, "net").is_err());
        assert!(validate_identifier(0, "net-1").is_err());
        assert!(validate_identifier(0, "net0 ").is_err());
    }

    #[test]
    fn test_identifier_messages() {
        let err = validate_identifier(2, "").unwrap_err();
        assert!(err.to_string().ends_with("Identifier interface[2] required."));

        let err = validate_identifier(0, "eth0").unwrap_err();
        assert!(err
            .to_string()
            .ends_with("Invalid identifier interface[0]. Must be net[n] with n integer >= 0"));
    }

    #[test]
    fn test_validate_user() {
        assert!(validate_user("root@pam").is_ok());
        assert!(validate_user("foreman@pve").is_ok());
        assert!(validate_user("root").is_err());
        assert!(validate_user("").is_err());
        assert!(validate_user("root@").is_err());
        assert!(validate_user("ro ot@pam").is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("http://foo.com").is_ok());
        assert!(validate_url("http://bar.com/baz").is_ok());
        assert!(validate_url("https://pve.example.com:8006/api2/json").is_ok());
        assert!(validate_url("a").is_err());
        assert!(validate_url("").is_err());
        assert!(validate_url("ftp://foo.com").is_err());
    }

    #[test]
    fn test_validate_connection() {
        assert!(validate_connection("https://pve:8006/api2/json", "root@pam", "secret").is_ok());
        assert!(validate_connection("https://pve:8006/api2/json", "root@pam", "").is_err());
        assert!(validate_connection("", "root@pam", "secret").is_err());
        assert!(validate_connection("https://pve:8006", "root", "secret").is_err());
    }
}
