use crate::config::types::{ClientConfig, Config, SitemapConfig, UserAgentConfig};
use crate::robots::ProductToken;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_user_agent_config(&config.user_agent)?;
    validate_client_config(&config.client)?;
    validate_sitemap_config(&config.sitemap)?;
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    // The name doubles as the robots.txt identity
    if config.crawler_name == ProductToken::WILDCARD {
        return Err(ConfigError::Validation(
            "crawler_name cannot be '*', it would match every robots.txt group".to_string(),
        ));
    }

    if ProductToken::parse(&config.crawler_name).is_err() {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    // Validate contact URL
    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    // Validate contact email (basic validation)
    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates HTTP client configuration
fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > 60 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be between 1 and 60, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates sitemap resolution bounds
fn validate_sitemap_config(config: &SitemapConfig) -> Result<(), ConfigError> {
    if config.max_depth < 1 || config.max_depth > 32 {
        return Err(ConfigError::Validation(format!(
            "max_depth must be between 1 and 32, got {}",
            config.max_depth
        )));
    }

    if config.max_sitemaps < 1 || config.max_sitemaps > 10_000 {
        return Err(ConfigError::Validation(format!(
            "max_sitemaps must be between 1 and 10000, got {}",
            config.max_sitemaps
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    // Basic email format check: must contain @ and have text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    // Domain part should contain at least one dot
    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
