//! Version information for petrodeal

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// `name/version`, used as the HTTP client user agent and in logs
pub fn user_agent() -> String {
    format!("{}/{}", PKG_NAME, VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent() {
        assert_eq!(user_agent(), format!("petrodeal/{}", VERSION));
    }
}
