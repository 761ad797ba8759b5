use std::collections::HashSet;

/// Paths reachable without a credential when the auth gate is enabled.
///
/// Matching is exact: `/api/v1/resume-cover` is public but
/// `/api/v1/resume-cover/save` is not.
pub const PUBLIC_PATHS: &[&str] = &[
    "/",
    "/health",
    "/openapi.json",
    "/docs",
    "/redoc",
    "/favicon.ico",
    // JWT issuance
    "/api/v1/auth/login",
    "/api/v1/auth/signup",
    "/api/v1/auth/refresh",
    // Password reset / OTP
    "/api/v1/auth/forgot-otp",
    "/api/v1/auth/verify-otp",
    "/api/v1/auth/reset-with-otp",
    // Public generator and news feed
    "/api/v1/resume-cover",
    "/api/v1/news/jobs",
    // Called by Stripe, not by a logged-in user
    "/api/v1/pay/webhook",
];

/// Immutable set of exact request paths that bypass authentication.
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    paths: HashSet<String>,
}

impl ExclusionSet {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::new(PUBLIC_PATHS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_contains_every_public_path() {
        let set = ExclusionSet::default();
        assert_eq!(set.len(), PUBLIC_PATHS.len());
        for path in PUBLIC_PATHS {
            assert!(set.contains(path), "{path} should be excluded");
        }
    }

    #[test]
    fn test_sub_path_is_not_excluded() {
        let set = ExclusionSet::default();
        assert!(set.contains("/api/v1/resume-cover"));
        assert!(!set.contains("/api/v1/resume-cover/save"));
        assert!(!set.contains("/api/v1/pay/webhook/"));
        assert!(!set.contains("/health/deep"));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let set = ExclusionSet::default();
        assert!(!set.contains("/HEALTH"));
        assert!(!set.contains("/api/v1/Auth/login"));
    }

    #[test]
    fn test_protected_paths_not_excluded() {
        let set = ExclusionSet::default();
        assert!(!set.contains("/api/v1/profile"));
        assert!(!set.contains("/api/v1/pay/checkout"));
        assert!(!set.contains(""));
    }
}
