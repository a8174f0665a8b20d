//! Development environment detection
//!
//! Overrides in the query string can choose any surface, so they are only
//! honored where this classifier says "development". It looks at literal
//! hostnames and deploy-time flags only, never at request parameters or
//! headers other than the host itself.

/// Loopback hosts used by local development servers
const DEV_HOSTS: &[&str] = &["localhost", "127.0.0.1", "0.0.0.0", "::1"];

/// Hosting domains that serve ephemeral development instances
const DEV_HOST_SUFFIXES: &[&str] = &[".repl.co", ".replit.dev"];

/// Decides whether development overrides may be honored for a host
#[derive(Debug, Clone, Copy)]
pub struct EnvironmentClassifier {
    build_dev_mode: bool,
}

impl EnvironmentClassifier {
    /// `deploy_dev_mode` comes from configuration read once at startup. The
    /// `dev-mode` Cargo feature turns development on for every host as well.
    pub fn new(deploy_dev_mode: bool) -> Self {
        Self {
            build_dev_mode: deploy_dev_mode || cfg!(feature = "dev-mode"),
        }
    }

    #[cfg(test)]
    pub(crate) fn fixed(build_dev_mode: bool) -> Self {
        Self { build_dev_mode }
    }

    /// Whether the build itself is a development build
    pub fn build_dev_mode(&self) -> bool {
        self.build_dev_mode
    }

    pub fn is_development(&self, host: &str) -> bool {
        let host = normalize_host(host);

        if is_development_host(&host) {
            return true;
        }

        self.build_dev_mode
    }
}

/// Literal hostname match against the loopback set and development hosting
/// suffixes, independent of any build flag.
pub fn is_development_host(host: &str) -> bool {
    let host = normalize_host(host);
    DEV_HOSTS.contains(&host.as_str())
        || DEV_HOST_SUFFIXES.iter().any(|suffix| host.ends_with(suffix))
}

/// Whether a development host is a loopback address (served over plain HTTP)
pub fn is_loopback_host(host: &str) -> bool {
    DEV_HOSTS.contains(&normalize_host(host).as_str())
}

/// Lowercase a host, drop a trailing dot and any `:port` suffix.
///
/// Bracketed IPv6 literals (`[::1]:5173`) keep only the address. Normalizing
/// an already normalized host returns it unchanged.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();

    let host = if let Some(rest) = host.strip_prefix('[') {
        rest.split(']').next().unwrap_or_default()
    } else if host.matches(':').count() > 1 {
        // Bare IPv6 literal, which cannot carry a port
        host
    } else {
        host.split(':').next().unwrap_or_default()
    };

    host.trim_end_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("LocalHost:5173"), "localhost");
        assert_eq!(normalize_host("acme.example.org."), "acme.example.org");
        assert_eq!(normalize_host("[::1]:8080"), "::1");
        assert_eq!(normalize_host("  dash.example.org "), "dash.example.org");
        assert_eq!(normalize_host(""), "");
    }

    #[test]
    fn test_normalize_host_is_idempotent() {
        for host in ["[::1]:8080", "[::1]", "::1", "LocalHost:5173", "acme.example.org.", ""] {
            let once = normalize_host(host);
            assert_eq!(normalize_host(&once), once, "{}", host);
        }
        assert_eq!(normalize_host("::1"), "::1");
        assert_eq!(normalize_host("[::1]"), "::1");
    }

    #[test]
    fn test_ipv6_loopback_in_every_form() {
        let classifier = EnvironmentClassifier { build_dev_mode: false };
        for host in ["::1", "[::1]", "[::1]:3000"] {
            assert!(classifier.is_development(host), "{}", host);
            assert!(is_loopback_host(host), "{}", host);
        }
    }

    #[test]
    fn test_loopback_hosts_are_development() {
        let classifier = EnvironmentClassifier { build_dev_mode: false };
        assert!(classifier.is_development("localhost"));
        assert!(classifier.is_development("localhost:5173"));
        assert!(classifier.is_development("127.0.0.1:8080"));
        assert!(classifier.is_development("0.0.0.0"));
        assert!(classifier.is_development("[::1]:3000"));
    }

    #[test]
    fn test_ephemeral_hosting_is_development() {
        let classifier = EnvironmentClassifier { build_dev_mode: false };
        assert!(classifier.is_development("portal.user.repl.co"));
        assert!(classifier.is_development("abc-123.replit.dev"));
        // Suffix match only; the bare domain is not an instance
        assert!(!classifier.is_development("replit.dev.example.org"));
    }

    #[test]
    fn test_production_hosts_are_not_development() {
        let classifier = EnvironmentClassifier { build_dev_mode: false };
        assert!(!classifier.is_development("acme.example.org"));
        assert!(!classifier.is_development("localhost.example.org"));
        assert!(!classifier.is_development("example.org"));
    }

    #[test]
    fn test_build_flag_makes_every_host_development() {
        let classifier = EnvironmentClassifier { build_dev_mode: true };
        assert!(classifier.is_development("acme.example.org"));
        assert!(classifier.build_dev_mode());
    }

    #[test]
    fn test_deploy_flag_enables_build_dev_mode() {
        assert!(EnvironmentClassifier::new(true).build_dev_mode());
    }

    #[test]
    fn test_loopback_detection() {
        assert!(is_loopback_host("localhost:5173"));
        assert!(!is_loopback_host("abc.replit.dev"));
    }
}
