use regex::Regex;

/// What a User-Agent header tells us about the visitor. Fields stay `None`
/// when the header is missing or unrecognisable, and the analytics layer
/// reports them under the "Unknown" label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub device_type: Option<String>,
    pub platform: Option<String>,
    pub browser: Option<String>,
}

/// Classifies User-Agent strings into the three visit dimensions.
/// Patterns are compiled once and shared for the life of the process.
pub struct UserAgentClassifier {
    tablet: Regex,
    mobile: Regex,
}

impl UserAgentClassifier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tablet: Regex::new(r"(?i)ipad|tablet").expect("valid tablet pattern"),
            mobile: Regex::new(r"(?i)mobile|iphone|ipod").expect("valid mobile pattern"),
        }
    }

    #[must_use]
    pub fn classify(&self, user_agent: Option<&str>) -> ClientInfo {
        let Some(ua) = user_agent.filter(|ua| !ua.trim().is_empty()) else {
            return ClientInfo::default();
        };

        ClientInfo {
            device_type: Some(self.device_type(ua).to_string()),
            platform: self.platform(ua).map(str::to_string),
            browser: self.browser(ua).map(str::to_string),
        }
    }

    fn device_type(&self, ua: &str) -> &'static str {
        if self.tablet.is_match(ua) {
            "Tablet"
        } else if self.mobile.is_match(ua) {
            "Mobile"
        } else if ua.contains("Android") {
            // Android tablets omit the "Mobile" token.
            "Tablet"
        } else {
            "Desktop"
        }
    }

    fn platform(&self, ua: &str) -> Option<&'static str> {
        if ua.contains("iPhone") || ua.contains("iPad") || ua.contains("iPod") {
            Some("iOS")
        } else if ua.contains("Android") {
            Some("Android")
        } else if ua.contains("Windows") {
            Some("Windows")
        } else if ua.contains("Macintosh") || ua.contains("Mac OS X") {
            Some("macOS")
        } else if ua.contains("Linux") {
            Some("Linux")
        } else {
            None
        }
    }

    fn browser(&self, ua: &str) -> Option<&'static str> {
        // Order matters: Chrome-derived browsers also advertise
        // "Chrome" and "Safari" in their UA strings.
        if ua.contains("Edg/") || ua.contains("Edge/") {
            Some("Edge")
        } else if ua.contains("OPR/") || ua.contains("Opera") {
            Some("Opera")
        } else if ua.contains("Firefox/") {
            Some("Firefox")
        } else if ua.contains("Chrome/") || ua.contains("CriOS/") {
            Some("Chrome")
        } else if ua.contains("Safari/") {
            Some("Safari")
        } else {
            None
        }
    }
}

impl Default for UserAgentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_WIN: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";
    const SAFARI_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1";
    const FIREFOX_LINUX: &str =
        "Mozilla/5.0 (X11; Linux x86_64; rv:127.0) Gecko/20100101 Firefox/127.0";
    const SAFARI_IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 17_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1";

    #[test]
    fn test_desktop_chrome() {
        let info = UserAgentClassifier::new().classify(Some(CHROME_WIN));
        assert_eq!(info.device_type.as_deref(), Some("Desktop"));
        assert_eq!(info.platform.as_deref(), Some("Windows"));
        assert_eq!(info.browser.as_deref(), Some("Chrome"));
    }

    #[test]
    fn test_mobile_safari() {
        let info = UserAgentClassifier::new().classify(Some(SAFARI_IPHONE));
        assert_eq!(info.device_type.as_deref(), Some("Mobile"));
        assert_eq!(info.platform.as_deref(), Some("iOS"));
        assert_eq!(info.browser.as_deref(), Some("Safari"));
    }

    #[test]
    fn test_tablet() {
        let info = UserAgentClassifier::new().classify(Some(SAFARI_IPAD));
        assert_eq!(info.device_type.as_deref(), Some("Tablet"));
        assert_eq!(info.platform.as_deref(), Some("iOS"));
    }

    #[test]
    fn test_firefox_linux() {
        let info = UserAgentClassifier::new().classify(Some(FIREFOX_LINUX));
        assert_eq!(info.device_type.as_deref(), Some("Desktop"));
        assert_eq!(info.platform.as_deref(), Some("Linux"));
        assert_eq!(info.browser.as_deref(), Some("Firefox"));
    }

    #[test]
    fn test_missing_header_stays_unknown() {
        let info = UserAgentClassifier::new().classify(None);
        assert_eq!(info, ClientInfo::default());

        let info = UserAgentClassifier::new().classify(Some("  "));
        assert!(info.device_type.is_none());
    }
}
