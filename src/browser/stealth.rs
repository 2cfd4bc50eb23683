use crate::config::BrowserConfig;

/// Chromium flags applied to every session.
pub const BASE_LAUNCH_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--no-first-run",
    "--no-zygote",
    "--disable-blink-features=AutomationControlled", // hide automation
];

#[derive(Debug, Clone, PartialEq)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

/// Fixed device fingerprint presented to the target site.
#[derive(Debug, Clone)]
pub struct BrowserFingerprint {
    pub user_agent: String,
    pub viewport: ViewportSize,
    pub locale: String,
}

impl BrowserFingerprint {
    pub fn from_config(config: &BrowserConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            viewport: ViewportSize {
                width: config.viewport_width,
                height: config.viewport_height,
            },
            locale: config.locale.clone(),
        }
    }

    // "en-US" -> "en-US,en;q=0.9"
    pub fn accept_language(&self) -> String {
        match self.locale.split('-').next() {
            Some(lang) if lang != self.locale => format!("{},{};q=0.9", self.locale, lang),
            _ => self.locale.clone(),
        }
    }
}

impl Default for BrowserFingerprint {
    fn default() -> Self {
        Self::from_config(&BrowserConfig::default())
    }
}

pub fn launch_args(config: &BrowserConfig) -> Vec<String> {
    let mut args: Vec<String> = BASE_LAUNCH_ARGS.iter().map(|arg| arg.to_string()).collect();

    args.push(format!("--lang={}", config.locale));
    if let Some(ref proxy) = config.proxy {
        args.push(format!("--proxy-server={}", proxy));
    }
    args.extend(config.extra_args.iter().cloned());

    args
}

/// Runs before any page script so the site never sees `navigator.webdriver`.
pub fn generate_stealth_script(fingerprint: &BrowserFingerprint) -> String {
    let languages = fingerprint
        .accept_language()
        .split(',')
        .map(|lang| format!("'{}'", lang.split(';').next().unwrap_or(lang)))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"
    (function() {{
        Object.defineProperty(navigator, 'webdriver', {{ get: () => undefined }});
        Object.defineProperty(navigator, 'languages', {{ get: () => [{}] }});
    }})();
    "#,
        languages
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fingerprint() {
        let fingerprint = BrowserFingerprint::default();

        assert!(fingerprint.user_agent.contains("Chrome/120.0.0.0"));
        assert_eq!(fingerprint.viewport, ViewportSize { width: 1920, height: 1080 });
        assert_eq!(fingerprint.locale, "en-US");
    }

    #[test]
    fn test_accept_language() {
        let fingerprint = BrowserFingerprint::default();
        assert_eq!(fingerprint.accept_language(), "en-US,en;q=0.9");

        let mut bare = BrowserFingerprint::default();
        bare.locale = "fr".to_string();
        assert_eq!(bare.accept_language(), "fr");
    }

    #[test]
    fn test_launch_args() {
        let mut config = BrowserConfig::default();
        config.proxy = Some("10.0.0.1:3128".to_string());
        config.extra_args = vec!["--mute-audio".to_string()];

        let args = launch_args(&config);
        assert!(args.contains(&"--disable-blink-features=AutomationControlled".to_string()));
        assert!(args.contains(&"--no-sandbox".to_string()));
        assert!(args.contains(&"--lang=en-US".to_string()));
        assert!(args.contains(&"--proxy-server=10.0.0.1:3128".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("--mute-audio"));
    }

    #[test]
    fn test_launch_args_without_proxy() {
        let args = launch_args(&BrowserConfig::default());
        assert!(!args.iter().any(|arg| arg.starts_with("--proxy-server")));
    }

    #[test]
    fn test_stealth_script_generation() {
        let script = generate_stealth_script(&BrowserFingerprint::default());

        assert!(script.contains("'webdriver'"), "Script should hide webdriver property");
        assert!(script.contains("get: () => undefined"));
        assert!(script.contains("['en-US', 'en']"));
    }
}
