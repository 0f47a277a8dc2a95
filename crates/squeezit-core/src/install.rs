//! "Add to home screen" support
//!
//! iOS has no install prompt, so those users get manual instructions. Other
//! platforms get an install button driven by the browser's deferred prompt.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallPlatform {
    Ios,
    Other,
}

impl InstallPlatform {
    pub fn detect(user_agent: &str) -> Self {
        const IOS_DEVICES: [&str; 3] = ["iPad", "iPhone", "iPod"];
        if IOS_DEVICES.iter().any(|d| user_agent.contains(d)) {
            InstallPlatform::Ios
        } else {
            InstallPlatform::Other
        }
    }

    /// Manual steps for platforms without a prompt.
    pub fn instructions(self) -> Option<&'static [&'static str]> {
        match self {
            InstallPlatform::Ios => Some(&["Tap Share", "Then Add to Home Screen"]),
            InstallPlatform::Other => None,
        }
    }
}
