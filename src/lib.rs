//! readnext library exports for testing

use clap::ValueEnum;

pub mod cli;
pub mod core;
pub mod storage;
pub mod tui;

#[cfg(test)]
pub mod test_support;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// JSON file on this machine
    #[default]
    Local,
    /// Hosted REST table (Supabase/PostgREST)
    Remote,
}

impl Backend {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "local" | "file" => Some(Backend::Local),
            "remote" | "supabase" => Some(Backend::Remote),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Backend::Local => "local",
            Backend::Remote => "remote",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_names() {
        assert_eq!(Backend::from_name("Remote"), Some(Backend::Remote));
        assert_eq!(Backend::from_name("file"), Some(Backend::Local));
        assert_eq!(Backend::from_name("s3"), None);
        assert_eq!(Backend::Remote.name(), "remote");
    }
}
