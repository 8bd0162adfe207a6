use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Extension(String),
    Prefix(String),
    OutputName(String),
    ExcludeSuffix,
    SameExtension(String),
    MissingDirectory(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse JSON: {}", e),
            ConfigError::Extension(ext) => write!(
                f,
                "invalid extension {:?}: must start with '.' and name a suffix",
                ext
            ),
            ConfigError::Prefix(prefix) => write!(
                f,
                "invalid prefix {:?}: must be non-empty and not end with '_'",
                prefix
            ),
            ConfigError::OutputName(name) => {
                write!(f, "invalid output name {:?}: must be a bare file name", name)
            }
            ConfigError::ExcludeSuffix => write!(f, "exclude suffix must not be empty"),
            ConfigError::SameExtension(ext) => write!(
                f,
                "source and target extension are both {:?}: outputs would replace their inputs",
                ext
            ),
            ConfigError::MissingDirectory(command) => write!(
                f,
                "no directory configured for `{}` (pass it on the command line or in the config file)",
                command
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> ConfigError {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> ConfigError {
        ConfigError::Json(err)
    }
}
