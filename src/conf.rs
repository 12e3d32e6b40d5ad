use anyhow::Context;
use std::env::VarError;
use std::fmt;
use std::path::PathBuf;

/// Where the runner reads the raw message bytes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Stdin,
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::File(path) => write!(f, "file:{}", path.display()),
            InputSource::Stdin => f.write_str("stdin"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub input: InputSource,
}

impl Config {
    /// Build a configuration from environment variables.
    ///
    /// Optional variable: `INPUT_PATH`. An unset or empty value selects stdin.
    /// The log format is read separately by [`crate::LogFormat::from_env`].
    ///
    /// # Errors
    /// Returns an error if `INPUT_PATH` is set but is not valid unicode.
    pub fn from_env() -> anyhow::Result<Self> {
        let input = match std::env::var("INPUT_PATH") {
            Ok(path) if !path.trim().is_empty() => InputSource::File(PathBuf::from(path)),
            Ok(_) | Err(VarError::NotPresent) => InputSource::Stdin,
            Err(e) => return Err(e).context("INPUT_PATH environment variable is not valid unicode"),
        };

        Ok(Self { input })
    }

    /// A path given on the command line wins over `INPUT_PATH`.
    #[must_use]
    pub fn with_input_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.input = InputSource::File(path);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    // Global mutex to serialize environment-variable dependent tests
    static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_MUTEX.get_or_init(|| Mutex::new(()))
    }

    fn clear_env() {
        unsafe { std::env::remove_var("INPUT_PATH") };
    }

    #[test]
    fn from_env_defaults_to_stdin() {
        let _g = env_lock().lock().unwrap();
        clear_env();

        let cfg = Config::from_env().expect("should parse");
        assert_eq!(cfg.input, InputSource::Stdin);
    }

    #[test]
    fn from_env_parses_overrides() {
        let _g = env_lock().lock().unwrap();
        clear_env();

        unsafe { std::env::set_var("INPUT_PATH", "/tmp/message.json") };

        let cfg = Config::from_env().expect("should parse");
        assert_eq!(
            cfg.input,
            InputSource::File(PathBuf::from("/tmp/message.json"))
        );
    }

    #[test]
    fn blank_input_path_means_stdin() {
        let _g = env_lock().lock().unwrap();
        clear_env();

        unsafe { std::env::set_var("INPUT_PATH", "  ") };

        let cfg = Config::from_env().expect("should parse");
        assert_eq!(cfg.input, InputSource::Stdin);
    }

    #[test]
    fn cli_path_overrides_env() {
        let _g = env_lock().lock().unwrap();
        clear_env();

        unsafe { std::env::set_var("INPUT_PATH", "from-env.json") };

        let cfg = Config::from_env()
            .expect("should parse")
            .with_input_path(Some(PathBuf::from("from-cli.json")));
        assert_eq!(cfg.input, InputSource::File(PathBuf::from("from-cli.json")));

        let cfg = Config::from_env().expect("should parse").with_input_path(None);
        assert_eq!(cfg.input, InputSource::File(PathBuf::from("from-env.json")));
    }

    #[test]
    fn input_source_display() {
        assert_eq!(InputSource::Stdin.to_string(), "stdin");
        assert_eq!(
            InputSource::File(PathBuf::from("in.json")).to_string(),
            "file:in.json"
        );
    }
}
