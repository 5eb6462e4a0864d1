use std::borrow::Cow;
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::USAGE;
use crate::config::{load_settings, Settings, DEFAULT_CONFIG_FILE};
use crate::error::{exit, ConfigError};
use crate::output::Reporter;
use crate::probe::test_connectivity;

/// What a run is going to probe, decided from the positional arguments.
#[derive(Debug)]
enum Plan<'a> {
    Settings(Settings),
    Single { address: Cow<'a, str>, port: i64 },
}

pub struct App<W: Write> {
    reporter: Reporter<W>,
    default_config: PathBuf,
}

impl<W: Write> App<W> {
    pub fn new(reporter: Reporter<W>) -> Self {
        Self {
            reporter,
            default_config: PathBuf::from(".").join(DEFAULT_CONFIG_FILE),
        }
    }

    /// Settings file used when no positional argument is given.
    pub fn with_default_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_config = path.into();
        self
    }

    pub fn into_reporter(self) -> Reporter<W> {
        self.reporter
    }

    /// Runs the probes selected by `args` (flags already removed) and returns the exit code.
    ///
    /// Tokens are taken as-is, so a config path that is not valid UTF-8 still
    /// reaches the file system unchanged.
    pub fn run<S: AsRef<OsStr>>(&mut self, args: &[S]) -> i32 {
        let args: Vec<&OsStr> = args.iter().map(AsRef::as_ref).collect();
        match self.plan(&args) {
            Some(Plan::Settings(settings)) => self.run_settings(&settings),
            Some(Plan::Single { address, port }) => {
                test_connectivity(&mut self.reporter, &address, port)
            }
            None => exit::USAGE,
        }
    }

    fn plan<'a>(&mut self, args: &[&'a OsStr]) -> Option<Plan<'a>> {
        match args {
            [] => {
                let path = self.default_config.clone();
                match self.load_config(&path) {
                    Some(settings) => Some(Plan::Settings(settings)),
                    None => self.usage_error(&format!(
                        "***MISSING OR INVALID DEFAULT SETTINGS FILE ({})***",
                        DEFAULT_CONFIG_FILE
                    )),
                }
            }
            &[path] => {
                let path = Path::new(path);
                match self.load_config(path) {
                    Some(settings) => Some(Plan::Settings(settings)),
                    None => self.usage_error(&format!(
                        "***MISSING OR INVALID SETTINGS FILE ({})***",
                        path.display()
                    )),
                }
            }
            &[address, port] => match port.to_str().and_then(parse_port) {
                Some(port) => Some(Plan::Single {
                    address: address.to_string_lossy(),
                    port,
                }),
                None => self.usage_error("***INVALID PORT***"),
            },
            _ => self.usage_error("***MISSING PARAMETERS***"),
        }
    }

    /// The last non-zero code wins; zero never clears an earlier failure.
    fn run_settings(&mut self, settings: &Settings) -> i32 {
        let mut last_error = exit::SUCCESS;
        for (address, port) in settings.targets() {
            let code = test_connectivity(&mut self.reporter, address, port);
            if code != exit::SUCCESS {
                last_error = code;
            }
        }
        last_error
    }

    fn load_config(&mut self, path: &Path) -> Option<Settings> {
        match load_settings(path) {
            Ok(settings) => Some(settings),
            Err(ConfigError::NotFound(_)) => None,
            Err(e) => {
                self.reporter.debug("***FILE LOAD ERROR***");
                self.reporter.debug(format!("Error:{}", e.kind()));
                self.reporter.debug(format!("Message:{}", e));
                if let Some(source) = std::error::Error::source(&e) {
                    self.reporter.debug(format!("Cause:{}", source));
                }
                None
            }
        }
    }

    fn usage_error<T>(&mut self, message: &str) -> Option<T> {
        self.reporter.warning(message);
        self.reporter.warning(USAGE);
        None
    }
}

/// Accepts what a 32-bit signed integer parse accepts, surrounding whitespace included.
fn parse_port(text: &str) -> Option<i64> {
    text.trim().parse::<i32>().ok().map(i64::from)
}
