use std::ffi::OsString;
use clap::error::ErrorKind;
use clap::Parser;

use crate::output::Verbosity;

pub const USAGE: &str = concat!(
    "USAGE: ConnectivityTest [[-silent]|[-showDebug]|[-hideErrors]|[-hideWarnings]|[-hideInfo]] ",
    "[ConfigurationFilePath] | [[IP_Address] [Port_Number]]\n",
    " Example: ConnectivityTest 192.168.1.1 80 \n",
    " Example: ConnectivityTest config.json"
);

#[derive(Parser, Debug)]
#[command(name = "ConnectivityTest")]
#[command(version)]
#[command(about = "Checks TCP reachability of IP/port destinations", long_about = None)]
#[command(after_help = concat!(
    "Verbosity flags (case-insensitive): ",
    "-silent, -showDebug, -hideErrors, -hideWarnings, -hideInfo"
))]
pub struct Cli {
    #[arg(
        value_name = "ARGS",
        allow_hyphen_values = true,
        trailing_var_arg = true,
        help = "Config file path (defaults to ./config.json), or an IPv4 address followed by a port"
    )]
    pub args: Vec<OsString>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    Silent,
    ShowDebug,
    HideErrors,
    HideWarnings,
    HideInfo,
}

impl Flag {
    const ALL: [(&'static str, Flag); 5] = [
        ("-silent", Flag::Silent),
        ("-showDebug", Flag::ShowDebug),
        ("-hideErrors", Flag::HideErrors),
        ("-hideWarnings", Flag::HideWarnings),
        ("-hideInfo", Flag::HideInfo),
    ];

    fn recognize(token: &str) -> Option<Flag> {
        Self::ALL
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map(|(_, flag)| *flag)
    }

    fn apply(self, verbosity: &mut Verbosity) {
        match self {
            Flag::Silent => verbosity.silent = true,
            Flag::ShowDebug => verbosity.debug = true,
            Flag::HideErrors => verbosity.show_errors = false,
            Flag::HideWarnings => verbosity.show_warnings = false,
            Flag::HideInfo => verbosity.show_info = false,
        }
    }
}

/// Pulls the verbosity flags out of `args` and returns the rest in order.
///
/// Tokens that are not a recognized flag pass through untouched, including
/// unknown ones that start with `-` and ones that are not valid UTF-8.
pub fn process_flags<I, S>(args: I) -> (Verbosity, Vec<OsString>)
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut verbosity = Verbosity::default();
    let mut positional = Vec::new();

    for arg in args {
        let arg = arg.into();
        match arg.to_str().and_then(Flag::recognize) {
            Some(flag) => flag.apply(&mut verbosity),
            None => positional.push(arg),
        }
    }

    tracing::debug!(?verbosity, positional = positional.len(), "processed flags");
    (verbosity, positional)
}

/// Returns clap's help or version output when `positional` asks for it.
///
/// The positional list itself is never rewritten by clap; it reaches the
/// orchestrator exactly as `process_flags` left it.
pub fn info_request(positional: &[OsString]) -> Option<clap::Error> {
    let argv = std::iter::once(OsString::from("ConnectivityTest"))
        .chain(positional.iter().cloned());
    match Cli::try_parse_from(argv) {
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => Some(e),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_are_removed_in_any_position() {
        let (verbosity, rest) = process_flags(["10.0.0.1", "-silent", "80", "-hideInfo"]);
        assert_eq!(rest, vec!["10.0.0.1", "80"]);
        assert!(verbosity.silent);
        assert!(!verbosity.show_info);
    }

    #[test]
    fn test_flags_match_case_insensitively() {
        let (verbosity, rest) =
            process_flags(["-SHOWDEBUG", "-hideerrors", "-HideWarnings", "-Silent", "-HIDEINFO"]);
        assert!(rest.is_empty());
        assert_eq!(
            verbosity,
            Verbosity {
                silent: true,
                debug: true,
                show_errors: false,
                show_warnings: false,
                show_info: false,
            }
        );
    }

    #[test]
    fn test_unknown_dash_tokens_pass_through() {
        let (verbosity, rest) = process_flags(["-verbose", "config.json", "-showDebug"]);
        assert_eq!(rest, vec!["-verbose", "config.json"]);
        assert!(verbosity.debug);
        assert!(!verbosity.silent);
    }

    #[test]
    fn test_no_flags_keeps_defaults() {
        let (verbosity, rest) = process_flags(Vec::<String>::new());
        assert!(rest.is_empty());
        assert_eq!(verbosity, Verbosity::default());
    }

    #[test]
    fn test_cli_accepts_hyphen_values() {
        let cli = Cli::try_parse_from(["ConnectivityTest", "-weird", "80"]).unwrap();
        assert_eq!(cli.args, vec!["-weird", "80"]);
    }

    #[test]
    fn test_double_dash_is_kept_as_positional() {
        let (_, rest) = process_flags(["--", "-silent", "127.0.0.1", "80"]);
        assert_eq!(rest, vec!["--", "127.0.0.1", "80"]);
    }

    #[test]
    fn test_info_request() {
        assert!(info_request(&[OsString::from("--help")]).is_some());
        assert!(info_request(&[OsString::from("--version")]).is_some());
        assert!(info_request(&[OsString::from("--"), OsString::from("bogus")]).is_none());
        assert!(info_request(&[OsString::from("127.0.0.1"), OsString::from("80")]).is_none());
        assert!(info_request(&[]).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_tokens_pass_through() {
        use std::os::unix::ffi::OsStrExt;

        let raw = std::ffi::OsStr::from_bytes(b"conf\xff.json").to_os_string();
        let (verbosity, rest) = process_flags([OsString::from("-hideInfo"), raw.clone()]);
        assert_eq!(rest, vec![raw]);
        assert!(!verbosity.show_info);
    }
}
