//! Command line types for the mock client

use clap::{CommandFactory, Parser};
use gpclient_mock::config::{DEFAULT_LOCK_PATH, DEFAULT_TIMEOUT_SECS, LOCK_PATH_ENV};
use gpclient_mock::MockConfig;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "gpclient-mock")]
#[command(about = "Mock gpclient: holds a PID lock file until timeout or SIGTERM", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Read one credential line from stdin before taking the lock
    #[arg(short = 'c', long)]
    pub cookie_on_stdin: bool,

    /// Seconds to hold the lock (non-numeric input means 0)
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = parse_timeout,
        allow_hyphen_values = true
    )]
    pub timeout: u64,

    /// Lock file location
    #[arg(
        short,
        long,
        value_name = "PATH",
        env = LOCK_PATH_ENV,
        default_value = DEFAULT_LOCK_PATH,
        allow_hyphen_values = true
    )]
    pub lock_file: PathBuf,

    /// Report whether an instance holds the lock file, then exit
    #[arg(long, conflicts_with = "stop")]
    pub status: bool,

    /// Send SIGTERM to the instance recorded in the lock file, then exit
    #[arg(long)]
    pub stop: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,

    /// Stray operands, e.g. values of unrecognized options
    #[arg(hide = true)]
    pub ignored: Vec<String>,
}

impl Cli {
    /// Parse arguments, silently dropping flags this binary does not know.
    ///
    /// The mock stands in for a real client that is launched with its own
    /// option set, so unrecognized flags must not abort startup. The dropped
    /// flags are returned so they can be logged once logging is up.
    pub fn parse_lenient<I, T>(args: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let filtered = drop_unknown_flags(args);
        (Self::parse_from(filtered.kept), filtered.dropped)
    }

    pub fn to_config(&self) -> MockConfig {
        MockConfig::default()
            .with_lock_path(&self.lock_file)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_cookie_on_stdin(self.cookie_on_stdin)
    }
}

#[derive(Debug, Default)]
struct FilteredArgs {
    kept: Vec<OsString>,
    dropped: Vec<String>,
}

/// Remove option tokens that no argument of [`Cli`] claims.
///
/// Short clusters are filtered letter by letter: `-cx` keeps `-c`. The token
/// right after a known value-taking option is always kept, so `--timeout -3`
/// still reaches the timeout parser. A value-taking option with nothing
/// after it is dropped and its default applies.
fn drop_unknown_flags<I, T>(args: I) -> FilteredArgs
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let cmd = Cli::command();
    let mut longs: Vec<(String, bool)> =
        vec![("help".to_string(), false), ("version".to_string(), false)];
    let mut shorts: Vec<(char, bool)> = vec![('h', false), ('V', false)];
    for arg in cmd.get_arguments() {
        let takes_value = arg.get_action().takes_values();
        if let Some(long) = arg.get_long() {
            longs.push((long.to_string(), takes_value));
        }
        if let Some(short) = arg.get_short() {
            shorts.push((short, takes_value));
        }
    }
    let short_takes_value =
        |c: char| shorts.iter().find(|(known, _)| *known == c).map(|(_, v)| *v);

    let mut filtered = FilteredArgs::default();
    let mut expect_value = false;
    let mut args = args.into_iter().map(Into::into);

    // Program name
    if let Some(argv0) = args.next() {
        filtered.kept.push(argv0);
    }

    for token in args {
        if expect_value {
            expect_value = false;
            filtered.kept.push(token);
            continue;
        }

        let Some(text) = token.to_str() else {
            filtered.kept.push(token);
            continue;
        };

        if text == "--" || text == "-" || !text.starts_with('-') {
            filtered.kept.push(token);
        } else if let Some(long) = text.strip_prefix("--") {
            let (name, inline_value) = match long.split_once('=') {
                Some((name, _)) => (name, true),
                None => (long, false),
            };
            match longs.iter().find(|(known, _)| known == name) {
                Some((_, takes_value)) => {
                    expect_value = *takes_value && !inline_value;
                    filtered.kept.push(token);
                }
                None => filtered.dropped.push(text.to_string()),
            }
        } else {
            let cluster = &text[1..];
            let mut switches = String::new();
            let mut valued: Option<String> = None;

            for (idx, c) in cluster.char_indices() {
                match short_takes_value(c) {
                    Some(false) => switches.push(c),
                    Some(true) => {
                        let rest = &cluster[idx + c.len_utf8()..];
                        if rest.is_empty() {
                            expect_value = true;
                            valued = Some(format!("-{c}"));
                        } else {
                            valued = Some(format!("-{c}{rest}"));
                        }
                        break;
                    }
                    None => filtered.dropped.push(format!("-{c}")),
                }
            }

            // Switches and the value-taking option stay separate tokens so a
            // dangling option can be dropped without losing the switches
            if !switches.is_empty() {
                filtered.kept.push(OsString::from(format!("-{switches}")));
            }
            if let Some(valued) = valued {
                filtered.kept.push(OsString::from(valued));
            }
        }
    }

    if expect_value {
        if let Some(dangling) = filtered.kept.pop() {
            filtered
                .dropped
                .push(dangling.to_string_lossy().into_owned());
        }
    }

    filtered
}

/// Parse a timeout the way `atoi` would: leading digits count, anything
/// else (including a negative number) yields 0.
fn parse_timeout(value: &str) -> Result<u64, String> {
    let digits: String = value
        .trim_start()
        .trim_start_matches('+')
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();

    Ok(digits.parse().unwrap_or(0))
}
