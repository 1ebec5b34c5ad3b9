// SPDX-License-Identifier: GPL-3.0-only

//! Command-line interface of the `juno` binary.
//!
//! Without a subcommand `juno` starts the widget. With one it acts as a
//! remote for an already running widget and talks to it over D-Bus, which is
//! how a desktop keyboard shortcut reaches the widget:
//!
//! ```bash
//! juno toggle-expand
//! juno theme midnight
//! ```

use clap::{Parser, Subcommand};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::dbus::{DbusClientBlocking, DbusResult};

/// Filter directive used when neither `--log-level` nor `RUST_LOG` says otherwise.
pub const DEFAULT_LOG_DIRECTIVE: &str = "juno=info";

/// Juno, a floating sticky-notes widget.
#[derive(Parser, Debug)]
#[command(name = "juno", version, about)]
pub struct Args {
    /// Log level override (a tracing directive such as `juno=debug`).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Control a running widget instead of starting one.
    #[command(subcommand)]
    pub command: Option<Remote>,
}

/// Remote commands sent to a running widget.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Remote {
    /// Expand the ball or collapse the panel.
    ToggleExpand,
    /// Show the widget.
    Show,
    /// Hide the widget.
    Hide,
    /// Show the widget if hidden, hide it otherwise.
    ToggleVisibility,
    /// Snap the ball to the nearest screen edge.
    Snap,
    /// Select a theme (light, dark, midnight, nebula).
    Theme { name: String },
    /// Quit the widget.
    Quit,
}

impl Remote {
    /// Runs the command against the widget's D-Bus service.
    ///
    /// Returns a short human-readable result.
    pub fn run(&self, client: &DbusClientBlocking) -> DbusResult<String> {
        Ok(match self {
            Remote::ToggleExpand => {
                if client.toggle_expand()? {
                    "expanded".to_string()
                } else {
                    "collapsed".to_string()
                }
            }
            Remote::Show => visibility(client.show()?),
            Remote::Hide => visibility(client.hide()?),
            Remote::ToggleVisibility => visibility(client.toggle_visibility()?),
            Remote::Snap => {
                let (x, y, edge) = client.snap_to_edge()?;
                if edge.is_empty() {
                    format!("not snapped, at ({x}, {y})")
                } else {
                    format!("{edge} at ({x}, {y})")
                }
            }
            Remote::Theme { name } => client.set_theme(name)?,
            Remote::Quit => {
                client.quit()?;
                "quit".to_string()
            }
        })
    }
}

fn visibility(visible: bool) -> String {
    if visible { "visible" } else { "hidden" }.to_string()
}

/// Juno panel applet.
#[derive(Parser, Debug)]
#[command(name = "juno-applet", version, about)]
pub struct AppletArgs {
    /// Log level override (a tracing directive such as `juno=debug`).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

pub fn parse_applet() -> AppletArgs {
    AppletArgs::parse()
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` is honoured; `log_level` (or [`DEFAULT_LOG_DIRECTIVE`]) is
/// added on top of it.
pub fn init_tracing(log_level: Option<&str>) {
    let directive = log_level
        .unwrap_or(DEFAULT_LOG_DIRECTIVE)
        .parse::<Directive>()
        .or_else(|_| DEFAULT_LOG_DIRECTIVE.parse::<Directive>());

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = directive {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: no arguments starts the widget.
    #[test]
    fn test_no_subcommand() {
        let args = Args::try_parse_from(["juno"]).unwrap();
        assert_eq!(args.command, None);
        assert_eq!(args.log_level, None);
    }

    /// Test: remote subcommands and the global log level parse.
    #[test]
    fn test_remote_subcommands() {
        let args = Args::try_parse_from(["juno", "toggle-expand", "--log-level", "juno=debug"])
            .unwrap();
        assert_eq!(args.command, Some(Remote::ToggleExpand));
        assert_eq!(args.log_level.as_deref(), Some("juno=debug"));

        let args = Args::try_parse_from(["juno", "theme", "nebula"]).unwrap();
        assert_eq!(
            args.command,
            Some(Remote::Theme {
                name: "nebula".to_string()
            })
        );

        let args = Args::try_parse_from(["juno", "toggle-visibility"]).unwrap();
        assert_eq!(args.command, Some(Remote::ToggleVisibility));
    }

    /// Test: unknown subcommands are rejected.
    #[test]
    fn test_unknown_subcommand() {
        assert!(Args::try_parse_from(["juno", "explode"]).is_err());
    }

    /// Test: the default directive is valid.
    #[test]
    fn test_default_directive_parses() {
        assert!(DEFAULT_LOG_DIRECTIVE.parse::<Directive>().is_ok());
    }
}
