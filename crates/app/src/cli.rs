//! Command-line interface definition.
//!
//! - `relay collection|folder|request ...` manage the collection tree
//! - `relay tab ...` opens, closes and focuses editing tabs
//! - `relay edit`, `relay params` change the active tab
//! - `relay send` dispatches the active tab

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use relay_domain::{Header, HttpMethod, QueryParam};

/// Relay - a lightweight REST API client
#[derive(Parser, Debug)]
#[command(name = "relay", version, about = "A lightweight REST API client")]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the state files
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Configuration file (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Keep state in memory only; nothing is read or written
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Manage collections
    #[command(subcommand)]
    Collection(CollectionCommand),

    /// Manage folders inside a collection
    #[command(subcommand)]
    Folder(FolderCommand),

    /// Manage stored requests
    #[command(subcommand)]
    Request(RequestCommand),

    /// Open, close and focus editing tabs
    #[command(subcommand)]
    Tab(TabCommand),

    /// Edit the active tab; changes reach the stored request too
    Edit(EditArgs),

    /// Show or rewrite the active tab's query parameters
    Params(ParamsArgs),

    /// Send the active tab and print the response descriptor
    Send,
}

/// Collection subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum CollectionCommand {
    /// Create a collection and print its id
    Add {
        /// Collection name
        name: String,
    },
    /// Print the whole tree
    List,
    /// Delete a collection with everything in it
    Delete {
        /// Collection id
        collection: String,
    },
}

/// Folder subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum FolderCommand {
    /// Create a folder and print its id
    Add {
        /// Collection id
        collection: String,
        /// Folder name
        name: String,
    },
    /// Delete a folder with its requests
    Delete {
        /// Collection id
        collection: String,
        /// Folder id
        folder: String,
    },
}

/// Request subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum RequestCommand {
    /// Create a request and print its id
    Add {
        /// Collection id
        collection: String,
        /// Folder id
        folder: String,
        /// Request name
        name: String,
        /// HTTP method
        #[arg(short = 'X', long, default_value = "GET")]
        method: HttpMethod,
    },
    /// Delete a request
    Delete {
        /// Collection id
        collection: String,
        /// Folder id
        folder: String,
        /// Request id
        request: String,
    },
    /// Print the stored request as JSON
    Show {
        /// Collection id
        collection: String,
        /// Folder id
        folder: String,
        /// Request id
        request: String,
    },
}

/// Tab subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum TabCommand {
    /// Open a stored request (or focus its tab) and print the tab id
    Open {
        /// Collection id
        collection: String,
        /// Folder id
        folder: String,
        /// Request id
        request: String,
    },
    /// Close a tab
    Close {
        /// Tab id
        tab: String,
    },
    /// Close every tab
    CloseAll,
    /// Make a tab active
    Activate {
        /// Tab id
        tab: String,
    },
    /// Clear the active tab
    Deactivate,
    /// List open tabs; the active one is marked with `*`
    List,
    /// Print the active tab as JSON
    Show,
}

/// Arguments for the edit command
#[derive(Args, Debug, Clone, Default)]
pub struct EditArgs {
    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New HTTP method
    #[arg(short = 'X', long)]
    pub method: Option<HttpMethod>,

    /// New url, query string included
    #[arg(long)]
    pub url: Option<String>,

    /// New body text
    #[arg(long, conflicts_with = "no_body")]
    pub body: Option<String>,

    /// Remove the body
    #[arg(long)]
    pub no_body: bool,

    /// Set a header (`Key: Value`); replaces a header with the same name
    #[arg(short = 'H', long = "header", value_name = "KEY:VALUE", value_parser = parse_header)]
    pub headers: Vec<Header>,

    /// Remove headers by name
    #[arg(long = "remove-header", value_name = "KEY")]
    pub remove_headers: Vec<String>,

    /// Use bearer token auth
    #[arg(long, group = "auth", value_name = "TOKEN")]
    pub bearer: Option<String>,

    /// Use basic auth
    #[arg(long, group = "auth", value_name = "USER:PASS")]
    pub basic: Option<String>,

    /// Use an API key, sent as a header or with `@query` as a query pair
    #[arg(long, group = "auth", value_name = "KEY=VALUE[@query]")]
    pub api_key: Option<String>,

    /// Use an `OAuth2` access token
    #[arg(long, group = "auth", value_name = "TOKEN")]
    pub oauth2: Option<String>,

    /// Remove auth
    #[arg(long, group = "auth")]
    pub no_auth: bool,
}

/// Arguments for the params command
#[derive(Args, Debug, Clone)]
pub struct ParamsArgs {
    /// Optional action; prints the params when omitted
    #[command(subcommand)]
    pub action: Option<ParamsAction>,
}

/// Params subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ParamsAction {
    /// Replace the query string with these rows (`key=value`, `!key=value` disabled)
    Set {
        /// Parameter rows
        #[arg(value_name = "ROW", value_parser = parse_param)]
        rows: Vec<QueryParam>,
    },
    /// Remove the query string
    Clear,
}

fn parse_header(s: &str) -> Result<Header, String> {
    Header::parse_line(s).map_err(|e| e.to_string())
}

fn parse_param(s: &str) -> Result<QueryParam, String> {
    QueryParam::parse_row(s).map_err(|e| e.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("relay").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_global_flags_anywhere() {
        let cli = parse(&["collection", "list", "--data-dir", "/tmp/x", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        assert!(matches!(cli.command, Command::Collection(CollectionCommand::List)));
    }

    #[test]
    fn test_request_add_method() {
        let cli = parse(&["request", "add", "c", "f", "Create", "-X", "post"]);
        let Command::Request(RequestCommand::Add { method, name, .. }) = cli.command else {
            panic!("unexpected command");
        };
        assert_eq!(method, HttpMethod::Post);
        assert_eq!(name, "Create");
    }

    #[test]
    fn test_edit_args() {
        let cli = parse(&[
            "edit",
            "--url",
            "https://api.test",
            "-H",
            "Accept: text/plain",
            "--bearer",
            "tok",
        ]);
        let Command::Edit(args) = cli.command else {
            panic!("unexpected command");
        };
        assert_eq!(args.url.as_deref(), Some("https://api.test"));
        assert_eq!(args.headers, vec![Header::new("Accept", "text/plain")]);
        assert_eq!(args.bearer.as_deref(), Some("tok"));
    }

    #[test]
    fn test_conflicting_flags_are_rejected() {
        let base = ["relay", "edit", "--bearer", "a", "--no-auth"];
        assert!(Cli::try_parse_from(base).is_err());
        assert!(Cli::try_parse_from(["relay", "edit", "--body", "{}", "--no-body"]).is_err());
        assert!(Cli::try_parse_from(["relay", "edit", "-H", "broken"]).is_err());
        let trace = ["relay", "request", "add", "c", "f", "n", "-X", "TRACE"];
        assert!(Cli::try_parse_from(trace).is_err());
    }

    #[test]
    fn test_params_set_rows() {
        let cli = parse(&["params", "set", "page=2", "!debug=true"]);
        let Command::Params(ParamsArgs {
            action: Some(ParamsAction::Set { rows }),
        }) = cli.command
        else {
            panic!("unexpected command");
        };
        assert_eq!(
            rows,
            vec![QueryParam::new("page", "2"), QueryParam::disabled("debug", "true")]
        );
    }

    #[test]
    fn test_params_without_action() {
        let cli = parse(&["params"]);
        assert!(matches!(cli.command, Command::Params(ParamsArgs { action: None })));
    }
}
