//! Command execution.
//!
//! Every command loads the workbench, performs one operation through it and
//! writes a plain-text or JSON result to `out`. Diagnostics go to the log.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use relay_application::{Clock, DispatchError, Dispatcher, EditOutcome, StateStorage, Workbench};
use relay_domain::{AuthConfig, QueryParams, RequestPatch, SavedRequest, TabId};
use relay_infrastructure::{
    AppConfig, FileStateStorage, MemoryStateStorage, ReqwestHttpClient, SystemClock, load_config,
    to_json_stable,
};
use tracing::debug;

use crate::cli::{
    Cli, CollectionCommand, Command, EditArgs, FolderCommand, ParamsAction, RequestCommand,
    TabCommand,
};

/// Resolves configuration and storage, then executes the command.
///
/// # Errors
///
/// Returns an error if configuration or state cannot be loaded, or if the
/// command itself fails.
pub async fn run<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    let mut settings = load_config(cli.config.as_deref()).context("loading configuration")?;
    if let Some(dir) = cli.data_dir {
        settings.data_dir = Some(dir);
    }

    if cli.ephemeral {
        let mut bench = Workbench::load(MemoryStateStorage::new(), SystemClock::new())?;
        return execute(cli.command, &mut bench, &settings, out).await;
    }

    let dir = settings.resolved_data_dir();
    debug!(dir = %dir.display(), "using data directory");
    let mut bench = Workbench::load(FileStateStorage::new(&dir), SystemClock::new())
        .with_context(|| format!("loading state from {}", dir.display()))?;
    execute(cli.command, &mut bench, &settings, out).await
}

/// Executes one command against a loaded workbench.
///
/// # Errors
///
/// Returns an error for unknown ids, refused sends and storage failures.
pub async fn execute<S, C, W>(
    command: Command,
    bench: &mut Workbench<S, C>,
    settings: &AppConfig,
    out: &mut W,
) -> Result<()>
where
    S: StateStorage + Clone,
    C: Clock,
    W: Write,
{
    match command {
        Command::Collection(cmd) => collection(cmd, bench, out),
        Command::Folder(cmd) => folder(cmd, bench, out),
        Command::Request(cmd) => request(cmd, bench, out),
        Command::Tab(cmd) => tab(cmd, bench, out),
        Command::Edit(args) => edit(&args, bench, out),
        Command::Params(args) => params(args.action, bench, out),
        Command::Send => send(bench, settings, out).await,
    }
}

fn collection<S, C, W>(
    cmd: CollectionCommand,
    bench: &mut Workbench<S, C>,
    out: &mut W,
) -> Result<()>
where
    S: StateStorage + Clone,
    C: Clock,
    W: Write,
{
    match cmd {
        CollectionCommand::Add { name } => {
            let id = bench.add_collection(name)?;
            writeln!(out, "{id}")?;
        }
        CollectionCommand::List => {
            for collection in bench.collections() {
                writeln!(out, "{}  {}", collection.id, collection.name)?;
                for folder in &collection.folders {
                    writeln!(out, "  {}  {}", folder.id, folder.name)?;
                    for request in &folder.requests {
                        let method = request.method.as_str();
                        writeln!(out, "    {}  {method:<6} {}", request.id, request.name)?;
                    }
                }
            }
        }
        CollectionCommand::Delete { collection } => {
            if !bench.delete_collection(&collection)? {
                bail!("collection not found: {collection}");
            }
        }
    }
    Ok(())
}

fn folder<S, C, W>(cmd: FolderCommand, bench: &mut Workbench<S, C>, out: &mut W) -> Result<()>
where
    S: StateStorage + Clone,
    C: Clock,
    W: Write,
{
    match cmd {
        FolderCommand::Add { collection, name } => {
            let id = bench
                .add_folder(&collection, name)?
                .ok_or_else(|| anyhow!("collection not found: {collection}"))?;
            writeln!(out, "{id}")?;
        }
        FolderCommand::Delete { collection, folder } => {
            if !bench.delete_folder(&collection, &folder)? {
                bail!("folder not found: {collection}/{folder}");
            }
        }
    }
    Ok(())
}

fn request<S, C, W>(cmd: RequestCommand, bench: &mut Workbench<S, C>, out: &mut W) -> Result<()>
where
    S: StateStorage + Clone,
    C: Clock,
    W: Write,
{
    match cmd {
        RequestCommand::Add {
            collection,
            folder,
            name,
            method,
        } => {
            let id = bench
                .add_request(&collection, &folder, method, name)?
                .ok_or_else(|| anyhow!("folder not found: {collection}/{folder}"))?;
            writeln!(out, "{id}")?;
        }
        RequestCommand::Delete {
            collection,
            folder,
            request,
        } => {
            if !bench.delete_request(&collection, &folder, &request)? {
                bail!("request not found: {collection}/{folder}/{request}");
            }
        }
        RequestCommand::Show {
            collection,
            folder,
            request,
        } => {
            let request = bench.entities().get_request(&collection, &folder, &request)?;
            write!(out, "{}", to_json_stable(request)?)?;
        }
    }
    Ok(())
}

fn tab<S, C, W>(cmd: TabCommand, bench: &mut Workbench<S, C>, out: &mut W) -> Result<()>
where
    S: StateStorage + Clone,
    C: Clock,
    W: Write,
{
    match cmd {
        TabCommand::Open {
            collection,
            folder,
            request,
        } => {
            let id = bench
                .open_request(&collection, &folder, &request)?
                .ok_or_else(|| anyhow!("cannot open {collection}/{folder}/{request}: not found"))?;
            writeln!(out, "{id}")?;
        }
        TabCommand::Close { tab } => {
            if !bench.close_tab(&TabId::from(tab.as_str()))? {
                bail!("tab not open: {tab}");
            }
        }
        TabCommand::CloseAll => bench.close_all_tabs()?,
        TabCommand::Activate { tab } => bench.set_active_tab(Some(TabId::from(tab)))?,
        TabCommand::Deactivate => bench.set_active_tab(None)?,
        TabCommand::List => {
            let active = bench.tabs().active_tab();
            for tab in bench.tabs().open_tabs() {
                let marker = if active == Some(&tab.tab_id) { '*' } else { ' ' };
                writeln!(
                    out,
                    "{marker} {}  {:<6} {}",
                    tab.tab_id, tab.request.method.as_str(), tab.request.name
                )?;
            }
        }
        TabCommand::Show => {
            let tab = bench.active_tab().ok_or_else(no_active_tab)?;
            write!(out, "{}", to_json_stable(tab)?)?;
        }
    }
    Ok(())
}

fn edit<S, C, W>(args: &EditArgs, bench: &mut Workbench<S, C>, out: &mut W) -> Result<()>
where
    S: StateStorage + Clone,
    C: Clock,
    W: Write,
{
    let current = bench.active_snapshot().ok_or_else(no_active_tab)?;
    let patch = build_patch(args, &current)?;
    if patch.is_empty() {
        bail!("nothing to edit");
    }
    let outcome = bench.apply_edit_to_active(&patch)?.unwrap_or_default();
    writeln!(out, "{}", describe_outcome(outcome))?;
    Ok(())
}

fn params<S, C, W>(
    action: Option<ParamsAction>,
    bench: &mut Workbench<S, C>,
    out: &mut W,
) -> Result<()>
where
    S: StateStorage + Clone,
    C: Clock,
    W: Write,
{
    let rows = match action {
        None => {
            let params = bench.active_query_params().ok_or_else(no_active_tab)?;
            for param in params.all() {
                let flag = if param.enabled { "" } else { "!" };
                writeln!(out, "{flag}{}={}", param.key, param.value)?;
            }
            return Ok(());
        }
        Some(ParamsAction::Set { rows }) => rows.into_iter().collect(),
        Some(ParamsAction::Clear) => QueryParams::new(),
    };
    let outcome = bench
        .edit_active_query_params(&rows)?
        .ok_or_else(no_active_tab)?;
    writeln!(out, "{}", describe_outcome(outcome))?;
    Ok(())
}

async fn send<S, C, W>(bench: &Workbench<S, C>, settings: &AppConfig, out: &mut W) -> Result<()>
where
    S: StateStorage + Clone,
    C: Clock,
    W: Write,
{
    let client = ReqwestHttpClient::with_user_agent(&settings.user_agent)?;
    let dispatcher = Dispatcher::new(Arc::new(client)).with_timeout_ms(settings.request_timeout_ms);
    match bench.send_active(&dispatcher).await {
        Ok(descriptor) => {
            write!(out, "{}", to_json_stable(&descriptor)?)?;
            Ok(())
        }
        Err(error @ (DispatchError::EmptyUrl | DispatchError::MalformedBody(_))) => {
            Err(anyhow!(error).context("request not sent"))
        }
        Err(DispatchError::NoActiveTab) => Err(no_active_tab()),
    }
}

/// Builds the patch an edit command describes, relative to the current
/// working snapshot.
///
/// # Errors
///
/// Returns an error for malformed `--basic` or `--api-key` values.
pub fn build_patch(args: &EditArgs, current: &SavedRequest) -> Result<RequestPatch> {
    let mut patch = RequestPatch::new();
    if let Some(name) = &args.name {
        patch = patch.with_name(name);
    }
    if let Some(method) = args.method {
        patch = patch.with_method(method);
    }
    if let Some(url) = &args.url {
        patch = patch.with_url(url);
    }
    if let Some(body) = &args.body {
        patch = patch.with_body(body);
    } else if args.no_body {
        patch = patch.without_body();
    }

    if !args.headers.is_empty() || !args.remove_headers.is_empty() {
        let mut headers = current.headers.clone();
        headers.retain(|h| !args.remove_headers.iter().any(|name| h.is_named(name)));
        for header in &args.headers {
            match headers.iter_mut().find(|h| h.is_named(&header.key)) {
                Some(existing) => *existing = header.clone(),
                None => headers.push(header.clone()),
            }
        }
        patch = patch.with_headers(headers);
    }

    if let Some(auth) = auth_from_args(args)? {
        patch = patch.with_auth(auth);
    }
    Ok(patch)
}

fn auth_from_args(args: &EditArgs) -> Result<Option<AuthConfig>> {
    if let Some(token) = &args.bearer {
        return Ok(Some(AuthConfig::bearer(token)));
    }
    if let Some(pair) = &args.basic {
        let (user, pass) = pair
            .split_once(':')
            .ok_or_else(|| anyhow!("--basic expects USER:PASS"))?;
        return Ok(Some(AuthConfig::basic(user, pass)));
    }
    if let Some(spec) = &args.api_key {
        let (pair, in_query) = spec
            .strip_suffix("@query")
            .map_or((spec.as_str(), false), |pair| (pair, true));
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("--api-key expects KEY=VALUE[@query]"))?;
        return Ok(Some(if in_query {
            AuthConfig::api_key_query(key, value)
        } else {
            AuthConfig::api_key_header(key, value)
        }));
    }
    if let Some(token) = &args.oauth2 {
        return Ok(Some(AuthConfig::oauth2(token)));
    }
    Ok(args.no_auth.then_some(AuthConfig::None))
}

const fn describe_outcome(outcome: EditOutcome) -> &'static str {
    match (outcome.store_changed, outcome.tab_changed) {
        (true, true) => "updated",
        (false, true) => "updated tab only (stored request no longer exists)",
        (true, false) => "updated stored request only",
        (false, false) => "no changes",
    }
}

fn no_active_tab() -> anyhow::Error {
    anyhow!("no active tab; open one with `relay tab open`")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use relay_domain::{Header, HttpMethod};

    fn current() -> SavedRequest {
        SavedRequest::new("r".into(), "r", HttpMethod::Get, SystemClock::new().now())
    }

    #[test]
    fn test_headers_merge_by_name() {
        let args = EditArgs {
            headers: vec![
                Header::new("content-type", "text/plain"),
                Header::new("Accept", "*/*"),
            ],
            ..EditArgs::default()
        };
        let patch = build_patch(&args, &current()).unwrap();
        assert_eq!(
            patch.headers.unwrap(),
            vec![
                Header::new("content-type", "text/plain"),
                Header::new("Accept", "*/*")
            ]
        );
    }

    #[test]
    fn test_remove_header() {
        let args = EditArgs {
            remove_headers: vec!["CONTENT-TYPE".into()],
            ..EditArgs::default()
        };
        let patch = build_patch(&args, &current()).unwrap();
        assert_eq!(patch.headers, Some(Vec::new()));
    }

    #[test]
    fn test_auth_flags() {
        let args = EditArgs {
            api_key: Some("api_key=s3cr3t@query".into()),
            ..EditArgs::default()
        };
        assert_eq!(
            build_patch(&args, &current()).unwrap().auth,
            Some(AuthConfig::api_key_query("api_key", "s3cr3t"))
        );

        let args = EditArgs {
            basic: Some("ada:lovelace".into()),
            ..EditArgs::default()
        };
        assert_eq!(
            build_patch(&args, &current()).unwrap().auth,
            Some(AuthConfig::basic("ada", "lovelace"))
        );

        let args = EditArgs {
            basic: Some("no-separator".into()),
            ..EditArgs::default()
        };
        assert!(build_patch(&args, &current()).is_err());

        let args = EditArgs {
            no_auth: true,
            ..EditArgs::default()
        };
        assert_eq!(build_patch(&args, &current()).unwrap().auth, Some(AuthConfig::None));
    }

    #[test]
    fn test_empty_args_give_empty_patch() {
        assert!(build_patch(&EditArgs::default(), &current()).unwrap().is_empty());
    }
}
