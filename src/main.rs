use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use terrace_core::config::page_size_from_env_value;
use terrace_core::draft::{Draft, ListField, PlaceField, SubmitError};
use terrace_core::map::{MapClick, MapReconciler, MarkerKey};
use terrace_core::pages::{BrowseSession, ProfileSession, SearchSession};
use terrace_core::routes::Route;
use terrace_core::store::{AuthGate, AuthStore, LoadingFlags};
use terrace_core::validation::Issue;
use terrace_core::{ClientConfig, ReqwestClient, TerraceApi};
use terrace_types::{Coordinates, PlaceId, UserId};

mod text_map;

use text_map::TextMap;

type Api = TerraceApi<ReqwestClient>;

#[derive(Parser)]
#[command(name = "terrace")]
#[command(about = "Terrace map client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a client route, e.g. "/?listId=4" or "/user/abc"
    Open {
        route: String,
    },
    /// Show a list on the map, optionally with one place selected
    Show {
        /// Raw listId value
        #[arg(long)]
        list_id: Option<String>,
        /// Place to select
        #[arg(long)]
        place: Option<u64>,
    },
    /// Search lists by name
    Search {
        term: String,
    },
    /// Show the signed-in user
    Whoami,
    /// Build a list from a JSON file and submit it
    AddList {
        file: PathBuf,
    },
}

/// A list as written by hand for `add-list`.
#[derive(Debug, Deserialize)]
struct ListFile {
    name: String,
    description: String,
    #[serde(default)]
    thumbnail: String,
    places: Vec<PlaceFile>,
}

#[derive(Debug, Deserialize)]
struct PlaceFile {
    lat: f64,
    lon: f64,
    name: String,
    description: String,
    #[serde(default)]
    thumbnail: String,
    #[serde(default)]
    banner: String,
}

/// Main entry point for the Terrace client
///
/// # Environment Variables
/// - `TERRACE_API_URL`: API base URL (default: "http://localhost:4000")
/// - `TERRACE_SESSION_COOKIE`: session cookie sent with credentialed requests
/// - `TERRACE_PAGE_SIZE`: lists per page on user pages (default: 10)
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("terrace=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'terrace --help' for commands");
        return Ok(());
    };

    let api_url =
        std::env::var("TERRACE_API_URL").unwrap_or_else(|_| "http://localhost:4000".into());
    let page_size = page_size_from_env_value(std::env::var("TERRACE_PAGE_SIZE").ok())?;
    let cfg = ClientConfig::new(
        &api_url,
        std::env::var("TERRACE_SESSION_COOKIE").ok(),
        page_size,
    )?;
    tracing::debug!("using {:?}", cfg);

    let api = TerraceApi::new(ReqwestClient::new(cfg.clone()));
    let loading = LoadingFlags::new();

    match command {
        Commands::Open { route } => open(&api, &loading, &cfg, Route::parse(&route)?).await,
        Commands::Show { list_id, place } => {
            show(&api, &loading, list_id.as_deref(), place.map(PlaceId)).await
        }
        Commands::Search { term } => search(&api, &loading, &term).await,
        Commands::Whoami => whoami(&api).await,
        Commands::AddList { file } => add_list(&api, &loading, &file).await,
    }
}

async fn open(
    api: &Api,
    loading: &LoadingFlags,
    cfg: &ClientConfig,
    route: Route,
) -> anyhow::Result<()> {
    tracing::info!("opening {}", route);
    match route {
        Route::Index { list_id } => show(api, loading, list_id.as_deref(), None).await,
        Route::User { user_id } => profile(api, loading, cfg, &user_id).await,
        Route::AddList => {
            let mut auth = AuthStore::new();
            auth.refresh(api).await;
            match auth.gate() {
                AuthGate::Allowed(user) => {
                    println!("Signed in as {}; use 'terrace add-list <file>'", user.name)
                }
                AuthGate::Denied | AuthGate::Pending => println!("Not authenticated"),
            }
            Ok(())
        }
        Route::SignIn => {
            let mut auth = AuthStore::new();
            auth.refresh(api).await;
            match Route::SignIn.resolve_for(auth.user().is_some()) {
                Route::SignIn => {
                    println!("Sign in through the web app, then set TERRACE_SESSION_COOKIE");
                    Ok(())
                }
                target => {
                    println!("Already signed in; opening {target}");
                    show(api, loading, None, None).await
                }
            }
        }
        Route::NotFound => bail!("page not found"),
    }
}

async fn show(
    api: &Api,
    loading: &LoadingFlags,
    list_param: Option<&str>,
    place: Option<PlaceId>,
) -> anyhow::Result<()> {
    let mut session = BrowseSession::new(loading.clone());
    session.load(api, list_param).await;
    if let Some(e) = session.list_error() {
        bail!("could not load list: {e}");
    }

    if let Some(place_id) = place {
        let mut map = MapReconciler::new(TextMap::new());
        map.render(session.viewport(), session.markers());
        let action = map
            .click(MapClick::Marker(MarkerKey::Place(place_id)))
            .ok_or_else(|| anyhow!("place {place_id} is not on this list"))?;
        if let Some(ticket) = session.handle_map_action(action) {
            let (list_id, place_id) = *ticket.key();
            let result = api.fetch_place(Some(place_id), Some(list_id)).await;
            session.complete_place(ticket, result);
        }
    }

    match session.list() {
        Some(list) => {
            println!("{}", list.name);
            println!("{}", list.description);
            if let Some(creator) = session.creator() {
                println!("by {} ({})", creator.name, Route::User { user_id: creator.id.clone() });
            }
        }
        None => println!("No list selected"),
    }

    let mut map = MapReconciler::new(TextMap::new());
    map.render(session.viewport(), session.markers());
    for line in map.widget().lines() {
        println!("{line}");
    }

    if let Some(e) = session.detail_error() {
        bail!("could not load place: {e}");
    }
    if let Some(detail) = session.detail() {
        println!();
        println!("{} ({})", detail.name, detail.coordinates());
        println!("{}", detail.description);
        for image in [&detail.thumbnail, &detail.banner].into_iter().flatten() {
            println!("  {image}");
        }
    }
    Ok(())
}

async fn profile(
    api: &Api,
    loading: &LoadingFlags,
    cfg: &ClientConfig,
    user_id: &UserId,
) -> anyhow::Result<()> {
    let mut session = ProfileSession::new(loading.clone(), cfg.page_size());
    if !session.load(api, user_id).await? {
        println!("No such user; opening {}", Route::index(None));
        return show(api, loading, None, None).await;
    }
    while session.has_more() {
        if session.load_more(api).await? == 0 {
            break;
        }
    }

    if let Some(user) = session.user() {
        println!("{} (joined {})", user.name, user.created_at.format("%Y-%m-%d"));
    }
    for list in session.lists() {
        println!("  {} {}", Route::index(Some(list.id)), list.name);
    }
    Ok(())
}

async fn search(api: &Api, loading: &LoadingFlags, term: &str) -> anyhow::Result<()> {
    let mut session = SearchSession::new(loading.clone());
    let results = session.search(api, term).await?;
    if results.is_empty() {
        println!("No lists found");
    }
    for list in results {
        println!("  {} {}", Route::index(Some(list.id)), list.name);
    }
    Ok(())
}

async fn whoami(api: &Api) -> anyhow::Result<()> {
    let mut auth = AuthStore::new();
    auth.refresh(api).await;
    match auth.user() {
        Some(user) => println!("{} ({})", user.name, user.id),
        None => println!("Not signed in"),
    }
    Ok(())
}

async fn add_list(api: &Api, loading: &LoadingFlags, file: &Path) -> anyhow::Result<()> {
    let mut auth = AuthStore::new();
    auth.refresh(api).await;
    if !matches!(auth.gate(), AuthGate::Allowed(_)) {
        bail!("not authenticated");
    }

    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let input: ListFile =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", file.display()))?;

    let mut draft = Draft::new();
    let mut map = MapReconciler::new(TextMap::new());
    map.render(draft.viewport(), draft.markers());

    draft.edit_meta_field(ListField::Name, input.name);
    draft.edit_meta_field(ListField::Description, input.description);
    draft.edit_meta_field(ListField::Thumbnail, input.thumbnail);

    for (i, place) in input.places.into_iter().enumerate() {
        let at = Coordinates::new(place.lat, place.lon)
            .with_context(|| format!("place {i} has bad coordinates"))?;
        if let Some(action) = map.click(MapClick::Background(at)) {
            draft.handle_map_action(action)?;
        }
        draft.edit_pending_field(PlaceField::Name, place.name)?;
        draft.edit_pending_field(PlaceField::Description, place.description)?;
        draft.edit_pending_field(PlaceField::Thumbnail, place.thumbnail)?;
        draft.edit_pending_field(PlaceField::Banner, place.banner)?;
        map.render(draft.viewport(), draft.markers());

        if draft.accept_pending().is_err() {
            print_issues(draft.issues());
            bail!("place {i} is invalid");
        }
        map.render(draft.viewport(), draft.markers());
    }

    for line in map.widget().lines() {
        println!("{line}");
    }

    match draft.submit(api, loading).await {
        Ok(id) => {
            println!("Created {}", Route::index(Some(id)));
            Ok(())
        }
        Err(SubmitError::Validation(issues) | SubmitError::ServerValidation(issues)) => {
            print_issues(&issues);
            bail!("list was rejected")
        }
        Err(SubmitError::Request(e)) => Err(e.into()),
    }
}

fn print_issues(issues: &[Issue]) {
    for issue in issues {
        eprintln!("  {issue}");
    }
}
