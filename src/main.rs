//! vitrine - render a project detail page headlessly
//!
//! Usage: `vitrine <detail-page-url>`
//!
//! Resolves the project, loads its documentation and screenshots from the
//! configured asset root and prints the resulting page view as JSON.

use std::env;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vitrine::catalog::ProjectRepository;
use vitrine::config::{AssetRoot, Config};
use vitrine::docs::{DocumentLoader, Fetcher, FsFetcher, HttpFetcher};
use vitrine::i18n::{FileLocaleStore, Locale, LocaleService, LocaleStore, MemoryLocaleStore};
use vitrine::page::{Capabilities, DetailPage};
use vitrine::routing::ProjectIdResolver;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vitrine=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let url = env::args()
        .nth(1)
        .context("usage: vitrine <detail-page-url>")?;

    let config = Config::from_env();
    info!("Configuration loaded, asset root: {:?}", config.asset_root);

    let store: Box<dyn LocaleStore> = match &config.locale_file {
        Some(path) => Box::new(FileLocaleStore::new(path.clone())),
        None => Box::new(MemoryLocaleStore::default()),
    };
    let i18n = match &config.locale_dir {
        Some(dir) => LocaleService::with_bundle_dir(store, dir.clone()),
        None => LocaleService::new(store),
    };
    let detected = Locale::detect(env::var("LANG").ok().as_deref());
    i18n.init(detected);
    if let Some(locale) = config.locale {
        i18n.use_for_session(locale);
    }

    let fetcher: Arc<dyn Fetcher> = match &config.asset_root {
        AssetRoot::Http(base) => Arc::new(HttpFetcher::new(base.clone())),
        AssetRoot::Dir(dir) => Arc::new(FsFetcher::new(dir.clone())),
    };

    let repository = ProjectRepository::builtin().context("embedded project catalog is invalid")?;
    info!("Catalog ready with {} projects", repository.len());

    let mut page = DetailPage::new(
        i18n,
        Arc::new(repository),
        ProjectIdResolver::new(config.page_name.clone()),
        DocumentLoader::new(fetcher.clone(), config.doc_cache.clone()),
        Capabilities::headless(fetcher),
        config.lazy_margin,
    );

    page.init(&url).await;

    let view = serde_json::to_string_pretty(&page.snapshot())?;
    println!("{}", view);

    Ok(())
}
