use anyhow::Context;
use author_catalog::config::Config;
use author_catalog::notify::LogNotifier;
use author_catalog::rest::RestGateway;
use author_catalog::store::AuthorStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let gateway = RestGateway::new(config.base_url());
    let store = AuthorStore::new(gateway, LogNotifier);

    store
        .refresh()
        .await
        .context("Failed to fetch the author catalog")?;
    for author in store.authors() {
        println!("{author}");
    }

    Ok(())
}
