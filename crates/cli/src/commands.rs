// FILE: crates/cli/src/commands.rs

use anyhow::{bail, Context, Result};
use console::style;
use std::sync::Arc;
use std::time::Duration;
use storyreel_cache::{DiskImageCache, ImagePrefetcher};
use storyreel_config::{CacheConfig, Config, ConfigManager, NetworkConfig};
use storyreel_core::{StoryCollection, StorySource};
use storyreel_engine::{
    RequestState, Session, SessionHandle, StoryFeature, StoryListAction, StoryListFeature,
    StoryListState,
};
use storyreel_network::{Client, ClientConfig, FileStorySource, HttpStorySource, RetryPolicy};

/// List the collections offered by the source
pub async fn list_collections(config: &Config, source: Option<&str>) -> Result<()> {
    let source = build_source(config, source)?;
    let state = load_story_list(source).await?;
    let collections = loaded_collections(&state)?;

    if collections.is_empty() {
        println!("No story collections available.");
        return Ok(());
    }

    println!(
        "\n{} Story Collections",
        style(collections.len()).bold().cyan()
    );
    println!("{}", "=".repeat(60));

    for (position, collection) in collections.iter().enumerate() {
        print_collection_summary(position + 1, collection);
    }

    Ok(())
}

/// Play collection `number` (1-based) starting at story `start`
pub async fn play_collection(
    config: &Config,
    manager: &ConfigManager,
    source: Option<&str>,
    number: usize,
    start: usize,
) -> Result<()> {
    let source = build_source(config, source)?;
    let (collection, feature) = open_collection(source, number).await?;

    if collection.is_empty() {
        bail!("Collection '{}' has no stories", collection.display_name);
    }

    let feature = feature
        .with_segment_duration(config.playback.segment_duration())
        .with_resume_skip_threshold(config.playback.resume_skip_threshold());

    println!(
        "\n{} {}",
        style("▶").green().bold(),
        style(&collection.display_name).bold()
    );

    let likes = manager.likes().context("Failed to read liked stories")?;

    crate::player::start_playback(
        feature,
        start,
        likes,
        &config.playback,
        &collection.display_name,
    )
    .await
}

/// Download the images of collection `number` into the image cache
pub async fn prefetch_images(config: &Config, source: Option<&str>, number: usize) -> Result<()> {
    if !config.cache.enabled {
        bail!("The image cache is disabled (cache.enabled = false)");
    }

    let story_source = build_source(config, source)?;
    let state = load_story_list(story_source).await?;
    let collection = pick_collection(loaded_collections(&state)?, number)?;
    let items = state.items.get(&collection.id).cloned().unwrap_or_default();

    let cache = Arc::new(image_cache(&config.cache)?);
    let client = build_client(&config.network)?;
    let prefetcher = ImagePrefetcher::new(client, Arc::clone(&cache));

    println!(
        "Prefetching {} images for '{}'...",
        items.len(),
        collection.display_name
    );
    let report = prefetcher.prefetch_items(&items).await;

    println!("{} Prefetch complete", style("✓").green().bold());
    println!("  Downloaded: {}", report.downloaded);
    println!("  Already cached: {}", report.already_cached);
    if report.failed > 0 {
        println!("  Failed: {}", style(report.failed).red());
    }
    println!("  Cache: {}", cache.directory().display());

    Ok(())
}

pub fn clear_cache(config: &Config) -> Result<()> {
    let cache = image_cache(&config.cache)?;
    let removed = cache.clear().context("Failed to clear image cache")?;
    println!(
        "{} Removed {} cached images from {}",
        style("✓").green().bold(),
        removed,
        cache.directory().display()
    );
    Ok(())
}

pub fn config_init(manager: &ConfigManager) -> Result<()> {
    if manager.initialize().context("Failed to write config")? {
        println!(
            "{} Config written to {}",
            style("✓").green().bold(),
            manager.config_path().display()
        );
    } else {
        println!(
            "Config already exists at {}",
            manager.config_path().display()
        );
    }
    Ok(())
}

/// Print the effective config, including environment overrides
pub fn config_show(manager: &ConfigManager, config: &Config) -> Result<()> {
    println!("# {}", manager.config_path().display());
    print!("{}", config.to_toml().context("Failed to render config")?);

    for problem in manager.validate().unwrap_or_default() {
        println!("{} {}", style("warning:").yellow().bold(), problem);
    }
    Ok(())
}

pub fn config_reset(manager: &ConfigManager) -> Result<()> {
    manager.reset().context("Failed to reset config")?;
    println!(
        "{} Config reset to defaults at {}",
        style("✓").green().bold(),
        manager.config_path().display()
    );
    Ok(())
}

/// HTTP client honoring the network section
pub fn build_client(network: &NetworkConfig) -> Result<Client> {
    let config = ClientConfig {
        timeout: network.timeout(),
        retry_policy: RetryPolicy::new(network.max_attempts as usize)
            .with_initial_delay(Duration::from_millis(100)),
        ..ClientConfig::default()
    };
    Client::with_config(config).context("Failed to create HTTP client")
}

/// An http(s) argument is a service base URL, anything else a JSON file
pub fn build_source(config: &Config, source: Option<&str>) -> Result<Arc<dyn StorySource>> {
    let target = source.unwrap_or(config.network.base_url.as_str());

    if target.starts_with("http://") || target.starts_with("https://") {
        let client = build_client(&config.network)?;
        let source = HttpStorySource::new(client, target)
            .with_context(|| format!("Invalid story service URL: {}", target))?;
        Ok(Arc::new(source))
    } else {
        Ok(Arc::new(FileStorySource::new(target)))
    }
}

pub fn image_cache(config: &CacheConfig) -> Result<DiskImageCache> {
    match &config.directory {
        Some(directory) => Ok(DiskImageCache::new(directory.clone())),
        None => DiskImageCache::with_default_directory()
            .context("Failed to locate image cache directory"),
    }
}

/// Runs the story list feature until the load settles
pub async fn load_story_list(source: Arc<dyn StorySource>) -> Result<StoryListState> {
    let (_session, state) = spawn_story_list(source).await?;
    Ok(state)
}

async fn spawn_story_list(
    source: Arc<dyn StorySource>,
) -> Result<(SessionHandle<StoryListFeature>, StoryListState)> {
    log::info!("Loading story collections from {}", source.name());
    let session = Session::spawn(StoryListFeature::new(source));
    session.send(StoryListAction::LoadStoryCollections)?;

    let state = session
        .wait_for(|state| {
            matches!(
                state.collections,
                RequestState::Success(_) | RequestState::Failure(_)
            )
        })
        .await?;
    Ok((session, state))
}

/// Loads the list, selects collection `number` and opens its playback machine
pub async fn open_collection(
    source: Arc<dyn StorySource>,
    number: usize,
) -> Result<(StoryCollection, StoryFeature)> {
    let (session, state) = spawn_story_list(source).await?;

    let id = pick_collection(loaded_collections(&state)?, number)?.id;
    session.send(StoryListAction::SelectCollection(Some(id)))?;
    let state = session.wait_for(|state| state.selected == Some(id)).await?;

    let collection = state
        .selected_collection()
        .cloned()
        .context("Selected collection disappeared")?;
    let feature = state
        .open(id)
        .context("Selected collection has no playback items")?;
    Ok((collection, feature))
}

fn loaded_collections(state: &StoryListState) -> Result<&[StoryCollection]> {
    match &state.collections {
        RequestState::Success(collections) => Ok(collections),
        RequestState::Failure(message) => bail!("{}", message),
        RequestState::Idle | RequestState::Loading => bail!("Story collections are not loaded"),
    }
}

/// Resolves a 1-based collection number as printed by `list`
fn pick_collection(collections: &[StoryCollection], number: usize) -> Result<&StoryCollection> {
    if number == 0 || number > collections.len() {
        bail!(
            "No collection {}; choose between 1 and {}",
            number,
            collections.len()
        );
    }
    Ok(&collections[number - 1])
}

fn print_collection_summary(number: usize, collection: &StoryCollection) {
    println!(
        "{:>3}. {} {}",
        number,
        style(&collection.display_name).bold(),
        style(format!("({} stories)", collection.len())).dim()
    );
    let names: Vec<&str> = collection
        .stories
        .iter()
        .map(|story| story.name.as_str())
        .collect();
    if !names.is_empty() {
        println!("     {}", names.join(", "));
    }
}
