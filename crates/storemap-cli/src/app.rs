//! Command handlers. Each builds what it needs from [`AppConfig`], runs one
//! operation, and prints the result.

use std::sync::Arc;
use std::time::Duration;

use storemap_core::{AppConfig, GeoCoordinate};
use storemap_directory::{category_options, DataSourceClient, StoreDirectory, StoreFilter};
use storemap_geo::{
    FileStore, FixedPosition, GeoCache, GeocodeBatcher, KakaoGeocoder, UserLocator,
    ViewportAdjuster, DEFAULT_CENTER, DEFAULT_ZOOM_LEVEL,
};

use crate::output;
use crate::ViewportArgs;

/// Wires the file-backed cache, the Kakao geocoder and the data source into a
/// [`StoreDirectory`].
///
/// # Errors
///
/// Returns an error if `KAKAO_REST_API_KEY` is not set, if either HTTP client
/// cannot be built, or if a configured URL is invalid.
pub(crate) fn build_directory(
    config: &AppConfig,
) -> anyhow::Result<StoreDirectory<KakaoGeocoder>> {
    let store = FileStore::open(config.cache_path.clone());
    tracing::debug!(path = %store.path().display(), entries = store.len(), "geo cache opened");
    let cache = GeoCache::new(Arc::new(store));

    let geocoder = KakaoGeocoder::with_base_url(
        config.require_geocoder_api_key()?,
        config.request_timeout_secs,
        &config.user_agent,
        &config.geocoder_url,
    )?;
    let batcher = GeocodeBatcher::with_policy(
        geocoder,
        cache,
        config.geocode_batch_size,
        Duration::from_millis(config.geocode_delay_ms),
    );

    let source = DataSourceClient::with_endpoint(
        config.data_service_key.as_deref(),
        config.request_timeout_secs,
        &config.user_agent,
        &config.data_url,
    )?;

    Ok(StoreDirectory::new(source, batcher))
}

/// Loads the directory and prints the stores matching `filter`.
pub(crate) async fn run_load(directory: &StoreDirectory<KakaoGeocoder>, filter: &StoreFilter) {
    let stores = directory.load_all().await;
    if stores.is_empty() {
        println!("no stores loaded; check YPAY_SERVICE_KEY and the log output");
        return;
    }
    output::print_stores(&filter.apply(&stores));
}

/// Loads the directory and prints its category options.
pub(crate) async fn run_categories(directory: &StoreDirectory<KakaoGeocoder>) {
    directory.load_all().await;
    let snapshot = directory.snapshot();
    let options = category_options(snapshot.records.iter().map(|r| r.category.as_str()));
    if options.is_empty() {
        println!("no categories found");
        return;
    }
    for option in options {
        println!("{option}");
    }
}

/// Loads the directory and prints the stores inside the visible part of the
/// given map viewport.
pub(crate) async fn run_visible(
    directory: &StoreDirectory<KakaoGeocoder>,
    args: &ViewportArgs,
    filter: &StoreFilter,
) {
    let mut adjuster = ViewportAdjuster::with_chrome(args.chrome());
    adjuster.set_map_viewport(args.map_viewport());
    let Some(bounds) = adjuster.compute_adjusted_bounds() else {
        println!("map bounds unavailable; --height-px must be a positive number");
        return;
    };

    directory.load_all().await;
    println!("visible area: {}", output::fmt_bounds(&bounds));

    let visible = directory.visible_stores(&adjuster);
    output::print_stores(&filter.apply(&visible));
}

/// Resolves a single address and prints its coordinate.
///
/// # Errors
///
/// Returns an error if the address could not be resolved.
pub(crate) async fn run_resolve(
    batcher: &GeocodeBatcher<KakaoGeocoder>,
    address: &str,
) -> anyhow::Result<()> {
    let coordinate = batcher
        .resolve(address)
        .await
        .ok_or_else(|| anyhow::anyhow!("could not resolve address '{address}'"))?;
    println!("{}", output::fmt_coordinate(coordinate));
    Ok(())
}

/// Prints where the map should move to show the user. Location failures are
/// shown to the user and leave the map at its starting view.
pub(crate) async fn run_focus(position: Option<GeoCoordinate>, viewport: Option<&ViewportArgs>) {
    let mut locator = UserLocator::new(FixedPosition(position));
    let location = match locator.locate().await {
        Ok(location) => location,
        Err(e) => {
            eprintln!("{e}");
            println!(
                "map stays at {} (level {DEFAULT_ZOOM_LEVEL})",
                output::fmt_coordinate(DEFAULT_CENTER)
            );
            return;
        }
    };

    let mut adjuster = ViewportAdjuster::new();
    if let Some(args) = viewport {
        adjuster.set_chrome(args.chrome());
        adjuster.set_map_viewport(args.map_viewport());
    }
    let focus = adjuster.focus_on(location);
    println!(
        "move map to {} (level {})",
        output::fmt_coordinate(focus.center),
        focus.level
    );
}
