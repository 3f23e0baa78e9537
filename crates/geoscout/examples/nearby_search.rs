//! Store locator walkthrough
//!
//! Loads a fixture into the in-memory provider and drives the coordinator the
//! way a store-locator screen would: nearby stores first, then an address typed
//! keystroke by keystroke, then the stores around that address.

use std::time::Duration;

use geoscout::{
    Channel, CoordinatorConfigBuilder, CoordinatorUpdate, InMemoryProvider, NearbyOutcome,
    SearchCoordinator, StoreDetails,
};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/stores.json");

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    geoscout::init_logging(tracing::Level::INFO)?;

    // Pretend the device needs a moment to get a location fix
    let provider = InMemoryProvider::from_path(FIXTURE)?.empty_for_first(1);
    let config = CoordinatorConfigBuilder::responsive()
        .retry_interval(Duration::from_millis(200))
        .try_build()?;
    let coordinator = SearchCoordinator::new(provider, config)?;

    println!("Stores near you:");
    match coordinator.find_nearby(None).await? {
        NearbyOutcome::Found(stores) => {
            for store in &stores {
                let details = StoreDetails::from_location(store);
                println!("  {} | {} | {}", details.name, details.address, details.curbside);
            }
        }
        NearbyOutcome::Exhausted { attempts } => {
            println!(
                "  {} (after {attempts} attempts)",
                coordinator.status_text(Channel::Nearby).unwrap_or_default()
            );
        }
    }

    let mut updates = coordinator.subscribe();
    for prefix in ["8", "84", "841", "841 Br", "841 Broad"] {
        coordinator.on_query_intent(prefix);
        tokio::time::sleep(Duration::from_millis(60)).await;
    }
    if let CoordinatorUpdate::SuggestionsUpdated { count, .. } = updates.recv().await? {
        println!("\n{count} suggestion(s) for \"841 Broad\":");
    }
    let suggestions = coordinator.current_suggestions();
    for suggestion in &suggestions {
        println!("  {}", suggestion.label);
    }

    if let Some(picked) = suggestions.first() {
        coordinator.find_nearby(Some(picked)).await?;
        println!("\nStores near {}:", picked.label);
        for store in coordinator.selectable_nearby_results() {
            println!("  {store}");
        }
        let region = coordinator.current_region();
        println!("Map centred on {} ({} m)", region.center, region.span_meters);
    }

    Ok(())
}
