use std::collections::HashMap;

use log::{error, info};
use scraper::Html;

use crate::notify::Notifier;
use crate::scraper::{Fetch, Strategy};
use crate::storage::{count_key, SignalStore};

/// One full sweep over the configured house ids, in order. Returns how many
/// changes were detected (and so how many notifications were attempted).
pub fn run<S: Strategy>(
    strategy: &S,
    fetcher: &dyn Fetch,
    store: &mut dyn SignalStore,
    notifier: &dyn Notifier,
    house_ids: &[String],
) -> usize {
    // Each distinct URL is fetched at most once per run; a failed fetch is
    // remembered so the ids behind it are skipped, not retried.
    let mut documents: HashMap<String, Option<Html>> = HashMap::new();
    let mut changed = 0;

    for house_id in house_ids {
        let url = strategy.document_url(house_id);
        let document = documents
            .entry(url.clone())
            .or_insert_with(|| match fetcher.fetch(&url) {
                Ok(document) => Some(document),
                Err(err) => {
                    error!("Scraping failed. Document URL: {url}: {err:#}");
                    None
                }
            });
        let Some(document) = document.as_ref() else {
            error!("Skipping house id {house_id}: document was not fetched");
            continue;
        };

        let signal = strategy.extract(document, house_id);

        let key = count_key(house_id);
        let previous = match store.get(&key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                info!(
                    "Before house count data does not exist. House name: {}",
                    signal.house_name
                );
                String::new()
            }
            Err(err) => {
                error!("Failed to read {key} from the store: {err:#}");
                continue;
            }
        };

        if signal.value == previous {
            info!(
                "It's the same as the before state. current: {}, before: {}, House name: {}",
                signal.value, previous, signal.house_name
            );
            continue;
        }

        if let Err(err) = store.set(&key, &signal.value) {
            error!("Failed to write {key} to the store: {err:#}");
            continue;
        }

        let message = strategy.message(&signal, house_id);
        if let Err(err) = notifier.notify(&message) {
            error!("Failed to deliver notification for house id {house_id}: {err:#}");
        }
        info!("{message}");
        changed += 1;
    }

    changed
}
