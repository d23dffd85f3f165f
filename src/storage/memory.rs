//! Memory storage
//!
//! Mirrors the listing semantics of the MySQL storage (case-insensitive `LIKE '%...%'`) so the
//! API can be tested without a database. Also counts writes, to assert nothing was written.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::countries::Country;
use crate::destinations::Destination;
use crate::destinations::DestinationRow;

use super::CreateDestinationValues;
use super::ListingQuery;
use super::Result;
use super::Storage;
use super::UpdateDestinationValues;

/// An in-memory storage
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// All destinations in storage, by ID
    destinations: Arc<Mutex<BTreeMap<i64, Destination>>>,

    /// All countries in storage
    countries: Arc<Mutex<Vec<Country>>>,

    /// Number of write operations
    writes: Arc<AtomicUsize>,
}

impl Memory {
    /// Create a memory storage with these countries
    pub fn with_countries(countries: &[(&str, &str)]) -> Self {
        let memory = Self::default();

        memory.countries.try_lock().expect("Fresh lock").extend(
            countries.iter().map(|(code, name)| Country {
                country: (*name).to_string(),
                country_code: (*code).to_string(),
            }),
        );

        memory
    }

    /// Number of create/update/delete calls so far
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// All destinations in ID order
    pub async fn destinations(&self) -> Vec<Destination> {
        self.destinations.lock().await.values().cloned().collect()
    }

    async fn matching_rows(&self, listing: &ListingQuery) -> Vec<DestinationRow> {
        let countries = self.countries.lock().await;

        self.destinations
            .lock()
            .await
            .values()
            .map(|destination| DestinationRow {
                id: destination.id,
                name: destination.name.clone(),
                countrycode: destination.countrycode.clone(),
                country: countries
                    .iter()
                    .find(|country| country.country_code == destination.countrycode)
                    .map(|country| country.country.clone()),
                description: destination.description.clone(),
                kind: destination.kind.clone(),
            })
            .filter(|row| is_match(listing, row))
            .collect()
    }
}

/// `column LIKE '%needle%'`, case-insensitive, `NULL` never matches
fn like(column: Option<&str>, needle: &str) -> bool {
    column.is_some_and(|column| column.to_lowercase().contains(&needle.to_lowercase()))
}

fn is_match(listing: &ListingQuery, row: &DestinationRow) -> bool {
    let column = |name: &str| match name {
        "d.name" => Some(row.name.as_str()),
        "d.description" => row.description.as_deref(),
        "c.name" => row.country.as_deref(),
        "d.countrycode" => Some(row.countrycode.as_str()),
        "d.type" => Some(row.kind.as_str()),
        _ => None,
    };

    let search = (!listing.search.is_empty()).then(|| {
        ["d.name", "c.name", "d.description", "d.countrycode", "d.type"]
            .iter()
            .any(|name| like(column(*name), &listing.search))
    });

    let filters = listing.sidebar_filters.active();
    let sidebar = (!filters.is_empty()).then(|| {
        filters
            .iter()
            .all(|(name, value)| like(column(*name), value))
    });

    match (search, sidebar) {
        (None, None) => true,
        (search, sidebar) => search.unwrap_or(false) || sidebar.unwrap_or(false),
    }
}

#[async_trait]
impl Storage for Memory {
    async fn find_destinations(&self, listing: &ListingQuery) -> Result<Vec<DestinationRow>> {
        let offset = usize::try_from(listing.pagination.offset()).unwrap_or(usize::MAX);
        let per_page = usize::try_from(listing.pagination.per_page).unwrap_or(usize::MAX);

        Ok(self
            .matching_rows(listing)
            .await
            .into_iter()
            .skip(offset)
            .take(per_page)
            .collect())
    }

    async fn count_destinations(&self, listing: &ListingQuery) -> Result<i64> {
        Ok(i64::try_from(self.matching_rows(listing).await.len()).unwrap_or(i64::MAX))
    }

    async fn find_destination_by_id(&self, id: i64) -> Result<Vec<Destination>> {
        Ok(self
            .destinations
            .lock()
            .await
            .get(&id)
            .cloned()
            .into_iter()
            .collect())
    }

    async fn find_all_countries(&self) -> Result<Vec<Country>> {
        let mut countries = self.countries.lock().await.clone();
        countries.sort_by(|a, b| a.country.cmp(&b.country));

        Ok(countries)
    }

    async fn create_destination(&self, values: &CreateDestinationValues<'_>) -> Result<i64> {
        self.writes.fetch_add(1, Ordering::SeqCst);

        let mut destinations = self.destinations.lock().await;
        let id = destinations.keys().next_back().map_or(1, |id| id + 1);

        destinations.insert(
            id,
            Destination {
                id,
                name: values.name.to_string(),
                description: Some(values.description.to_string()),
                countrycode: values.country_code.to_string(),
                kind: values.kind.to_string(),
                last_modif: Some(Utc::now().naive_utc()),
            },
        );

        Ok(id)
    }

    async fn update_destination(&self, values: &UpdateDestinationValues<'_>) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);

        if let Some(destination) = self.destinations.lock().await.get_mut(&values.id) {
            destination.name = values.name.to_string();
            destination.description = Some(values.description.to_string());
            destination.countrycode = values.country_code.to_string();
            destination.kind = values.kind.to_string();
            destination.last_modif = Some(Utc::now().naive_utc());
        }

        Ok(())
    }

    async fn delete_destination(&self, id: i64) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);

        self.destinations.lock().await.remove(&id);

        Ok(())
    }
}
