//! Seed the catalog from a YAML file.
//!
//! Every entry is validated before anything is written, so a bad file leaves
//! the store untouched. See `crates/cli/catalog.example.yaml` for the format.

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use safar_core::Price;
use safar_server::db::{CatalogRepository, DocumentStore};
use safar_server::models::{CatalogItem, Flight, Hotel, Package, Validate};

use super::{CliError, connect};

/// Contents of a catalog seed file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatalogFile {
    pub packages: Vec<Package>,
    pub hotels: Vec<Hotel>,
    pub flights: Vec<Flight>,
}

impl CatalogFile {
    /// Total number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len() + self.hotels.len() + self.flights.len()
    }

    /// Whether the file has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate every entry, returning one message per invalid entry.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        collect_errors(&self.packages, &mut errors);
        collect_errors(&self.hotels, &mut errors);
        collect_errors(&self.flights, &mut errors);
        errors
    }
}

fn collect_errors<T: CatalogItem>(items: &[T], errors: &mut Vec<String>) {
    for (i, item) in items.iter().enumerate() {
        if let Err(e) = item.validate() {
            errors.push(format!("{}[{i}]: {e}", T::COLLECTION));
        }
    }
}

async fn insert_all<T: CatalogItem>(
    store: &DocumentStore,
    items: Vec<T>,
    describe: impl Fn(&T) -> String,
) -> Result<usize, CliError> {
    let repo = CatalogRepository::<T>::new(store);
    let count = items.len();
    for item in items {
        let summary = describe(&item);
        let id = repo.create(item).await?;
        info!(collection = T::COLLECTION, id = %id, "  {summary}");
    }
    Ok(count)
}

/// Load packages, hotels and flights from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, any entry is
/// invalid, or a write fails.
pub async fn catalog(path: &Path) -> Result<(), CliError> {
    info!(path = %path.display(), "Loading catalog from file");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let file: CatalogFile = serde_yaml::from_str(&content)?;

    let errors = file.validate();
    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(CliError::InvalidEntries(errors.len()));
    }
    if file.is_empty() {
        info!("Nothing to seed");
        return Ok(());
    }

    let store = DocumentStore::postgres(connect().await?);

    let packages = insert_all(&store, file.packages, |p| {
        format!("{} ({})", p.name, Price::new(p.price, p.currency))
    })
    .await?;
    let hotels = insert_all(&store, file.hotels, |h| {
        format!("{} ({}/night)", h.name, Price::new(h.price_per_night, h.currency))
    })
    .await?;
    let flights = insert_all(&store, file.flights, |f| {
        format!("{} ({})", f.name, Price::new(f.price, f.currency))
    })
    .await?;

    info!("Seeding complete!");
    info!("  Packages: {packages}");
    info!("  Hotels: {hotels}");
    info!("  Flights: {flights}");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_example_file_is_valid() {
        let file: CatalogFile =
            serde_yaml::from_str(include_str!("../../catalog.example.yaml")).unwrap();
        assert_eq!(file.packages.len(), 2);
        assert_eq!(file.hotels.len(), 1);
        assert_eq!(file.flights.len(), 1);
        assert!(file.validate().is_empty());
    }

    #[test]
    fn test_reports_every_invalid_entry() {
        let file: CatalogFile = serde_yaml::from_str(
            r#"
packages:
  - name: "Umrah Economy"
    price: "1200"
  - name: "  "
    price: "900"
hotels:
  - name: "Hilton Makkah"
    pricePerNight: "-5"
"#,
        )
        .unwrap();

        let errors = file.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("packages[1]"));
        assert!(errors[1].starts_with("hotels[0]"));
    }

    #[test]
    fn test_empty_file() {
        let file: CatalogFile = serde_yaml::from_str("{}").unwrap();
        assert!(file.is_empty());
        assert!(file.validate().is_empty());
    }
}
