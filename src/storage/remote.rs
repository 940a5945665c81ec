//! Remote table-backed grocery storage.
//!
//! Items live as individual rows in a remote table service, keyed by name.
//! Listing walks the table with a paginated scan. Reads fail open: an
//! unreachable table reports items as absent and the list as empty, with the
//! underlying error logged. Mutations follow the configured
//! [`PersistFailurePolicy`] instead.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::{PersistFailurePolicy, RemoteConfig};
use crate::core::{FieldUpdate, GroceryItem, ItemField};
use crate::error::{FailOpen, PantryError, Result};
use crate::storage::GroceryStore;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One page of a table scan.
#[derive(Debug, Deserialize)]
struct ScanPage {
    items: Vec<GroceryItem>,
    #[serde(default)]
    last_key: Option<String>,
}

/// Wire body for a single-field update.
#[derive(Debug, Serialize)]
struct PatchBody {
    property: ItemField,
    value: serde_json::Value,
}

/// Grocery store backed by a remote table service.
#[derive(Debug)]
pub struct RemoteStore {
    client: Client,
    base_url: String,
    table: String,
    page_size: u32,
    policy: PersistFailurePolicy,
}

impl RemoteStore {
    /// Create a store against the configured table endpoint.
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        Self::with_policy(config, PersistFailurePolicy::Propagate)
    }

    /// Create a store with an explicit persistence-failure policy.
    pub fn with_policy(config: &RemoteConfig, policy: PersistFailurePolicy) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PantryError::remote(format!("building http client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            table: config.table.clone(),
            page_size: config.scan_page_size,
            policy,
        })
    }

    /// URL addressing a single item row.
    fn item_url(&self, name: &str) -> String {
        format!("{}/tables/{}/items/{}", self.base_url, self.table, name)
    }

    /// URL for one scan page.
    fn scan_url(&self, start_key: Option<&str>) -> String {
        let mut url = format!(
            "{}/tables/{}/items?limit={}",
            self.base_url, self.table, self.page_size
        );
        if let Some(key) = start_key {
            url.push_str("&start_key=");
            url.push_str(key);
        }
        url
    }

    /// Fetch an item, distinguishing absence from transport failure.
    fn try_get(&self, name: &str) -> Result<Option<GroceryItem>> {
        let response = self.client.get(self.item_url(name)).send()?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json()?)),
            status => Err(PantryError::remote(format!(
                "GET {} returned {}",
                name, status
            ))),
        }
    }

    /// Walk the table scan to the end.
    fn try_list(&self) -> Result<Vec<GroceryItem>> {
        let mut items = Vec::new();
        let mut start_key: Option<String> = None;

        loop {
            let response = self
                .client
                .get(self.scan_url(start_key.as_deref()))
                .send()?;
            if !response.status().is_success() {
                return Err(PantryError::remote(format!(
                    "scan returned {}",
                    response.status()
                )));
            }
            let page: ScanPage = response.json()?;
            items.extend(page.items);
            match page.last_key {
                Some(key) => start_key = Some(key),
                None => break,
            }
        }

        Ok(items)
    }

    /// Apply the persistence-failure policy to a mutation outcome.
    fn handle_write(&self, result: Result<()>, context: &str) -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(err) => match self.policy {
                PersistFailurePolicy::Propagate => Err(err),
                PersistFailurePolicy::Log => {
                    tracing::warn!("{}: {}", context, err);
                    Ok(())
                }
            },
        }
    }

    fn try_put(&self, item: &GroceryItem) -> Result<()> {
        let response = self.client.put(self.item_url(&item.name)).json(item).send()?;
        if !response.status().is_success() {
            return Err(PantryError::remote(format!(
                "PUT {} returned {}",
                item.name,
                response.status()
            )));
        }
        Ok(())
    }

    fn try_delete(&self, name: &str) -> Result<()> {
        let response = self.client.delete(self.item_url(name)).send()?;
        let status = response.status();
        // Deleting an absent row is a no-op, matching the other backends.
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(PantryError::remote(format!(
                "DELETE {} returned {}",
                name, status
            )));
        }
        Ok(())
    }

    fn try_patch(&self, name: &str, update: &FieldUpdate) -> Result<()> {
        let body = PatchBody {
            property: update.field(),
            value: update.value_json(),
        };
        let response = self
            .client
            .patch(self.item_url(name))
            .json(&body)
            .send()?;
        if !response.status().is_success() {
            return Err(PantryError::remote(format!(
                "PATCH {} returned {}",
                name,
                response.status()
            )));
        }
        Ok(())
    }
}

impl GroceryStore for RemoteStore {
    fn get(&self, name: &str) -> Result<Option<GroceryItem>> {
        Ok(self
            .try_get(name)
            .fail_open_with("fetching remote item", None))
    }

    fn add(&self, item: &GroceryItem) -> Result<()> {
        self.handle_write(self.try_put(item), "adding remote item")
    }

    fn delete(&self, name: &str) -> Result<()> {
        self.handle_write(self.try_delete(name), "deleting remote item")
    }

    fn update(&self, name: &str, update: &FieldUpdate) -> Result<()> {
        match self.try_get(name) {
            Ok(Some(_)) => self.handle_write(self.try_patch(name, update), "updating remote item"),
            Ok(None) => Err(PantryError::not_found(name)),
            Err(err) => self.handle_write(Err(err), "updating remote item"),
        }
    }

    fn list(&self) -> Result<Vec<GroceryItem>> {
        Ok(self.try_list().fail_open_default("scanning remote table"))
    }
}
