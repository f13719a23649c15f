//! Settings Repository (Singleton)

use super::{BaseRepository, RepoError, RepoResult, now_iso};
use crate::db::models::{Settings, SettingsUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "settings";
const SINGLETON_ID: &str = "main";

#[derive(Clone)]
pub struct SettingsRepository {
    base: BaseRepository,
}

impl SettingsRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Get or create the singleton settings record
    pub async fn get_or_create(&self) -> RepoResult<Settings> {
        if let Some(settings) = self.get().await? {
            return Ok(settings);
        }

        let now = now_iso();
        let settings = Settings {
            created_at: Some(now.clone()),
            updated_at: Some(now),
            ..Settings::default()
        };

        let created: Option<Settings> = self
            .base
            .db()
            .create((TABLE, SINGLETON_ID))
            .content(settings)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create settings".to_string()))
    }

    /// Get the singleton settings record
    pub async fn get(&self) -> RepoResult<Option<Settings>> {
        let settings: Option<Settings> = self.base.db().select((TABLE, SINGLETON_ID)).await?;
        Ok(settings)
    }

    /// Merge a partial update into the singleton.
    ///
    /// Shop name, currency, and timezone only change when a non-empty value
    /// is submitted. Tax id, address, email, and phone accept any submitted
    /// value, empty included. The logo URL only accepts being cleared; it is
    /// set through a dedicated path elsewhere.
    pub async fn update(&self, data: SettingsUpdate) -> RepoResult<Settings> {
        let mut settings = self.get_or_create().await?;

        if let Some(shop_name) = data.shop_name
            && !shop_name.is_empty()
        {
            settings.shop_name = shop_name;
        }
        if let Some(tax_id) = data.tax_id {
            settings.tax_id = tax_id;
        }
        if let Some(address) = data.address {
            settings.address = address;
        }
        if let Some(email) = data.email {
            settings.email = email;
        }
        if let Some(phone) = data.phone {
            settings.phone = phone;
        }
        if let Some(currency) = data.currency
            && !currency.is_empty()
        {
            settings.currency = currency;
        }
        if let Some(timezone) = data.timezone
            && !timezone.is_empty()
        {
            settings.timezone = timezone;
        }
        if data.logo_url.as_deref() == Some("") {
            settings.logo_url = String::new();
        }

        settings.updated_at = Some(now_iso());
        settings.id = None;

        let singleton_id = RecordId::from_table_key(TABLE, SINGLETON_ID);
        let updated: Option<Settings> = self
            .base
            .db()
            .update(singleton_id)
            .content(settings)
            .await?;
        updated.ok_or_else(|| RepoError::Database("Failed to update settings".to_string()))
    }
}
