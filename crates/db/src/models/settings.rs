use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sqlx::{FromRow, Sqlite, SqlitePool};
use ts_rs::TS;

use super::billing::DocumentKind;

pub const COMPANY_PROFILE_ID: &str = "company_profile";
pub const BILLING_COUNTERS_ID: &str = "billing_counters";
pub const WIFI_ZONE_SETTINGS_ID: &str = "wifi_zone_settings";

/// Singleton configuration document, keyed by a string id. The payload is
/// an opaque JSON blob to the data layer; typed views live alongside.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct SettingsDoc {
    pub id: String,
    pub data: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct CompanyProfile {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub tax_id: Option<String>,
}

/// Next document number per kind, consumed when a document is issued.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct BillingCounters {
    pub quote: i64,
    pub invoice: i64,
    pub receipt: i64,
}

impl Default for BillingCounters {
    fn default() -> Self {
        Self {
            quote: 1,
            invoice: 1,
            receipt: 1,
        }
    }
}

impl BillingCounters {
    pub fn next_for(&mut self, kind: DocumentKind) -> i64 {
        let counter = match kind {
            DocumentKind::Quote => &mut self.quote,
            DocumentKind::Invoice => &mut self.invoice,
            DocumentKind::Receipt => &mut self.receipt,
        };
        let n = *counter;
        *counter += 1;
        n
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct WifiZoneSettings {
    pub ssid: String,
    pub bandwidth_mbps: i64,
    pub rate_per_hour_cents: i64,
}

impl SettingsDoc {
    pub fn parsed<T: DeserializeOwned + Default>(&self) -> T {
        serde_json::from_str(&self.data).unwrap_or_default()
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM settings ORDER BY id ASC")
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM settings WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn put(pool: &SqlitePool, id: &str, data: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO settings (id, data)
               VALUES ($1, $2)
               ON CONFLICT(id) DO UPDATE SET
                   data = excluded.data,
                   updated_at = datetime('now', 'subsec')
               RETURNING *"#,
        )
        .bind(id)
        .bind(data)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id_in_tx(
        tx: &mut sqlx::Transaction<'_, Sqlite>,
        id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM settings WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    pub async fn put_in_tx(
        tx: &mut sqlx::Transaction<'_, Sqlite>,
        id: &str,
        data: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"INSERT INTO settings (id, data)
               VALUES ($1, $2)
               ON CONFLICT(id) DO UPDATE SET
                   data = excluded.data,
                   updated_at = datetime('now', 'subsec')"#,
        )
        .bind(id)
        .bind(data)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_advance_per_kind() {
        let mut counters = BillingCounters::default();
        assert_eq!(counters.next_for(DocumentKind::Invoice), 1);
        assert_eq!(counters.next_for(DocumentKind::Invoice), 2);
        assert_eq!(counters.next_for(DocumentKind::Quote), 1);
        assert_eq!(counters.invoice, 3);
    }
}
