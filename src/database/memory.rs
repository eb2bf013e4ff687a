use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Datelike;
use tokio::sync::RwLock;

use crate::database::gateway::Gateway;
use crate::database::manager::DatabaseError;
use crate::database::models::{Auto, Marke};

#[derive(Debug, Default)]
struct Tables {
    marken: BTreeMap<i32, String>,
    autos: BTreeMap<i32, Auto>,
    next_marke_id: i32,
    next_auto_id: i32,
}

impl Tables {
    fn embed(&self, auto: &Auto) -> Auto {
        let mut auto = auto.clone();
        auto.marke = self
            .marken
            .get(&auto.fs_marken)
            .map(|name| Marke::new(auto.fs_marken, name.clone()));
        auto
    }
}

/// In-process store with the same contracts as the PostgreSQL gateway:
/// serial ids starting at 1, no referential constraint on `fs_marken`, and
/// brands embedded as they exist at read time.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    tables: RwLock<Tables>,
    offline: AtomicBool,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a store fault (or recover).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), DatabaseError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DatabaseError::Unavailable("memory store is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn read_marke_by_id(&self, id: i32) -> Result<Option<Marke>, DatabaseError> {
        self.ensure_online()?;
        let tables = self.tables.read().await;
        Ok(tables.marken.get(&id).map(|name| Marke::new(id, name.clone())))
    }

    async fn list_marken(&self) -> Result<Vec<Marke>, DatabaseError> {
        self.ensure_online()?;
        let tables = self.tables.read().await;
        Ok(tables
            .marken
            .iter()
            .map(|(id, name)| Marke::new(*id, name.clone()))
            .collect())
    }

    async fn insert_marke(&self, name: &str) -> Result<u64, DatabaseError> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        tables.next_marke_id += 1;
        let id = tables.next_marke_id;
        tables.marken.insert(id, name.to_string());
        Ok(1)
    }

    async fn delete_marke(&self, id: i32) -> Result<u64, DatabaseError> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        Ok(tables.marken.remove(&id).map_or(0, |_| 1))
    }

    async fn read_auto_by_id(&self, id: i32) -> Result<Option<Auto>, DatabaseError> {
        self.ensure_online()?;
        let tables = self.tables.read().await;
        Ok(tables.autos.get(&id).map(|auto| tables.embed(auto)))
    }

    async fn list_autos(&self) -> Result<Vec<Auto>, DatabaseError> {
        self.ensure_online()?;
        let tables = self.tables.read().await;
        Ok(tables.autos.values().map(|auto| tables.embed(auto)).collect())
    }

    async fn list_autos_by_year(&self, year: i32) -> Result<Vec<Auto>, DatabaseError> {
        self.ensure_online()?;
        let tables = self.tables.read().await;
        Ok(tables
            .autos
            .values()
            .filter(|auto| auto.baujahr.year() == year)
            .map(|auto| tables.embed(auto))
            .collect())
    }

    async fn insert_auto(&self, auto: &Auto) -> Result<u64, DatabaseError> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        tables.next_auto_id += 1;
        let id = tables.next_auto_id;
        let stored = Auto {
            id_autos: id,
            marke: None,
            ..auto.clone()
        };
        tables.autos.insert(id, stored);
        Ok(1)
    }

    async fn update_auto(&self, auto: &Auto) -> Result<u64, DatabaseError> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        match tables.autos.get_mut(&auto.id_autos) {
            Some(existing) => {
                *existing = Auto {
                    marke: None,
                    ..auto.clone()
                };
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_auto(&self, id: i32) -> Result<u64, DatabaseError> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        Ok(tables.autos.remove(&id).map_or(0, |_| 1))
    }

    async fn delete_all_autos(&self) -> Result<u64, DatabaseError> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;
        let removed = tables.autos.len() as u64;
        tables.autos.clear();
        Ok(removed)
    }

    async fn count_autos(&self) -> Result<i64, DatabaseError> {
        self.ensure_online()?;
        Ok(self.tables.read().await.autos.len() as i64)
    }

    async fn marke_exists(&self, id: i32) -> Result<bool, DatabaseError> {
        self.ensure_online()?;
        Ok(self.tables.read().await.marken.contains_key(&id))
    }

    async fn auto_exists(&self, id: i32) -> Result<bool, DatabaseError> {
        self.ensure_online()?;
        Ok(self.tables.read().await.autos.contains_key(&id))
    }

    async fn count_autos_referencing(&self, marke_id: i32) -> Result<i64, DatabaseError> {
        self.ensure_online()?;
        let tables = self.tables.read().await;
        Ok(tables.autos.values().filter(|auto| auto.fs_marken == marke_id).count() as i64)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.ensure_online()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn auto(modell: &str, year: i32, fs_marken: i32) -> Auto {
        Auto {
            id_autos: 0,
            modell: modell.to_string(),
            baujahr: NaiveDate::from_ymd_opt(year, 3, 1).unwrap(),
            gewicht: 1200.0,
            leistung: 90,
            verbrenner: true,
            produktion: false,
            fs_marken,
            marke: None,
        }
    }

    #[tokio::test]
    async fn assigns_serial_ids_starting_at_one() {
        let gw = MemoryGateway::new();
        gw.insert_marke("Volkswagen").await.unwrap();
        gw.insert_marke("Opel").await.unwrap();

        let marken = gw.list_marken().await.unwrap();
        assert_eq!(marken, vec![Marke::new(1, "Volkswagen"), Marke::new(2, "Opel")]);
    }

    #[tokio::test]
    async fn embeds_brand_as_of_read_time() {
        let gw = MemoryGateway::new();
        gw.insert_marke("Volkswagen").await.unwrap();
        gw.insert_auto(&auto("Golf", 2020, 1)).await.unwrap();

        let read = gw.read_auto_by_id(1).await.unwrap().unwrap();
        assert_eq!(read.marke, Some(Marke::new(1, "Volkswagen")));

        // No constraint stops the brand from vanishing underneath the auto.
        assert_eq!(gw.delete_marke(1).await.unwrap(), 1);
        let read = gw.read_auto_by_id(1).await.unwrap().unwrap();
        assert!(read.marke.is_none());
        assert_eq!(read.fs_marken, 1);
    }

    #[tokio::test]
    async fn year_filter_is_a_subset_of_the_full_list() {
        let gw = MemoryGateway::new();
        gw.insert_marke("Opel").await.unwrap();
        gw.insert_auto(&auto("Astra", 2019, 1)).await.unwrap();
        gw.insert_auto(&auto("Corsa", 2020, 1)).await.unwrap();
        gw.insert_auto(&auto("Insignia", 2020, 1)).await.unwrap();

        let all = gw.list_autos().await.unwrap();
        let in_2020 = gw.list_autos_by_year(2020).await.unwrap();
        let expected: Vec<Auto> = all.into_iter().filter(|a| a.baujahr.year() == 2020).collect();
        assert_eq!(in_2020, expected);
        assert!(gw.list_autos_by_year(1999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn targeted_writes_report_zero_rows_for_missing_ids() {
        let gw = MemoryGateway::new();
        let mut ghost = auto("Ghost", 2020, 1);
        ghost.id_autos = 42;

        assert_eq!(gw.update_auto(&ghost).await.unwrap(), 0);
        assert_eq!(gw.delete_auto(42).await.unwrap(), 0);
        assert_eq!(gw.delete_marke(42).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn counts_and_bulk_delete() {
        let gw = MemoryGateway::new();
        gw.insert_marke("Opel").await.unwrap();
        gw.insert_marke("BMW").await.unwrap();
        gw.insert_auto(&auto("Astra", 2019, 1)).await.unwrap();
        gw.insert_auto(&auto("Corsa", 2020, 1)).await.unwrap();
        gw.insert_auto(&auto("X1", 2021, 2)).await.unwrap();

        assert_eq!(gw.count_autos().await.unwrap(), 3);
        assert_eq!(gw.count_autos_referencing(1).await.unwrap(), 2);
        assert_eq!(gw.count_autos_referencing(3).await.unwrap(), 0);
        assert_eq!(gw.delete_all_autos().await.unwrap(), 3);
        assert_eq!(gw.count_autos().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn offline_store_faults_every_call() {
        let gw = MemoryGateway::new();
        gw.set_offline(true);
        assert!(matches!(gw.list_marken().await, Err(DatabaseError::Unavailable(_))));
        assert!(gw.health_check().await.is_err());

        gw.set_offline(false);
        assert!(gw.health_check().await.is_ok());
    }
}
