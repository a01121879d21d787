//! SQLite implementation of the catalog storage ports.
//!
//! One repository covers masters, clients (with their salon cards) and
//! services; the three port traits are implemented on the same struct so a
//! single `Arc` can be handed to every service that needs catalog access.

use async_trait::async_trait;
use chrono::DateTime;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};
use salonkit_core::{ClientStore, MasterStore, ServiceStore};
use salonkit_domain::{
    Client, Master, NewClient, NewMaster, NewService, Result, SalonCard,
    SalonError, Service, ServiceCategory, UpdateClientField, UpdateMasterField,
    UpdateServiceField,
};
use tracing::{debug, instrument};

use super::{map_pool_error, map_sql_error, DbManager};

const MASTER_COLUMNS: &str = "master_id, first_name, last_name, phone, email, specialty";
const CLIENT_COLUMNS: &str = "client_id, first_name, last_name, phone, email, password_hash";
const SERVICE_COLUMNS: &str = "service_id, service_name, duration_minutes, price, category_id";

/// Catalog storage backed by the shared SQLite pool.
pub struct SqliteCatalogRepository {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteCatalogRepository {
    pub fn new(db: &DbManager) -> Self {
        Self { pool: db.pool().clone() }
    }
}

fn map_master(row: &Row<'_>) -> rusqlite::Result<Master> {
    Ok(Master {
        master_id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        phone: row.get(3)?,
        email: row.get(4)?,
        specialty: row.get(5)?,
    })
}

fn map_client(row: &Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        client_id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        phone: row.get(3)?,
        email: row.get(4)?,
        password_hash: row.get(5)?,
    })
}

fn map_service(row: &Row<'_>) -> rusqlite::Result<Service> {
    Ok(Service {
        service_id: row.get(0)?,
        service_name: row.get(1)?,
        duration_minutes: row.get(2)?,
        price: row.get(3)?,
        category_id: row.get(4)?,
    })
}

fn map_card(row: &Row<'_>) -> rusqlite::Result<SalonCard> {
    let level: String = row.get(1)?;
    let issue_ts: i64 = row.get(3)?;
    Ok(SalonCard {
        client_id: row.get(0)?,
        discount_level: level.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(1, Type::Text, e.into())
        })?,
        total_spent: row.get(2)?,
        issue_date: DateTime::from_timestamp(issue_ts, 0)
            .ok_or(rusqlite::Error::IntegralValueOutOfRange(3, issue_ts))?,
    })
}

#[async_trait]
impl MasterStore for SqliteCatalogRepository {
    #[instrument(skip(self, master))]
    async fn insert_master(&self, master: NewMaster) -> Result<Master> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        conn.execute(
            "INSERT INTO masters (first_name, last_name, phone, email, specialty) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                master.first_name,
                master.last_name,
                master.phone,
                master.email,
                master.specialty
            ],
        )
        .map_err(map_sql_error)?;

        Ok(Master {
            master_id: conn.last_insert_rowid(),
            first_name: master.first_name,
            last_name: master.last_name,
            phone: master.phone,
            email: master.email,
            specialty: master.specialty,
        })
    }

    async fn find_master(&self, master_id: i64) -> Result<Option<Master>> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        conn.query_row(
            &format!("SELECT {MASTER_COLUMNS} FROM masters WHERE master_id = ?1"),
            params![master_id],
            map_master,
        )
        .optional()
        .map_err(map_sql_error)
    }

    async fn find_master_by_phone(&self, phone: &str) -> Result<Option<Master>> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        conn.query_row(
            &format!("SELECT {MASTER_COLUMNS} FROM masters WHERE phone = ?1"),
            params![phone],
            map_master,
        )
        .optional()
        .map_err(map_sql_error)
    }

    async fn update_master(&self, master_id: i64, update: UpdateMasterField) -> Result<()> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        let rows = match update {
            UpdateMasterField::FirstName(v) => conn.execute(
                "UPDATE masters SET first_name = ?1 WHERE master_id = ?2",
                params![v, master_id],
            ),
            UpdateMasterField::LastName(v) => conn.execute(
                "UPDATE masters SET last_name = ?1 WHERE master_id = ?2",
                params![v, master_id],
            ),
            UpdateMasterField::Phone(v) => conn.execute(
                "UPDATE masters SET phone = ?1 WHERE master_id = ?2",
                params![v, master_id],
            ),
            UpdateMasterField::Email(v) => conn.execute(
                "UPDATE masters SET email = ?1 WHERE master_id = ?2",
                params![v, master_id],
            ),
            UpdateMasterField::Specialty(v) => conn.execute(
                "UPDATE masters SET specialty = ?1 WHERE master_id = ?2",
                params![v, master_id],
            ),
        }
        .map_err(map_sql_error)?;

        if rows == 0 {
            return Err(SalonError::MasterNotFound(master_id));
        }
        Ok(())
    }

    async fn assign_categories(&self, master_id: i64, category_ids: &[i64]) -> Result<()> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        for category_id in category_ids {
            conn.execute(
                "INSERT OR IGNORE INTO master_categories (master_id, category_id) \
                 VALUES (?1, ?2)",
                params![master_id, category_id],
            )
            .map_err(map_sql_error)?;
        }
        Ok(())
    }

    async fn category_ids_for(&self, master_id: i64) -> Result<Vec<i64>> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        let mut stmt = conn
            .prepare(
                "SELECT category_id FROM master_categories \
                 WHERE master_id = ?1 ORDER BY category_id",
            )
            .map_err(map_sql_error)?;
        let rows = stmt
            .query_map(params![master_id], |row| row.get(0))
            .map_err(map_sql_error)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sql_error)
    }

    async fn list_masters_in_category(&self, category_id: i64) -> Result<Vec<Master>> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        let mut stmt = conn
            .prepare(
                "SELECT m.master_id, m.first_name, m.last_name, m.phone, m.email, m.specialty \
                 FROM masters m \
                 JOIN master_categories mc ON mc.master_id = m.master_id \
                 WHERE mc.category_id = ?1 \
                 ORDER BY m.master_id",
            )
            .map_err(map_sql_error)?;
        let rows = stmt.query_map(params![category_id], map_master).map_err(map_sql_error)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sql_error)
    }
}

#[async_trait]
impl ClientStore for SqliteCatalogRepository {
    #[instrument(skip(self, client))]
    async fn insert_client(&self, client: NewClient) -> Result<Client> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        conn.execute(
            "INSERT INTO clients (first_name, last_name, phone, email, password_hash) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                client.first_name,
                client.last_name,
                client.phone,
                client.email,
                client.password_hash
            ],
        )
        .map_err(map_sql_error)?;

        Ok(Client {
            client_id: conn.last_insert_rowid(),
            first_name: client.first_name,
            last_name: client.last_name,
            phone: client.phone,
            email: client.email,
            password_hash: client.password_hash,
        })
    }

    async fn find_client(&self, client_id: i64) -> Result<Option<Client>> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        conn.query_row(
            &format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE client_id = ?1"),
            params![client_id],
            map_client,
        )
        .optional()
        .map_err(map_sql_error)
    }

    async fn find_client_by_phone(&self, phone: &str) -> Result<Option<Client>> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        conn.query_row(
            &format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE phone = ?1"),
            params![phone],
            map_client,
        )
        .optional()
        .map_err(map_sql_error)
    }

    async fn update_client(&self, client_id: i64, update: UpdateClientField) -> Result<()> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        let rows = match update {
            UpdateClientField::FirstName(v) => conn.execute(
                "UPDATE clients SET first_name = ?1 WHERE client_id = ?2",
                params![v, client_id],
            ),
            UpdateClientField::LastName(v) => conn.execute(
                "UPDATE clients SET last_name = ?1 WHERE client_id = ?2",
                params![v, client_id],
            ),
            UpdateClientField::Phone(v) => conn.execute(
                "UPDATE clients SET phone = ?1 WHERE client_id = ?2",
                params![v, client_id],
            ),
            UpdateClientField::Email(v) => conn.execute(
                "UPDATE clients SET email = ?1 WHERE client_id = ?2",
                params![v, client_id],
            ),
        }
        .map_err(map_sql_error)?;

        if rows == 0 {
            return Err(SalonError::ClientNotFound(client_id));
        }
        Ok(())
    }

    async fn find_card(&self, client_id: i64) -> Result<Option<SalonCard>> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        conn.query_row(
            "SELECT client_id, discount_level, total_spent, issue_date \
             FROM salon_cards WHERE client_id = ?1",
            params![client_id],
            map_card,
        )
        .optional()
        .map_err(map_sql_error)
    }

    async fn save_card(&self, card: &SalonCard) -> Result<()> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        conn.execute(
            "INSERT INTO salon_cards (client_id, discount_level, total_spent, issue_date) \
             VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(client_id) DO UPDATE SET \
                 discount_level = excluded.discount_level, \
                 total_spent = excluded.total_spent",
            params![
                card.client_id,
                card.discount_level.as_str(),
                card.total_spent,
                card.issue_date.timestamp()
            ],
        )
        .map_err(map_sql_error)?;
        debug!(
            client_id = card.client_id,
            level = card.discount_level.as_str(),
            "salon card saved"
        );
        Ok(())
    }
}

#[async_trait]
impl ServiceStore for SqliteCatalogRepository {
    async fn insert_category(&self, category_name: &str) -> Result<ServiceCategory> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        conn.execute(
            "INSERT INTO service_categories (category_name) VALUES (?1)",
            params![category_name],
        )
        .map_err(map_sql_error)?;

        Ok(ServiceCategory {
            category_id: conn.last_insert_rowid(),
            category_name: category_name.to_string(),
        })
    }

    async fn find_category(&self, category_id: i64) -> Result<Option<ServiceCategory>> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        conn.query_row(
            "SELECT category_id, category_name FROM service_categories WHERE category_id = ?1",
            params![category_id],
            |row| {
                Ok(ServiceCategory { category_id: row.get(0)?, category_name: row.get(1)? })
            },
        )
        .optional()
        .map_err(map_sql_error)
    }

    async fn insert_service(&self, service: NewService) -> Result<Service> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        conn.execute(
            "INSERT INTO services (service_name, duration_minutes, price, category_id) \
             VALUES (?1, ?2, ?3, ?4)",
            params![
                service.service_name,
                service.duration_minutes,
                service.price,
                service.category_id
            ],
        )
        .map_err(map_sql_error)?;

        Ok(Service {
            service_id: conn.last_insert_rowid(),
            service_name: service.service_name,
            duration_minutes: service.duration_minutes,
            price: service.price,
            category_id: service.category_id,
        })
    }

    async fn find_service(&self, service_id: i64) -> Result<Option<Service>> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        conn.query_row(
            &format!("SELECT {SERVICE_COLUMNS} FROM services WHERE service_id = ?1"),
            params![service_id],
            map_service,
        )
        .optional()
        .map_err(map_sql_error)
    }

    async fn list_services(&self) -> Result<Vec<Service>> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        let mut stmt = conn
            .prepare(&format!("SELECT {SERVICE_COLUMNS} FROM services ORDER BY service_name"))
            .map_err(map_sql_error)?;
        let rows = stmt.query_map([], map_service).map_err(map_sql_error)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sql_error)
    }

    async fn update_service(&self, service_id: i64, update: UpdateServiceField) -> Result<()> {
        let conn = self.pool.get().map_err(map_pool_error)?;
        let rows = match update {
            UpdateServiceField::ServiceName(v) => conn.execute(
                "UPDATE services SET service_name = ?1 WHERE service_id = ?2",
                params![v, service_id],
            ),
            UpdateServiceField::DurationMinutes(v) => conn.execute(
                "UPDATE services SET duration_minutes = ?1 WHERE service_id = ?2",
                params![v, service_id],
            ),
            UpdateServiceField::Price(v) => conn.execute(
                "UPDATE services SET price = ?1 WHERE service_id = ?2",
                params![v, service_id],
            ),
        }
        .map_err(map_sql_error)?;

        if rows == 0 {
            return Err(SalonError::ServiceNotFound(service_id));
        }
        Ok(())
    }
}
