//! Catalog management service - masters, clients, services, loyalty

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use salonkit_domain::{
    normalize_phone, Client, DiscountLevel, Master, NewClient, NewMaster, NewService, Result,
    SalonCard, SalonError, Service, ServiceCategory, UpdateClientField, UpdateMasterField,
    UpdateServiceField,
};
use tracing::{debug, info};

use super::ports::{ClientStore, MasterStore, PurchaseRecorder, ServiceStore};

/// Catalog management service
///
/// Admin-facing CRUD over masters, clients, services and categories. Field
/// updates go through the enumerated `Update*Field` commands; phone numbers
/// are normalized before storage so the uniqueness constraints hold.
pub struct CatalogService {
    masters: Arc<dyn MasterStore>,
    clients: Arc<dyn ClientStore>,
    services: Arc<dyn ServiceStore>,
}

impl CatalogService {
    /// Create a new catalog service
    pub fn new(
        masters: Arc<dyn MasterStore>,
        clients: Arc<dyn ClientStore>,
        services: Arc<dyn ServiceStore>,
    ) -> Self {
        Self { masters, clients, services }
    }

    /// Register a master, optionally assigning service categories.
    pub async fn create_master(&self, mut master: NewMaster) -> Result<Master> {
        master.phone = normalize_phone(&master.phone);
        master.email = master.email.map(|e| e.trim().to_lowercase());

        if self.masters.find_master_by_phone(&master.phone).await?.is_some() {
            return Err(SalonError::DuplicateEntry(format!(
                "master with phone {} already exists",
                master.phone
            )));
        }

        let category_ids = std::mem::take(&mut master.category_ids);
        for category_id in &category_ids {
            self.services
                .find_category(*category_id)
                .await?
                .ok_or(SalonError::CategoryNotFound(*category_id))?;
        }

        let created = self.masters.insert_master(master).await?;
        if !category_ids.is_empty() {
            self.masters.assign_categories(created.master_id, &category_ids).await?;
        }

        info!(master_id = created.master_id, "master created");
        Ok(created)
    }

    /// Assign additional service categories to a master.
    pub async fn assign_categories_to_master(
        &self,
        master_id: i64,
        category_ids: &[i64],
    ) -> Result<()> {
        self.masters
            .find_master(master_id)
            .await?
            .ok_or(SalonError::MasterNotFound(master_id))?;

        for category_id in category_ids {
            self.services
                .find_category(*category_id)
                .await?
                .ok_or(SalonError::CategoryNotFound(*category_id))?;
        }

        self.masters.assign_categories(master_id, category_ids).await
    }

    /// Apply one enumerated field update to a master.
    pub async fn update_master(&self, master_id: i64, update: UpdateMasterField) -> Result<()> {
        self.masters
            .find_master(master_id)
            .await?
            .ok_or(SalonError::MasterNotFound(master_id))?;

        let update = match update {
            UpdateMasterField::Phone(phone) => UpdateMasterField::Phone(normalize_phone(&phone)),
            UpdateMasterField::Email(email) => {
                UpdateMasterField::Email(email.map(|e| e.trim().to_lowercase()))
            }
            other => other,
        };
        self.masters.update_master(master_id, update).await
    }

    /// Register a client and issue their salon card.
    pub async fn create_client(&self, mut client: NewClient) -> Result<Client> {
        client.phone = normalize_phone(&client.phone);
        client.email = client.email.map(|e| e.trim().to_lowercase());

        if self.clients.find_client_by_phone(&client.phone).await?.is_some() {
            return Err(SalonError::DuplicateEntry(format!(
                "client with phone {} already exists",
                client.phone
            )));
        }

        let created = self.clients.insert_client(client).await?;

        let card = SalonCard {
            client_id: created.client_id,
            discount_level: DiscountLevel::Standard,
            total_spent: 0.0,
            issue_date: Utc::now(),
        };
        self.clients.save_card(&card).await?;

        info!(client_id = created.client_id, "client created with salon card");
        Ok(created)
    }

    /// Apply one enumerated field update to a client.
    pub async fn update_client(&self, client_id: i64, update: UpdateClientField) -> Result<()> {
        self.clients
            .find_client(client_id)
            .await?
            .ok_or(SalonError::ClientNotFound(client_id))?;

        let update = match update {
            UpdateClientField::Phone(phone) => UpdateClientField::Phone(normalize_phone(&phone)),
            UpdateClientField::Email(email) => {
                UpdateClientField::Email(email.map(|e| e.trim().to_lowercase()))
            }
            other => other,
        };
        self.clients.update_client(client_id, update).await
    }

    /// Create a service category.
    pub async fn create_category(&self, category_name: &str) -> Result<ServiceCategory> {
        let name = category_name.trim();
        if name.is_empty() {
            return Err(SalonError::InvalidInput("category name must not be empty".to_string()));
        }
        self.services.insert_category(name).await
    }

    /// Create a service within an existing category.
    pub async fn create_service(&self, service: NewService) -> Result<Service> {
        if service.duration_minutes == 0 {
            return Err(SalonError::InvalidInterval(
                "service duration must be positive".to_string(),
            ));
        }
        self.services
            .find_category(service.category_id)
            .await?
            .ok_or(SalonError::CategoryNotFound(service.category_id))?;

        self.services.insert_service(service).await
    }

    /// Apply one enumerated field update to a service.
    pub async fn update_service(&self, service_id: i64, update: UpdateServiceField) -> Result<()> {
        self.services
            .find_service(service_id)
            .await?
            .ok_or(SalonError::ServiceNotFound(service_id))?;

        if let UpdateServiceField::DurationMinutes(0) = update {
            return Err(SalonError::InvalidInterval(
                "service duration must be positive".to_string(),
            ));
        }
        self.services.update_service(service_id, update).await
    }

    /// All services, ordered by name.
    pub async fn list_services(&self) -> Result<Vec<Service>> {
        self.services.list_services().await
    }
}

#[async_trait]
impl PurchaseRecorder for CatalogService {
    async fn record_purchase(&self, client_id: i64, amount: f64) -> Result<SalonCard> {
        if amount < 0.0 {
            return Err(SalonError::InvalidInput("amount must not be negative".to_string()));
        }

        let mut card = self
            .clients
            .find_card(client_id)
            .await?
            .ok_or(SalonError::ClientNotFound(client_id))?;

        let charged = card.apply_discount(amount);
        card.total_spent += charged;
        card.upgrade_level();
        self.clients.save_card(&card).await?;

        debug!(client_id, charged, level = card.discount_level.as_str(), "purchase recorded");
        Ok(card)
    }
}
