//! Port interfaces for catalog storage (masters, clients, services)

use async_trait::async_trait;
use salonkit_domain::{
    Client, Master, NewClient, NewMaster, NewService, Result, SalonCard, Service, ServiceCategory,
    UpdateClientField, UpdateMasterField, UpdateServiceField,
};

/// Trait for persisting masters and their category assignments
#[async_trait]
pub trait MasterStore: Send + Sync {
    /// Insert a master (without category assignments).
    async fn insert_master(&self, master: NewMaster) -> Result<Master>;

    /// Look up a master by id.
    async fn find_master(&self, master_id: i64) -> Result<Option<Master>>;

    /// Look up a master by normalized phone number.
    async fn find_master_by_phone(&self, phone: &str) -> Result<Option<Master>>;

    /// Apply a single enumerated field update.
    async fn update_master(&self, master_id: i64, update: UpdateMasterField) -> Result<()>;

    /// Assign service categories to a master (idempotent per pair).
    async fn assign_categories(&self, master_id: i64, category_ids: &[i64]) -> Result<()>;

    /// The category ids a master is qualified for.
    async fn category_ids_for(&self, master_id: i64) -> Result<Vec<i64>>;

    /// All masters assigned to a category.
    async fn list_masters_in_category(&self, category_id: i64) -> Result<Vec<Master>>;
}

/// Trait for persisting clients and their salon cards
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Insert a client.
    async fn insert_client(&self, client: NewClient) -> Result<Client>;

    /// Look up a client by id.
    async fn find_client(&self, client_id: i64) -> Result<Option<Client>>;

    /// Look up a client by normalized phone number.
    async fn find_client_by_phone(&self, phone: &str) -> Result<Option<Client>>;

    /// Apply a single enumerated field update.
    async fn update_client(&self, client_id: i64, update: UpdateClientField) -> Result<()>;

    /// Look up the salon card of a client.
    async fn find_card(&self, client_id: i64) -> Result<Option<SalonCard>>;

    /// Upsert a salon card.
    async fn save_card(&self, card: &SalonCard) -> Result<()>;
}

/// Trait for persisting services and categories
#[async_trait]
pub trait ServiceStore: Send + Sync {
    /// Insert a category with a unique name.
    async fn insert_category(&self, category_name: &str) -> Result<ServiceCategory>;

    /// Look up a category by id.
    async fn find_category(&self, category_id: i64) -> Result<Option<ServiceCategory>>;

    /// Insert a service.
    async fn insert_service(&self, service: NewService) -> Result<Service>;

    /// Look up a service by id.
    async fn find_service(&self, service_id: i64) -> Result<Option<Service>>;

    /// All services, ordered by name.
    async fn list_services(&self) -> Result<Vec<Service>>;

    /// Apply a single enumerated field update.
    async fn update_service(&self, service_id: i64, update: UpdateServiceField) -> Result<()>;
}

/// Purchase/loyalty recorder invoked by calling workflows after an
/// appointment transitions to `Completed`. Never wired into the lifecycle
/// state machine itself.
#[async_trait]
pub trait PurchaseRecorder: Send + Sync {
    /// Record a purchase: apply the card discount, accumulate the spend and
    /// upgrade the tier. Returns the updated card.
    async fn record_purchase(&self, client_id: i64, amount: f64) -> Result<SalonCard>;
}
