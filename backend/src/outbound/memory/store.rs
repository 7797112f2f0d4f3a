//! Process-local store implementing every repository port.
//!
//! One mutex guards all tables, so multi-table operations (import, order
//! placement) are atomic the same way the Diesel transactions are.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::domain::ports::{
    CatalogueRepository, CatalogueRepositoryError, NewUser, OrderRepository, OrderRepositoryError,
    RecoveryRepository, RecoveryRepositoryError, StoredCredentials, UserRepository,
    UserRepositoryError,
};
use crate::domain::{
    CatalogueItem, CatalogueItemId, CartLine, DisplayName, EmailAddress, NewCatalogueItem,
    NewOrder, NewRecoveryItem, OrderId, OrderSummary, PasswordHash, PaymentReference,
    RecoveryItem, RecoveryItemId, RecoveryStatus, Role, User, UserId,
};

#[derive(Debug, Clone)]
struct StoredOrder {
    user_id: UserId,
    total: Decimal,
    reference: PaymentReference,
    lines: Vec<CartLine>,
}

/// Order as held in the ledger, with its lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub id: OrderId,
    pub user_id: UserId,
    pub total: Decimal,
    pub lines: Vec<CartLine>,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i32, StoredCredentials>,
    catalogue: BTreeMap<i32, CatalogueItem>,
    recovery: BTreeMap<i32, RecoveryItem>,
    orders: BTreeMap<i32, StoredOrder>,
    last_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn user_id_by_email(&self, email: &EmailAddress) -> Option<i32> {
        self.users
            .iter()
            .find(|(_, stored)| &stored.user.email == email)
            .map(|(id, _)| *id)
    }
}

/// In-memory storefront state.
///
/// Identifiers come from one shared sequence, so ids are unique across
/// tables as well as within them.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, String> {
        self.tables
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }
}

/// Newest first, ties broken by the higher id.
fn newest_first<T>(mut items: Vec<T>, key: impl Fn(&T) -> (chrono::DateTime<Utc>, i32)) -> Vec<T> {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
    items
}

#[async_trait]
impl CatalogueRepository for MemoryStore {
    async fn list_newest_first(&self) -> Result<Vec<CatalogueItem>, CatalogueRepositoryError> {
        let tables = self.lock().map_err(CatalogueRepositoryError::connection)?;
        let items = tables.catalogue.values().cloned().collect();
        Ok(newest_first(items, |item| (item.created_at, item.id.get())))
    }

    async fn create(
        &self,
        item: NewCatalogueItem,
    ) -> Result<CatalogueItem, CatalogueRepositoryError> {
        let mut tables = self.lock().map_err(CatalogueRepositoryError::connection)?;
        let id = tables.next_id();
        let stored = CatalogueItem {
            id: CatalogueItemId::new(id),
            title: item.title,
            booking_code: item.booking_code,
            price: item.price,
            league: item.league,
            description: item.description,
            created_at: Utc::now(),
        };
        tables.catalogue.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: CatalogueItemId) -> Result<(), CatalogueRepositoryError> {
        let mut tables = self.lock().map_err(CatalogueRepositoryError::connection)?;
        if tables.catalogue.remove(&id.get()).is_none() {
            return Err(CatalogueRepositoryError::not_found(id.get()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecoveryRepository for MemoryStore {
    async fn list_all(&self) -> Result<Vec<RecoveryItem>, RecoveryRepositoryError> {
        let tables = self.lock().map_err(RecoveryRepositoryError::connection)?;
        let items = tables.recovery.values().cloned().collect();
        Ok(newest_first(items, |item| (item.created_at, item.id.get())))
    }

    async fn list_approved(&self) -> Result<Vec<RecoveryItem>, RecoveryRepositoryError> {
        let tables = self.lock().map_err(RecoveryRepositoryError::connection)?;
        let items = tables
            .recovery
            .values()
            .filter(|item| item.status.is_approved())
            .cloned()
            .collect();
        Ok(newest_first(items, |item| (item.created_at, item.id.get())))
    }

    async fn create(&self, item: NewRecoveryItem) -> Result<RecoveryItem, RecoveryRepositoryError> {
        let mut tables = self.lock().map_err(RecoveryRepositoryError::connection)?;
        let id = tables.next_id();
        let stored = RecoveryItem {
            id: RecoveryItemId::new(id),
            title: item.title,
            booking_code: item.booking_code,
            price: item.price,
            league: item.league,
            description: item.description,
            status: RecoveryStatus::Pending,
            created_at: Utc::now(),
        };
        tables.recovery.insert(id, stored.clone());
        Ok(stored)
    }

    async fn approve(&self, id: RecoveryItemId) -> Result<RecoveryItem, RecoveryRepositoryError> {
        let mut tables = self.lock().map_err(RecoveryRepositoryError::connection)?;
        let item = tables
            .recovery
            .get_mut(&id.get())
            .ok_or_else(|| RecoveryRepositoryError::not_found(id.get()))?;
        item.status = RecoveryStatus::Approved;
        Ok(item.clone())
    }

    async fn delete(&self, id: RecoveryItemId) -> Result<(), RecoveryRepositoryError> {
        let mut tables = self.lock().map_err(RecoveryRepositoryError::connection)?;
        tables
            .recovery
            .remove(&id.get())
            .map(|_| ())
            .ok_or_else(|| RecoveryRepositoryError::not_found(id.get()))
    }

    async fn import(&self, id: RecoveryItemId) -> Result<CatalogueItem, RecoveryRepositoryError> {
        let mut tables = self.lock().map_err(RecoveryRepositoryError::connection)?;
        let staged = tables
            .recovery
            .get(&id.get())
            .ok_or_else(|| RecoveryRepositoryError::not_found(id.get()))?;
        if !staged.status.is_approved() {
            return Err(RecoveryRepositoryError::not_approved(id.get()));
        }
        let staged = staged.clone();

        let catalogue_id = tables.next_id();
        let published = CatalogueItem {
            id: CatalogueItemId::new(catalogue_id),
            title: staged.title,
            booking_code: staged.booking_code,
            price: staged.price,
            league: staged.league,
            description: staged.description,
            created_at: staged.created_at,
        };
        tables.catalogue.insert(catalogue_id, published.clone());
        tables.recovery.remove(&id.get());
        Ok(published)
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn place(&self, order: NewOrder) -> Result<OrderId, OrderRepositoryError> {
        let mut tables = self.lock().map_err(OrderRepositoryError::connection)?;
        if tables
            .orders
            .values()
            .any(|stored| stored.reference == order.payment_reference)
        {
            return Err(OrderRepositoryError::duplicate_reference(
                order.payment_reference.to_string(),
            ));
        }
        if let Some(missing) = order
            .cart
            .item_ids()
            .into_iter()
            .find(|id| !tables.catalogue.contains_key(&id.get()))
        {
            return Err(OrderRepositoryError::unknown_item(missing.get()));
        }

        let id = tables.next_id();
        tables.orders.insert(
            id,
            StoredOrder {
                user_id: order.user_id,
                total: order.total,
                reference: order.payment_reference,
                lines: order.cart.lines().to_vec(),
            },
        );
        Ok(OrderId::new(id))
    }

    async fn find_by_reference(
        &self,
        reference: &PaymentReference,
    ) -> Result<Option<OrderSummary>, OrderRepositoryError> {
        let tables = self.lock().map_err(OrderRepositoryError::connection)?;
        Ok(tables
            .orders
            .iter()
            .find(|(_, stored)| &stored.reference == reference)
            .map(|(id, stored)| OrderSummary {
                id: OrderId::new(*id),
                user_id: stored.user_id,
            }))
    }

    async fn owned_item_ids(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CatalogueItemId>, OrderRepositoryError> {
        let tables = self.lock().map_err(OrderRepositoryError::connection)?;
        let owned: BTreeSet<CatalogueItemId> = tables
            .orders
            .values()
            .filter(|stored| stored.user_id == user_id)
            .flat_map(|stored| stored.lines.iter().map(|line| line.item_id))
            .collect();
        Ok(owned.into_iter().collect())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, UserRepositoryError> {
        self.seed_user(user.name, user.email, user.password_hash, user.role)
    }

    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let tables = self.lock().map_err(UserRepositoryError::connection)?;
        Ok(tables
            .user_id_by_email(email)
            .and_then(|id| tables.users.get(&id))
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let tables = self.lock().map_err(UserRepositoryError::connection)?;
        Ok(tables.users.get(&id.get()).map(|stored| stored.user.clone()))
    }

    async fn update_name(
        &self,
        id: UserId,
        name: &DisplayName,
    ) -> Result<User, UserRepositoryError> {
        let mut tables = self.lock().map_err(UserRepositoryError::connection)?;
        let stored = tables
            .users
            .get_mut(&id.get())
            .ok_or_else(|| UserRepositoryError::not_found(id.to_string()))?;
        stored.user.name = name.clone();
        Ok(stored.user.clone())
    }

    async fn set_role(&self, email: &EmailAddress, role: Role) -> Result<User, UserRepositoryError> {
        let mut tables = self.lock().map_err(UserRepositoryError::connection)?;
        let stored = tables
            .user_id_by_email(email)
            .and_then(|id| tables.users.get_mut(&id))
            .ok_or_else(|| UserRepositoryError::not_found(email.to_string()))?;
        stored.user.role = role;
        Ok(stored.user.clone())
    }
}

impl MemoryStore {
    /// Seed an account directly, bypassing registration.
    ///
    /// Lets a fresh in-memory deployment or a test start with an admin.
    ///
    /// # Errors
    ///
    /// Fails when the email is already taken.
    pub fn seed_user(
        &self,
        name: DisplayName,
        email: EmailAddress,
        password_hash: PasswordHash,
        role: Role,
    ) -> Result<User, UserRepositoryError> {
        let mut tables = self.lock().map_err(UserRepositoryError::connection)?;
        if tables.user_id_by_email(&email).is_some() {
            return Err(UserRepositoryError::duplicate_email(email.to_string()));
        }
        let id = tables.next_id();
        let user = User {
            id: UserId::new(id),
            name,
            email,
            role,
            is_active: true,
        };
        tables.users.insert(
            id,
            StoredCredentials {
                user: user.clone(),
                password_hash,
            },
        );
        Ok(user)
    }

    /// Snapshot of the order ledger in id order.
    pub fn orders(&self) -> Vec<OrderRecord> {
        self.lock()
            .map(|tables| {
                tables
                    .orders
                    .iter()
                    .map(|(id, stored)| OrderRecord {
                        id: OrderId::new(*id),
                        user_id: stored.user_id,
                        total: stored.total,
                        lines: stored.lines.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
