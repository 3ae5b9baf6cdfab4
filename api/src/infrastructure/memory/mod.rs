//! Process-local implementation of every repository port.
//!
//! Backs `DATABASE_BACKEND=memory` and the test suite. Ids are allocated per
//! table starting at 1, like Postgres serial columns.

mod addresses;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use crate::application::ports::UniqueViolation;
use crate::application::ports::category_repository::CategoryRepository;
use crate::application::ports::customer_repository::CustomerRepository;
use crate::application::ports::health_probe::HealthProbe;
use crate::application::ports::product_repository::ProductRepository;
use crate::application::ports::setting_repository::SettingRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::addresses::address::Address;
use crate::domain::catalog::category::{Category, CategoryFields};
use crate::domain::catalog::product::{Product, ProductFields};
use crate::domain::customers::customer::{Customer, CustomerAccount};
use crate::domain::settings::setting::Setting;
use crate::domain::users::user::{Role, User};

pub use addresses::MemoryAddressSession;

const ADMIN_ROLE_ID: i64 = 1;
const CUSTOMER_ROLE_ID: i64 = 2;

#[derive(Default)]
struct Sequences {
    users: i64,
    customers: i64,
    addresses: i64,
    products: i64,
    categories: i64,
}

fn next(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

#[derive(Default)]
struct State {
    seq: Sequences,
    users: Vec<User>,
    customers: Vec<Customer>,
    addresses: Vec<Address>,
    products: Vec<Product>,
    categories: Vec<Category>,
    // (product_id, category_id)
    product_categories: Vec<(i64, i64)>,
    settings: Vec<Setting>,
}

struct Inner {
    state: Mutex<State>,
    // One lock per customer; serializes that customer's atomic address sessions.
    address_locks: Mutex<HashMap<i64, Arc<tokio::sync::Mutex<()>>>>,
}

#[derive(Clone)]
pub struct MemoryDatabase {
    inner: Arc<Inner>,
}

impl Default for MemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State::default()),
                address_locks: Mutex::new(HashMap::new()),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn address_lock(&self, customer_id: i64) -> Arc<tokio::sync::Mutex<()>> {
        self.inner
            .address_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(customer_id)
            .or_default()
            .clone()
    }
}

fn role_id(role: Role) -> i64 {
    match role {
        Role::Admin => ADMIN_ROLE_ID,
        Role::Customer => CUSTOMER_ROLE_ID,
    }
}

fn insert_user(state: &mut State, email: &str, password_hash: Option<&str>, role: Role) -> User {
    let now = Utc::now();
    let user = User {
        id: next(&mut state.seq.users),
        email: email.to_string(),
        password_hash: password_hash.map(str::to_string),
        role_id: role_id(role),
        role,
        deleted_at: None,
        created_at: now,
        updated_at: now,
    };
    state.users.push(user.clone());
    user
}

fn account_of(state: &State, user_id: i64) -> Option<CustomerAccount> {
    let user = state
        .users
        .iter()
        .find(|u| u.id == user_id && u.is_active())?;
    let customer = state.customers.iter().find(|c| c.user_id == user_id)?;
    Some(CustomerAccount {
        user: user.clone(),
        customer: customer.clone(),
    })
}

#[async_trait]
impl UserRepository for MemoryDatabase {
    async fn create_user(
        &self,
        email: &str,
        password_hash: Option<&str>,
        role: Role,
    ) -> anyhow::Result<User> {
        let mut state = self.state();
        if state.users.iter().any(|u| u.email == email) {
            return Err(UniqueViolation { field: "email" }.into());
        }
        Ok(insert_user(&mut state, email, password_hash, role))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.state().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        Ok(self.state().users.iter().find(|u| u.id == id).cloned())
    }

    async fn email_taken(&self, email: &str, except: Option<i64>) -> anyhow::Result<bool> {
        Ok(self
            .state()
            .users
            .iter()
            .any(|u| u.email == email && Some(u.id) != except))
    }

    async fn soft_delete(&self, id: i64) -> anyhow::Result<bool> {
        let mut state = self.state();
        match state
            .users
            .iter_mut()
            .find(|u| u.id == id && u.is_active())
        {
            Some(user) => {
                let now = Utc::now();
                user.deleted_at = Some(now);
                user.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl CustomerRepository for MemoryDatabase {
    async fn create_account(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> anyhow::Result<CustomerAccount> {
        let mut state = self.state();
        if state.users.iter().any(|u| u.email == email) {
            return Err(UniqueViolation { field: "email" }.into());
        }
        let user = insert_user(&mut state, email, None, Role::Customer);
        let customer = Customer {
            id: next(&mut state.seq.customers),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            user_id: user.id,
            created_at: user.created_at,
            updated_at: user.created_at,
        };
        state.customers.push(customer.clone());
        Ok(CustomerAccount { user, customer })
    }

    async fn find_by_user(&self, user_id: i64) -> anyhow::Result<Option<Customer>> {
        Ok(self
            .state()
            .customers
            .iter()
            .find(|c| c.user_id == user_id)
            .cloned())
    }

    async fn list_accounts(&self) -> anyhow::Result<Vec<CustomerAccount>> {
        let state = self.state();
        Ok(state
            .users
            .iter()
            .filter(|u| u.role == Role::Customer)
            .filter_map(|u| account_of(&state, u.id))
            .collect())
    }

    async fn get_account(&self, user_id: i64) -> anyhow::Result<Option<CustomerAccount>> {
        Ok(account_of(&self.state(), user_id))
    }

    async fn update_account(
        &self,
        user_id: i64,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> anyhow::Result<Option<CustomerAccount>> {
        let mut state = self.state();
        if account_of(&state, user_id).is_none() {
            return Ok(None);
        }
        if state.users.iter().any(|u| u.email == email && u.id != user_id) {
            return Err(UniqueViolation { field: "email" }.into());
        }
        let now = Utc::now();
        if let Some(user) = state.users.iter_mut().find(|u| u.id == user_id) {
            user.email = email.to_string();
            user.updated_at = now;
        }
        if let Some(customer) = state.customers.iter_mut().find(|c| c.user_id == user_id) {
            customer.first_name = first_name.to_string();
            customer.last_name = last_name.to_string();
            customer.updated_at = now;
        }
        Ok(account_of(&state, user_id))
    }
}

#[async_trait]
impl ProductRepository for MemoryDatabase {
    async fn list(&self) -> anyhow::Result<Vec<Product>> {
        Ok(self.state().products.clone())
    }

    async fn find(&self, id: i64) -> anyhow::Result<Option<Product>> {
        Ok(self.state().products.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, fields: &ProductFields) -> anyhow::Result<Product> {
        let mut state = self.state();
        let now = Utc::now();
        let product = Product {
            id: next(&mut state.seq.products),
            name: fields.name.clone(),
            description: fields.description.clone(),
            created_at: now,
            updated_at: now,
        };
        state.products.push(product.clone());
        if let Some(ids) = &fields.category_ids {
            link_categories(&mut state, product.id, ids);
        }
        Ok(product)
    }

    async fn update(&self, id: i64, fields: &ProductFields) -> anyhow::Result<Option<Product>> {
        let mut state = self.state();
        let Some(product) = state.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        product.name = fields.name.clone();
        product.description = fields.description.clone();
        product.updated_at = Utc::now();
        let product = product.clone();
        if let Some(ids) = &fields.category_ids {
            link_categories(&mut state, id, ids);
        }
        Ok(Some(product))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let mut state = self.state();
        let before = state.products.len();
        state.products.retain(|p| p.id != id);
        state.product_categories.retain(|(p, _)| *p != id);
        Ok(state.products.len() != before)
    }

    async fn categories_of(&self, id: i64) -> anyhow::Result<Vec<Category>> {
        let state = self.state();
        Ok(state
            .categories
            .iter()
            .filter(|c| state.product_categories.contains(&(id, c.id)))
            .cloned()
            .collect())
    }
}

fn link_categories(state: &mut State, product_id: i64, category_ids: &[i64]) {
    state.product_categories.retain(|(p, _)| *p != product_id);
    for cid in category_ids {
        if !state.product_categories.contains(&(product_id, *cid)) {
            state.product_categories.push((product_id, *cid));
        }
    }
}

#[async_trait]
impl CategoryRepository for MemoryDatabase {
    async fn list(&self) -> anyhow::Result<Vec<Category>> {
        Ok(self.state().categories.clone())
    }

    async fn find(&self, id: i64) -> anyhow::Result<Option<Category>> {
        Ok(self.state().categories.iter().find(|c| c.id == id).cloned())
    }

    async fn create(&self, fields: &CategoryFields) -> anyhow::Result<Category> {
        let mut state = self.state();
        let now = Utc::now();
        let category = Category {
            id: next(&mut state.seq.categories),
            name: fields.name.clone(),
            description: fields.description.clone(),
            created_at: now,
            updated_at: now,
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn update(&self, id: i64, fields: &CategoryFields) -> anyhow::Result<Option<Category>> {
        let mut state = self.state();
        Ok(state
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .map(|category| {
                category.name = fields.name.clone();
                category.description = fields.description.clone();
                category.updated_at = Utc::now();
                category.clone()
            }))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let mut state = self.state();
        let before = state.categories.len();
        state.categories.retain(|c| c.id != id);
        state.product_categories.retain(|(_, c)| *c != id);
        Ok(state.categories.len() != before)
    }

    async fn existing_ids(&self, ids: &[i64]) -> anyhow::Result<Vec<i64>> {
        let state = self.state();
        Ok(ids
            .iter()
            .copied()
            .filter(|id| state.categories.iter().any(|c| c.id == *id))
            .collect())
    }
}

#[async_trait]
impl SettingRepository for MemoryDatabase {
    async fn list(&self) -> anyhow::Result<Vec<Setting>> {
        Ok(self.state().settings.clone())
    }

    async fn find(&self, key: &str) -> anyhow::Result<Option<Setting>> {
        Ok(self.state().settings.iter().find(|s| s.key == key).cloned())
    }

    async fn create(&self, key: &str, value: &str) -> anyhow::Result<Setting> {
        let mut state = self.state();
        if state.settings.iter().any(|s| s.key == key) {
            return Err(UniqueViolation { field: "key" }.into());
        }
        let now = Utc::now();
        let setting = Setting {
            key: key.to_string(),
            value: value.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.settings.push(setting.clone());
        Ok(setting)
    }

    async fn update(&self, key: &str, value: &str) -> anyhow::Result<Option<Setting>> {
        let mut state = self.state();
        Ok(state
            .settings
            .iter_mut()
            .find(|s| s.key == key)
            .map(|setting| {
                setting.value = value.to_string();
                setting.updated_at = Utc::now();
                setting.clone()
            }))
    }

    async fn delete(&self, key: &str) -> anyhow::Result<bool> {
        let mut state = self.state();
        let before = state.settings.len();
        state.settings.retain(|s| s.key != key);
        Ok(state.settings.len() != before)
    }
}

#[async_trait]
impl HealthProbe for MemoryDatabase {
    async fn ping(&self) -> bool {
        true
    }
}
