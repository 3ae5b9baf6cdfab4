use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use super::user_repository_sqlx::{USER_COLUMNS, user_from_row};
use crate::application::ports::customer_repository::CustomerRepository;
use crate::domain::customers::customer::{Customer, CustomerAccount};
use crate::domain::users::user::Role;
use crate::infrastructure::db::{PgPool, unique_on};

const CUSTOMER_COLUMNS: &str = "c.id, c.first_name, c.last_name, c.user_id, c.created_at, c.updated_at";

fn customer_from_row(r: &PgRow) -> Customer {
    Customer {
        id: r.get("id"),
        first_name: r.get("first_name"),
        last_name: r.get("last_name"),
        user_id: r.get("user_id"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

fn account_from_row(r: &PgRow) -> anyhow::Result<CustomerAccount> {
    let user = user_from_row(r)?;
    let customer = Customer {
        id: r.get("customer_id"),
        first_name: r.get("first_name"),
        last_name: r.get("last_name"),
        user_id: user.id,
        created_at: r.get("customer_created_at"),
        updated_at: r.get("customer_updated_at"),
    };
    Ok(CustomerAccount { user, customer })
}

fn account_query(filter: &str) -> String {
    format!(
        r#"SELECT {USER_COLUMNS},
                  c.id AS customer_id, c.first_name, c.last_name,
                  c.created_at AS customer_created_at, c.updated_at AS customer_updated_at
           FROM users u
           JOIN roles r ON r.id = u.role_id
           JOIN customers c ON c.user_id = u.id
           WHERE u.deleted_at IS NULL {filter}
           ORDER BY u.id"#
    )
}

pub struct SqlxCustomerRepository {
    pub pool: PgPool,
}

impl SqlxCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for SqlxCustomerRepository {
    async fn create_account(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> anyhow::Result<CustomerAccount> {
        let mut tx = self.pool.begin().await?;
        let user_id: i64 = sqlx::query_scalar(
            r#"INSERT INTO users (email, role_id)
               SELECT $1, id FROM roles WHERE name = $2
               RETURNING id"#,
        )
        .bind(email)
        .bind(Role::Customer.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(unique_on("email"))?;
        sqlx::query("INSERT INTO customers (first_name, last_name, user_id) VALUES ($1, $2, $3)")
            .bind(first_name)
            .bind(last_name)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        let row = sqlx::query(&account_query("AND u.id = $1"))
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        account_from_row(&row)
    }

    async fn find_by_user(&self, user_id: i64) -> anyhow::Result<Option<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers c WHERE c.user_id = $1");
        let row = sqlx::query(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(customer_from_row))
    }

    async fn list_accounts(&self) -> anyhow::Result<Vec<CustomerAccount>> {
        let rows = sqlx::query(&account_query("AND r.name = $1"))
            .bind(Role::Customer.as_str())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(account_from_row).collect()
    }

    async fn get_account(&self, user_id: i64) -> anyhow::Result<Option<CustomerAccount>> {
        let row = sqlx::query(&account_query("AND u.id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(account_from_row).transpose()
    }

    async fn update_account(
        &self,
        user_id: i64,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> anyhow::Result<Option<CustomerAccount>> {
        let mut tx = self.pool.begin().await?;
        let res = sqlx::query(
            "UPDATE users SET email = $2, updated_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .bind(email)
        .execute(&mut *tx)
        .await
        .map_err(unique_on("email"))?;
        if res.rows_affected() == 0 {
            return Ok(None);
        }
        sqlx::query(
            "UPDATE customers SET first_name = $2, last_name = $3, updated_at = now() WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(first_name)
        .bind(last_name)
        .execute(&mut *tx)
        .await?;
        let row = sqlx::query(&account_query("AND u.id = $1"))
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
        tx.commit().await?;
        row.as_ref().map(account_from_row).transpose()
    }
}
