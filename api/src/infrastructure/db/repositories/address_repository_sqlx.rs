use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgExecutor, Postgres, Row, Transaction};

use crate::application::ports::address_repository::{
    AddressRepository, AddressSession, AddressWriteMode,
};
use crate::domain::addresses::address::{Address, AddressFields};
use crate::infrastructure::db::PgPool;

const ADDRESS_COLUMNS: &str =
    "id, street1, street2, city, zip, country, is_default, customer_id, created_at, updated_at";

fn address_from_row(r: &PgRow) -> Address {
    Address {
        id: r.get("id"),
        street1: r.get("street1"),
        street2: r.get("street2"),
        city: r.get("city"),
        zip: r.get("zip"),
        country: r.get("country"),
        is_default: r.get("is_default"),
        customer_id: r.get("customer_id"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

async fn list<'e, E: PgExecutor<'e>>(e: E, customer_id: i64) -> anyhow::Result<Vec<Address>> {
    let sql = format!("SELECT {ADDRESS_COLUMNS} FROM addresses WHERE customer_id = $1 ORDER BY id");
    let rows = sqlx::query(&sql).bind(customer_id).fetch_all(e).await?;
    Ok(rows.iter().map(address_from_row).collect())
}

async fn find<'e, E: PgExecutor<'e>>(
    e: E,
    customer_id: i64,
    address_id: i64,
) -> anyhow::Result<Option<Address>> {
    let sql = format!("SELECT {ADDRESS_COLUMNS} FROM addresses WHERE customer_id = $1 AND id = $2");
    let row = sqlx::query(&sql)
        .bind(customer_id)
        .bind(address_id)
        .fetch_optional(e)
        .await?;
    Ok(row.as_ref().map(address_from_row))
}

async fn find_default<'e, E: PgExecutor<'e>>(
    e: E,
    customer_id: i64,
) -> anyhow::Result<Option<Address>> {
    let sql = format!(
        "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE customer_id = $1 AND is_default ORDER BY id LIMIT 1"
    );
    let row = sqlx::query(&sql)
        .bind(customer_id)
        .fetch_optional(e)
        .await?;
    Ok(row.as_ref().map(address_from_row))
}

async fn insert<'e, E: PgExecutor<'e>>(
    e: E,
    customer_id: i64,
    fields: &AddressFields,
    is_default: bool,
) -> anyhow::Result<Address> {
    let sql = format!(
        r#"INSERT INTO addresses (street1, street2, city, zip, country, is_default, customer_id)
           VALUES ($1, $2, $3, $4, $5, $6, $7)
           RETURNING {ADDRESS_COLUMNS}"#
    );
    let row = sqlx::query(&sql)
        .bind(&fields.street1)
        .bind(&fields.street2)
        .bind(&fields.city)
        .bind(&fields.zip)
        .bind(&fields.country)
        .bind(is_default)
        .bind(customer_id)
        .fetch_one(e)
        .await?;
    Ok(address_from_row(&row))
}

async fn save<'e, E: PgExecutor<'e>>(
    e: E,
    customer_id: i64,
    address: &Address,
) -> anyhow::Result<Address> {
    let sql = format!(
        r#"UPDATE addresses
           SET street1 = $3, street2 = $4, city = $5, zip = $6, country = $7,
               is_default = $8, updated_at = now()
           WHERE customer_id = $1 AND id = $2
           RETURNING {ADDRESS_COLUMNS}"#
    );
    let row = sqlx::query(&sql)
        .bind(customer_id)
        .bind(address.id)
        .bind(&address.street1)
        .bind(&address.street2)
        .bind(&address.city)
        .bind(&address.zip)
        .bind(&address.country)
        .bind(address.is_default)
        .fetch_optional(e)
        .await?;
    row.as_ref()
        .map(address_from_row)
        .ok_or_else(|| anyhow::anyhow!("address {} not found", address.id))
}

async fn delete<'e, E: PgExecutor<'e>>(
    e: E,
    customer_id: i64,
    address_id: i64,
) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM addresses WHERE customer_id = $1 AND id = $2")
        .bind(customer_id)
        .bind(address_id)
        .execute(e)
        .await?;
    Ok(res.rows_affected() > 0)
}

enum Conn {
    Pool(PgPool),
    Tx(Transaction<'static, Postgres>),
}

// Calls `$f` with the session executor and customer id.
macro_rules! on_conn {
    ($session:expr, $f:ident($($arg:expr),*)) => {
        match &mut $session.conn {
            Conn::Pool(pool) => $f(&*pool, $session.customer_id $(, $arg)*).await,
            Conn::Tx(tx) => $f(&mut **tx, $session.customer_id $(, $arg)*).await,
        }
    };
}

pub struct SqlxAddressSession {
    conn: Conn,
    customer_id: i64,
}

#[async_trait]
impl AddressSession for SqlxAddressSession {
    async fn list(&mut self) -> anyhow::Result<Vec<Address>> {
        on_conn!(self, list())
    }

    async fn find(&mut self, address_id: i64) -> anyhow::Result<Option<Address>> {
        on_conn!(self, find(address_id))
    }

    async fn find_default(&mut self) -> anyhow::Result<Option<Address>> {
        on_conn!(self, find_default())
    }

    async fn insert(
        &mut self,
        fields: &AddressFields,
        is_default: bool,
    ) -> anyhow::Result<Address> {
        on_conn!(self, insert(fields, is_default))
    }

    async fn save(&mut self, address: &Address) -> anyhow::Result<Address> {
        on_conn!(self, save(address))
    }

    async fn delete(&mut self, address_id: i64) -> anyhow::Result<bool> {
        on_conn!(self, delete(address_id))
    }

    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        if let Conn::Tx(tx) = self.conn {
            tx.commit().await?;
        }
        Ok(())
    }
}

pub struct SqlxAddressRepository {
    pub pool: PgPool,
}

impl SqlxAddressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AddressRepository for SqlxAddressRepository {
    async fn open(
        &self,
        customer_id: i64,
        mode: AddressWriteMode,
    ) -> anyhow::Result<Box<dyn AddressSession>> {
        let conn = match mode {
            AddressWriteMode::Sequential => Conn::Pool(self.pool.clone()),
            AddressWriteMode::Atomic => {
                let mut tx = self.pool.begin().await?;
                // Serializes concurrent sessions of the same customer.
                sqlx::query("SELECT id FROM customers WHERE id = $1 FOR UPDATE")
                    .bind(customer_id)
                    .fetch_optional(&mut *tx)
                    .await?;
                Conn::Tx(tx)
            }
        };
        Ok(Box::new(SqlxAddressSession { conn, customer_id }))
    }

    async fn owner_of(&self, address_id: i64) -> anyhow::Result<Option<i64>> {
        let owner = sqlx::query_scalar::<_, i64>("SELECT customer_id FROM addresses WHERE id = $1")
            .bind(address_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(owner)
    }
}
