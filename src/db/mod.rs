pub mod models;

use std::sync::Arc;

use sqlx::{
    mysql::{MySqlArguments, MySqlConnectOptions, MySqlPoolOptions},
    query::Query,
    MySql, MySqlPool,
};
use tokio::sync::Semaphore;
use tracing::info;

use crate::config::DatabaseConfig;

use self::models::{FieldValue, SensorReading};

/// Shared handle to the readings database.
///
/// Requests queue on `slots` (one permit per pooled connection, FIFO, no
/// depth limit) before touching the pool, so the pool's acquire deadline only
/// ever bounds connection setup. A stopped server fails fast instead of
/// leaving requests parked behind a long acquire timeout.
#[derive(Debug, Clone)]
pub struct Database {
    pool: MySqlPool,
    slots: Arc<Semaphore>,
}

impl Database {
    /// Wraps an existing pool, sizing the queue to its connection limit.
    pub fn new(pool: MySqlPool) -> Self {
        let permits = pool.options().get_max_connections() as usize;
        Self {
            pool,
            slots: Arc::new(Semaphore::new(permits.max(1))),
        }
    }

    /// Builds the pool lazily, so startup does not depend on the database
    /// being reachable.
    pub fn connect(config: &DatabaseConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name);

        info!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            max_connections = config.max_connections,
            connect_timeout_secs = config.connect_timeout.as_secs(),
            "Creating database connection pool"
        );

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_lazy_with(options);

        Self::new(pool)
    }

    /// Inserts one reading and returns the id the storage engine assigned to it.
    /// Waits for a free slot first when every connection is busy.
    pub async fn insert_reading(&self, reading: &SensorReading) -> Result<u64, sqlx::Error> {
        let _slot = self
            .slots
            .acquire()
            .await
            .map_err(|_| sqlx::Error::PoolClosed)?;

        insert_reading(&self.pool, reading).await
    }

    /// Waits for checked-out connections to be returned, then closes the pool.
    pub async fn close(self) {
        info!("Closing database connection pool");
        self.slots.close();
        self.pool.close().await;
    }
}

/// Inserts one reading on `pool`, binding each field in the shape it was posted.
pub async fn insert_reading(pool: &MySqlPool, reading: &SensorReading) -> Result<u64, sqlx::Error> {
    let query = sqlx::query(
        r#"
        INSERT INTO LEITURA_SENSOR (status, mensagem, temperatura, valorMQ2, id_sensor)
        VALUES (?, ?, ?, ?, ?)
        "#,
    );

    let query = [
        &reading.status,
        &reading.message,
        &reading.temperature,
        &reading.gas_value,
        &reading.sensor_id,
    ]
    .into_iter()
    .fold(query, bind_field);

    Ok(query.execute(pool).await?.last_insert_id())
}

fn bind_field<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &'q Option<FieldValue>,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        None => query.bind(None::<&str>),
        Some(FieldValue::Int(v)) => query.bind(*v),
        Some(FieldValue::Float(v)) => query.bind(*v),
        Some(FieldValue::Bool(v)) => query.bind(*v),
        Some(FieldValue::Text(s)) => query.bind(s.as_str()),
    }
}
