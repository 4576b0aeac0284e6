use std::collections::HashSet;

use async_trait::async_trait;
use tiberius::{AuthMethod, Client, Config, ToSql};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use crate::errors::LoadError;
use crate::models::connections::ConnectParams;
use crate::models::record::FieldValue;
use crate::models::schema::ColumnSchema;

use super::DbClient;

const COLUMNS_QUERY: &str = "\
SELECT COLUMN_NAME, IS_NULLABLE, COLUMN_DEFAULT, DATA_TYPE
FROM INFORMATION_SCHEMA.COLUMNS
WHERE TABLE_NAME = @P1";

const IDENTITY_QUERY: &str = "\
SELECT COUNT(*)
FROM sys.identity_columns
WHERE OBJECT_NAME(object_id) = @P1";

const COMPUTED_QUERY: &str = "\
SELECT name
FROM sys.computed_columns
WHERE OBJECT_NAME(object_id) = @P1";

/// Typed NULL placeholder for parameter binding.
static SQL_NULL: Option<i64> = None;

impl FieldValue {
    fn as_sql(&self) -> &dyn ToSql {
        match self {
            FieldValue::Int(i) => i,
            FieldValue::Text(s) => s,
            FieldValue::Null => &SQL_NULL,
        }
    }
}

/// TDS connection to one SQL Server instance.
///
/// Tiberius calls take `&mut self`; the loader is strictly sequential, so a
/// mutex around the client is enough.
pub struct MssqlClient {
    client: Mutex<Client<Compat<TcpStream>>>,
}

impl MssqlClient {
    pub async fn connect(params: &ConnectParams) -> Result<Self, LoadError> {
        let mut config = Config::new();
        config.host(&params.host);
        config.port(params.port);
        config.database(&params.catalog);
        config.authentication(AuthMethod::sql_server(&params.user, &params.password));
        config.trust_cert();

        let tcp = TcpStream::connect(config.get_addr())
            .await
            .map_err(|e| LoadError::Connection(e.to_string()))?;
        tcp.set_nodelay(true)
            .map_err(|e| LoadError::Connection(e.to_string()))?;

        let client = Client::connect(config, tcp.compat_write())
            .await
            .map_err(|e| LoadError::Connection(e.to_string()))?;

        Ok(Self {
            client: Mutex::new(client),
        })
    }
}

#[async_trait]
impl DbClient for MssqlClient {
    async fn table_columns(&self, table_name: &str) -> Result<Vec<ColumnSchema>, LoadError> {
        let mut client = self.client.lock().await;
        let rows = client
            .query(COLUMNS_QUERY, &[&table_name])
            .await
            .map_err(|e| LoadError::Schema(e.to_string()))?
            .into_first_result()
            .await
            .map_err(|e| LoadError::Schema(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let name: &str = row
                    .get("COLUMN_NAME")
                    .ok_or_else(|| LoadError::Schema("missing COLUMN_NAME".to_string()))?;
                let is_nullable: &str = row
                    .get("IS_NULLABLE")
                    .ok_or_else(|| LoadError::Schema("missing IS_NULLABLE".to_string()))?;
                let data_type: &str = row
                    .get("DATA_TYPE")
                    .ok_or_else(|| LoadError::Schema("missing DATA_TYPE".to_string()))?;
                let default: Option<&str> = row.get("COLUMN_DEFAULT");

                Ok(ColumnSchema {
                    name: name.to_string(),
                    data_type: data_type.to_string(),
                    is_nullable: is_nullable == "YES",
                    default: default.map(str::to_string),
                })
            })
            .collect()
    }

    async fn has_identity_column(&self, table_name: &str) -> Result<bool, LoadError> {
        let mut client = self.client.lock().await;
        let row = client
            .query(IDENTITY_QUERY, &[&table_name])
            .await
            .map_err(|e| LoadError::Schema(e.to_string()))?
            .into_row()
            .await
            .map_err(|e| LoadError::Schema(e.to_string()))?
            .ok_or_else(|| LoadError::Schema("identity count query returned no rows".to_string()))?;

        let count: i32 = row
            .get(0)
            .ok_or_else(|| LoadError::Schema("identity count was NULL".to_string()))?;
        Ok(count > 0)
    }

    async fn computed_columns(&self, table_name: &str) -> Result<HashSet<String>, LoadError> {
        let mut client = self.client.lock().await;
        let rows = client
            .query(COMPUTED_QUERY, &[&table_name])
            .await
            .map_err(|e| LoadError::Schema(e.to_string()))?
            .into_first_result()
            .await
            .map_err(|e| LoadError::Schema(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let name: &str = row
                    .get(0)
                    .ok_or_else(|| LoadError::Schema("computed column name was NULL".to_string()))?;
                Ok(name.to_string())
            })
            .collect()
    }

    async fn execute(&self, sql: &str, params: &[FieldValue]) -> Result<(), LoadError> {
        let bound: Vec<&dyn ToSql> = params.iter().map(FieldValue::as_sql).collect();

        let mut client = self.client.lock().await;
        client
            .execute(sql, &bound)
            .await
            .map_err(|e| LoadError::Execution(e.to_string()))?;
        Ok(())
    }
}
