use std::collections::BTreeMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clientes_core::{parse_identifier, Cliente, ClienteChanges, ClienteFields, ClienteId};
use serde::{Deserialize, Serialize};
use surrealdb::{
    engine::any::{connect, Any},
    Surreal,
};

use crate::store::ClienteStore;

const NAMESPACE: &str = "clientes";
const DATABASE: &str = "clientesdb";

/// Embedded SurrealDB holding the `cliente` table.
#[derive(Clone)]
pub struct SurrealStore {
    inner: Surreal<Any>,
}

/// Stored document body. The record id lives in the SurrealDB record key.
#[derive(Debug, Serialize, Deserialize)]
struct ClienteDoc {
    nombre: String,
    dni: Option<String>,
    email: Option<String>,
    fecha_nacimiento: Option<String>,
}

impl From<ClienteFields> for ClienteDoc {
    fn from(f: ClienteFields) -> Self {
        Self {
            nombre: f.nombre,
            dni: f.dni,
            email: f.email,
            fecha_nacimiento: f.fecha_nacimiento,
        }
    }
}

/// Row shape of the projection in `SELECT_FIELDS`.
#[derive(Debug, Deserialize)]
struct ClienteRow {
    id: String,
    nombre: String,
    dni: Option<String>,
    email: Option<String>,
    fecha_nacimiento: Option<String>,
}

impl TryFrom<ClienteRow> for Cliente {
    type Error = anyhow::Error;

    fn try_from(row: ClienteRow) -> Result<Self> {
        let id = parse_identifier(&row.id)
            .with_context(|| format!("stored cliente has a foreign key {:?}", row.id))?;
        Ok(Cliente {
            id,
            nombre: row.nombre,
            dni: row.dni,
            email: row.email,
            fecha_nacimiento: row.fecha_nacimiento,
        })
    }
}

const SELECT_FIELDS: &str = "record::id(id) AS id, nombre, dni, email, fecha_nacimiento";

impl SurrealStore {
    /// Connects to `endpoint`, e.g. `surrealkv://.clientes/db` or `mem://`.
    pub async fn connect(endpoint: &str) -> Result<Self> {
        // The `any` engine picks the backend from the endpoint scheme.
        let inner = connect(endpoint)
            .await
            .with_context(|| format!("connecting to {endpoint}"))?;
        inner
            .use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .context("selecting surreal namespace/db")?;
        Ok(Self { inner })
    }

    /// Defines the table and its indexes.
    pub async fn apply_schema(&self) -> Result<()> {
        let schema = include_str!("../schema.surql");
        self.inner
            .query(schema)
            .await
            .context("applying schema")?
            .check()
            .context("applying schema")?;
        Ok(())
    }
}

#[async_trait]
impl ClienteStore for SurrealStore {
    async fn insert(&self, id: ClienteId, fields: ClienteFields) -> Result<()> {
        self.inner
            .query("CREATE type::thing('cliente', $id) CONTENT $doc RETURN NONE;")
            .bind(("id", id.as_key()))
            .bind(("doc", ClienteDoc::from(fields)))
            .await?
            .check()
            .with_context(|| format!("inserting cliente {id}"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: ClienteId) -> Result<Option<Cliente>> {
        let mut res = self
            .inner
            .query(format!(
                "SELECT {SELECT_FIELDS} FROM type::thing('cliente', $id);"
            ))
            .bind(("id", id.as_key()))
            .await?;
        let row: Option<ClienteRow> = res.take(0)?;
        row.map(Cliente::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Cliente>> {
        let mut res = self
            .inner
            .query(format!("SELECT {SELECT_FIELDS} FROM cliente ORDER BY id ASC;"))
            .await?;
        let rows: Vec<ClienteRow> = res.take(0)?;
        rows.into_iter().map(Cliente::try_from).collect()
    }

    async fn update_by_id(&self, id: ClienteId, changes: ClienteChanges) -> Result<bool> {
        let mut res = self
            .inner
            .query("UPDATE type::thing('cliente', $id) MERGE $patch RETURN AFTER;")
            .bind(("id", id.as_key()))
            .bind(("patch", merge_patch(changes)))
            .await?;
        let updated: Vec<ClienteDoc> = res.take(0)?;
        Ok(!updated.is_empty())
    }

    async fn delete_by_id(&self, id: ClienteId) -> Result<u64> {
        let mut res = self
            .inner
            .query("DELETE type::thing('cliente', $id) RETURN BEFORE;")
            .bind(("id", id.as_key()))
            .await?;
        let deleted: Vec<ClienteDoc> = res.take(0)?;
        Ok(deleted.len() as u64)
    }
}

/// Object for `MERGE`: touched fields only; a cleared field is sent as NONE,
/// which removes it from the document.
fn merge_patch(changes: ClienteChanges) -> BTreeMap<String, Option<String>> {
    let mut patch = BTreeMap::new();
    if let Some(nombre) = changes.nombre {
        patch.insert("nombre".to_string(), Some(nombre));
    }
    if let Some(dni) = changes.dni {
        patch.insert("dni".to_string(), dni);
    }
    if let Some(email) = changes.email {
        patch.insert("email".to_string(), email);
    }
    if let Some(fecha) = changes.fecha_nacimiento {
        patch.insert("fecha_nacimiento".to_string(), fecha);
    }
    patch
}
