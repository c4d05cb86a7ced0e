use std::sync::Arc;

use clientes_core::{
    new_cliente_id, parse_identifier, validate_fields, validate_patch, Cliente, ClienteChanges,
    ClienteError, ClientePayload,
};

use crate::store::ClienteStore;

/// CRUD over cliente records, shared by the form and JSON surfaces.
///
/// Every operation validates first and then issues a single write; reads
/// after a write only build the response.
#[derive(Clone)]
pub struct ClienteService {
    store: Arc<dyn ClienteStore>,
}

impl ClienteService {
    pub fn new(store: Arc<dyn ClienteStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Cliente>, ClienteError> {
        Ok(self.store.find_all().await?)
    }

    pub async fn create(&self, raw: &ClientePayload) -> Result<Cliente, ClienteError> {
        let fields = validate_fields(raw).map_err(ClienteError::Validation)?;
        let id = new_cliente_id();
        self.store.insert(id, fields.clone()).await?;
        tracing::info!(id = %id, "cliente created");
        Ok(Cliente::from_fields(id, fields))
    }

    pub async fn get(&self, raw_id: &str) -> Result<Cliente, ClienteError> {
        let id = parse_identifier(raw_id)?;
        self.store
            .find_by_id(id)
            .await?
            .ok_or(ClienteError::NotFound)
    }

    /// Form update: every field is revalidated and overwritten.
    pub async fn replace(&self, raw_id: &str, raw: &ClientePayload) -> Result<Cliente, ClienteError> {
        let existing = self.get(raw_id).await?;
        let fields = validate_fields(raw).map_err(ClienteError::Validation)?;
        let changes = ClienteChanges::replace_all(fields);
        self.write_changes(existing, changes).await
    }

    /// API update: only the fields present in `raw` are validated and
    /// applied. `nombre` may be set empty here.
    pub async fn patch(&self, raw_id: &str, raw: &ClientePayload) -> Result<Cliente, ClienteError> {
        let existing = self.get(raw_id).await?;
        let changes = validate_patch(raw).map_err(|e| ClienteError::Validation(vec![e]))?;
        self.write_changes(existing, changes).await
    }

    /// Returns whether a record was deleted. A well-formed id with no record
    /// is not an error here; each surface reports it its own way.
    pub async fn delete(&self, raw_id: &str) -> Result<bool, ClienteError> {
        let id = parse_identifier(raw_id)?;
        let deleted = self.store.delete_by_id(id).await? > 0;
        if deleted {
            tracing::info!(id = %id, "cliente deleted");
        } else {
            tracing::debug!(id = %id, "delete matched no cliente");
        }
        Ok(deleted)
    }

    /// Writes `changes` and answers with the record as stored afterwards.
    async fn write_changes(
        &self,
        existing: Cliente,
        changes: ClienteChanges,
    ) -> Result<Cliente, ClienteError> {
        let id = existing.id;
        // Deleted between lookup and write.
        if !self.store.update_by_id(id, changes).await? {
            return Err(ClienteError::NotFound);
        }
        tracing::info!(id = %id, "cliente updated");
        self.store
            .find_by_id(id)
            .await?
            .ok_or(ClienteError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use anyhow::Result;
    use async_trait::async_trait;
    use clientes_core::{ClienteFields, ClienteId, Field, FieldError};

    fn service() -> ClienteService {
        ClienteService::new(Arc::new(InMemoryStore::new()))
    }

    fn ana() -> ClientePayload {
        ClientePayload {
            nombre: "Ana".into(),
            dni: "123".into(),
            email: "a@b.com".into(),
            fecha_nacimiento: "17/05/2020".into(),
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let svc = service();
        let created = svc.create(&ana()).await.unwrap();
        assert_eq!(created.fecha_nacimiento.as_deref(), Some("2020-05-17"));
        let fetched = svc.get(&created.id.to_string()).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn invalid_create_persists_nothing() {
        let svc = service();
        let raw = ClientePayload {
            nombre: "".into(),
            dni: "abc".into(),
            ..Default::default()
        };
        match svc.create(&raw).await {
            Err(ClienteError::Validation(errors)) => assert_eq!(
                errors,
                vec![FieldError::NombreRequerido, FieldError::DniNoNumerico]
            ),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_distinguishes_invalid_and_missing() {
        let svc = service();
        assert!(matches!(svc.get("zzz").await, Err(ClienteError::InvalidId(_))));
        let missing = new_cliente_id().to_string();
        assert!(matches!(svc.get(&missing).await, Err(ClienteError::NotFound)));
    }

    #[tokio::test]
    async fn replace_overwrites_every_field() {
        let svc = service();
        let created = svc.create(&ana()).await.unwrap();
        let raw = ClientePayload {
            nombre: "Ana María".into(),
            ..Default::default()
        };
        let updated = svc.replace(&created.id.to_string(), &raw).await.unwrap();
        assert_eq!(updated.nombre, "Ana María");
        assert_eq!(updated.dni, None);
        assert_eq!(updated.email, None);
        assert_eq!(updated.fecha_nacimiento, None);
        assert_eq!(svc.get(&created.id.to_string()).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn replace_requires_nombre() {
        let svc = service();
        let created = svc.create(&ana()).await.unwrap();
        let raw = ClientePayload::default();
        assert!(matches!(
            svc.replace(&created.id.to_string(), &raw).await,
            Err(ClienteError::Validation(_))
        ));
        assert_eq!(svc.get(&created.id.to_string()).await.unwrap(), created);
    }

    #[tokio::test]
    async fn patch_leaves_other_fields() {
        let svc = service();
        let created = svc.create(&ana()).await.unwrap();
        let raw = ClientePayload {
            email: "x@y.com".into(),
            ..Default::default()
        };
        let updated = svc.patch(&created.id.to_string(), &raw).await.unwrap();
        assert_eq!(updated.email.as_deref(), Some("x@y.com"));
        assert_eq!(updated.nombre, created.nombre);
        assert_eq!(updated.dni, created.dni);
        assert_eq!(updated.fecha_nacimiento, created.fecha_nacimiento);
    }

    #[tokio::test]
    async fn failed_patch_commits_nothing() {
        let svc = service();
        let created = svc.create(&ana()).await.unwrap();
        let raw = ClientePayload {
            nombre: "Otro".into(),
            fecha_nacimiento: "2020-13-01".into(),
            ..Default::default()
        };
        assert!(svc.patch(&created.id.to_string(), &raw).await.is_err());
        assert_eq!(svc.get(&created.id.to_string()).await.unwrap(), created);
    }

    #[tokio::test]
    async fn patch_null_clears_field() {
        let svc = service();
        let created = svc.create(&ana()).await.unwrap();
        let raw = ClientePayload {
            dni: Field::Null,
            ..Default::default()
        };
        let updated = svc.patch(&created.id.to_string(), &raw).await.unwrap();
        assert_eq!(updated.dni, None);
    }

    /// Store where another writer touches `email` right after every update.
    struct ConcurrentWriter(InMemoryStore);

    #[async_trait]
    impl ClienteStore for ConcurrentWriter {
        async fn insert(&self, id: ClienteId, fields: ClienteFields) -> Result<()> {
            self.0.insert(id, fields).await
        }

        async fn find_by_id(&self, id: ClienteId) -> Result<Option<Cliente>> {
            self.0.find_by_id(id).await
        }

        async fn find_all(&self) -> Result<Vec<Cliente>> {
            self.0.find_all().await
        }

        async fn update_by_id(&self, id: ClienteId, changes: ClienteChanges) -> Result<bool> {
            let matched = self.0.update_by_id(id, changes).await?;
            let other = ClienteChanges {
                email: Some(Some("otro@x.com".into())),
                ..Default::default()
            };
            self.0.update_by_id(id, other).await?;
            Ok(matched)
        }

        async fn delete_by_id(&self, id: ClienteId) -> Result<u64> {
            self.0.delete_by_id(id).await
        }
    }

    #[tokio::test]
    async fn update_answers_with_the_stored_record() {
        let svc = ClienteService::new(Arc::new(ConcurrentWriter(InMemoryStore::new())));
        let created = svc.create(&ana()).await.unwrap();
        let raw = ClientePayload {
            nombre: "Ana María".into(),
            ..Default::default()
        };
        let updated = svc.patch(&created.id.to_string(), &raw).await.unwrap();
        assert_eq!(updated.nombre, "Ana María");
        assert_eq!(updated.email.as_deref(), Some("otro@x.com"));
        assert_eq!(svc.get(&created.id.to_string()).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_went() {
        let svc = service();
        let created = svc.create(&ana()).await.unwrap();
        assert!(svc.delete(&created.id.to_string()).await.unwrap());
        assert!(!svc.delete(&created.id.to_string()).await.unwrap());
        assert!(matches!(svc.delete("nope").await, Err(ClienteError::InvalidId(_))));
    }
}
