//! Product CRUD service.

use common::{Money, ProductId};
use store::{EntityStore, ProductRecord, StoreError};

use crate::error::DomainError;

/// Validated product fields for create and update.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub price: Money,
    pub description: Option<String>,
    pub stock: u32,
}

/// Service for managing products.
pub struct ProductService<S: EntityStore> {
    store: S,
}

impl<S: EntityStore> ProductService<S> {
    /// Creates a new product service with the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns all products.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ProductRecord>, DomainError> {
        Ok(self.store.list_products().await?)
    }

    /// Looks up a product by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: ProductId) -> Result<ProductRecord, DomainError> {
        self.store
            .get_product(id)
            .await?
            .ok_or(DomainError::NotFound("Product"))
    }

    /// Creates a product.
    #[tracing::instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: ProductInput) -> Result<ProductRecord, DomainError> {
        let product =
            ProductRecord::new(input.name, input.price, input.description, input.stock);
        self.store.insert_product(&product).await?;
        Ok(product)
    }

    /// Updates a product's fields, including a direct stock overwrite.
    #[tracing::instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: ProductId,
        input: ProductInput,
    ) -> Result<ProductRecord, DomainError> {
        let current = self
            .store
            .get_product(id)
            .await?
            .ok_or(DomainError::NotFound("Product"))?;

        let updated = ProductRecord {
            id,
            name: input.name,
            price: input.price,
            description: input.description,
            stock: input.stock,
            version: current.version,
        };

        match self.store.update_product(&updated).await {
            Ok(()) => Ok(updated),
            Err(StoreError::VersionConflict { .. }) => {
                if self.store.get_product(id).await?.is_none() {
                    Err(DomainError::NotFound("Product"))
                } else {
                    Err(DomainError::Conflict)
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes a product unconditionally.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<(), DomainError> {
        if !self.store.delete_product(id).await? {
            return Err(DomainError::NotFound("Product"));
        }
        Ok(())
    }
}
