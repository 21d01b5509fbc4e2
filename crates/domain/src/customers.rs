//! Customer CRUD service.

use common::CustomerId;
use store::{CustomerRecord, EntityStore, StoreError};

use crate::error::DomainError;

/// Validated customer fields for create and update.
#[derive(Debug, Clone)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
}

/// Service for managing customers.
pub struct CustomerService<S: EntityStore> {
    store: S,
}

impl<S: EntityStore> CustomerService<S> {
    /// Creates a new customer service with the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns all customers.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<CustomerRecord>, DomainError> {
        Ok(self.store.list_customers().await?)
    }

    /// Looks up a customer by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: CustomerId) -> Result<CustomerRecord, DomainError> {
        self.store
            .get_customer(id)
            .await?
            .ok_or(DomainError::NotFound("Customer"))
    }

    /// Creates a customer, rejecting duplicate emails (case-sensitive).
    #[tracing::instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create(&self, input: CustomerInput) -> Result<CustomerRecord, DomainError> {
        if self
            .store
            .find_customer_by_email(&input.email)
            .await?
            .is_some()
        {
            return Err(DomainError::DuplicateEmail);
        }

        let customer = CustomerRecord::new(input.name, input.email, input.phone, input.address);
        self.store.insert_customer(&customer).await?;
        Ok(customer)
    }

    /// Updates a customer's fields.
    ///
    /// The duplicate-email check excludes the customer itself. A stale
    /// write is re-checked for existence: a vanished row is NotFound, an
    /// intervening write is a conflict.
    #[tracing::instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: CustomerId,
        input: CustomerInput,
    ) -> Result<CustomerRecord, DomainError> {
        let current = self
            .store
            .get_customer(id)
            .await?
            .ok_or(DomainError::NotFound("Customer"))?;

        if let Some(other) = self.store.find_customer_by_email(&input.email).await?
            && other.id != id
        {
            return Err(DomainError::DuplicateEmail);
        }

        let updated = CustomerRecord {
            id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            address: input.address,
            version: current.version,
        };

        match self.store.update_customer(&updated).await {
            Ok(()) => Ok(updated),
            Err(StoreError::VersionConflict { .. }) => {
                if self.store.get_customer(id).await?.is_none() {
                    Err(DomainError::NotFound("Customer"))
                } else {
                    Err(DomainError::Conflict)
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes a customer, blocked while any order references it.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: CustomerId) -> Result<(), DomainError> {
        if self.store.get_customer(id).await?.is_none() {
            return Err(DomainError::NotFound("Customer"));
        }
        if self.store.customer_has_orders(id).await? {
            return Err(DomainError::CustomerHasOrders);
        }
        self.store.delete_customer(id).await?;
        Ok(())
    }
}
