//! Products service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        products::{
            data::{NewProduct, ProductUpdate},
            errors::ProductsServiceError,
            records::{ProductDiscountRecord, ProductRecord, ProductUuid},
            repository::PgProductsRepository,
        },
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

fn validate(
    price: u64,
    stock: u64,
    discount: Option<ProductDiscountRecord>,
) -> Result<(), ProductsServiceError> {
    i64::try_from(price)?;
    i64::try_from(stock)?;

    if let Some(discount) = discount {
        discount.to_discount()?;
    }

    Ok(())
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(&self) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self.repository.list_products(&mut tx).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(
        &self,
        product: ProductUuid,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        validate(product.price, product.stock, product.discount)?;

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_product(&mut tx, product).await?;

        tx.commit().await?;

        info!(product = %created.uuid, seller = %created.seller_uuid, "product created");

        Ok(created)
    }

    async fn update_product(
        &self,
        seller: UserUuid,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError> {
        validate(update.price, update.stock, update.discount)?;

        let mut tx = self.db.begin().await?;

        let existing = self.repository.lock_product(&mut tx, product).await?;

        if existing.seller_uuid != seller {
            return Err(ProductsServiceError::Forbidden);
        }

        let updated = self
            .repository
            .update_product(&mut tx, product, update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_product(
        &self,
        seller: UserUuid,
        product: ProductUuid,
    ) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let existing = self.repository.lock_product(&mut tx, product).await?;

        if existing.seller_uuid != seller {
            return Err(ProductsServiceError::Forbidden);
        }

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves all listed products.
    async fn list_products(&self) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single product that has not been deleted.
    async fn get_product(&self, product: ProductUuid)
    -> Result<ProductRecord, ProductsServiceError>;

    /// Creates a new product.
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Replaces a product's details. Only its seller may do this.
    async fn update_product(
        &self,
        seller: UserUuid,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Soft deletes a product. Only its seller may do this.
    async fn delete_product(
        &self,
        seller: UserUuid,
        product: ProductUuid,
    ) -> Result<(), ProductsServiceError>;
}
