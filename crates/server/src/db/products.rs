//! Product repository for database operations.
//!
//! Also owns the `product_views` analytics table. That table carries a
//! 24-hour retention window: expired rows are swept opportunistically on
//! insert and filtered out of reads, so callers never observe stale views.

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;

use lustra_core::{Price, ProductCategory, ProductId, ProductStatus, SellerId, UserId};

use super::RepositoryError;
use crate::models::product::Product;

/// Retention window for `product_views` rows.
const VIEW_RETENTION_HOURS: i64 = 24;

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    seller_id: i64,
    name: String,
    description: String,
    price: String,
    category: ProductCategory,
    images: String,
    status: ProductStatus,
    ar_model: Option<String>,
    purchase_link: String,
    view_count: i64,
    click_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(r: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::parse(&r.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price in database: {e}"))
        })?;
        let images: Vec<String> = serde_json::from_str(&r.images).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid image list in database: {e}"))
        })?;

        Ok(Self {
            id: ProductId::new(r.id),
            seller_id: SellerId::new(r.seller_id),
            name: r.name,
            description: r.description,
            price,
            category: r.category,
            images,
            status: r.status,
            ar_model: r.ar_model,
            purchase_link: r.purchase_link,
            view_count: r.view_count,
            click_count: r.click_count,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

const PRODUCT_COLUMNS: &str = r"
    id, seller_id, name, description, price, category, images, status,
    ar_model, purchase_link, view_count, click_count, created_at, updated_at
";

/// Descriptive fields of a product, used for create and full update.
#[derive(Debug, Clone)]
pub struct ProductFields<'f> {
    pub name: &'f str,
    pub description: &'f str,
    pub price: Price,
    pub category: ProductCategory,
    pub images: &'f [String],
    pub ar_model: Option<&'f str>,
    pub purchase_link: &'f str,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a product listing. Status is always forced to `pending`,
    /// regardless of what the caller supplied in the request payload.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        seller_id: SellerId,
        fields: &ProductFields<'_>,
    ) -> Result<Product, RepositoryError> {
        let now = Utc::now();
        let images_json = serde_json::to_string(fields.images)
            .map_err(|e| RepositoryError::DataCorruption(format!("image list: {e}")))?;

        let result = sqlx::query(
            r"
            INSERT INTO products
                (seller_id, name, description, price, category, images, status,
                 ar_model, purchase_link, view_count, click_count, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, 0, ?, ?)
            ",
        )
        .bind(seller_id.as_i64())
        .bind(fields.name)
        .bind(fields.description)
        .bind(fields.price.to_string())
        .bind(fields.category)
        .bind(&images_json)
        .bind(ProductStatus::Pending)
        .bind(fields.ar_model)
        .bind(fields.purchase_link)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(Product {
            id: ProductId::new(result.last_insert_rowid()),
            seller_id,
            name: fields.name.to_owned(),
            description: fields.description.to_owned(),
            price: fields.price,
            category: fields.category,
            images: fields.images.to_vec(),
            status: ProductStatus::Pending,
            ar_model: fields.ar_model.map(str::to_owned),
            purchase_link: fields.purchase_link.to_owned(),
            view_count: 0,
            click_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
        ))
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// List all products, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// List products with the given status, oldest first, optionally
    /// filtered by category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_status(
        &self,
        status: ProductStatus,
        category: Option<ProductCategory>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = match category {
            Some(category) => {
                sqlx::query_as::<_, ProductRow>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products
                     WHERE status = ? AND category = ?
                     ORDER BY created_at ASC"
                ))
                .bind(status)
                .bind(category)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ProductRow>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products
                     WHERE status = ?
                     ORDER BY created_at ASC"
                ))
                .bind(status)
                .fetch_all(self.pool)
                .await?
            }
        };

        rows.into_iter().map(Product::try_from).collect()
    }

    /// List the products owned by a seller, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_seller(
        &self,
        seller_id: SellerId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE seller_id = ? ORDER BY created_at ASC"
        ))
        .bind(seller_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// List pending products joined with their seller's business name,
    /// oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_pending_with_seller_name(
        &self,
    ) -> Result<Vec<(Product, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct PendingRow {
            #[sqlx(flatten)]
            product: ProductRow,
            business_name: String,
        }

        let rows = sqlx::query_as::<_, PendingRow>(
            r"
            SELECT p.id, p.seller_id, p.name, p.description, p.price, p.category,
                   p.images, p.status, p.ar_model, p.purchase_link,
                   p.view_count, p.click_count, p.created_at, p.updated_at,
                   s.business_name
            FROM products p
            JOIN sellers s ON s.id = p.seller_id
            WHERE p.status = ?
            ORDER BY p.created_at ASC
            ",
        )
        .bind(ProductStatus::Pending)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|r| Ok((Product::try_from(r.product)?, r.business_name)))
            .collect()
    }

    /// Count products with the given status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_status(&self, status: ProductStatus) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE status = ?")
            .bind(status)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Replace the descriptive fields of a product.
    ///
    /// The `seller_id` reference and the status are immutable here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn update(
        &self,
        id: ProductId,
        fields: &ProductFields<'_>,
    ) -> Result<Product, RepositoryError> {
        let images_json = serde_json::to_string(fields.images)
            .map_err(|e| RepositoryError::DataCorruption(format!("image list: {e}")))?;

        let result = sqlx::query(
            r"
            UPDATE products
            SET name = ?, description = ?, price = ?, category = ?, images = ?,
                ar_model = ?, purchase_link = ?, updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(fields.name)
        .bind(fields.description)
        .bind(fields.price.to_string())
        .bind(fields.category)
        .bind(&images_json)
        .bind(fields.ar_model)
        .bind(fields.purchase_link)
        .bind(Utc::now())
        .bind(id.as_i64())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Write a new status. The approval workflow is the only caller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn set_status(
        &self,
        id: ProductId,
        status: ProductStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE products SET status = ?, updated_at = ? WHERE id = ?
            ",
        )
        .bind(status)
        .bind(Utc::now())
        .bind(id.as_i64())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        sqlx::query("DELETE FROM product_views WHERE product_id = ?")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;
        sqlx::query("DELETE FROM wishlist_items WHERE product_id = ?")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Bump the view counter. Plain increment, no compare-and-swap: lost
    /// updates under concurrency are acceptable for approximate analytics.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn increment_view_count(&self, id: ProductId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE products SET view_count = view_count + 1 WHERE id = ?")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Bump the click counter. Same semantics as the view counter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn increment_click_count(&self, id: ProductId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE products SET click_count = click_count + 1 WHERE id = ?")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Record an ephemeral view event and sweep expired rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn record_view(
        &self,
        product_id: ProductId,
        user_id: Option<UserId>,
        client_ip: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let cutoff = Utc::now() - Duration::hours(VIEW_RETENTION_HOURS);
        sqlx::query("DELETE FROM product_views WHERE datetime(created_at) < datetime(?)")
            .bind(cutoff)
            .execute(self.pool)
            .await?;

        sqlx::query(
            r"
            INSERT INTO product_views (product_id, user_id, client_ip, created_at)
            VALUES (?, ?, ?, ?)
            ",
        )
        .bind(product_id.as_i64())
        .bind(user_id.map(|u| u.as_i64()))
        .bind(client_ip)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Count views of a product inside the retention window.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent_view_count(&self, product_id: ProductId) -> Result<i64, RepositoryError> {
        let cutoff = Utc::now() - Duration::hours(VIEW_RETENTION_HOURS);
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM product_views
            WHERE product_id = ? AND datetime(created_at) >= datetime(?)
            ",
        )
        .bind(product_id.as_i64())
        .bind(cutoff)
        .fetch_one(self.pool)
        .await?;
        Ok(count)
    }

    /// Count products created per calendar day since `cutoff`.
    ///
    /// Returns `(bucket, count)` pairs with `bucket` as `YYYY-MM-DD`,
    /// ascending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_created_by_day(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<(String, i64)>, RepositoryError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r"
            SELECT date(created_at) AS bucket, COUNT(*) AS n
            FROM products
            WHERE datetime(created_at) >= datetime(?)
            GROUP BY bucket
            ORDER BY bucket ASC
            ",
        )
        .bind(cutoff)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Count products created per calendar month, across all history.
    ///
    /// Returns `(bucket, count)` pairs with `bucket` as `YYYY-MM`, ascending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_created_by_month(&self) -> Result<Vec<(String, i64)>, RepositoryError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r"
            SELECT strftime('%Y-%m', created_at) AS bucket, COUNT(*) AS n
            FROM products
            GROUP BY bucket
            ORDER BY bucket ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}
