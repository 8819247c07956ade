//! Catalog endpoints: products, categories, subcategories, brands.
//!
//! All reads here are public and go through the moka cache.

use reqwest::Method;
use tracing::{debug, instrument};

use freshcart_core::{BrandId, CategoryId, ProductId};

use super::cache::{CacheKey, CacheValue};
use super::types::{Brand, Category, DataResponse, ListResponse, Product, Subcategory};
use super::{ApiClient, ApiError, segment};

/// Filters for `GET /api/v1/products`.
///
/// Doubles as the cache key, so two equal queries share one cached page.
#[derive(Debug, Clone, Default, Hash, PartialEq, Eq)]
pub struct ProductQuery {
    pub brand: Option<BrandId>,
    pub category: Option<CategoryId>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

impl ProductQuery {
    #[must_use]
    pub fn with_brand(mut self, brand: BrandId) -> Self {
        self.brand = Some(brand);
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Page numbers start at 1; `0` is treated as "first page".
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = if page == 0 { None } else { Some(page) };
        self
    }

    /// Query-string pairs in the API's parameter names.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(brand) = &self.brand {
            params.push(("brand", brand.to_string()));
        }
        if let Some(category) = &self.category {
            params.push(("category[in]", category.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        params
    }
}

impl ApiClient {
    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List products matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self, query: &ProductQuery) -> Result<ListResponse<Product>, ApiError> {
        let cache_key = CacheKey::Products(query.clone());

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let request = self
            .request(Method::GET, "/api/v1/products", None)
            .query(&query.to_params());
        let products: ListResponse<Product> = self.send(request).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown product, or another error
    /// if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let cache_key = CacheKey::Product(id.clone());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let path = format!("/api/v1/products/{}", segment(id.as_str()));
        let response: DataResponse<Product> =
            self.send(self.request(Method::GET, &path, None)).await?;
        let product = response.data;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    // =========================================================================
    // Category Methods
    // =========================================================================

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let response: ListResponse<Category> = self
            .send(self.request(Method::GET, "/api/v1/categories", None))
            .await?;

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(response.data.clone()),
            )
            .await;

        Ok(response.data)
    }

    /// Get a category by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is unknown or the request fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn category(&self, id: &CategoryId) -> Result<Category, ApiError> {
        let cache_key = CacheKey::Category(id.clone());

        if let Some(CacheValue::Category(category)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for category");
            return Ok(category);
        }

        let path = format!("/api/v1/categories/{}", segment(id.as_str()));
        let response: DataResponse<Category> =
            self.send(self.request(Method::GET, &path, None)).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Category(response.data.clone()))
            .await;

        Ok(response.data)
    }

    /// List the subcategories of a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn subcategories(&self, id: &CategoryId) -> Result<Vec<Subcategory>, ApiError> {
        let cache_key = CacheKey::Subcategories(id.clone());

        if let Some(CacheValue::Subcategories(subcategories)) =
            self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for subcategories");
            return Ok(subcategories);
        }

        let path = format!("/api/v1/categories/{}/subcategories", segment(id.as_str()));
        let response: ListResponse<Subcategory> =
            self.send(self.request(Method::GET, &path, None)).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Subcategories(response.data.clone()))
            .await;

        Ok(response.data)
    }

    // =========================================================================
    // Brand Methods
    // =========================================================================

    /// List all brands.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn brands(&self) -> Result<Vec<Brand>, ApiError> {
        if let Some(CacheValue::Brands(brands)) = self.inner.cache.get(&CacheKey::Brands).await {
            debug!("Cache hit for brands");
            return Ok(brands);
        }

        let response: ListResponse<Brand> = self
            .send(self.request(Method::GET, "/api/v1/brands", None))
            .await?;

        self.inner
            .cache
            .insert(CacheKey::Brands, CacheValue::Brands(response.data.clone()))
            .await;

        Ok(response.data)
    }

    /// Get a brand by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the brand is unknown or the request fails.
    #[instrument(skip(self), fields(brand_id = %id))]
    pub async fn brand(&self, id: &BrandId) -> Result<Brand, ApiError> {
        let cache_key = CacheKey::Brand(id.clone());

        if let Some(CacheValue::Brand(brand)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for brand");
            return Ok(brand);
        }

        let path = format!("/api/v1/brands/{}", segment(id.as_str()));
        let response: DataResponse<Brand> =
            self.send(self.request(Method::GET, &path, None)).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Brand(response.data.clone()))
            .await;

        Ok(response.data)
    }
}
