//! Cache types for catalog responses.

use freshcart_core::{BrandId, CategoryId, ProductId};

use super::catalog::ProductQuery;
use super::types::{Brand, Category, ListResponse, Product, Subcategory};

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products(ProductQuery),
    Product(ProductId),
    Categories,
    Category(CategoryId),
    Subcategories(CategoryId),
    Brands,
    Brand(BrandId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(ListResponse<Product>),
    Product(Box<Product>),
    Categories(Vec<Category>),
    Category(Category),
    Subcategories(Vec<Subcategory>),
    Brands(Vec<Brand>),
    Brand(Brand),
}
