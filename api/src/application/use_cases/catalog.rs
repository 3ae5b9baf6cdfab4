use crate::application::ports::category_repository::CategoryRepository;
use crate::application::ports::product_repository::ProductRepository;
use crate::application::validation::ValidationErrors;
use crate::domain::catalog::category::{Category, CategoryFields};
use crate::domain::catalog::product::{Product, ProductFields};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("Product not found")]
    ProductNotFound,
    #[error("Category not found")]
    CategoryNotFound,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

async fn ensure_categories_exist<C: CategoryRepository + ?Sized>(
    categories: &C,
    fields: &ProductFields,
) -> Result<(), CatalogError> {
    let Some(ids) = fields.category_ids.as_deref() else {
        return Ok(());
    };
    let existing = categories.existing_ids(ids).await?;
    if ids.iter().any(|id| !existing.contains(id)) {
        return Err(ValidationErrors::single("exists", "categories").into());
    }
    Ok(())
}

pub struct ListProducts<'a, P: ProductRepository + ?Sized> {
    pub products: &'a P,
}

impl<'a, P: ProductRepository + ?Sized> ListProducts<'a, P> {
    pub async fn execute(&self) -> anyhow::Result<Vec<Product>> {
        self.products.list().await
    }
}

pub struct GetProduct<'a, P: ProductRepository + ?Sized> {
    pub products: &'a P,
}

impl<'a, P: ProductRepository + ?Sized> GetProduct<'a, P> {
    pub async fn execute(&self, id: i64) -> Result<Product, CatalogError> {
        self.products
            .find(id)
            .await?
            .ok_or(CatalogError::ProductNotFound)
    }
}

pub struct GetProductCategories<'a, P: ProductRepository + ?Sized> {
    pub products: &'a P,
}

impl<'a, P: ProductRepository + ?Sized> GetProductCategories<'a, P> {
    pub async fn execute(&self, id: i64) -> Result<Vec<Category>, CatalogError> {
        if self.products.find(id).await?.is_none() {
            return Err(CatalogError::ProductNotFound);
        }
        Ok(self.products.categories_of(id).await?)
    }
}

pub struct CreateProduct<'a, P, C>
where
    P: ProductRepository + ?Sized,
    C: CategoryRepository + ?Sized,
{
    pub products: &'a P,
    pub categories: &'a C,
}

impl<'a, P, C> CreateProduct<'a, P, C>
where
    P: ProductRepository + ?Sized,
    C: CategoryRepository + ?Sized,
{
    pub async fn execute(&self, fields: &ProductFields) -> Result<Product, CatalogError> {
        ensure_categories_exist(self.categories, fields).await?;
        Ok(self.products.create(fields).await?)
    }
}

pub struct UpdateProduct<'a, P, C>
where
    P: ProductRepository + ?Sized,
    C: CategoryRepository + ?Sized,
{
    pub products: &'a P,
    pub categories: &'a C,
}

impl<'a, P, C> UpdateProduct<'a, P, C>
where
    P: ProductRepository + ?Sized,
    C: CategoryRepository + ?Sized,
{
    pub async fn execute(&self, id: i64, fields: &ProductFields) -> Result<Product, CatalogError> {
        if self.products.find(id).await?.is_none() {
            return Err(CatalogError::ProductNotFound);
        }
        ensure_categories_exist(self.categories, fields).await?;
        self.products
            .update(id, fields)
            .await?
            .ok_or(CatalogError::ProductNotFound)
    }
}

pub struct DeleteProduct<'a, P: ProductRepository + ?Sized> {
    pub products: &'a P,
}

impl<'a, P: ProductRepository + ?Sized> DeleteProduct<'a, P> {
    pub async fn execute(&self, id: i64) -> Result<(), CatalogError> {
        if self.products.delete(id).await? {
            Ok(())
        } else {
            Err(CatalogError::ProductNotFound)
        }
    }
}

pub struct ListCategories<'a, C: CategoryRepository + ?Sized> {
    pub categories: &'a C,
}

impl<'a, C: CategoryRepository + ?Sized> ListCategories<'a, C> {
    pub async fn execute(&self) -> anyhow::Result<Vec<Category>> {
        self.categories.list().await
    }
}

pub struct GetCategory<'a, C: CategoryRepository + ?Sized> {
    pub categories: &'a C,
}

impl<'a, C: CategoryRepository + ?Sized> GetCategory<'a, C> {
    pub async fn execute(&self, id: i64) -> Result<Category, CatalogError> {
        self.categories
            .find(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound)
    }
}

pub struct CreateCategory<'a, C: CategoryRepository + ?Sized> {
    pub categories: &'a C,
}

impl<'a, C: CategoryRepository + ?Sized> CreateCategory<'a, C> {
    pub async fn execute(&self, fields: &CategoryFields) -> anyhow::Result<Category> {
        self.categories.create(fields).await
    }
}

pub struct UpdateCategory<'a, C: CategoryRepository + ?Sized> {
    pub categories: &'a C,
}

impl<'a, C: CategoryRepository + ?Sized> UpdateCategory<'a, C> {
    pub async fn execute(&self, id: i64, fields: &CategoryFields) -> Result<Category, CatalogError> {
        self.categories
            .update(id, fields)
            .await?
            .ok_or(CatalogError::CategoryNotFound)
    }
}

pub struct DeleteCategory<'a, C: CategoryRepository + ?Sized> {
    pub categories: &'a C,
}

impl<'a, C: CategoryRepository + ?Sized> DeleteCategory<'a, C> {
    pub async fn execute(&self, id: i64) -> Result<(), CatalogError> {
        if self.categories.delete(id).await? {
            Ok(())
        } else {
            Err(CatalogError::CategoryNotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::MemoryDatabase;

    fn shoes() -> CategoryFields {
        CategoryFields {
            name: "Shoes".into(),
            description: "Things for feet".into(),
        }
    }

    fn boots(category_ids: Option<Vec<i64>>) -> ProductFields {
        ProductFields {
            name: "Boots".into(),
            description: "Leather boots".into(),
            category_ids,
        }
    }

    #[tokio::test]
    async fn product_links_replace_previous_ones() {
        let db = MemoryDatabase::new();
        let a = CreateCategory { categories: &db }.execute(&shoes()).await.unwrap();
        let b = CreateCategory { categories: &db }.execute(&shoes()).await.unwrap();
        let create = CreateProduct {
            products: &db,
            categories: &db,
        };
        let product = create.execute(&boots(Some(vec![a.id]))).await.unwrap();

        let linked = GetProductCategories { products: &db }
            .execute(product.id)
            .await
            .unwrap();
        assert_eq!(linked.iter().map(|c| c.id).collect::<Vec<_>>(), [a.id]);

        UpdateProduct {
            products: &db,
            categories: &db,
        }
        .execute(product.id, &boots(Some(vec![b.id])))
        .await
        .unwrap();
        let linked = GetProductCategories { products: &db }
            .execute(product.id)
            .await
            .unwrap();
        assert_eq!(linked.iter().map(|c| c.id).collect::<Vec<_>>(), [b.id]);

        // Omitting the list keeps the links.
        UpdateProduct {
            products: &db,
            categories: &db,
        }
        .execute(product.id, &boots(None))
        .await
        .unwrap();
        let linked = GetProductCategories { products: &db }
            .execute(product.id)
            .await
            .unwrap();
        assert_eq!(linked.len(), 1);
    }

    #[tokio::test]
    async fn unknown_category_ids_are_rejected() {
        let db = MemoryDatabase::new();
        let err = CreateProduct {
            products: &db,
            categories: &db,
        }
        .execute(&boots(Some(vec![42])))
        .await
        .unwrap_err();
        match err {
            CatalogError::Validation(errors) => {
                assert_eq!(errors.0[0].code, "exists");
                assert_eq!(errors.0[0].field.as_deref(), Some("categories"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(ListProducts { products: &db }.execute().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_ids_report_not_found() {
        let db = MemoryDatabase::new();
        assert!(matches!(
            GetProduct { products: &db }.execute(1).await,
            Err(CatalogError::ProductNotFound)
        ));
        assert!(matches!(
            DeleteCategory { categories: &db }.execute(1).await,
            Err(CatalogError::CategoryNotFound)
        ));
        assert!(matches!(
            UpdateProduct {
                products: &db,
                categories: &db,
            }
            .execute(1, &boots(None))
            .await,
            Err(CatalogError::ProductNotFound)
        ));
    }

    #[tokio::test]
    async fn deleting_a_category_unlinks_it() {
        let db = MemoryDatabase::new();
        let category = CreateCategory { categories: &db }.execute(&shoes()).await.unwrap();
        let product = CreateProduct {
            products: &db,
            categories: &db,
        }
        .execute(&boots(Some(vec![category.id])))
        .await
        .unwrap();
        DeleteCategory { categories: &db }
            .execute(category.id)
            .await
            .unwrap();
        let linked = GetProductCategories { products: &db }
            .execute(product.id)
            .await
            .unwrap();
        assert!(linked.is_empty());
    }
}
