use std::collections::{HashMap, HashSet};
use std::path::Path;

use fixed::types::U51F13;
use tracing::warn;

/// Possible errors to occur while loading the product catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// The unique identifier of a product
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(u32);

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A product offered for sale
///
/// Products are read once from the catalog file at startup and are
/// never mutated afterwards.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    price: U51F13,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, price: U51F13) -> Self {
        Self {
            id,
            name: name.into(),
            price,
        }
    }

    /// The unique id of the product
    pub fn id(&self) -> ProductId {
        self.id
    }

    /// The display name of the product
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The unit price of the product
    pub fn price(&self) -> U51F13 {
        self.price
    }
}

/// The product catalog of the register
///
/// The catalog is loaded from a `id,name,price` CSV file. Rows that fail to
/// parse, reuse an id, or reuse a display name are skipped with a warning.
/// Display names are unique within a loaded catalog, so looking a product up
/// by name is unambiguous.
#[derive(Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
    by_id: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Loads the catalog from the specified CSV file
    ///
    /// If the file does not exist yet, it is seeded with the default product
    /// list before the first read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        if !path.exists() {
            Self::seed_default(path)?;
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut products = Vec::new();
        for row in reader.deserialize::<Product>() {
            match row {
                Ok(product) => products.push(product),
                Err(err) => warn!("skipping malformed catalog row: {err}"),
            }
        }

        Ok(Self::from_products(products))
    }

    /// Builds a catalog from an already parsed product list
    ///
    /// Products with an id or display name that is already taken are skipped.
    pub fn from_products(products: Vec<Product>) -> Self {
        let mut catalog = Self::default();
        let mut names = HashSet::new();

        for product in products {
            if catalog.by_id.contains_key(&product.id()) {
                warn!("skipping catalog row with duplicate id {}", product.id());
                continue;
            }
            if !names.insert(product.name().to_owned()) {
                warn!("skipping catalog row with duplicate name {:?}", product.name());
                continue;
            }

            catalog.by_id.insert(product.id(), catalog.products.len());
            catalog.products.push(product);
        }

        catalog
    }

    /// Looks a product up by its id
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.by_id.get(&id).map(|&index| &self.products[index])
    }

    /// All products, in catalog file order
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn seed_default(path: &Path) -> Result<(), CatalogError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(true)
            .from_path(path)?;

        for product in Self::default_products() {
            writer.serialize(product)?;
        }
        writer.flush()?;

        Ok(())
    }

    fn default_products() -> Vec<Product> {
        [
            (1, "Espresso", 50),
            (2, "Latte", 65),
            (3, "Cappuccino", 70),
            (4, "Cappuccino Freddo", 75),
            (5, "Americano", 45),
            (6, "Mocha", 80),
            (7, "Macchiato", 70),
            (8, "Flat White", 70),
            (9, "Croissant", 45),
            (10, "Danish Pastry", 55),
            (11, "Muffin", 40),
            (12, "Donut", 35),
        ]
        .into_iter()
        .map(|(id, name, price)| Product::new(ProductId(id), name, U51F13::from_num(price)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_file_is_seeded_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");

        let catalog = Catalog::load(&path).unwrap();

        assert!(path.exists());
        assert_eq!(catalog.len(), 12);
        let espresso = catalog.get(ProductId(1)).unwrap();
        assert_eq!(espresso.name(), "Espresso");
        assert_eq!(espresso.price(), U51F13::from_num(50));
    }

    #[test]
    fn seeded_file_is_reread_on_next_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");

        Catalog::load(&path).unwrap();
        let catalog = Catalog::load(&path).unwrap();

        assert_eq!(catalog.len(), 12);
        assert_eq!(catalog.get(ProductId(12)).unwrap().name(), "Donut");
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "id,name,price").unwrap();
        writeln!(file, "1,Espresso,50.0").unwrap();
        writeln!(file, "2,Latte").unwrap();
        writeln!(file, "x,Cappuccino,70.0").unwrap();
        writeln!(file, "4,Mocha,not-a-price").unwrap();
        writeln!(file, "5,Americano,45.0").unwrap();
        drop(file);

        let catalog = Catalog::load(&path).unwrap();

        assert_eq!(catalog.len(), 2);
        assert!(catalog.get(ProductId(1)).is_some());
        assert!(catalog.get(ProductId(5)).is_some());
    }

    #[test]
    fn duplicate_ids_are_skipped() {
        let catalog = Catalog::from_products(vec![
            Product::new(ProductId(1), "Espresso", U51F13::from_num(50)),
            Product::new(ProductId(1), "Latte", U51F13::from_num(65)),
        ]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(ProductId(1)).unwrap().name(), "Espresso");
    }

    #[test]
    fn duplicate_names_are_skipped() {
        let catalog = Catalog::from_products(vec![
            Product::new(ProductId(1), "Espresso", U51F13::from_num(50)),
            Product::new(ProductId(2), "Espresso", U51F13::from_num(55)),
        ]);

        assert_eq!(catalog.len(), 1);
        assert!(catalog.get(ProductId(2)).is_none());
    }
}
