//! Display data rendered by the home templates.

use freshcart_core::{CATEGORIES, Category};

use crate::shop::{FeatureImage, Product};

/// One slide of the promotional banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideView {
    pub url: String,
    pub alt: String,
    pub active: bool,
}

/// A shop-by-category tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView {
    pub id: &'static str,
    pub label: &'static str,
    pub image_path: &'static str,
    pub href: String,
}

impl From<&Category> for CategoryView {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.as_str(),
            label: category.label,
            image_path: category.image_path,
            href: format!("/shop/category/{}", category.id),
        }
    }
}

/// Product display data for tiles and the detail dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub brand: String,
    pub image: Option<String>,
    pub price: String,
    /// Set when the product is on sale.
    pub sale_price: Option<String>,
    pub in_stock: bool,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            image: product.image.clone(),
            price: product.price.to_string(),
            sale_price: product
                .on_sale()
                .then(|| product.sale_price.to_string()),
            in_stock: product.in_stock(),
        }
    }
}

/// Snapshot of everything the home page renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    pub slides: Vec<SlideView>,
    pub current_slide: Option<usize>,
    pub show_controls: bool,
    pub categories: Vec<CategoryView>,
    pub products: Vec<ProductView>,
    /// Present while the detail dialog is open.
    pub dialog: Option<ProductView>,
}

impl HomeView {
    pub(crate) fn build(
        images: &[FeatureImage],
        current_slide: Option<usize>,
        show_controls: bool,
        products: &[Product],
        dialog: Option<&Product>,
    ) -> Self {
        let slides = images
            .iter()
            .enumerate()
            .map(|(index, image)| SlideView {
                url: image.image.clone(),
                alt: format!("slide-{index}"),
                active: current_slide == Some(index),
            })
            .collect();

        Self {
            slides,
            current_slide,
            show_controls,
            categories: CATEGORIES.iter().map(CategoryView::from).collect(),
            products: products.iter().map(ProductView::from).collect(),
            dialog: dialog.map(ProductView::from),
        }
    }
}
