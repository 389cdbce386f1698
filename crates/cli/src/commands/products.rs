//! Product commands. Every call is scoped by the given user id.

use std::io::{self, Write};

use catalogix_core::{NewProduct, Product, ProductId, UserId};
use catalogix_frontend::api::{ApiClient, CatalogBackend};
use catalogix_frontend::listing::Confirmation;

use super::{CliError, confirm};

/// Print the user's products.
pub async fn list(client: &ApiClient, user: Option<UserId>, currency: &str) -> Result<(), CliError> {
    let products = client.list_products(user).await?.into_items();
    write_products(&mut io::stdout().lock(), &products, currency)?;
    Ok(())
}

/// Create a product and print it.
pub async fn create(
    client: &ApiClient,
    user: Option<UserId>,
    name: &str,
    price: &str,
    description: Option<&str>,
    currency: &str,
) -> Result<(), CliError> {
    let new_product = NewProduct::parse(name, price, description)?;
    let created = client.create_product(&new_product, user).await?;
    tracing::info!(product_id = %created.id, "Product created");
    write_products(&mut io::stdout().lock(), std::slice::from_ref(&created), currency)?;
    Ok(())
}

/// Delete a product after confirmation.
pub async fn delete(
    client: &ApiClient,
    id: ProductId,
    user: Option<UserId>,
    yes: bool,
) -> Result<(), CliError> {
    if confirm("Delete this product?", yes)? == Confirmation::Declined {
        tracing::info!("Cancelled");
        return Ok(());
    }

    client.delete_product(id, user).await?;
    tracing::info!(product_id = %id, "Product deleted");
    Ok(())
}

fn write_products(out: &mut impl Write, products: &[Product], currency: &str) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products found.");
    }

    writeln!(out, "{:<8} {:<24} PRICE", "ID", "NAME")?;
    for product in products {
        writeln!(
            out,
            "{:<8} {:<24} {}",
            product.id,
            product.name,
            product.price.display_with(currency)
        )?;
    }
    Ok(())
}
