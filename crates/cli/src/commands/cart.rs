//! Cart commands.
//!
//! Each function runs one cart operation and prints the resulting cart.
//! Failures have already been shown to the shopper by the notifier, so they
//! only change the exit status here.

use std::io::{self, Write};

use rocket_shoes_core::{LineItem, ProductId};
use rocket_shoes_storefront::{CartError, CartManager, CartSummary, UpdateProductAmount};

/// How the cart is printed after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Text,
    /// The stored JSON representation
    Json,
}

/// Errors that can occur while running a cart command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The cart rejected or failed the operation.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Writing output failed.
    #[error("Output error: {0}")]
    Output(#[from] io::Error),

    /// Serializing output failed.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Print the cart.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn show(cart: &CartManager, format: OutputFormat) -> Result<(), CommandError> {
    let items = cart.cart();
    let mut out = io::stdout().lock();
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&items)?)?,
        OutputFormat::Text => write_table(&mut out, &items, &cart.summary())?,
    }
    Ok(())
}

/// Print only the cart totals.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn summary(cart: &CartManager, format: OutputFormat) -> Result<(), CommandError> {
    let summary = cart.summary();
    let mut out = io::stdout().lock();
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?,
        OutputFormat::Text => write_summary(&mut out, &summary)?,
    }
    Ok(())
}

/// Add one unit of a product, then print the cart.
///
/// # Errors
///
/// Returns the cart error if the add was rejected or failed.
pub async fn add(
    cart: &CartManager,
    product_id: ProductId,
    format: OutputFormat,
) -> Result<(), CommandError> {
    cart.add_product(product_id).await?;
    show(cart, format)
}

/// Remove a product, then print the cart.
///
/// # Errors
///
/// Returns the cart error if the product was not in the cart.
pub fn remove(
    cart: &CartManager,
    product_id: ProductId,
    format: OutputFormat,
) -> Result<(), CommandError> {
    cart.remove_product(product_id)?;
    show(cart, format)
}

/// Set a product's quantity, then print the cart.
///
/// # Errors
///
/// Returns the cart error if the quantity was rejected or stock lookup failed.
pub async fn update(
    cart: &CartManager,
    product_id: ProductId,
    amount: i64,
    format: OutputFormat,
) -> Result<(), CommandError> {
    cart.update_product_amount(UpdateProductAmount::new(product_id, amount))
        .await?;
    show(cart, format)
}

fn write_table(out: &mut impl Write, items: &[LineItem], summary: &CartSummary) -> io::Result<()> {
    if items.is_empty() {
        writeln!(out, "Cart is empty")?;
        return Ok(());
    }

    for item in items {
        writeln!(
            out,
            "{:>5}  {:<40}  {:>4} x {:>10}  {:>10}",
            item.product_id(),
            item.product.name,
            item.amount,
            item.product.price,
            item.line_total(),
        )?;
    }
    write_summary(out, summary)
}

fn write_summary(out: &mut impl Write, summary: &CartSummary) -> io::Result<()> {
    writeln!(
        out,
        "{} product(s), {} item(s), subtotal {}",
        summary.distinct_items, summary.total_quantity, summary.subtotal
    )
}

#[cfg(test)]
mod tests {
    use rocket_shoes_core::{Price, Product};

    use super::*;

    #[test]
    fn test_write_table_empty() {
        let mut out = Vec::new();
        write_table(&mut out, &[], &CartSummary::empty()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Cart is empty\n");
    }

    #[test]
    fn test_write_table_lines_and_totals() {
        let items = vec![LineItem::new(
            Product::new(ProductId::new(3), "Trail Runner", Price::from_cents(12_950), ""),
            2,
        )];
        let summary = CartSummary::from(items.as_slice());

        let mut out = Vec::new();
        write_table(&mut out, &items, &summary).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Trail Runner"));
        assert!(text.contains("129.50"));
        assert!(text.contains("259.00"));
        assert!(text.ends_with("1 product(s), 2 item(s), subtotal 259.00\n"));
    }
}
