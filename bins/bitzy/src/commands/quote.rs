//! Quote command - build a cart from menu items and print totals

use super::usage;
use crate::app::App;
use anyhow::Result;
use bitzy_cart::CartLedger;
use bitzy_cli::{format_count, Status};
use bitzy_menu::Catalog;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Catalog JSON file
    #[arg(long)]
    pub file: PathBuf,

    /// Item to add as ITEM or ITEM:QTY (combos as combo_<id>); repeatable
    #[arg(long = "add", value_name = "ITEM[:QTY]", required = true)]
    pub items: Vec<String>,
}

pub fn run(app: &App, args: &QuoteArgs) -> Result<()> {
    let catalog = Catalog::load(&args.file)?;
    let mut ledger = CartLedger::from_config(&app.config.schema.cart);

    for spec in &args.items {
        let (id, quantity) = parse_line(spec)?;
        let Some(item) = catalog.find(id) else {
            return usage(format!("Unknown menu item: {id}"));
        };
        ledger.add_item(item, quantity, Vec::new())?;
    }

    if app.is_json() {
        return app.print_json(&ledger.cart());
    }

    Status::header(&format!(
        "Cart: {}, {} units",
        format_count(ledger.len(), "line", "lines"),
        ledger.unit_count()
    ));
    for line in ledger.lines() {
        let total = line
            .line_total()
            .map_or_else(|| "-".to_string(), |m| m.to_string());
        println!("  {:>3} x {:<28} {:>10}", line.quantity, line.item.name, total);
    }
    println!();
    Status::field("Subtotal", ledger.subtotal());
    Status::field("Total", ledger.total());
    Ok(())
}

/// Splits `ITEM[:QTY]`; the quantity defaults to 1
fn parse_line(spec: &str) -> Result<(&str, u32)> {
    let (id, quantity) = match spec.rsplit_once(':') {
        Some((id, qty)) => match qty.trim().parse::<u32>() {
            Ok(qty) => (id, qty),
            Err(_) => return usage(format!("Invalid quantity in {spec:?}")),
        },
        None => (spec, 1),
    };
    let id = id.trim();
    if id.is_empty() {
        return usage(format!("Missing item id in {spec:?}"));
    }
    Ok((id, quantity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("misal").unwrap(), ("misal", 1));
        assert_eq!(parse_line("misal:3").unwrap(), ("misal", 3));
        assert_eq!(parse_line("combo_c1:0").unwrap(), ("combo_c1", 0));
    }

    #[test]
    fn test_parse_line_rejects_bad_input() {
        assert!(parse_line("misal:two").is_err());
        assert!(parse_line(":2").is_err());
        assert!(parse_line("misal:-1").is_err());
    }
}
