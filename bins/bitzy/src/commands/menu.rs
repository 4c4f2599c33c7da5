//! Menu command - list the catalog with filters and sorting

use crate::app::App;
use anyhow::Result;
use bitzy_cli::{format_count, Status};
use bitzy_menu::{Catalog, CatalogFilter, CategoryId, MenuItemRef, PreferenceStore, SortKey};
use clap::Args;
use owo_colors::OwoColorize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct MenuArgs {
    /// Catalog JSON file
    #[arg(long)]
    pub file: PathBuf,

    /// Only this category
    #[arg(long)]
    pub category: Option<String>,

    /// Only vegetarian items (also on when the veg-only preference is set)
    #[arg(long)]
    pub veg: bool,

    /// Hide sold-out items
    #[arg(long)]
    pub available: bool,

    /// price-asc, price-desc, rating-asc, rating-desc, name-asc or name-desc
    #[arg(long, default_value = "price-asc")]
    pub sort: SortKey,
}

pub fn run(app: &App, args: &MenuArgs) -> Result<()> {
    let catalog = Catalog::load(&args.file)?;
    let prefs = PreferenceStore::new(app.store()).load();

    let filter = CatalogFilter {
        category: args.category.as_deref().map(CategoryId::from),
        veg_only: args.veg,
        available_only: args.available,
        sort: args.sort,
    }
    .with_global_veg(prefs.veg_only);

    let items = catalog.all_items();
    let listed = filter.apply(&items);

    if app.is_json() {
        return app.print_json(&listed);
    }

    let mut title = format!(
        "Menu: {} by {}",
        format_count(listed.len(), "item", "items"),
        filter.sort
    );
    if filter.veg_only {
        title.push_str(", veg only");
    }
    Status::header(&title);

    if listed.is_empty() {
        Status::info("Nothing matches these filters");
        return Ok(());
    }
    for item in listed {
        print_item(item);
    }
    Ok(())
}

fn print_item(item: &MenuItemRef) {
    let marker = if item.is_veg() {
        "●".green().to_string()
    } else {
        "●".red().to_string()
    };
    let rating = item
        .display_rating()
        .map(|r| format!("★ {r:.1}"))
        .unwrap_or_default();
    let sold_out = if item.is_available { "" } else { " (sold out)" };

    println!(
        "  {marker} {:<28} {:>9}  {:<6}{}",
        item.name,
        item.base_price.to_string(),
        rating.dimmed(),
        sold_out.red()
    );
}
