//! The cart ledger.
//!
//! Lines are never merged: every `add_item` appends a new line, even for an
//! identical item and option set. After every mutation the subtotal and
//! total are recomputed from scratch as the sum of base price times quantity.
//! Mutations build the next line list first and only replace the current
//! state once the new totals are known to be valid.

use crate::error::{CartError, Result};
use bitzy_core::config::CartConfig;
use bitzy_menu::{ItemId, MenuItemOption, MenuItemRef, Money};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

/// Opaque unique line identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(Uuid);

impl LineId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for LineId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// One addition event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Line id
    pub line_id: LineId,
    /// Item snapshot taken when the line was added
    pub item: MenuItemRef,
    /// Units, at least one
    pub quantity: u32,
    /// Options chosen for this line
    pub selected_options: Vec<MenuItemOption>,
}

impl CartLine {
    /// Base price times quantity.
    pub fn line_total(&self) -> Option<Money> {
        self.item.base_price.checked_mul(u64::from(self.quantity))
    }
}

/// Snapshot of the cart after a mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// Lines in insertion order
    pub lines: Vec<CartLine>,
    /// Sum of line totals
    pub subtotal: Money,
    /// Amount payable; equal to the subtotal
    pub total: Money,
}

/// Owns the cart lines and their totals.
#[derive(Debug, Clone)]
pub struct CartLedger {
    currency: String,
    lines: Vec<CartLine>,
    subtotal: Money,
    total: Money,
}

impl Default for CartLedger {
    fn default() -> Self {
        Self::new(bitzy_menu::DEFAULT_CURRENCY)
    }
}

impl CartLedger {
    /// Creates an empty cart priced in `currency`.
    pub fn new(currency: impl Into<String>) -> Self {
        let currency = currency.into();
        Self {
            subtotal: Money::zero(currency.clone()),
            total: Money::zero(currency.clone()),
            currency,
            lines: Vec::new(),
        }
    }

    /// Creates an empty cart from the `[cart]` config section.
    pub fn from_config(config: &CartConfig) -> Self {
        Self::new(config.currency.clone())
    }

    /// Appends a new line and returns its id.
    ///
    /// # Errors
    ///
    /// [`CartError::InvalidQuantity`] when `quantity` is zero,
    /// [`CartError::CurrencyMismatch`] for a foreign-currency item,
    /// [`CartError::AmountOverflow`] when the total would overflow.
    pub fn add_item(
        &mut self,
        item: MenuItemRef,
        quantity: u32,
        options: Vec<MenuItemOption>,
    ) -> Result<LineId> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        if item.base_price.currency_code != self.currency {
            return Err(CartError::CurrencyMismatch {
                item: item.id.to_string(),
                found: item.base_price.currency_code.clone(),
                expected: self.currency.clone(),
            });
        }

        let line_id = LineId::generate();
        debug!(line_id = %line_id, item = %item.id, quantity, "Adding cart line");

        let mut lines = self.lines.clone();
        lines.push(CartLine {
            line_id,
            item,
            quantity,
            selected_options: options,
        });
        self.commit(lines)?;
        Ok(line_id)
    }

    /// Replaces a line's quantity. Zero removes the line; an unknown id is a no-op.
    pub fn set_quantity(&mut self, line_id: LineId, quantity: u32) -> Result<Cart> {
        if quantity == 0 {
            return self.remove_line(line_id);
        }

        let Some(index) = self.position(line_id) else {
            return Ok(self.cart());
        };
        debug!(line_id = %line_id, quantity, "Setting line quantity");

        let mut lines = self.lines.clone();
        lines[index].quantity = quantity;
        self.commit(lines)
    }

    /// Deletes a line; an unknown id is a no-op.
    pub fn remove_line(&mut self, line_id: LineId) -> Result<Cart> {
        let Some(index) = self.position(line_id) else {
            return Ok(self.cart());
        };
        debug!(line_id = %line_id, "Removing cart line");

        let mut lines = self.lines.clone();
        lines.remove(index);
        self.commit(lines)
    }

    /// Empties the cart.
    pub fn clear(&mut self) -> Cart {
        debug!(lines = self.lines.len(), "Clearing cart");
        self.lines.clear();
        self.subtotal = Money::zero(self.currency.clone());
        self.total = Money::zero(self.currency.clone());
        self.cart()
    }

    /// Adds one unit to a line.
    pub fn increment(&mut self, line_id: LineId) -> Result<Cart> {
        match self.line(line_id) {
            Some(line) => {
                let quantity = line.quantity.checked_add(1).ok_or(CartError::AmountOverflow)?;
                self.set_quantity(line_id, quantity)
            }
            None => Ok(self.cart()),
        }
    }

    /// Takes one unit off a line; a line at one unit is removed instead.
    pub fn decrement(&mut self, line_id: LineId) -> Result<Cart> {
        match self.line(line_id).map(|line| line.quantity) {
            Some(1) => self.remove_line(line_id),
            Some(quantity) => self.set_quantity(line_id, quantity - 1),
            None => Ok(self.cart()),
        }
    }

    /// The line with `line_id`.
    pub fn line(&self, line_id: LineId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.line_id == line_id)
    }

    /// The first line holding `item_id`.
    pub fn line_for_item(&self, item_id: &ItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.item.id == item_id)
    }

    /// Quantity on the first line holding `item_id`, zero when absent.
    pub fn quantity_for_item(&self, item_id: &ItemId) -> u32 {
        self.line_for_item(item_id).map_or(0, |line| line.quantity)
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// No lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Units across all lines.
    pub fn unit_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Cart currency.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> &Money {
        &self.subtotal
    }

    /// Amount payable.
    pub fn total(&self) -> &Money {
        &self.total
    }

    /// Snapshot of lines and totals.
    pub fn cart(&self) -> Cart {
        Cart {
            lines: self.lines.clone(),
            subtotal: self.subtotal.clone(),
            total: self.total.clone(),
        }
    }

    fn position(&self, line_id: LineId) -> Option<usize> {
        self.lines.iter().position(|line| line.line_id == line_id)
    }

    fn commit(&mut self, lines: Vec<CartLine>) -> Result<Cart> {
        let sum = sum_lines(&self.currency, &lines)?;
        self.lines = lines;
        self.subtotal = sum.clone();
        self.total = sum;
        Ok(self.cart())
    }
}

fn sum_lines(currency: &str, lines: &[CartLine]) -> Result<Money> {
    lines.iter().try_fold(Money::zero(currency), |acc, line| {
        line.line_total()
            .and_then(|line_total| acc.checked_add(&line_total))
            .ok_or(CartError::AmountOverflow)
    })
}
