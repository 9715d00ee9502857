//! Order model and the totals calculator.
//!
//! The two monetary totals are never taken from user input: they are derived
//! from `nb_days`, `tjm` and `taux_tva` by [`calculate_totals`] whenever a
//! draft is turned into a payload for the orders API.

use crate::error::TotalsOverflow;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An order as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Backend-assigned identifier.
    pub id: i64,
    pub customer: String,
    pub nb_days: i32,
    /// Daily rate.
    #[serde(with = "rust_decimal::serde::float")]
    pub tjm: Decimal,
    /// VAT rate as a percentage (0-100).
    #[serde(with = "rust_decimal::serde::float")]
    pub taux_tva: Decimal,
    /// Total excluding tax.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_ht: Decimal,
    /// Total including tax.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_ttc: Decimal,
}

/// Creation view: everything except the id and the totals.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOrder {
    pub customer: String,
    pub nb_days: i32,
    pub tjm: Decimal,
    pub taux_tva: Decimal,
}

/// Update view: everything except the totals.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOrder {
    pub id: i64,
    pub customer: String,
    pub nb_days: i32,
    pub tjm: Decimal,
    pub taux_tva: Decimal,
}

/// POST body for a new order: an [`Order`] without its id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub customer: String,
    pub nb_days: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub tjm: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub taux_tva: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_ht: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_ttc: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub total_ht: Decimal,
    pub total_ttc: Decimal,
}

/// `total_ht = nb_days * tjm`, `total_ttc = total_ht * (1 + taux_tva / 100)`.
///
/// No validation is done here; out-of-range inputs give arithmetically
/// consistent results. Fails only when a total does not fit in a [`Decimal`].
pub fn calculate_totals(
    nb_days: i32,
    tjm: Decimal,
    taux_tva: Decimal,
) -> Result<Totals, TotalsOverflow> {
    let total_ht = Decimal::from(nb_days)
        .checked_mul(tjm)
        .ok_or(TotalsOverflow)?;
    let multiplier = taux_tva
        .checked_div(Decimal::ONE_HUNDRED)
        .and_then(|rate| rate.checked_add(Decimal::ONE))
        .ok_or(TotalsOverflow)?;
    let total_ttc = total_ht.checked_mul(multiplier).ok_or(TotalsOverflow)?;

    Ok(Totals {
        total_ht,
        total_ttc,
    })
}

impl CreateOrder {
    pub fn totals(&self) -> Result<Totals, TotalsOverflow> {
        calculate_totals(self.nb_days, self.tjm, self.taux_tva)
    }
}

impl UpdateOrder {
    pub fn totals(&self) -> Result<Totals, TotalsOverflow> {
        calculate_totals(self.nb_days, self.tjm, self.taux_tva)
    }
}

impl TryFrom<CreateOrder> for NewOrder {
    type Error = TotalsOverflow;

    fn try_from(draft: CreateOrder) -> Result<Self, Self::Error> {
        let Totals {
            total_ht,
            total_ttc,
        } = draft.totals()?;

        Ok(Self {
            customer: draft.customer,
            nb_days: draft.nb_days,
            tjm: draft.tjm,
            taux_tva: draft.taux_tva,
            total_ht,
            total_ttc,
        })
    }
}

impl TryFrom<UpdateOrder> for Order {
    type Error = TotalsOverflow;

    fn try_from(draft: UpdateOrder) -> Result<Self, Self::Error> {
        let Totals {
            total_ht,
            total_ttc,
        } = draft.totals()?;

        Ok(Self {
            id: draft.id,
            customer: draft.customer,
            nb_days: draft.nb_days,
            tjm: draft.tjm,
            taux_tva: draft.taux_tva,
            total_ht,
            total_ttc,
        })
    }
}

/// Narrow a stored order back to its editable fields, dropping the totals.
impl From<Order> for UpdateOrder {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            customer: order.customer,
            nb_days: order.nb_days,
            tjm: order.tjm,
            taux_tva: order.taux_tva,
        }
    }
}
