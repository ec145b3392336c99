//! Ticket printing types
//!
//! [`TicketPayload`] mirrors the JSON the POS front end posts (field names
//! kept as the front end sends them). [`Ticket`] is the validated order the
//! composer renders.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// Domain
// ============================================================================

/// How the order reaches the customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryType {
    /// Customer picks up at the store
    Pickup,
    /// Sent to the customer's address
    Delivery,
}

impl DeliveryType {
    /// Receipt label
    pub fn label(self) -> &'static str {
        match self {
            Self::Pickup => "LOCAL",
            Self::Delivery => "DOMICILIO",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    NotPaid,
}

impl PaymentStatus {
    /// Receipt label
    pub fn label(self) -> &'static str {
        match self {
            Self::Paid => "PAGADO",
            Self::NotPaid => "NO PAGADO",
        }
    }
}

/// One ordered product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    /// Sauce/size options, in print order
    pub modifiers: Vec<String>,
    /// `unit_price * quantity`, checked when the line is built
    pub subtotal: Decimal,
}

impl LineItem {
    /// Validate one ordered product and compute its subtotal
    pub fn new(
        product_name: String,
        unit_price: Decimal,
        quantity: u32,
        modifiers: Vec<String>,
    ) -> Result<Self, CompositionError> {
        if unit_price.is_sign_negative() && !unit_price.is_zero() {
            return Err(CompositionError::InvalidValue {
                field: format!("precioUnitario ({})", product_name),
                reason: format!("negative price {}", unit_price),
            });
        }
        if quantity == 0 {
            return Err(CompositionError::InvalidValue {
                field: format!("cantidad ({})", product_name),
                reason: "quantity must be at least 1".to_string(),
            });
        }
        let subtotal = unit_price
            .checked_mul(Decimal::from(quantity))
            .ok_or_else(|| CompositionError::InvalidValue {
                field: format!("precioUnitario ({})", product_name),
                reason: format!("{} x {} is out of range", unit_price, quantity),
            })?;

        Ok(Self {
            product_name,
            unit_price,
            quantity,
            modifiers,
            subtotal,
        })
    }
}

/// A validated order, ready to compose
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub date: String,
    pub customer_name: String,
    pub phone: String,
    /// Present exactly when `delivery_type` is [`DeliveryType::Delivery`]
    pub address: Option<String>,
    pub paid: PaymentStatus,
    pub delivery_type: DeliveryType,
    pub line_items: Vec<LineItem>,
    /// Sum of all line subtotals
    pub total: Decimal,
}

/// Sum line subtotals, rejecting a total that does not fit a [`Decimal`]
pub fn order_total(items: &[LineItem]) -> Result<Decimal, CompositionError> {
    items.iter().try_fold(Decimal::ZERO, |acc, item| {
        acc.checked_add(item.subtotal)
            .ok_or_else(|| CompositionError::InvalidValue {
                field: "detalles".to_string(),
                reason: "order total is out of range".to_string(),
            })
    })
}

// ============================================================================
// Wire payload
// ============================================================================

/// Text field that front ends send either as a string or a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    Text(String),
    Number(serde_json::Number),
}

impl TextValue {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

/// Ticket as posted to `POST /imprimir`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPayload {
    pub fecha: Option<TextValue>,
    pub cliente: Option<String>,
    pub telefono: Option<TextValue>,
    pub direccion: Option<String>,
    /// `1` or `true` means paid
    pub pagado: Option<Value>,
    /// `1`, `"delivery"` or `"domicilio"` means delivery
    pub tipo_entrega: Option<Value>,
    pub detalles: Option<Vec<DetailPayload>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailPayload {
    pub precio_unitario: Decimal,
    pub cantidad: u32,
    pub producto_rel: ProductRef,
    #[serde(default)]
    pub variaciones_detalle: Vec<VariationDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRef {
    pub nombre: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariationDetail {
    pub variacion: Variation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variation {
    pub nombre: String,
}

// ============================================================================
// Validation
// ============================================================================

/// The ticket cannot be rendered
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompositionError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Malformed ticket: {0}")]
    Malformed(String),
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, CompositionError> {
    value.ok_or(CompositionError::MissingField(field))
}

fn parse_paid(value: Option<&Value>) -> PaymentStatus {
    match value {
        Some(Value::Bool(true)) => PaymentStatus::Paid,
        Some(Value::Number(n)) if n.as_i64() == Some(1) => PaymentStatus::Paid,
        _ => PaymentStatus::NotPaid,
    }
}

fn parse_delivery_type(value: &Value) -> DeliveryType {
    match value {
        Value::Number(n) if n.as_i64() == Some(1) => DeliveryType::Delivery,
        Value::String(s)
            if s.eq_ignore_ascii_case("delivery") || s.eq_ignore_ascii_case("domicilio") =>
        {
            DeliveryType::Delivery
        }
        _ => DeliveryType::Pickup,
    }
}

impl TryFrom<DetailPayload> for LineItem {
    type Error = CompositionError;

    fn try_from(detail: DetailPayload) -> Result<Self, Self::Error> {
        Self::new(
            detail.producto_rel.nombre,
            detail.precio_unitario,
            detail.cantidad,
            detail
                .variaciones_detalle
                .into_iter()
                .map(|v| v.variacion.nombre)
                .collect(),
        )
    }
}

impl TryFrom<TicketPayload> for Ticket {
    type Error = CompositionError;

    fn try_from(payload: TicketPayload) -> Result<Self, Self::Error> {
        let date = required(payload.fecha, "fecha")?.into_string();
        let customer_name = required(payload.cliente, "cliente")?;
        let phone = required(payload.telefono, "telefono")?.into_string();
        let delivery_type = parse_delivery_type(&required(payload.tipo_entrega, "tipoEntrega")?);
        let paid = parse_paid(payload.pagado.as_ref());

        let address = match delivery_type {
            DeliveryType::Delivery => Some(
                payload
                    .direccion
                    .filter(|a| !a.trim().is_empty())
                    .ok_or(CompositionError::MissingField("direccion"))?,
            ),
            DeliveryType::Pickup => None,
        };

        let line_items = required(payload.detalles, "detalles")?
            .into_iter()
            .map(LineItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let total = order_total(&line_items)?;

        Ok(Self {
            date,
            customer_name,
            phone,
            address,
            paid,
            delivery_type,
            line_items,
            total,
        })
    }
}
