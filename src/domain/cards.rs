//! Physical card domain types
//!
//! NFC and QR cards ordered by a user and linked to their public profile.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_CARD_QUANTITY: i32 = 100;

/// Card kind enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Nfc,
    Qr,
    NfcQr,
}

impl CardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nfc => "nfc",
            Self::Qr => "qr",
            Self::NfcQr => "nfc_qr",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "qr" => Self::Qr,
            "nfc_qr" => Self::NfcQr,
            _ => Self::Nfc,
        }
    }

    /// Unit price in USD
    pub fn unit_price(&self) -> Decimal {
        match self {
            Self::Nfc => Decimal::new(2499, 2),
            Self::Qr => Decimal::new(999, 2),
            Self::NfcQr => Decimal::new(2999, 2),
        }
    }
}

/// Card design enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CardDesign {
    Classic,
    Minimal,
    Bold,
}

impl Default for CardDesign {
    fn default() -> Self {
        Self::Classic
    }
}

impl CardDesign {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Minimal => "minimal",
            Self::Bold => "bold",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "minimal" => Self::Minimal,
            "bold" => Self::Bold,
            _ => Self::Classic,
        }
    }
}

/// Card order status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    Pending,
    Processing,
    Shipped,
    Active,
    Cancelled,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Active => "active",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "processing" => Self::Processing,
            "shipped" => Self::Shipped,
            "active" => Self::Active,
            "cancelled" => Self::Cancelled,
            _ => Self::Pending,
        }
    }

    pub fn can_cancel(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Request DTO for ordering cards
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCardRequest {
    pub kind: CardKind,
    #[serde(default)]
    pub design: CardDesign,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    pub shipping_name: String,
    pub shipping_address: String,
}

fn default_quantity() -> i32 {
    1
}

impl OrderCardRequest {
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_CARD_QUANTITY).contains(&self.quantity) {
            return Err(format!(
                "Quantity must be between 1 and {}",
                MAX_CARD_QUANTITY
            ));
        }
        if self.shipping_name.trim().is_empty() {
            return Err("Shipping name is required".to_string());
        }
        if self.shipping_address.trim().is_empty() {
            return Err("Shipping address is required".to_string());
        }
        Ok(())
    }

    pub fn total_price(&self) -> Decimal {
        self.kind.unit_price() * Decimal::from(self.quantity)
    }
}

/// Response DTO for card
#[derive(Debug, Clone, Serialize)]
pub struct CardResponse {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub kind: CardKind,
    pub design: CardDesign,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub status: CardStatus,
    pub shipping_name: String,
    pub shipping_address: String,
    /// URL encoded into the chip / QR code
    pub target_url: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(quantity: i32) -> OrderCardRequest {
        OrderCardRequest {
            kind: CardKind::NfcQr,
            design: CardDesign::Minimal,
            quantity,
            shipping_name: "Jane Doe".into(),
            shipping_address: "1 Main St".into(),
        }
    }

    #[test]
    fn total_price_multiplies_unit_price() {
        assert_eq!(order(3).total_price(), Decimal::new(8997, 2));
    }

    #[test]
    fn quantity_bounds() {
        assert!(order(0).validate().is_err());
        assert!(order(1).validate().is_ok());
        assert!(order(100).validate().is_ok());
        assert!(order(101).validate().is_err());
    }

    #[test]
    fn blank_shipping_rejected() {
        let mut req = order(1);
        req.shipping_address = "  ".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn only_pending_cards_cancel() {
        assert!(CardStatus::Pending.can_cancel());
        assert!(!CardStatus::Shipped.can_cancel());
        assert_eq!(CardStatus::from_db("shipped"), CardStatus::Shipped);
    }
}
