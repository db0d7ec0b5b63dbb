//! Deal API models and DTOs

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::validation::{
    validate_not_empty, validate_one_of, validate_optional_uuid, validate_string_length,
};
use crate::db::models::deal::DEAL_STATUSES;
use crate::db::repositories::{DealFilter, DealUpdate, NewDeal};

fn validate_amounts(quantity: Option<f64>, price: Option<f64>) -> ApiResult<()> {
    if matches!(quantity, Some(q) if !(q.is_finite() && q > 0.0)) {
        return Err(ApiError::ValidationError("quantity must be positive".to_string()));
    }
    if matches!(price, Some(p) if !(p.is_finite() && p >= 0.0)) {
        return Err(ApiError::ValidationError(
            "price_per_unit cannot be negative".to_string(),
        ));
    }
    Ok(())
}

fn validate_currency(currency: &str) -> ApiResult<()> {
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ApiError::ValidationError(format!(
            "currency must be a three-letter code: {}",
            currency
        )));
    }
    Ok(())
}

/// Request to open a deal; the broker is the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDealRequest {
    pub vessel_id: Option<String>,
    pub refinery_id: Option<String>,
    pub seller_company_id: Option<String>,
    pub buyer_company_id: Option<String>,
    pub cargo_type: String,
    pub quantity: f64,
    /// Defaults to "bbl"
    pub unit: Option<String>,
    pub price_per_unit: f64,
    /// Defaults to "USD"
    pub currency: Option<String>,
    pub notes: Option<String>,
}

impl CreateDealRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_not_empty(&self.cargo_type, "cargo_type")?;
        validate_string_length(&self.cargo_type, "cargo_type", 1, 100)?;
        validate_amounts(Some(self.quantity), Some(self.price_per_unit))?;
        if let Some(currency) = &self.currency {
            validate_currency(currency)?;
        }
        validate_optional_uuid(self.vessel_id.as_deref())?;
        validate_optional_uuid(self.refinery_id.as_deref())?;
        validate_optional_uuid(self.seller_company_id.as_deref())?;
        validate_optional_uuid(self.buyer_company_id.as_deref())?;
        Ok(())
    }

    pub fn into_new(self, broker_id: String) -> NewDeal {
        NewDeal {
            broker_id,
            vessel_id: self.vessel_id,
            refinery_id: self.refinery_id,
            seller_company_id: self.seller_company_id,
            buyer_company_id: self.buyer_company_id,
            cargo_type: self.cargo_type,
            quantity: self.quantity,
            unit: self.unit.unwrap_or_else(|| "bbl".to_string()),
            price_per_unit: self.price_per_unit,
            currency: self.currency.unwrap_or_else(|| "USD".to_string()),
            status: "pending".to_string(),
            notes: self.notes,
        }
    }
}

/// Request to update a deal; absent fields are kept
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDealRequest {
    pub vessel_id: Option<String>,
    pub refinery_id: Option<String>,
    pub seller_company_id: Option<String>,
    pub buyer_company_id: Option<String>,
    pub cargo_type: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub price_per_unit: Option<f64>,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl UpdateDealRequest {
    pub fn has_updates(&self) -> bool {
        self.vessel_id.is_some()
            || self.refinery_id.is_some()
            || self.seller_company_id.is_some()
            || self.buyer_company_id.is_some()
            || self.cargo_type.is_some()
            || self.quantity.is_some()
            || self.unit.is_some()
            || self.price_per_unit.is_some()
            || self.currency.is_some()
            || self.status.is_some()
            || self.notes.is_some()
    }

    /// The new status when it is the only field being changed
    pub fn status_only(&self) -> Option<&str> {
        let rest = Self {
            status: None,
            ..self.clone()
        };
        match &self.status {
            Some(status) if !rest.has_updates() => Some(status),
            _ => None,
        }
    }

    pub fn validate(&self) -> ApiResult<()> {
        validate_amounts(self.quantity, self.price_per_unit)?;
        if let Some(currency) = &self.currency {
            validate_currency(currency)?;
        }
        if let Some(status) = &self.status {
            validate_one_of(status, "status", DEAL_STATUSES)?;
        }
        validate_optional_uuid(self.vessel_id.as_deref())?;
        validate_optional_uuid(self.refinery_id.as_deref())?;
        validate_optional_uuid(self.seller_company_id.as_deref())?;
        validate_optional_uuid(self.buyer_company_id.as_deref())?;
        Ok(())
    }

    pub fn into_update(self) -> DealUpdate {
        DealUpdate {
            vessel_id: self.vessel_id,
            refinery_id: self.refinery_id,
            seller_company_id: self.seller_company_id,
            buyer_company_id: self.buyer_company_id,
            cargo_type: self.cargo_type,
            quantity: self.quantity,
            unit: self.unit,
            price_per_unit: self.price_per_unit,
            currency: self.currency,
            status: self.status,
            notes: self.notes,
        }
    }
}

/// Query parameters for listing deals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DealListQuery {
    pub status: Option<String>,
    pub vessel_id: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl DealListQuery {
    /// Filter scoped to `broker_id`; `None` sees every broker
    pub fn filter(&self, broker_id: Option<String>) -> DealFilter {
        DealFilter {
            broker_id,
            status: self.status.clone(),
            vessel_id: self.vessel_id.clone(),
        }
    }
}

/// Deal with its computed value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealResponse {
    #[serde(flatten)]
    pub deal: crate::db::models::Deal,
    pub total_value: f64,
}

impl From<crate::db::models::Deal> for DealResponse {
    fn from(deal: crate::db::models::Deal) -> Self {
        Self {
            total_value: deal.total_value(),
            deal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateDealRequest {
        serde_json::from_str(r#"{"cargo_type":"Brent crude","quantity":500000,"price_per_unit":82.5}"#)
            .unwrap()
    }

    #[test]
    fn test_create_deal_defaults() {
        let req = request();
        assert!(req.validate().is_ok());
        let new = req.into_new("b-1".to_string());
        assert_eq!(new.broker_id, "b-1");
        assert_eq!(new.unit, "bbl");
        assert_eq!(new.currency, "USD");
        assert_eq!(new.status, "pending");
    }

    #[test]
    fn test_create_deal_invalid_amounts() {
        let mut req = request();
        req.quantity = 0.0;
        assert!(req.validate().is_err());

        let mut req = request();
        req.price_per_unit = -1.0;
        assert!(req.validate().is_err());

        let mut req = request();
        req.currency = Some("usd".to_string());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_deal_status_checked() {
        let req = UpdateDealRequest {
            status: Some("won".to_string()),
            ..Default::default()
        };
        assert!(req.has_updates());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_status_only_update() {
        let req = UpdateDealRequest {
            status: Some("negotiating".to_string()),
            ..Default::default()
        };
        assert_eq!(req.status_only(), Some("negotiating"));

        let req = UpdateDealRequest {
            status: Some("negotiating".to_string()),
            notes: Some("counter offer".to_string()),
            ..Default::default()
        };
        assert_eq!(req.status_only(), None);
        assert_eq!(UpdateDealRequest::default().status_only(), None);
    }
}
