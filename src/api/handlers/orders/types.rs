//! Request/response types for order endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub city_or_municipality: String,
    pub shipping_address: String,
    pub delegate_name: String,
    pub delegate_phone1: String,
    #[serde(default)]
    pub delegate_phone2: Option<String>,
    #[serde(default)]
    pub libraries_count: i32,
    #[serde(default)]
    pub kindergartens_count: i32,
    #[serde(default)]
    pub total_institutions: i32,
    #[serde(default)]
    pub delivery_date: Option<String>,
    #[serde(default)]
    pub protocol_text: Option<String>,
    #[serde(default)]
    pub protocol_email_recipient: Option<String>,
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub success: bool,
    pub id: Uuid,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub city_or_municipality: String,
    pub shipping_address: String,
    pub delegate_name: String,
    pub delegate_phone1: String,
    pub delegate_phone2: Option<String>,
    pub libraries_count: i32,
    pub kindergartens_count: i32,
    pub total_institutions: i32,
    pub delivery_date: Option<String>,
    pub protocol_text: Option<String>,
    pub protocol_email_recipient: Option<String>,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
