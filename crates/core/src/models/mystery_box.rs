//! Mystery box models for `/mysteryboxes/{id}` and its claim endpoint

use crate::models::{ActiveWindow, PrizeRecord};
use serde::{Deserialize, Serialize};

/// Claim code meaning the prize was awarded
pub const CLAIM_CODE_SUCCESS: i64 = 1;

/// Claim code the platform uses for "not enough credits"
pub const CLAIM_CODE_INSUFFICIENT_CREDITS: i64 = 2;

/// Response from `GET /mysteryboxes/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MysteryBox {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub img_url: Option<String>,
    /// Credits charged per claim
    #[serde(default)]
    pub credits: i64,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub stock: Option<BoxStock>,
    #[serde(default)]
    pub active: Option<ActiveWindow>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoxStock {
    #[serde(default)]
    pub redeemed: i64,
    #[serde(default)]
    pub available: i64,
    #[serde(default)]
    pub count: i64,
}

/// Response from `POST /mysteryboxes/{id}/claim`.
///
/// The same shape arrives on success and on business-rule failures, so
/// it is decoded before the HTTP status is judged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub prize: Option<PrizeRecord>,
}

impl ClaimResponse {
    pub fn is_success(&self) -> bool {
        self.code == Some(CLAIM_CODE_SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_box() {
        let raw = r#"{
            "id": "1-test-wheel", "name": "Wheel", "description": "Spin it", "imgUrl": "",
            "credits": 10, "isAvailable": true,
            "stock": {"redeemed": 3, "available": 97, "count": 100},
            "active": {"from": "2024-01-01T00:00:00Z", "to": "2030-01-01T00:00:00Z"},
            "countLimit": 0, "limitCount": false, "period": "none",
            "requirement": {"category": "", "tags": [], "missions": [], "achievements": [], "level": null},
            "tags": []
        }"#;
        let mystery_box: MysteryBox = serde_json::from_str(raw).unwrap();
        assert!(mystery_box.is_available);
        assert_eq!(mystery_box.credits, 10);
        assert_eq!(mystery_box.stock.unwrap().available, 97);
    }

    #[test]
    fn test_claim_codes() {
        let rejected: ClaimResponse =
            serde_json::from_str(r#"{"code": 2, "message": "Not enough credits"}"#).unwrap();
        assert!(!rejected.is_success());
        assert_eq!(rejected.code, Some(CLAIM_CODE_INSUFFICIENT_CREDITS));

        let won: ClaimResponse = serde_json::from_str(
            r#"{"code": 1, "message": "ok", "prize": {"id": "tshirt", "name": "T-Shirt", "tags": ["MB"]}}"#,
        )
        .unwrap();
        assert!(won.is_success());
        assert_eq!(won.prize.unwrap().id, "tshirt");
    }
}
