//! Prize catalog, mystery-wheel segments, and claimed prizes

use serde::{Deserialize, Serialize};

/// Tag that marks a prize as part of the mystery wheel
pub const MYSTERY_PRIZE_TAG: &str = "MB";

/// Weight used when a prize does not state its probability
pub const DEFAULT_PRIZE_PROBABILITY: f64 = 0.25;

/// Catalog entry from `GET /prizes`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrizeRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub img_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub stock: Option<PrizeStock>,
    #[serde(default)]
    pub probability: Option<f64>,
    #[serde(default)]
    pub credits: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrizeStock {
    #[serde(default)]
    pub available: i64,
    #[serde(default)]
    pub redeemed: i64,
    #[serde(default)]
    pub count: i64,
}

impl PrizeRecord {
    pub fn is_mystery_prize(&self) -> bool {
        self.tags.iter().any(|t| t == MYSTERY_PRIZE_TAG)
    }

    pub fn into_prize(self) -> Prize {
        Prize {
            stock: self.stock.map(|s| s.available).unwrap_or(0),
            probability: self
                .probability
                .filter(|p| *p > 0.0)
                .unwrap_or(DEFAULT_PRIZE_PROBABILITY),
            id: self.id,
            name: self.name,
            description: self.description,
            img_url: self.img_url,
            tags: self.tags,
        }
    }
}

/// A segment on the mystery wheel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prize {
    pub id: String,
    pub name: String,
    pub description: String,
    pub stock: i64,
    pub probability: f64,
    pub img_url: Option<String>,
    pub tags: Vec<String>,
}

/// Keep only MB-tagged prizes and normalize their probabilities to sum to 1
pub fn wheel_prizes(records: Vec<PrizeRecord>) -> Vec<Prize> {
    let mut prizes: Vec<Prize> = records
        .into_iter()
        .filter(PrizeRecord::is_mystery_prize)
        .map(PrizeRecord::into_prize)
        .collect();

    let total: f64 = prizes.iter().map(|p| p.probability).sum();
    if total > 0.0 {
        for prize in &mut prizes {
            prize.probability /= total;
        }
    }
    prizes
}

/// A prize the player has already claimed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPrize {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub img_url: Option<String>,
    #[serde(default)]
    pub claimed_at: Option<String>,
}

/// `GET /players/{id}/prizes` has answered with each of these shapes
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PlayerPrizesResponse {
    List(Vec<PlayerPrize>),
    Prizes { prizes: Vec<PlayerPrize> },
    Items { items: Vec<PlayerPrize> },
}

impl PlayerPrizesResponse {
    pub fn into_prizes(self) -> Vec<PlayerPrize> {
        match self {
            PlayerPrizesResponse::List(prizes)
            | PlayerPrizesResponse::Prizes { prizes }
            | PlayerPrizesResponse::Items { items: prizes } => prizes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, tags: &[&str], probability: Option<f64>) -> PrizeRecord {
        PrizeRecord {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            img_url: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            stock: Some(PrizeStock {
                available: 4,
                ..Default::default()
            }),
            probability,
            credits: None,
        }
    }

    #[test]
    fn test_wheel_filters_and_normalizes() {
        let prizes = wheel_prizes(vec![
            record("mug", &["MB"], Some(0.5)),
            record("poster", &["shop"], Some(0.9)),
            record("sticker", &["MB", "cheap"], None),
        ]);
        assert_eq!(prizes.len(), 2);
        let total: f64 = prizes.iter().map(|p| p.probability).sum();
        assert!((total - 1.0).abs() < 1e-9);
        // 0.5 vs default 0.25
        assert!((prizes[0].probability - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(prizes[1].stock, 4);
    }

    #[test]
    fn test_player_prize_shapes() {
        for raw in [
            r#"[{"id": "a", "name": "A"}]"#,
            r#"{"prizes": [{"id": "a", "name": "A"}]}"#,
            r#"{"items": [{"id": "a", "name": "A", "claimedAt": "2024-03-01T10:00:00Z"}]}"#,
        ] {
            let prizes = serde_json::from_str::<PlayerPrizesResponse>(raw).unwrap().into_prizes();
            assert_eq!(prizes.len(), 1);
            assert_eq!(prizes[0].id, "a");
        }
    }
}
