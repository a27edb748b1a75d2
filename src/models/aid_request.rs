use chrono::{DateTime, Utc};
use ethers::types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Urgency level at which a request qualifies for automatic distribution
pub const AUTO_DISTRIBUTION_URGENCY: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AidStatus {
    Pending,
    Approved,
    Distributed,
}

impl std::fmt::Display for AidStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AidStatus::Pending => write!(f, "pending"),
            AidStatus::Approved => write!(f, "approved"),
            AidStatus::Distributed => write!(f, "distributed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyTier {
    Critical,
    High,
    Moderate,
}

impl UrgencyTier {
    pub fn from_level(level: u8) -> Self {
        match level {
            9.. => UrgencyTier::Critical,
            7..=8 => UrgencyTier::High,
            _ => UrgencyTier::Moderate,
        }
    }
}

/// Model-based assessment attached to each request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAssessment {
    /// Ratio in [0, 1]
    pub confidence: f64,
    pub recommendation: String,
    pub risk_factors: Vec<String>,
}

impl AiAssessment {
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AidRequest {
    pub id: String,
    pub location: String,
    pub urgency_level: u8,
    pub description: String,
    /// ETH
    pub required_amount: Decimal,
    pub status: AidStatus,
    pub timestamp: DateTime<Utc>,
    pub ai_prediction: AiAssessment,
}

impl AidRequest {
    pub fn urgency_tier(&self) -> UrgencyTier {
        UrgencyTier::from_level(self.urgency_level)
    }

    pub fn is_auto_distribution_eligible(&self) -> bool {
        self.urgency_level >= AUTO_DISTRIBUTION_URGENCY
    }
}

/// `getAidRequest` result from the aid distribution contract, in wei
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnChainAidRequest {
    pub location: String,
    pub required_amount: U256,
    pub distributed_amount: U256,
    pub is_active: bool,
}

impl OnChainAidRequest {
    /// The contract answers unknown ids with a zeroed record.
    pub fn is_registered(&self) -> bool {
        !self.required_amount.is_zero()
    }

    pub fn is_fully_distributed(&self) -> bool {
        self.is_registered() && !self.is_active && self.distributed_amount >= self.required_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request(urgency_level: u8) -> AidRequest {
        AidRequest {
            id: "1".to_string(),
            location: "Defne, Hatay".to_string(),
            urgency_level,
            description: "Emergency medical supplies needed".to_string(),
            required_amount: Decimal::from(5),
            status: AidStatus::Pending,
            timestamp: Utc::now(),
            ai_prediction: AiAssessment {
                confidence: 0.95,
                recommendation: "Immediate distribution recommended".to_string(),
                risk_factors: vec!["Natural disaster".to_string()],
            },
        }
    }

    #[test]
    fn test_urgency_tiers() {
        assert_eq!(UrgencyTier::from_level(10), UrgencyTier::Critical);
        assert_eq!(UrgencyTier::from_level(9), UrgencyTier::Critical);
        assert_eq!(UrgencyTier::from_level(8), UrgencyTier::High);
        assert_eq!(UrgencyTier::from_level(7), UrgencyTier::High);
        assert_eq!(UrgencyTier::from_level(6), UrgencyTier::Moderate);
        assert_eq!(UrgencyTier::from_level(0), UrgencyTier::Moderate);
    }

    #[test]
    fn test_auto_distribution_eligibility() {
        assert!(sample_request(8).is_auto_distribution_eligible());
        assert!(sample_request(10).is_auto_distribution_eligible());
        assert!(!sample_request(7).is_auto_distribution_eligible());
    }

    #[test]
    fn test_confidence_percent() {
        let request = sample_request(10);
        assert_eq!(request.ai_prediction.confidence_percent(), 95);
    }

    #[test]
    fn test_camel_case_fields() {
        let json = serde_json::to_value(sample_request(10)).unwrap();
        assert_eq!(json["urgencyLevel"], 10);
        assert_eq!(json["aiPrediction"]["riskFactors"][0], "Natural disaster");
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn test_on_chain_distribution_state() {
        let mut on_chain = OnChainAidRequest {
            location: "Pazarcik".to_string(),
            required_amount: U256::from(10),
            distributed_amount: U256::from(10),
            is_active: false,
        };
        assert!(on_chain.is_fully_distributed());
        on_chain.is_active = true;
        assert!(!on_chain.is_fully_distributed());
    }

    #[test]
    fn test_zeroed_record_is_not_registered() {
        let on_chain = OnChainAidRequest {
            location: String::new(),
            required_amount: U256::zero(),
            distributed_amount: U256::zero(),
            is_active: false,
        };
        assert!(!on_chain.is_registered());
        assert!(!on_chain.is_fully_distributed());
    }
}
