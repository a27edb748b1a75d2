use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    Active,
    Passed,
    Rejected,
}

impl std::fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProposalStatus::Active => write!(f, "active"),
            ProposalStatus::Passed => write!(f, "passed"),
            ProposalStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: String,
    pub title: String,
    pub description: String,
    pub votes: u64,
    pub status: ProposalStatus,
    pub deadline: DateTime<Utc>,
    /// Amount requested from the faucet, ETH
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_amount: Option<Decimal>,
    /// Amount already received from individual donations, ETH
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_amount: Option<Decimal>,
}

impl Proposal {
    /// Funding progress in percent, capped at 100
    pub fn funding_progress(&self) -> Decimal {
        let received = self.received_amount.unwrap_or(Decimal::ZERO);
        let required = match self.required_amount {
            Some(required) if !required.is_zero() => required,
            _ => Decimal::ONE,
        };
        let progress = received / required * Decimal::ONE_HUNDRED;
        progress.min(Decimal::ONE_HUNDRED).max(Decimal::ZERO)
    }
}

/// DAO sizing used to decide when a proposal has majority support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceParams {
    pub dao_members: u64,
    /// Share of the faucet each passed proposal is eligible for, as a ratio
    pub faucet_distribution_ratio: Decimal,
}

impl Default for GovernanceParams {
    fn default() -> Self {
        Self {
            dao_members: 100,
            faucet_distribution_ratio: Decimal::new(1, 1),
        }
    }
}

impl GovernanceParams {
    /// ceil(members / 2)
    pub fn proposal_threshold(&self) -> u64 {
        self.dao_members.div_ceil(2)
    }

    pub fn has_majority(&self, proposal: &Proposal) -> bool {
        proposal.votes >= self.proposal_threshold()
    }

    /// Faucet amount a passed proposal may initially receive
    pub fn faucet_share(&self, faucet_balance: Decimal) -> Decimal {
        (faucet_balance * self.faucet_distribution_ratio).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn proposal(votes: u64, required: Option<&str>, received: Option<&str>) -> Proposal {
        Proposal {
            id: "3".to_string(),
            title: "Disaster Relief Fund".to_string(),
            description: "Emergency fund for immediate disaster response".to_string(),
            votes,
            status: ProposalStatus::Passed,
            deadline: Utc::now(),
            required_amount: required.map(|r| Decimal::from_str(r).unwrap()),
            received_amount: received.map(|r| Decimal::from_str(r).unwrap()),
        }
    }

    #[test]
    fn test_threshold_is_half_rounded_up() {
        assert_eq!(GovernanceParams::default().proposal_threshold(), 50);
        let odd = GovernanceParams {
            dao_members: 101,
            ..GovernanceParams::default()
        };
        assert_eq!(odd.proposal_threshold(), 51);
    }

    #[test]
    fn test_majority() {
        let params = GovernanceParams::default();
        assert!(params.has_majority(&proposal(65, None, None)));
        assert!(params.has_majority(&proposal(50, None, None)));
        assert!(!params.has_majority(&proposal(45, None, None)));
    }

    #[test]
    fn test_funding_progress() {
        assert_eq!(
            proposal(0, Some("10"), Some("2")).funding_progress(),
            Decimal::from(20)
        );
        assert_eq!(
            proposal(0, Some("1"), Some("3")).funding_progress(),
            Decimal::ONE_HUNDRED
        );
        assert_eq!(proposal(0, Some("5"), None).funding_progress(), Decimal::ZERO);
        // missing requirement treated as 1
        assert_eq!(
            proposal(0, None, Some("0.5")).funding_progress(),
            Decimal::from(50)
        );
    }

    #[test]
    fn test_faucet_share() {
        let params = GovernanceParams::default();
        assert_eq!(
            params.faucet_share(Decimal::from(12)),
            Decimal::from_str("1.2").unwrap()
        );
    }

    #[test]
    fn test_optional_amounts_omitted() {
        let json = serde_json::to_value(proposal(1, None, None)).unwrap();
        assert!(json.get("requiredAmount").is_none());
        assert_eq!(json["status"], "passed");
    }
}
