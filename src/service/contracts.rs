//! Contract methods the dashboard calls, and their call builders.

use ethers::abi::{self, ParamType, Token};
use ethers::types::U256;

use super::wallet_provider::{ContractCall, WalletError};
use crate::models::OnChainAidRequest;

pub const VOTE: &str = "vote(string)";
pub const GET_VOTES: &str = "getVotes(string)";
pub const DISTRIBUTE_AID: &str = "distributeAid(string,uint256)";
pub const GET_AID_REQUEST: &str = "getAidRequest(string)";

pub fn vote(voting_contract: &str, proposal_id: &str) -> ContractCall {
    ContractCall::new(
        voting_contract,
        VOTE,
        vec![Token::String(proposal_id.to_string())],
    )
}

pub fn get_votes(voting_contract: &str, proposal_id: &str) -> ContractCall {
    ContractCall::new(
        voting_contract,
        GET_VOTES,
        vec![Token::String(proposal_id.to_string())],
    )
}

/// The same wei amount is passed as argument and attached as value
pub fn distribute_aid(aid_contract: &str, request_id: &str, amount_wei: U256) -> ContractCall {
    ContractCall::new(
        aid_contract,
        DISTRIBUTE_AID,
        vec![
            Token::String(request_id.to_string()),
            Token::Uint(amount_wei),
        ],
    )
    .with_value(amount_wei)
}

pub fn get_aid_request(aid_contract: &str, request_id: &str) -> ContractCall {
    ContractCall::new(
        aid_contract,
        GET_AID_REQUEST,
        vec![Token::String(request_id.to_string())],
    )
}

pub fn decode_uint(data: &[u8]) -> Result<U256, WalletError> {
    let mut tokens = abi::decode(&[ParamType::Uint(256)], data)?;
    match tokens.pop() {
        Some(Token::Uint(value)) => Ok(value),
        _ => Err(WalletError::InvalidResponse("expected uint256".to_string())),
    }
}

/// `getAidRequest` returns a `(string, uint256, uint256, bool)` struct
pub fn decode_aid_request(data: &[u8]) -> Result<OnChainAidRequest, WalletError> {
    let layout = ParamType::Tuple(vec![
        ParamType::String,
        ParamType::Uint(256),
        ParamType::Uint(256),
        ParamType::Bool,
    ]);
    let mut tokens = abi::decode(&[layout], data)?;

    let fields = match tokens.pop() {
        Some(Token::Tuple(fields)) => fields,
        _ => {
            return Err(WalletError::InvalidResponse(
                "expected a getAidRequest tuple".to_string(),
            ))
        }
    };

    match fields.as_slice() {
        [Token::String(location), Token::Uint(required), Token::Uint(distributed), Token::Bool(active)] => {
            Ok(OnChainAidRequest {
                location: location.clone(),
                required_amount: *required,
                distributed_amount: *distributed,
                is_active: *active,
            })
        }
        _ => Err(WalletError::InvalidResponse(
            "unexpected getAidRequest layout".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aid_request_data(location: &str, required: U256, distributed: U256, active: bool) -> Vec<u8> {
        abi::encode(&[Token::Tuple(vec![
            Token::String(location.to_string()),
            Token::Uint(required),
            Token::Uint(distributed),
            Token::Bool(active),
        ])])
    }

    #[test]
    fn test_distribute_aid_attaches_value() {
        let call = distribute_aid("0xaid", "r1", U256::from(5));
        assert_eq!(call.method(), "distributeAid");
        assert_eq!(call.value, Some(U256::from(5)));
        assert_eq!(call.args[1], Token::Uint(U256::from(5)));
    }

    #[test]
    fn test_vote_is_not_payable() {
        let call = vote("0xvoting", "p1");
        assert_eq!(call.value, None);
        assert_eq!(call.args, vec![Token::String("p1".to_string())]);
    }

    #[test]
    fn test_decode_aid_request() {
        let data = aid_request_data("Pazarcik, Kahramanmaras", U256::from(7), U256::from(7), false);

        let request = decode_aid_request(&data).unwrap();
        assert_eq!(request.location, "Pazarcik, Kahramanmaras");
        assert!(request.is_fully_distributed());
    }

    #[test]
    fn test_decode_values_wider_than_128_bits() {
        let required = U256::from(u128::MAX) * U256::from(4u8);
        let data = aid_request_data("Antakya", required, U256::zero(), true);

        let request = decode_aid_request(&data).unwrap();
        assert_eq!(request.required_amount, required);

        let votes = decode_uint(&abi::encode(&[Token::Uint(U256::MAX)])).unwrap();
        assert_eq!(votes, U256::MAX);
    }

    #[test]
    fn test_decode_uint_rejects_empty() {
        assert!(decode_uint(&[]).is_err());
    }
}
