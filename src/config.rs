use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

use crate::models::{parse_chain_id, GovernanceParams, NativeCurrency, NetworkDescriptor};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub network: NetworkConfig,
    pub contracts: ContractsConfig,
    pub wallet: WalletConfig,
    pub read_model: ReadModelConfig,
    pub governance: GovernanceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub rust_log: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub chain_name: String,
    pub currency_name: String,
    pub currency_symbol: String,
    pub rpc_url: String,
    pub explorer_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContractsConfig {
    pub aid_distribution: String,
    pub proposal_voting: String,
    pub faucet: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WalletConfig {
    /// JSON-RPC endpoint of the wallet; no wallet when unset
    pub rpc_url: Option<String>,
    pub confirmation_poll_ms: u64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReadModelSourceKind {
    Static,
    Chain,
}

impl FromStr for ReadModelSourceKind {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(ReadModelSourceKind::Static),
            "chain" => Ok(ReadModelSourceKind::Chain),
            other => Err(anyhow::anyhow!("unknown READ_MODEL_SOURCE: {}", other)),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReadModelConfig {
    pub fixture_path: String,
    pub source: ReadModelSourceKind,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GovernanceConfig {
    pub dao_members: u64,
    pub faucet_distribution_ratio: Decimal,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let port: u16 = var_or("PORT", "8080").parse()?;
        let host = var_or("HOST", "127.0.0.1");
        let rust_log = var_or("RUST_LOG", "aid_dashboard=info,actix_web=info");

        let raw_chain_id = var_or("CHAIN_ID", "0xaa36a7");
        let chain_id = parse_chain_id(&raw_chain_id)
            .ok_or_else(|| anyhow::anyhow!("invalid CHAIN_ID: {}", raw_chain_id))?;
        let chain_name = var_or("CHAIN_NAME", "Sepolia");
        let currency_name = var_or("CURRENCY_NAME", "Sepolia Ether");
        let currency_symbol = var_or("CURRENCY_SYMBOL", "SEP");
        let network_rpc_url = var_or("NETWORK_RPC_URL", "https://sepolia.infura.io/v3/");
        let explorer_url = var_or("EXPLORER_URL", "https://sepolia.etherscan.io");

        let aid_distribution = var_or(
            "AID_DISTRIBUTION_ADDRESS",
            "0x9A676e781A523b5d0C0e43731313A708CB607508",
        );
        let proposal_voting = var_or(
            "PROPOSAL_VOTING_ADDRESS",
            "0x742d35Cc6634C0532925a3b844Bc454e4438f44e",
        );
        let faucet = var_or("FAUCET_ADDRESS", "0x1234567890123456789012345678901234567890");

        let wallet_rpc_url = env::var("WALLET_RPC_URL").ok().filter(|url| !url.trim().is_empty());
        let confirmation_poll_ms: u64 = var_or("CONFIRMATION_POLL_MS", "2000").parse()?;

        let fixture_path = var_or("READ_MODEL_FIXTURE", "fixtures/sample_data.json");
        let source: ReadModelSourceKind = var_or("READ_MODEL_SOURCE", "static").parse()?;

        let dao_members: u64 = var_or("DAO_MEMBERS", "100").parse()?;
        let faucet_distribution_ratio = Decimal::from_str(&var_or("FAUCET_DISTRIBUTION_RATIO", "0.1"))?;

        Ok(Config {
            server: ServerConfig { port, host, rust_log },
            network: NetworkConfig {
                chain_id,
                chain_name,
                currency_name,
                currency_symbol,
                rpc_url: network_rpc_url,
                explorer_url,
            },
            contracts: ContractsConfig {
                aid_distribution,
                proposal_voting,
                faucet,
            },
            wallet: WalletConfig {
                rpc_url: wallet_rpc_url,
                confirmation_poll_ms,
            },
            read_model: ReadModelConfig {
                fixture_path,
                source,
            },
            governance: GovernanceConfig {
                dao_members,
                faucet_distribution_ratio,
            },
        })
    }
}

impl NetworkConfig {
    pub fn descriptor(&self) -> NetworkDescriptor {
        NetworkDescriptor {
            chain_id: self.chain_id,
            chain_name: self.chain_name.clone(),
            native_currency: NativeCurrency {
                name: self.currency_name.clone(),
                symbol: self.currency_symbol.clone(),
                decimals: 18,
            },
            rpc_urls: vec![self.rpc_url.clone()],
            block_explorer_urls: vec![self.explorer_url.clone()],
        }
    }
}

impl GovernanceConfig {
    pub fn params(&self) -> GovernanceParams {
        GovernanceParams {
            dao_members: self.dao_members,
            faucet_distribution_ratio: self.faucet_distribution_ratio,
        }
    }
}
