// ── WalletLens Atoms: Constants ────────────────────────────────────────────
// All named constants for the crate live here.

// ── ERC-20 method signatures recognised by the decoder ────────────────────
pub const TRANSFER_SIGNATURE: &str = "transfer(address,uint256)";
pub const APPROVE_SIGNATURE: &str = "approve(address,uint256)";
pub const BALANCE_OF_SIGNATURE: &str = "balanceOf(address)";

/// keccak256("transfer(address,uint256)")[..4]
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];
/// keccak256("approve(address,uint256)")[..4]
pub const APPROVE_SELECTOR: [u8; 4] = [0x09, 0x5e, 0xa7, 0xb3];

// Selector (4) + address word (32) + uint256 word (32).
pub const TWO_ARG_CALL_LEN: usize = 4 + 32 + 32;

// ── Polling / caching defaults ─────────────────────────────────────────────
// The dashboard refreshes history more often than balances; prices are
// refetched at most once per TTL window.
pub const DEFAULT_TRANSACTIONS_POLL_SECS: u64 = 10;
pub const DEFAULT_BALANCES_POLL_SECS: u64 = 30;
pub const DEFAULT_PRICE_TTL_SECS: u64 = 300; // 5 minutes
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_EXPLORER_MAX_PAGES: u32 = 100;

/// Default length of the "top counterparties" lists.
pub const DEFAULT_TOP_N: usize = 5;

// ── AirDAO deployment defaults ─────────────────────────────────────────────
pub const DEFAULT_RPC_URL: &str = "https://network.ambrosus.io/";
pub const DEFAULT_EXPLORER_URL: &str = "https://blockscout-explorer.airdao.io";
pub const DEFAULT_PRICE_API_URL: &str = "https://api.coingecko.com/api/v3";

pub const NATIVE_SYMBOL: &str = "AMB";
pub const NATIVE_DECIMALS: u8 = 18;
pub const NATIVE_PRICE_ID: &str = "amber";

/// Well-known ERC-20 tokens on AirDAO: (symbol, contract, decimals, price id)
pub const KNOWN_TOKENS: &[(&str, &str, u8, &str)] = &[
    ("ASTRA", "0x5cecbde7811ac0ed86be11827ae622b89bc429df", 18, "astra-2"),
    ("HBR", "0xd09270e917024e75086e27854740871f1c8e0e10", 18, "harbor-4"),
    ("USDC", "0xff9f502976e7bd2b4901ad7dd1131bb81e5567de", 6, "usd-coin"),
];

// ── Display placeholders ───────────────────────────────────────────────────
pub const NO_TRANSFER_LABEL: &str = "No transfer";
pub const UNKNOWN_TOKEN_TRANSFER_LABEL: &str = "Unknown token transfer";
pub const UNKNOWN_TOKEN_LABEL: &str = "unknown token";
pub const UNHANDLED_CALL_LABEL: &str = "Unhandled contract call";
pub const CONTRACT_CALL_PREFIX: &str = "Contract call";
pub const APPROVAL_PREFIX: &str = "Approval";

/// Shown in the "to" column when a transaction deploys a contract.
pub const CONTRACT_CREATION_LABEL: &str = "Contract Creation";
/// Counterparty key used when the wallet funds a contract deployment.
pub const CONTRACT_CREATION_KEY: &str = "contract-creation";

// ── Truncation widths (front, back) ───────────────────────────────────────
pub const TABLE_TRUNCATE: (usize, usize) = (10, 10);
pub const WIDGET_TRUNCATE: (usize, usize) = (6, 4);

// ── Environment overrides ─────────────────────────────────────────────────
pub const ENV_RPC_URL: &str = "WALLETLENS_RPC_URL";
pub const ENV_EXPLORER_URL: &str = "WALLETLENS_EXPLORER_URL";
pub const ENV_PRICE_API_URL: &str = "WALLETLENS_PRICE_API_URL";

pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; WalletLens/0.1)";
