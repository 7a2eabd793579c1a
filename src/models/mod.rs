mod holdings;
mod id;
mod ledger;

pub use holdings::{HoldingItem, HoldingsSnapshot};
pub use id::{AccountId, AssetId};
pub use ledger::{AssetCatalog, AssetMetadata, AssetReference, LedgerSnapshot, RawLedgerEntry};
