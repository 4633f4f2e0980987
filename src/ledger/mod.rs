//! LP share accounting.

mod share_ledger;

pub use share_ledger::ShareLedger;
