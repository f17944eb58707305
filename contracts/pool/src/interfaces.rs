// Client traits for the pool's external collaborators. The pool only
// ever talks to these through generated clients; any contract honoring
// the interface can stand in.

use soroban_sdk::{contractclient, Address, Env};

/// Oracle adapter surface: spot and historical quotes, both returned as
/// 18-decimal fixed-point prices of `base` denominated in `quote`.
#[contractclient(name = "OracleAdapterClient")]
pub trait OracleAdapter {
    fn quote(env: Env, base: Address, quote: Address) -> u128;
    fn quote_from(env: Env, base: Address, quote: Address, target: u64) -> u128;
}

/// User-settings surface gating `_for` operations: whether `operator`
/// may act for `user`, and the automation cost `user` has pre-approved
/// (collateral wad).
#[contractclient(name = "UserSettingsClient")]
pub trait UserSettings {
    fn is_authorized(env: Env, user: Address, operator: Address) -> bool;
    fn authorized_cost(env: Env, user: Address) -> u128;
}
